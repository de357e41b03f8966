//! Host-facing facade over the engine for one day.
//!
//! A [`Board`] holds the host props, the selection controller and the last
//! derived cells. Every prop or selection change re-derives the cells from
//! scratch.

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::debug;

use crate::calendar::{dates_by_week, WeekRow};
use crate::config::BoardConfig;
use crate::engine::*;
use crate::model::*;
use crate::observability::{CELLS_DERIVED, RECOMPUTES_TOTAL};

#[derive(Debug, Clone)]
pub struct Board {
    config: BoardConfig,
    now: NaiveDateTime,
    controller: SelectionController,
    grid: SlotGrid,
    occupied: Vec<TimeRange>,
    invalid: Vec<TimeRange>,
    cells: Vec<Cell>,
}

/// Everything the host renders, as one serializable snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardView {
    pub times: Vec<TimeOfDay>,
    pub labels: Vec<String>,
    pub cells: Vec<CellView>,
    pub is_selected: bool,
    pub selected_time_display: String,
    pub item_height: String,
    pub item_line_height: String,
    pub week: Vec<WeekRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellView {
    #[serde(flatten)]
    pub cell: Cell,
    pub mute: bool,
}

impl Board {
    /// `now` is the wall clock used for the past-slot rule.
    pub fn new(config: BoardConfig, now: NaiveDateTime) -> Self {
        let mut board = Self {
            config,
            now,
            controller: SelectionController::new(),
            grid: SlotGrid::default(),
            occupied: Vec::new(),
            invalid: Vec::new(),
            cells: Vec::new(),
        };
        board.recompute();
        board
    }

    /// Replace the props. The selection is kept while it still fits the new grid.
    pub fn set_config(&mut self, config: BoardConfig) {
        self.config = config;
        self.recompute();
    }

    pub fn set_now(&mut self, now: NaiveDateTime) {
        self.now = now;
        self.recompute();
    }

    fn recompute(&mut self) {
        self.grid = build_slot_grid(self.config.start_time, self.config.end_time, self.config.interval);
        if self.controller.discard_outside(&self.grid) {
            self.store_selected_times(None);
        }

        let cfg = &self.config;
        self.occupied = merge_ranges(&cfg.occupied);
        self.invalid = match cfg.mode {
            WorkMode::Edit => infer_invalid_ranges(
                cfg.selected_date,
                &self.grid,
                &self.occupied,
                &cfg.invalid,
                self.now,
            ),
            WorkMode::View => merge_ranges(&cfg.invalid),
        };
        self.cells = derive_cells(
            &self.grid,
            &self.occupied,
            &self.invalid,
            self.controller.selection(),
        );

        metrics::counter!(RECOMPUTES_TOTAL).increment(1);
        metrics::histogram!(CELLS_DERIVED).record(self.cells.len() as f64);
        debug!(
            date = %cfg.selected_date,
            slots = self.grid.len(),
            occupied = self.occupied.len(),
            invalid = self.invalid.len(),
            "recomputed board"
        );
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn grid(&self) -> &SlotGrid {
        &self.grid
    }

    pub fn times(&self) -> &[TimeOfDay] {
        self.grid.times()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn occupied_ranges(&self) -> &[TimeRange] {
        &self.occupied
    }

    pub fn invalid_ranges(&self) -> &[TimeRange] {
        &self.invalid
    }

    pub fn selection(&self) -> Selection {
        self.controller.selection()
    }

    pub fn selected_time_display(&self) -> String {
        preview_selected_times(&self.config.selected_times)
    }

    /// Both indices set and both host-side times present.
    pub fn is_selected(&self) -> bool {
        self.selection().is_selected() && !self.selected_time_display().is_empty()
    }

    pub fn item_height(&self) -> String {
        format!("{}rpx", self.config.height)
    }

    pub fn item_line_height(&self) -> String {
        format!("{}rpx", self.config.height * 1.5)
    }

    /// Whether a cell should be shown as non-interactive.
    pub fn is_mute(&self, cell: &Cell) -> bool {
        match self.config.mode {
            WorkMode::View => true,
            WorkMode::Edit => self
                .grid
                .get(cell.index)
                .is_none_or(|slot| is_past(slot, self.config.selected_date, self.now)),
        }
    }

    pub fn labels(&self) -> Vec<String> {
        (0..self.grid.len()).map(|i| slot_label(&self.grid, i)).collect()
    }

    // ── Events ────────────────────────────────────────────

    /// Pointer activation of the cell keyed by `index`.
    pub fn on_cell_activate(&mut self, index: usize) -> Result<(TimeOfDay, TimeOfDay)> {
        let times = self.controller.expand(&self.grid, &self.cells, index)?;
        self.store_selected_times(Some(times));
        self.recompute();
        Ok(times)
    }

    /// Stepper adjustment to the single slot `index + offset`.
    pub fn on_step(&mut self, index: usize, offset: i64) -> Result<(TimeOfDay, TimeOfDay)> {
        let times = self.controller.narrow(&self.grid, index, offset)?;
        self.store_selected_times(Some(times));
        self.recompute();
        Ok(times)
    }

    /// Select `[start, end]` directly, bypassing blocking checks. Bounds past
    /// the grid leave nothing selected.
    pub fn on_programmatic_select(&mut self, start: usize, end: usize) {
        self.controller.set_selection(start, end);
        let times = self.selection().bounds().and_then(|(s, e)| self.grid.resolve(s, e).ok());
        self.store_selected_times(times);
        self.recompute();
    }

    pub fn clear_selection(&mut self) {
        self.controller.clear();
        self.store_selected_times(None);
        self.recompute();
    }

    fn store_selected_times(&mut self, times: Option<(TimeOfDay, TimeOfDay)>) {
        self.config.selected_times = match times {
            Some((start, end)) => vec![start.to_string(), end.to_string()],
            None => vec![String::new(), String::new()],
        };
    }

    pub fn view(&self) -> BoardView {
        let date = self.config.selected_date;
        BoardView {
            times: self.grid.times().to_vec(),
            labels: self.labels(),
            cells: self
                .cells
                .iter()
                .map(|&cell| CellView {
                    cell,
                    mute: self.is_mute(&cell),
                })
                .collect(),
            is_selected: self.is_selected(),
            selected_time_display: self.selected_time_display(),
            item_height: self.item_height(),
            item_line_height: self.item_line_height(),
            week: dates_by_week(date, date),
        }
    }
}
