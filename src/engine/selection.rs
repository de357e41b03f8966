use tracing::debug;

use crate::model::*;
use crate::observability::EXPAND_TOTAL;

use super::algebra::SlotGrid;
use super::cells::is_blocked;
use super::GridError;

/// How an `expand` call changed the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpandOutcome {
    /// Nothing was selected; the target became a one-slot selection.
    Started,
    /// One bound moved to the target.
    Extended,
    /// A blocker sat between the selection and the target; restarted there.
    Collapsed,
    /// The target was strictly inside the selection.
    Unchanged,
}

impl ExpandOutcome {
    pub fn label(self) -> &'static str {
        match self {
            ExpandOutcome::Started => "start",
            ExpandOutcome::Extended => "extend",
            ExpandOutcome::Collapsed => "collapse",
            ExpandOutcome::Unchanged => "unchanged",
        }
    }
}

/// Owns the selected slot span and applies pointer-driven edits to it.
///
/// Blocking checks run against the cells of the previous derivation; the
/// caller re-derives cells after every successful edit.
#[derive(Debug, Clone, Default)]
pub struct SelectionController {
    selection: Selection,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Overwrite the selection. Bounds given in either order are stored low, high.
    pub fn set_selection(&mut self, start: usize, end: usize) {
        self.selection = Selection::Selected {
            start: start.min(end),
            end: start.max(end),
        };
    }

    /// External reset back to nothing selected.
    pub fn clear(&mut self) {
        self.selection = Selection::Unselected;
    }

    /// Drop a selection that no longer fits `grid`. Returns true if one was dropped.
    pub fn discard_outside(&mut self, grid: &SlotGrid) -> bool {
        if self.selection.is_selected() && self.selection.bounds_within(grid.len()).is_none() {
            debug!(selection = ?self.selection, slots = grid.len(), "dropping selection outside grid");
            self.selection = Selection::Unselected;
            return true;
        }
        false
    }

    /// Grow or restart the selection towards the clicked slot `target`.
    ///
    /// Moving a bound outwards is refused when any occupied or invalid cell
    /// lies between the bound and the target (both inclusive); the selection
    /// then restarts as the single slot `target`. A stored selection that
    /// reaches past the grid counts as no selection. Returns the resolved
    /// start and end times.
    pub fn expand(
        &mut self,
        grid: &SlotGrid,
        cells: &[Cell],
        target: usize,
    ) -> Result<(TimeOfDay, TimeOfDay), GridError> {
        if target >= grid.len() {
            return Err(GridError::slot_out_of_range(target, grid.len()));
        }

        let (start, end, outcome) = match self.selection.bounds_within(grid.len()) {
            None => (target, target, ExpandOutcome::Started),
            Some((start, end)) if target <= start => {
                if is_blocked(cells, target, start) {
                    (target, target, ExpandOutcome::Collapsed)
                } else {
                    (target, end, ExpandOutcome::Extended)
                }
            }
            Some((start, end)) if target >= end => {
                if is_blocked(cells, end, target) {
                    (target, target, ExpandOutcome::Collapsed)
                } else {
                    (start, target, ExpandOutcome::Extended)
                }
            }
            Some((start, end)) => (start, end, ExpandOutcome::Unchanged),
        };

        let times = grid.resolve(start, end)?;
        self.selection = Selection::Selected { start, end };

        debug!(clicked = target, start, end, outcome = outcome.label(), "expand");
        metrics::counter!(EXPAND_TOTAL, "outcome" => outcome.label()).increment(1);
        Ok(times)
    }

    /// Collapse to the single slot `target + offset`, without blocking checks.
    pub fn narrow(
        &mut self,
        grid: &SlotGrid,
        target: usize,
        offset: i64,
    ) -> Result<(TimeOfDay, TimeOfDay), GridError> {
        let position = i64::try_from(target)
            .ok()
            .and_then(|t| t.checked_add(offset))
            .ok_or_else(|| GridError::slot_out_of_range(usize::MAX, grid.len()))?;
        let index = grid.checked_index(position)?;
        let times = grid.resolve(index, index)?;
        self.selection = Selection::Selected {
            start: index,
            end: index,
        };
        debug!(clicked = target, offset, index, "narrow");
        Ok(times)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::algebra::build_slot_grid;
    use crate::engine::cells::derive_cells;

    fn t(s: &str) -> TimeOfDay {
        s.parse().unwrap()
    }

    fn r(start: &str, end: &str) -> TimeRange {
        TimeRange::parse(start, end).unwrap()
    }

    struct Fixture {
        grid: SlotGrid,
        occupied: Vec<TimeRange>,
        ctl: SelectionController,
    }

    impl Fixture {
        fn new(start: &str, end: &str, interval: i32, occupied: Vec<TimeRange>) -> Self {
            Self {
                grid: build_slot_grid(t(start), t(end), interval),
                occupied,
                ctl: SelectionController::new(),
            }
        }

        fn cells(&self) -> Vec<Cell> {
            derive_cells(&self.grid, &self.occupied, &[], self.ctl.selection())
        }

        fn expand(&mut self, target: usize) -> (String, String) {
            let cells = self.cells();
            let (s, e) = self.ctl.expand(&self.grid, &cells, target).unwrap();
            (s.to_string(), e.to_string())
        }
    }

    #[test]
    fn first_click_selects_one_slot() {
        let mut f = Fixture::new("09:00", "12:00", 60, vec![]);
        assert_eq!(f.expand(1), ("10:00".into(), "11:00".into()));
        assert_eq!(f.ctl.selection(), Selection::Selected { start: 1, end: 1 });
    }

    #[test]
    fn extend_downwards_without_blockers() {
        let mut f = Fixture::new("09:00", "12:00", 60, vec![]);
        f.expand(1);
        assert_eq!(f.expand(0), ("09:00".into(), "11:00".into()));
        assert_eq!(f.ctl.selection(), Selection::Selected { start: 0, end: 1 });
    }

    #[test]
    fn extend_upwards_to_last_slot_uses_day_end() {
        let mut f = Fixture::new("09:00", "12:00", 60, vec![]);
        f.expand(0);
        assert_eq!(f.expand(2), ("09:00".into(), "12:00".into()));
        assert_eq!(f.ctl.selection(), Selection::Selected { start: 0, end: 2 });
    }

    #[test]
    fn blocked_below_restarts_at_target() {
        let mut f = Fixture::new("09:00", "12:00", 60, vec![r("09:00", "10:00")]);
        f.expand(1);
        assert_eq!(f.expand(0), ("09:00".into(), "10:00".into()));
        assert_eq!(f.ctl.selection(), Selection::Selected { start: 0, end: 0 });
    }

    #[test]
    fn blocked_above_restarts_at_target() {
        let mut f = Fixture::new("09:00", "14:00", 60, vec![r("11:00", "12:00")]);
        f.expand(0);
        f.expand(1);
        assert_eq!(f.expand(4), ("13:00".into(), "14:00".into()));
        assert_eq!(f.ctl.selection(), Selection::Selected { start: 4, end: 4 });
    }

    #[test]
    fn click_inside_selection_keeps_bounds() {
        let mut f = Fixture::new("09:00", "14:00", 60, vec![]);
        f.expand(0);
        f.expand(4);
        assert_eq!(f.expand(2), ("09:00".into(), "14:00".into()));
        assert_eq!(f.ctl.selection(), Selection::Selected { start: 0, end: 4 });
    }

    #[test]
    fn click_on_start_bound_shrinks_nothing() {
        let mut f = Fixture::new("09:00", "14:00", 60, vec![]);
        f.expand(1);
        f.expand(3);
        assert_eq!(f.expand(1), ("10:00".into(), "13:00".into()));
        assert_eq!(f.ctl.selection(), Selection::Selected { start: 1, end: 3 });
    }

    #[test]
    fn expand_out_of_grid_is_rejected() {
        let mut f = Fixture::new("09:00", "12:00", 60, vec![]);
        f.expand(1);
        let cells = f.cells();
        let err = f.ctl.expand(&f.grid, &cells, 3).unwrap_err();
        assert_eq!(err, GridError::SlotOutOfRange { index: 3, len: 3 });
        assert_eq!(f.ctl.selection(), Selection::Selected { start: 1, end: 1 });
    }

    #[test]
    fn narrow_moves_single_slot() {
        let mut f = Fixture::new("09:00", "12:00", 60, vec![r("10:00", "11:00")]);
        f.expand(0);
        // narrow ignores blockers
        let (s, e) = f.ctl.narrow(&f.grid, 0, 1).unwrap();
        assert_eq!((s, e), (t("10:00"), t("11:00")));
        assert_eq!(f.ctl.selection(), Selection::Selected { start: 1, end: 1 });
        let (s, e) = f.ctl.narrow(&f.grid, 1, -1).unwrap();
        assert_eq!((s, e), (t("09:00"), t("10:00")));
    }

    #[test]
    fn narrow_past_either_end_is_rejected() {
        let mut f = Fixture::new("09:00", "12:00", 60, vec![]);
        f.ctl.set_selection(0, 0);
        assert_eq!(
            f.ctl.narrow(&f.grid, 0, -1),
            Err(GridError::SlotOutOfRange { index: -1, len: 3 })
        );
        assert_eq!(
            f.ctl.narrow(&f.grid, 2, 1),
            Err(GridError::SlotOutOfRange { index: 3, len: 3 })
        );
        assert_eq!(f.ctl.selection(), Selection::Selected { start: 0, end: 0 });
    }

    #[test]
    fn stale_selection_restarts_at_click() {
        let mut f = Fixture::new("09:00", "12:00", 60, vec![]);
        f.ctl.set_selection(5, 9);
        assert_eq!(f.expand(0), ("09:00".into(), "10:00".into()));
        assert_eq!(f.ctl.selection(), Selection::Selected { start: 0, end: 0 });

        f.ctl.set_selection(1, 3);
        assert_eq!(f.expand(2), ("11:00".into(), "12:00".into()));
        assert_eq!(f.ctl.selection(), Selection::Selected { start: 2, end: 2 });
    }

    #[test]
    fn discard_outside_only_drops_what_does_not_fit() {
        let grid = build_slot_grid(t("09:00"), t("12:00"), 60);
        let mut ctl = SelectionController::new();
        assert!(!ctl.discard_outside(&grid));

        ctl.set_selection(0, 2);
        assert!(!ctl.discard_outside(&grid));
        assert_eq!(ctl.selection(), Selection::Selected { start: 0, end: 2 });

        ctl.set_selection(2, 3);
        assert!(ctl.discard_outside(&grid));
        assert_eq!(ctl.selection(), Selection::Unselected);
    }

    #[test]
    fn narrow_with_overflowing_offset_is_rejected() {
        let mut f = Fixture::new("09:00", "12:00", 60, vec![]);
        f.ctl.set_selection(1, 1);
        assert_eq!(
            f.ctl.narrow(&f.grid, i64::MAX as usize, 1),
            Err(GridError::SlotOutOfRange { index: i64::MAX, len: 3 })
        );
        assert_eq!(
            f.ctl.narrow(&f.grid, usize::MAX, -1),
            Err(GridError::SlotOutOfRange { index: i64::MAX, len: 3 })
        );
        assert_eq!(
            f.ctl.narrow(&f.grid, 0, i64::MIN),
            Err(GridError::SlotOutOfRange { index: i64::MIN, len: 3 })
        );
        assert_eq!(f.ctl.selection(), Selection::Selected { start: 1, end: 1 });
    }

    #[test]
    fn expand_reports_huge_target_without_wrapping() {
        let mut f = Fixture::new("09:00", "12:00", 60, vec![]);
        let cells = f.cells();
        assert_eq!(
            f.ctl.expand(&f.grid, &cells, usize::MAX),
            Err(GridError::SlotOutOfRange { index: i64::MAX, len: 3 })
        );
    }

    #[test]
    fn set_selection_orders_bounds_and_clear_resets() {
        let mut ctl = SelectionController::new();
        ctl.set_selection(4, 2);
        assert_eq!(ctl.selection(), Selection::Selected { start: 2, end: 4 });
        ctl.clear();
        assert_eq!(ctl.selection(), Selection::Unselected);
    }

    #[test]
    fn outcome_labels() {
        assert_eq!(ExpandOutcome::Started.label(), "start");
        assert_eq!(ExpandOutcome::Collapsed.label(), "collapse");
    }
}
