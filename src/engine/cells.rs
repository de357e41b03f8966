use chrono::{NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::model::*;

use super::algebra::{is_past, merge_ranges, range_to_slot_indices, SlotGrid};

/// Slot indices already given a non-idle status during one derivation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimedSlots(Vec<bool>);

impl ClaimedSlots {
    pub fn new(len: usize) -> Self {
        Self(vec![false; len])
    }

    /// Mark `[start, end]` claimed. Indices past the grid are ignored.
    pub fn claim(&mut self, start: usize, end: usize) {
        let len = self.0.len();
        if start >= len || start > end {
            return;
        }
        self.0[start..=end.min(len - 1)].fill(true);
    }

    pub fn is_claimed(&self, index: usize) -> bool {
        self.0.get(index).copied().unwrap_or(false)
    }

    pub fn unclaimed(&self) -> impl Iterator<Item = usize> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter(|(_, claimed)| !**claimed)
            .map(|(i, _)| i)
    }
}

fn push_span(cells: &mut Vec<Cell>, claimed: &mut ClaimedSlots, start: usize, end: usize, status: CellStatus) {
    cells.push(Cell::spanning(start, end, status));
    claimed.claim(start, end);
}

fn push_ranges(
    cells: &mut Vec<Cell>,
    claimed: &mut ClaimedSlots,
    grid: &SlotGrid,
    ranges: &[TimeRange],
    status: CellStatus,
) {
    for range in ranges {
        if let Some((start, end)) = range_to_slot_indices(grid.times(), range) {
            push_span(cells, claimed, start, end, status);
        }
    }
}

/// Build the full cell list for one day.
///
/// Layering: occupied, then invalid, then the selection, then one idle cell
/// per slot nobody claimed. Later layers do not check earlier claims, so a
/// slot covered by two categories yields two overlapping cells. A selection
/// reaching past the grid is not drawn. Output is sorted by `index`.
pub fn derive_cells(
    grid: &SlotGrid,
    occupied: &[TimeRange],
    invalid: &[TimeRange],
    selection: Selection,
) -> Vec<Cell> {
    let mut cells = Vec::with_capacity(grid.len());
    let mut claimed = ClaimedSlots::new(grid.len());

    push_ranges(&mut cells, &mut claimed, grid, occupied, CellStatus::Occupied);
    push_ranges(&mut cells, &mut claimed, grid, invalid, CellStatus::Invalid);

    if let Some((start, end)) = selection.bounds_within(grid.len()) {
        push_span(&mut cells, &mut claimed, start, end, CellStatus::Selected);
    }

    cells.extend(claimed.unclaimed().map(|i| Cell::single(i, CellStatus::Idle)));

    cells.sort_by_key(|c| c.index);

    debug!(slots = grid.len(), cells = cells.len(), ?selection, "derived cells");
    cells
}

/// True iff any cell with index in `[lo, hi]` is occupied or invalid.
pub fn is_blocked(cells: &[Cell], lo: usize, hi: usize) -> bool {
    cells
        .iter()
        .any(|c| lo <= c.index && c.index <= hi && c.status.is_blocking())
}

/// Invalid ranges while editing: every slot not under an occupied range whose
/// start is already past on `date`, merged with the externally supplied ones.
pub fn infer_invalid_ranges(
    date: NaiveDate,
    grid: &SlotGrid,
    occupied: &[TimeRange],
    external: &[TimeRange],
    now: NaiveDateTime,
) -> Vec<TimeRange> {
    let mut covered = ClaimedSlots::new(grid.len());
    for range in occupied {
        if let Some((start, end)) = range_to_slot_indices(grid.times(), range) {
            covered.claim(start, end);
        }
    }

    let mut ranges = external.to_vec();
    for index in covered.unclaimed() {
        let Some(slot) = grid.slot_range(index) else {
            continue;
        };
        if is_past(slot.start, date, now) {
            ranges.push(slot);
        }
    }

    merge_ranges(&ranges)
}
