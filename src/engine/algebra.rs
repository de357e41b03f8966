use chrono::{NaiveDate, NaiveDateTime, Timelike};

use crate::model::*;

use super::GridError;

/// Last representable wall-clock value (`24:00`), allowed as a day end.
pub const END_OF_DAY: Minute = 24 * 60;

// ── Time-of-day conversion ────────────────────────────────────────

/// Parse `HH:MM` (one or two digits per component) into minutes since midnight.
pub fn time_to_minutes(s: &str) -> Result<Minute, GridError> {
    let invalid = || GridError::InvalidTime(s.to_string());
    let (hour, minute) = s.split_once(':').ok_or_else(invalid)?;

    let component = |part: &str| -> Result<Minute, GridError> {
        if part.is_empty() || part.len() > 2 || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        part.parse().map_err(|_| invalid())
    };

    let hour = component(hour)?;
    let minute = component(minute)?;
    if minute >= 60 {
        return Err(invalid());
    }
    let total = hour * 60 + minute;
    if total > END_OF_DAY {
        return Err(invalid());
    }
    Ok(total)
}

/// Inverse of [`time_to_minutes`], zero-padded `HH:MM`.
pub fn minutes_to_time(m: Minute) -> String {
    TimeOfDay::from_minutes(m).to_string()
}

// ── Slot grid ─────────────────────────────────────────────────────

/// The day's slot start times plus the nominal day end.
///
/// Slot `i` runs from `times[i]` to `times[i + 1]`, or to `day_end` for the
/// last slot. `times` is strictly increasing and never contains `day_end`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SlotGrid {
    times: Vec<TimeOfDay>,
    day_end: TimeOfDay,
}

impl SlotGrid {
    pub fn times(&self) -> &[TimeOfDay] {
        &self.times
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<TimeOfDay> {
        self.times.get(index).copied()
    }

    pub fn day_end(&self) -> TimeOfDay {
        self.day_end
    }

    pub fn is_last(&self, index: usize) -> bool {
        index + 1 == self.times.len()
    }

    /// Wall-clock end of slot `index`.
    pub fn slot_end(&self, index: usize) -> Option<TimeOfDay> {
        if index >= self.times.len() {
            None
        } else if self.is_last(index) {
            Some(self.day_end)
        } else {
            self.get(index + 1)
        }
    }

    pub fn slot_range(&self, index: usize) -> Option<TimeRange> {
        Some(TimeRange::new(self.get(index)?, self.slot_end(index)?))
    }

    /// Start time of slot `start` and end time of slot `end`.
    pub fn resolve(&self, start: usize, end: usize) -> Result<(TimeOfDay, TimeOfDay), GridError> {
        let out_of_range = |index: usize| GridError::slot_out_of_range(index, self.len());
        let start_time = self.get(start).ok_or_else(|| out_of_range(start))?;
        let end_time = self.slot_end(end).ok_or_else(|| out_of_range(end))?;
        Ok((start_time, end_time))
    }

    /// Checked conversion of a signed slot position into a grid index.
    pub fn checked_index(&self, index: i64) -> Result<usize, GridError> {
        usize::try_from(index)
            .ok()
            .filter(|&i| i < self.len())
            .ok_or(GridError::SlotOutOfRange {
                index,
                len: self.len(),
            })
    }
}

/// Step from `start` towards `end` (exclusive) every `interval` minutes.
///
/// A non-positive interval or an empty day yields an empty grid.
pub fn build_slot_grid(start: TimeOfDay, end: TimeOfDay, interval: i32) -> SlotGrid {
    let mut times = Vec::new();
    if interval > 0 {
        let step = interval as usize;
        times.extend(
            (start.minutes()..end.minutes())
                .step_by(step)
                .map(TimeOfDay::from_minutes),
        );
    }
    SlotGrid {
        times,
        day_end: end,
    }
}

// ── Range algebra ─────────────────────────────────────────────────

/// Sort by start and fold overlapping or touching ranges together.
///
/// The input is left untouched; a fresh, disjoint vector is returned.
pub fn merge_ranges(ranges: &[TimeRange]) -> Vec<TimeRange> {
    let mut sorted = ranges.to_vec();
    sorted.sort_by_key(|r| r.start);

    let mut merged: Vec<TimeRange> = Vec::with_capacity(sorted.len());
    for range in sorted {
        if let Some(last) = merged.last_mut()
            && range.start <= last.end {
                last.end = last.end.max(range.end);
                continue;
            }
        merged.push(range);
    }
    merged
}

/// Contiguous slot indices whose start minute lies in `[range.start, range.end)`.
///
/// When the range starts inside the slot before the first match, that slot is
/// included too, so a partial booking still claims its whole enclosing slot.
/// Returns `None` when no slot start falls inside the range.
pub fn range_to_slot_indices(grid: &[TimeOfDay], range: &TimeRange) -> Option<(usize, usize)> {
    let first = grid.partition_point(|t| *t < range.start);
    let past_end = grid.partition_point(|t| *t < range.end);
    if first >= past_end {
        return None;
    }

    let mut start = first;
    if start > 0 && grid[start] > range.start {
        start -= 1;
    }
    Some((start, past_end - 1))
}

// ── Past-slot rule ────────────────────────────────────────────────

/// Whether a slot on `date` starting at `slot` has already begun at `now`.
///
/// Earlier dates are always past and later dates never are. On the same day a
/// slot is past once the clock reaches its start minute.
pub fn is_past(slot: TimeOfDay, date: NaiveDate, now: NaiveDateTime) -> bool {
    let today = now.date();
    if date < today {
        return true;
    }
    if date > today {
        return false;
    }
    slot.minutes() <= now.time().hour() * 60 + now.time().minute()
}

// ── Display helpers ───────────────────────────────────────────────

/// Axis label for slot `index`: the day end on the last slot, the slot time on
/// the hour, otherwise blank.
pub fn slot_label(grid: &SlotGrid, index: usize) -> String {
    if grid.is_last(index) {
        return grid.day_end().to_string();
    }
    match grid.get(index) {
        Some(t) if t.on_the_hour() => t.to_string(),
        _ => String::new(),
    }
}

/// `"start-end"` for a complete pair of non-empty times, otherwise empty.
pub fn preview_selected_times<S: AsRef<str>>(times: &[S]) -> String {
    match times {
        [start, end] if !start.as_ref().is_empty() && !end.as_ref().is_empty() => {
            format!("{}-{}", start.as_ref(), end.as_ref())
        }
        _ => String::new(),
    }
}
