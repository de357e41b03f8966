use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::engine::{time_to_minutes, GridError};

/// Minutes since local midnight, the only time unit inside the engine.
pub type Minute = u32;

/// A wall-clock `HH:MM` value, stored as a minute offset.
///
/// Parsing goes through [`time_to_minutes`]; formatting is zero-padded.
/// `24:00` is accepted so a day can end at midnight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(Minute);

impl TimeOfDay {
    pub const fn from_minutes(minutes: Minute) -> Self {
        Self(minutes)
    }

    pub const fn minutes(self) -> Minute {
        self.0
    }

    /// True when the minute component is zero.
    pub fn on_the_hour(self) -> bool {
        self.0 % 60 == 0
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

impl FromStr for TimeOfDay {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        time_to_minutes(s).map(Self)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = GridError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(t: TimeOfDay) -> Self {
        t.to_string()
    }
}

/// Half-open wall-clock range `[start, end)`.
///
/// Serialized as a two-element array: `["09:00", "10:30"]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(TimeOfDay, TimeOfDay)", into = "(TimeOfDay, TimeOfDay)")]
pub struct TimeRange {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl TimeRange {
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> Self {
        Self { start, end }
    }

    /// Parse both ends of a range from `HH:MM` strings.
    pub fn parse(start: &str, end: &str) -> Result<Self, GridError> {
        Ok(Self::new(start.parse()?, end.parse()?))
    }

    pub fn contains_minute(&self, m: Minute) -> bool {
        self.start.minutes() <= m && m < self.end.minutes()
    }
}

impl From<(TimeOfDay, TimeOfDay)> for TimeRange {
    fn from((start, end): (TimeOfDay, TimeOfDay)) -> Self {
        Self::new(start, end)
    }
}

impl From<TimeRange> for (TimeOfDay, TimeOfDay) {
    fn from(r: TimeRange) -> Self {
        (r.start, r.end)
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// What a cell shows. Occupied and Invalid block selection growth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellStatus {
    Idle,
    Selected,
    Occupied,
    Invalid,
    Expired,
}

impl CellStatus {
    pub fn is_blocking(self) -> bool {
        matches!(self, CellStatus::Occupied | CellStatus::Invalid)
    }
}

/// One rendered unit covering the contiguous slots `[index, row_end - 2]`.
///
/// `row_start`/`row_end` are 1-based, end-exclusive layout rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub index: usize,
    pub row_start: usize,
    pub row_end: usize,
    pub status: CellStatus,
}

impl Cell {
    /// A cell spanning slots `[start, end]` inclusive. Requires `start <= end`.
    pub fn spanning(start: usize, end: usize, status: CellStatus) -> Self {
        debug_assert!(start <= end, "cell start must not pass its end");
        Self {
            index: start,
            row_start: start + 1,
            row_end: end + 2,
            status,
        }
    }

    pub fn single(index: usize, status: CellStatus) -> Self {
        Self::spanning(index, index, status)
    }

    /// Last slot index covered by this cell.
    pub fn last_index(&self) -> usize {
        self.row_end - 2
    }

    pub fn slot_count(&self) -> usize {
        self.row_end - self.row_start
    }
}

/// Selected slot indices. Both ends are set or neither is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "state")]
pub enum Selection {
    #[default]
    Unselected,
    Selected { start: usize, end: usize },
}

impl Selection {
    pub fn bounds(self) -> Option<(usize, usize)> {
        match self {
            Selection::Unselected => None,
            Selection::Selected { start, end } => Some((start, end)),
        }
    }

    pub fn is_selected(self) -> bool {
        matches!(self, Selection::Selected { .. })
    }

    /// Bounds, but only when both ends name slots of a `len`-slot grid.
    pub fn bounds_within(self, len: usize) -> Option<(usize, usize)> {
        self.bounds().filter(|&(_, end)| end < len)
    }
}

/// Whether the host is editing availability or only viewing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkMode {
    #[default]
    Edit,
    View,
}
