use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("invalid time of day: {0:?}")]
    InvalidTime(String),

    #[error("invalid date: {0:?}")]
    InvalidDate(String),

    #[error("slot {index} out of range: grid has {len} slots")]
    SlotOutOfRange { index: i64, len: usize },

    #[error("invalid command: {0}")]
    InvalidCommand(String),
}

pub type Result<T> = std::result::Result<T, GridError>;

impl GridError {
    /// Out-of-range error for an unsigned slot position. Positions beyond
    /// `i64::MAX` are reported as `i64::MAX`.
    pub fn slot_out_of_range(index: usize, len: usize) -> Self {
        GridError::SlotOutOfRange {
            index: i64::try_from(index).unwrap_or(i64::MAX),
            len,
        }
    }
}
