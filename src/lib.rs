//! # timegrid
//!
//! Slot-grid engine behind an appointment-booking day view: maps a day's
//! opening hours onto fixed-length slots, lays booked and invalid ranges over
//! them as status-tagged cells, and grows or restarts a contiguous selection
//! without letting it cross a blocked cell.

pub mod board;
pub mod calendar;
pub mod command;
pub mod config;
pub mod engine;
pub mod model;
pub mod observability;

pub use board::{Board, BoardView};
pub use config::BoardConfig;
pub use engine::{GridError, SelectionController, SlotGrid};
pub use model::{Cell, CellStatus, Selection, TimeOfDay, TimeRange, WorkMode};
