//! Slot-grid engine: time algebra, cell derivation and the selection controller.
//!
//! Everything here is synchronous and side-effect free apart from the
//! [`SelectionController`] state; callers re-derive cells after each change.

mod algebra;
mod cells;
mod error;
mod selection;

pub use algebra::{
    build_slot_grid, is_past, merge_ranges, minutes_to_time, preview_selected_times,
    range_to_slot_indices, slot_label, time_to_minutes, SlotGrid, END_OF_DAY,
};
pub use cells::{derive_cells, infer_invalid_ranges, is_blocked, ClaimedSlots};
pub use error::{GridError, Result};
pub use selection::{ExpandOutcome, SelectionController};
