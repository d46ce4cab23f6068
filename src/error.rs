use thiserror::Error;

use crate::grid_config::{Direction, GridCoord, SlotId};

/// Reasons a grid structure can be rejected before any solving happens.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("Slot {slot_id} has length zero.")]
    EmptySlot { slot_id: SlotId },
    #[error("Slot {slot_id} ({direction:?} from {start_cell:?}) leaves the {width}x{height} grid.")]
    SlotOutOfBounds {
        slot_id: SlotId,
        start_cell: GridCoord,
        direction: Direction,
        width: usize,
        height: usize,
    },
    #[error("Slots {first} and {second} describe the same entry.")]
    DuplicateSlot { first: SlotId, second: SlotId },
    #[error("Slots {first} and {second} share more than one cell.")]
    AmbiguousOverlap { first: SlotId, second: SlotId },
}
