//! Fill crossword grids by treating each slot as a variable in a constraint satisfaction problem.
//!
//! Domains start out as the full word list for every slot. They're pruned by node consistency
//! (word length) and then by AC-3 (crossing letters), after which a backtracking search using the
//! MRV/degree and least-constraining-value heuristics looks for a complete fill.

pub mod arc_consistency;
pub mod backtracking_search;
pub mod consistency;
pub mod domains;
pub mod error;
pub mod grid_config;
pub mod heuristics;
pub mod render;
pub mod word_list;

pub use backtracking_search::{
    find_fill, find_fill_with_options, Assignment, FillFailure, FillOptions, FillSuccess, Filler,
    Propagation, Statistics,
};
pub use domains::DomainStore;
pub use error::GridError;
pub use grid_config::{Direction, GridConfig, Slot, SlotId};
pub use render::{letter_grid, render_grid, render_image};
pub use word_list::{WordId, WordList};

/// The expected maximum length for a single slot.
pub const MAX_SLOT_LENGTH: usize = 21;
