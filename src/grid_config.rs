//! The static shape of a puzzle: which slots exist, where they sit, and how they cross each other.
//! Nothing in here changes while filling.

use std::collections::HashMap;

use log::debug;
use smallvec::SmallVec;

use crate::error::GridError;
use crate::MAX_SLOT_LENGTH;

/// An identifier for a given slot, based on its index in the GridConfig's `slot_configs` field.
pub type SlotId = usize;

/// Zero-indexed (row, column) coords for a cell in the grid, where row 0 is the top row.
pub type GridCoord = (usize, usize);

/// The character marking an open cell in a structure file. Anything else is a block.
pub const OPEN_CELL: char = '_';

/// Direction that a slot is facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Across,
    Down,
}

/// A word position in the grid. Two slots are the same slot iff all of these fields match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Slot {
    pub start_cell: GridCoord,
    pub length: usize,
    pub direction: Direction,
}

impl Slot {
    pub fn new(row: usize, col: usize, length: usize, direction: Direction) -> Slot {
        Slot {
            start_cell: (row, col),
            length,
            direction,
        }
    }

    /// The coords of the cell at `cell_idx` within this slot.
    pub fn cell(&self, cell_idx: usize) -> GridCoord {
        let (row, col) = self.start_cell;
        match self.direction {
            Direction::Across => (row, col + cell_idx),
            Direction::Down => (row + cell_idx, col),
        }
    }

    /// Like `cell`, but `None` if the coords don't fit in a `usize`.
    pub fn checked_cell(&self, cell_idx: usize) -> Option<GridCoord> {
        let (row, col) = self.start_cell;
        match self.direction {
            Direction::Across => col.checked_add(cell_idx).map(|col| (row, col)),
            Direction::Down => row.checked_add(cell_idx).map(|row| (row, col)),
        }
    }

    /// Generate the coords for each cell of this slot.
    pub fn cell_coords(&self) -> impl Iterator<Item = GridCoord> + '_ {
        (0..self.length).map(move |cell_idx| self.cell(cell_idx))
    }
}

/// A crossing between one slot and another: the letter at `cell` in this slot has to match the
/// letter at `other_slot_cell` in the other slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crossing {
    pub other_slot_id: SlotId,
    pub cell: usize,
    pub other_slot_cell: usize,
}

/// A slot along with its crossings, which are kept sorted by `other_slot_id`.
#[derive(Debug, Clone)]
pub struct SlotConfig {
    pub id: SlotId,
    pub slot: Slot,
    pub crossings: SmallVec<[Crossing; MAX_SLOT_LENGTH]>,
}

/// A struct representing the aspects of a grid that are static during filling.
#[derive(Debug, Clone)]
pub struct GridConfig {
    pub width: usize,
    pub height: usize,
    open_cells: Vec<Vec<bool>>,
    pub slot_configs: Vec<SlotConfig>,
}

impl GridConfig {
    /// Build a grid from explicit slots. The open cells are exactly the cells covered by at least
    /// one slot.
    pub fn new(width: usize, height: usize, slots: Vec<Slot>) -> Result<GridConfig, GridError> {
        let mut open_cells = vec![vec![false; width]; height];

        for (slot_id, slot) in slots.iter().enumerate() {
            if slot.length == 0 {
                return Err(GridError::EmptySlot { slot_id });
            }
            let in_bounds = match slot.checked_cell(slot.length - 1) {
                Some((last_row, last_col)) => last_row < height && last_col < width,
                None => false,
            };
            if !in_bounds {
                return Err(GridError::SlotOutOfBounds {
                    slot_id,
                    start_cell: slot.start_cell,
                    direction: slot.direction,
                    width,
                    height,
                });
            }
            for (row, col) in slot.cell_coords() {
                open_cells[row][col] = true;
            }
        }

        GridConfig::build(width, height, open_cells, slots)
    }

    /// Parse a structure file, where `_` is an open cell and anything else is a block. Slots are
    /// numbered in reading order, with an across slot coming before a down slot that starts in
    /// the same cell. Runs of a single open cell don't form a slot.
    pub fn from_structure(structure: &str) -> Result<GridConfig, GridError> {
        let rows: Vec<Vec<bool>> = structure
            .lines()
            .map(|line| {
                line.trim_end_matches('\r')
                    .chars()
                    .map(|c| c == OPEN_CELL)
                    .collect()
            })
            .collect();

        let height = rows.len();
        let width = rows.iter().map(|row| row.len()).max().unwrap_or(0);

        let open_cells: Vec<Vec<bool>> = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, false);
                row
            })
            .collect();

        let is_open = |row: usize, col: usize| row < height && col < width && open_cells[row][col];
        let run_length = |row: usize, col: usize, direction: Direction| {
            (0..)
                .take_while(|&k| match direction {
                    Direction::Across => is_open(row, col + k),
                    Direction::Down => is_open(row + k, col),
                })
                .count()
        };

        let mut slots: Vec<Slot> = vec![];
        for row in 0..height {
            for col in 0..width {
                if !open_cells[row][col] {
                    continue;
                }

                if col == 0 || !open_cells[row][col - 1] {
                    let length = run_length(row, col, Direction::Across);
                    if length > 1 {
                        slots.push(Slot::new(row, col, length, Direction::Across));
                    }
                }

                if row == 0 || !open_cells[row - 1][col] {
                    let length = run_length(row, col, Direction::Down);
                    if length > 1 {
                        slots.push(Slot::new(row, col, length, Direction::Down));
                    }
                }
            }
        }

        GridConfig::build(width, height, open_cells, slots)
    }

    fn build(
        width: usize,
        height: usize,
        open_cells: Vec<Vec<bool>>,
        slots: Vec<Slot>,
    ) -> Result<GridConfig, GridError> {
        let mut slot_ids_by_slot: HashMap<Slot, SlotId> = HashMap::with_capacity(slots.len());
        for (slot_id, &slot) in slots.iter().enumerate() {
            if let Some(&first) = slot_ids_by_slot.get(&slot) {
                return Err(GridError::DuplicateSlot {
                    first,
                    second: slot_id,
                });
            }
            slot_ids_by_slot.insert(slot, slot_id);
        }

        // (slot id, cell index within slot) for every slot passing through each cell.
        let mut entries_by_loc: HashMap<GridCoord, SmallVec<[(SlotId, usize); 2]>> =
            HashMap::new();
        for (slot_id, slot) in slots.iter().enumerate() {
            for (cell_idx, loc) in slot.cell_coords().enumerate() {
                entries_by_loc
                    .entry(loc)
                    .or_default()
                    .push((slot_id, cell_idx));
            }
        }

        let mut slot_configs: Vec<SlotConfig> = Vec::with_capacity(slots.len());
        for (slot_id, &slot) in slots.iter().enumerate() {
            let mut crossings: SmallVec<[Crossing; MAX_SLOT_LENGTH]> = SmallVec::new();

            for (cell_idx, loc) in slot.cell_coords().enumerate() {
                for &(other_slot_id, other_slot_cell) in &entries_by_loc[&loc] {
                    if other_slot_id == slot_id {
                        continue;
                    }
                    if crossings.iter().any(|c: &Crossing| c.other_slot_id == other_slot_id) {
                        return Err(GridError::AmbiguousOverlap {
                            first: slot_id.min(other_slot_id),
                            second: slot_id.max(other_slot_id),
                        });
                    }
                    crossings.push(Crossing {
                        other_slot_id,
                        cell: cell_idx,
                        other_slot_cell,
                    });
                }
            }

            crossings.sort_by_key(|crossing| crossing.other_slot_id);
            slot_configs.push(SlotConfig {
                id: slot_id,
                slot,
                crossings,
            });
        }

        debug!(
            "Built {}x{} grid with {} slots",
            width,
            height,
            slot_configs.len()
        );

        Ok(GridConfig {
            width,
            height,
            open_cells,
            slot_configs,
        })
    }

    pub fn slot_count(&self) -> usize {
        self.slot_configs.len()
    }

    pub fn slots(&self) -> impl Iterator<Item = &Slot> + '_ {
        self.slot_configs.iter().map(|slot_config| &slot_config.slot)
    }

    pub fn slot(&self, slot_id: SlotId) -> &Slot {
        &self.slot_configs[slot_id].slot
    }

    /// Look up the id of a slot by its identity.
    pub fn slot_id(&self, slot: &Slot) -> Option<SlotId> {
        self.slot_configs.iter().position(|slot_config| slot_config.slot == *slot)
    }

    pub fn crossings(&self, slot_id: SlotId) -> &[Crossing] {
        &self.slot_configs[slot_id].crossings
    }

    /// Every slot sharing a cell with `slot_id`, in slot id order.
    pub fn neighbors(&self, slot_id: SlotId) -> impl Iterator<Item = SlotId> + '_ {
        self.crossings(slot_id)
            .iter()
            .map(|crossing| crossing.other_slot_id)
    }

    /// The cell indices `(i, j)` such that letter `i` of `x` has to equal letter `j` of `y`, or
    /// `None` if they don't cross.
    pub fn overlap(&self, x: SlotId, y: SlotId) -> Option<(usize, usize)> {
        self.crossings(x)
            .iter()
            .find(|crossing| crossing.other_slot_id == y)
            .map(|crossing| (crossing.cell, crossing.other_slot_cell))
    }

    /// Every ordered pair `(slot, neighbor)` in the grid, grouped by slot.
    pub fn arcs(&self) -> Vec<(SlotId, SlotId)> {
        self.slot_configs
            .iter()
            .flat_map(|slot_config| {
                slot_config
                    .crossings
                    .iter()
                    .map(move |crossing| (slot_config.id, crossing.other_slot_id))
            })
            .collect()
    }

    pub fn is_open(&self, (row, col): GridCoord) -> bool {
        row < self.height && col < self.width && self.open_cells[row][col]
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use crate::error::GridError;
    use crate::grid_config::{Direction, GridConfig, Slot};

    /// #___#
    /// #_##_
    /// #_##_
    /// #_##_
    /// #____
    #[test]
    fn test_from_structure_finds_slots_in_reading_order() {
        let config = GridConfig::from_structure("#___#\n#_##_\n#_##_\n#_##_\n#____\n")
            .unwrap();

        assert_eq!((config.width, config.height), (5, 5));
        assert_eq!(
            config.slots().copied().collect::<Vec<_>>(),
            vec![
                Slot::new(0, 1, 3, Direction::Across),
                Slot::new(0, 1, 5, Direction::Down),
                Slot::new(1, 4, 4, Direction::Down),
                Slot::new(4, 1, 4, Direction::Across),
            ],
        );

        assert_eq!(config.overlap(0, 1), Some((0, 0)));
        assert_eq!(config.overlap(1, 0), Some((0, 0)));
        assert_eq!(config.overlap(1, 3), Some((4, 0)));
        assert_eq!(config.overlap(3, 2), Some((3, 3)));
        assert_eq!(config.overlap(0, 2), None);
        assert_eq!(config.neighbors(1).collect::<Vec<_>>(), vec![0, 3]);
        assert_eq!(config.neighbors(3).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_from_structure_pads_short_rows_with_blocks() {
        let config = GridConfig::from_structure("___\n_\n_\r\n").unwrap();

        assert_eq!((config.width, config.height), (3, 3));
        assert!(config.is_open((2, 0)));
        assert!(!config.is_open((1, 2)));
        assert_eq!(config.slot_count(), 2);
        assert_eq!(
            config.slot_id(&Slot::new(0, 0, 3, Direction::Down)),
            Some(1)
        );
    }

    #[test]
    fn test_single_cells_do_not_form_slots() {
        let config = GridConfig::from_structure("_#_\n###\n_#_").unwrap();
        assert_eq!(config.slot_count(), 0);
        assert!(config.arcs().is_empty());
    }

    #[test]
    fn test_overlap_is_symmetric() {
        let config = GridConfig::new(
            3,
            3,
            vec![
                Slot::new(1, 0, 3, Direction::Across),
                Slot::new(0, 2, 3, Direction::Down),
            ],
        )
        .unwrap();

        assert_eq!(config.overlap(0, 1), Some((2, 1)));
        assert_eq!(config.overlap(1, 0), Some((1, 2)));
        assert_eq!(config.arcs(), vec![(0, 1), (1, 0)]);
        assert!(config.is_open((1, 1)));
        assert!(!config.is_open((0, 0)));
    }

    #[test]
    fn test_malformed_slots_are_rejected() {
        assert_eq!(
            GridConfig::new(3, 3, vec![Slot::new(0, 0, 0, Direction::Across)])
                .unwrap_err(),
            GridError::EmptySlot { slot_id: 0 },
        );

        assert!(matches!(
            GridConfig::new(3, 3, vec![Slot::new(1, 1, 3, Direction::Down)]),
            Err(GridError::SlotOutOfBounds { slot_id: 0, .. }),
        ));

        assert_eq!(
            GridConfig::new(
                3,
                3,
                vec![
                    Slot::new(0, 0, 3, Direction::Across),
                    Slot::new(0, 0, 3, Direction::Down),
                    Slot::new(0, 0, 3, Direction::Across),
                ],
            )
            .unwrap_err(),
            GridError::DuplicateSlot {
                first: 0,
                second: 2,
            },
        );

        assert_eq!(
            GridConfig::new(
                4,
                1,
                vec![
                    Slot::new(0, 0, 3, Direction::Across),
                    Slot::new(0, 1, 3, Direction::Across),
                ],
            )
            .unwrap_err(),
            GridError::AmbiguousOverlap {
                first: 0,
                second: 1,
            },
        );
    }

    #[test]
    fn test_slots_starting_past_the_largest_coord_are_out_of_bounds() {
        assert_eq!(
            GridConfig::new(3, 3, vec![Slot::new(usize::MAX, 0, 3, Direction::Down)])
                .unwrap_err(),
            GridError::SlotOutOfBounds {
                slot_id: 0,
                start_cell: (usize::MAX, 0),
                direction: Direction::Down,
                width: 3,
                height: 3,
            },
        );

        assert!(matches!(
            GridConfig::new(
                3,
                3,
                vec![
                    Slot::new(0, 0, 3, Direction::Across),
                    Slot::new(0, usize::MAX, 2, Direction::Across),
                ],
            ),
            Err(GridError::SlotOutOfBounds { slot_id: 1, .. }),
        ));

        let slot = Slot::new(0, usize::MAX - 1, 3, Direction::Across);
        assert_eq!(slot.checked_cell(1), Some((0, usize::MAX)));
        assert_eq!(slot.checked_cell(2), None);
    }
}
