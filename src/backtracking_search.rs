//! Grid filling by depth-first backtracking search. Domains are made node- and arc-consistent up
//! front, then slots are chosen with the MRV/degree heuristic and words are tried in
//! least-constraining order. The first complete, consistent fill found is returned.

use instant::{Duration, Instant};
use log::{debug, info, trace};
use thiserror::Error;

use crate::arc_consistency::{
    enforce_node_consistency, establish_arc_consistency, ArcConsistencyFailure,
    ArcConsistencyResult,
};
use crate::consistency::{is_complete, is_consistent};
use crate::domains::DomainStore;
use crate::grid_config::{GridConfig, SlotId};
use crate::heuristics::{order_domain_values, select_unassigned_slot};
use crate::word_list::{WordId, WordList};

/// A partial mapping from slots to words, indexed by slot id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    word_ids: Vec<Option<WordId>>,
    assigned_count: usize,
}

impl Assignment {
    /// An empty assignment for a grid with `slot_count` slots.
    pub fn new(slot_count: usize) -> Assignment {
        Assignment {
            word_ids: vec![None; slot_count],
            assigned_count: 0,
        }
    }

    pub fn get(&self, slot_id: SlotId) -> Option<WordId> {
        self.word_ids[slot_id]
    }

    pub fn is_assigned(&self, slot_id: SlotId) -> bool {
        self.word_ids[slot_id].is_some()
    }

    /// Put a word in a slot, replacing whatever was there.
    pub fn assign(&mut self, slot_id: SlotId, word_id: WordId) {
        if self.word_ids[slot_id].replace(word_id).is_none() {
            self.assigned_count += 1;
        }
    }

    pub fn unassign(&mut self, slot_id: SlotId) -> Option<WordId> {
        let previous = self.word_ids[slot_id].take();
        if previous.is_some() {
            self.assigned_count -= 1;
        }
        previous
    }

    /// The number of slots that have a word.
    pub fn len(&self) -> usize {
        self.assigned_count
    }

    pub fn is_empty(&self) -> bool {
        self.assigned_count == 0
    }

    /// Every `(slot, word)` pair, in slot id order.
    pub fn iter(&self) -> impl Iterator<Item = (SlotId, WordId)> + '_ {
        self.word_ids
            .iter()
            .enumerate()
            .filter_map(|(slot_id, word_id)| word_id.map(|word_id| (slot_id, word_id)))
    }

    pub fn word<'w>(&self, words: &'w WordList, slot_id: SlotId) -> Option<&'w str> {
        self.get(slot_id)
            .map(|word_id| words.word(word_id).string.as_str())
    }
}

/// When domains get pruned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Propagation {
    /// Establish arc consistency once before searching and leave the domains alone afterwards.
    #[default]
    Preprocess,

    /// Also re-run AC-3 from each newly filled slot, searching below it on a pruned copy of the
    /// domains. Rejects dead ends earlier at the cost of copying domains at every level.
    Maintain,
}

#[derive(Debug, Clone, Default)]
pub struct FillOptions {
    pub propagation: Propagation,
}

/// A struct tracking statistics about the filling process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Statistics {
    /// Search nodes that had to choose a slot.
    pub states: u64,
    /// Tentative words that were taken back out of their slot.
    pub backtracks: u64,
    /// Words removed from domains by node consistency and the initial AC-3 pass.
    pub preprocessing_eliminations: usize,
    pub duration: Duration,
}

/// A struct representing the results of a fill operation.
#[derive(Debug, Clone)]
pub struct FillSuccess {
    pub statistics: Statistics,
    pub assignment: Assignment,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FillFailure {
    #[error("No solution: arc consistency left slot {slot_id} without any options.")]
    Unsatisfiable { slot_id: SlotId },
    #[error("No solution: the search exhausted every option.")]
    Exhausted,
}

/// The state of a single fill: the grid, the words, and the domains pruned for this grid. Each
/// filler owns its domains, so independent fills never share anything.
#[derive(Debug)]
pub struct Filler<'a> {
    config: &'a GridConfig,
    words: &'a WordList,
    options: FillOptions,
    domains: DomainStore,
    statistics: Statistics,
}

impl<'a> Filler<'a> {
    /// Set up a filler where every slot can take every word.
    pub fn new(config: &'a GridConfig, words: &'a WordList, options: FillOptions) -> Filler<'a> {
        Filler {
            config,
            words,
            options,
            domains: DomainStore::full(config.slot_count(), words.len()),
            statistics: Statistics::default(),
        }
    }

    pub fn domains(&self) -> &DomainStore {
        &self.domains
    }

    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    pub fn enforce_node_consistency(&mut self) -> usize {
        let removed = enforce_node_consistency(self.config, self.words, &mut self.domains);
        self.statistics.preprocessing_eliminations += removed;
        removed
    }

    pub fn establish_arc_consistency(
        &mut self,
        arcs: Option<&[(SlotId, SlotId)]>,
    ) -> ArcConsistencyResult {
        let result = establish_arc_consistency(self.config, self.words, &mut self.domains, arcs);
        if let Ok(success) = &result {
            self.statistics.preprocessing_eliminations += success.eliminations;
        }
        result
    }

    /// Extend `assignment` into a complete fill using the current domains. On success the fill is
    /// left in `assignment`; on failure `assignment` is back to how it was passed in.
    pub fn backtrack(&mut self, assignment: &mut Assignment) -> bool {
        let mut search = Search {
            config: self.config,
            words: self.words,
            propagation: self.options.propagation,
            statistics: &mut self.statistics,
        };
        search.backtrack(&self.domains, assignment)
    }

    /// Prune the domains and search for a fill.
    pub fn solve(mut self) -> Result<FillSuccess, FillFailure> {
        let start = Instant::now();

        info!(
            "Filling {} slots from {} words ({:?})",
            self.config.slot_count(),
            self.words.len(),
            self.options.propagation,
        );

        let removed = self.enforce_node_consistency();
        debug!("Node consistency removed {} words", removed);

        if let Err(ArcConsistencyFailure { slot_id }) = self.establish_arc_consistency(None) {
            info!("No fill: arc consistency emptied slot {}", slot_id);
            return Err(FillFailure::Unsatisfiable { slot_id });
        }
        debug!(
            "{} candidate words remain across all slots",
            self.domains.total_len()
        );

        let mut assignment = Assignment::new(self.config.slot_count());
        let found = self.backtrack(&mut assignment);

        self.statistics.duration = start.elapsed();
        info!("{:?}", self.statistics);

        if found {
            Ok(FillSuccess {
                statistics: self.statistics,
                assignment,
            })
        } else {
            info!("No fill: search exhausted");
            Err(FillFailure::Exhausted)
        }
    }
}

struct Search<'a, 's> {
    config: &'a GridConfig,
    words: &'a WordList,
    propagation: Propagation,
    statistics: &'s mut Statistics,
}

impl Search<'_, '_> {
    fn backtrack(&mut self, domains: &DomainStore, assignment: &mut Assignment) -> bool {
        if is_complete(self.config, assignment) {
            return true;
        }

        let Some(slot_id) = select_unassigned_slot(self.config, domains, assignment) else {
            return true;
        };
        self.statistics.states += 1;

        let options = order_domain_values(self.config, self.words, domains, assignment, slot_id);
        trace!(
            "Slot {} has {} options at depth {}",
            slot_id,
            options.len(),
            assignment.len()
        );

        for word_id in options {
            assignment.assign(slot_id, word_id);

            if is_consistent(self.config, self.words, assignment)
                && self.descend(domains, assignment, slot_id, word_id)
            {
                return true;
            }

            assignment.unassign(slot_id);
            self.statistics.backtracks += 1;
            trace!(
                "Backtracking slot {} from {}",
                slot_id,
                self.words.word(word_id).string
            );
        }

        false
    }

    /// Search below a consistent tentative choice.
    fn descend(
        &mut self,
        domains: &DomainStore,
        assignment: &mut Assignment,
        slot_id: SlotId,
        word_id: WordId,
    ) -> bool {
        match self.propagation {
            Propagation::Preprocess => self.backtrack(domains, assignment),
            Propagation::Maintain => {
                let mut narrowed = domains.clone();
                narrowed.fix(slot_id, word_id);

                let arcs: Vec<(SlotId, SlotId)> = self
                    .config
                    .neighbors(slot_id)
                    .filter(|&neighbor| !assignment.is_assigned(neighbor))
                    .map(|neighbor| (neighbor, slot_id))
                    .collect();

                let result = establish_arc_consistency(
                    self.config,
                    self.words,
                    &mut narrowed,
                    Some(&arcs[..]),
                );
                match result {
                    Ok(_) => self.backtrack(&narrowed, assignment),
                    Err(_) => false,
                }
            }
        }
    }
}

/// Search for a valid fill for the given grid, pruning domains only before the search starts.
pub fn find_fill(config: &GridConfig, words: &WordList) -> Result<FillSuccess, FillFailure> {
    find_fill_with_options(config, words, &FillOptions::default())
}

pub fn find_fill_with_options(
    config: &GridConfig,
    words: &WordList,
    options: &FillOptions,
) -> Result<FillSuccess, FillFailure> {
    Filler::new(config, words, options.clone()).solve()
}
