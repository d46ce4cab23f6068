use crate::grid_config::SlotId;
use crate::word_list::WordId;

/// The words still possible for each slot. Each domain keeps the word list's order, and removals
/// never reorder what's left.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainStore {
    domains: Vec<Vec<WordId>>,
}

impl DomainStore {
    /// Start every slot off with the whole word list.
    pub fn full(slot_count: usize, word_count: usize) -> DomainStore {
        DomainStore {
            domains: (0..slot_count).map(|_| (0..word_count).collect()).collect(),
        }
    }

    pub fn get(&self, slot_id: SlotId) -> &[WordId] {
        &self.domains[slot_id]
    }

    pub fn len(&self, slot_id: SlotId) -> usize {
        self.domains[slot_id].len()
    }

    pub fn is_empty(&self, slot_id: SlotId) -> bool {
        self.domains[slot_id].is_empty()
    }

    /// Keep only the words matching `keep`, returning how many were removed.
    pub fn retain<F>(&mut self, slot_id: SlotId, keep: F) -> usize
    where
        F: FnMut(&WordId) -> bool,
    {
        let domain = &mut self.domains[slot_id];
        let before = domain.len();
        domain.retain(keep);
        before - domain.len()
    }

    /// Reduce a slot's domain to a single word.
    pub fn fix(&mut self, slot_id: SlotId, word_id: WordId) {
        self.domains[slot_id] = vec![word_id];
    }

    /// How many candidate words remain, summed over every slot.
    pub fn total_len(&self) -> usize {
        self.domains.iter().map(Vec::len).sum()
    }
}
