//! Search ordering: which slot to fill next, and which words to try in it first.

use std::cmp::Reverse;

use crate::backtracking_search::Assignment;
use crate::domains::DomainStore;
use crate::grid_config::{GridConfig, SlotId};
use crate::word_list::{WordId, WordList};

/// How many of this slot's crossing slots are still unfilled?
pub fn unassigned_degree(config: &GridConfig, assignment: &Assignment, slot_id: SlotId) -> usize {
    config
        .neighbors(slot_id)
        .filter(|&neighbor| !assignment.is_assigned(neighbor))
        .count()
}

/// Pick the unfilled slot with the fewest remaining options, preferring the one crossing the most
/// unfilled slots when that's tied. Any tie left over goes to the lowest slot id. Returns `None`
/// once every slot is filled.
pub fn select_unassigned_slot(
    config: &GridConfig,
    domains: &DomainStore,
    assignment: &Assignment,
) -> Option<SlotId> {
    (0..config.slot_count())
        .filter(|&slot_id| !assignment.is_assigned(slot_id))
        .min_by_key(|&slot_id| {
            (domains.len(slot_id), Reverse(unassigned_degree(config, assignment, slot_id)))
        })
}

/// Count the options in unfilled crossing slots that putting `word_id` in `slot_id` would rule
/// out.
pub fn count_ruled_out(
    config: &GridConfig,
    words: &WordList,
    domains: &DomainStore,
    assignment: &Assignment,
    slot_id: SlotId,
    word_id: WordId,
) -> usize {
    let word = words.word(word_id);

    config
        .crossings(slot_id)
        .iter()
        .filter(|crossing| !assignment.is_assigned(crossing.other_slot_id))
        .map(|crossing| {
            let glyph = word.glyphs.get(crossing.cell);

            domains
                .get(crossing.other_slot_id)
                .iter()
                .filter(|&&other_word_id| {
                    words.word(other_word_id).glyphs.get(crossing.other_slot_cell) != glyph
                })
                .count()
        })
        .sum()
}

/// Return the slot's options with the least constraining ones first. The sort is stable, so
/// options that rule out the same number of words stay in domain order.
pub fn order_domain_values(
    config: &GridConfig,
    words: &WordList,
    domains: &DomainStore,
    assignment: &Assignment,
    slot_id: SlotId,
) -> Vec<WordId> {
    let mut options = domains.get(slot_id).to_vec();
    options.sort_by_cached_key(|&word_id| {
        count_ruled_out(config, words, domains, assignment, slot_id, word_id)
    });
    options
}
