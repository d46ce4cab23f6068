use bit_set::BitSet;

use crate::backtracking_search::Assignment;
use crate::grid_config::GridConfig;
use crate::word_list::WordList;

/// Does `assignment` give a word to every slot in the grid?
pub fn is_complete(config: &GridConfig, assignment: &Assignment) -> bool {
    (0..config.slot_count())
        .all(|slot_id| assignment.is_assigned(slot_id))
}

/// Check a (possibly partial) assignment: every word has to fit its slot, no word can be used
/// twice, and crossing slots that are both filled have to agree on the shared letter.
pub fn is_consistent(config: &GridConfig, words: &WordList, assignment: &Assignment) -> bool {
    let mut seen_word_ids = BitSet::with_capacity(words.len());

    for (slot_id, word_id) in assignment.iter() {
        let word = words.word(word_id);

        if word.len() != config.slot(slot_id).length {
            return false;
        }

        if !seen_word_ids.insert(word_id) {
            return false;
        }

        for crossing in config.crossings(slot_id) {
            if let Some(other_word_id) = assignment.get(crossing.other_slot_id) {
                let other_word = words.word(other_word_id);

                // A crossing word of the wrong length fails the length check on its own turn.
                if word.glyphs.get(crossing.cell)
                    != other_word.glyphs.get(crossing.other_slot_cell)
                {
                    return false;
                }
            }
        }
    }

    true
}
