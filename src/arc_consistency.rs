//! Domain pruning that happens before search: node consistency (a word has to be as long as its
//! slot) followed by AC-3 over the crossings. A slot's domain is arc-consistent with a crossing
//! slot when every word in it has at least one word in the crossing slot's domain that puts the
//! same letter in the shared cell.

use std::collections::{HashSet, VecDeque};

use log::{debug, trace};

use crate::domains::DomainStore;
use crate::grid_config::{GridConfig, SlotId};
use crate::word_list::WordList;

/// Result from a successful call to `establish_arc_consistency`. No domain is empty, although
/// that doesn't guarantee that a fill exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArcConsistencySuccess {
    /// How many arcs were popped off the queue.
    pub arcs_checked: usize,
    /// How many words were removed across all domains.
    pub eliminations: usize,
}

/// Result from a failed call to `establish_arc_consistency`: the slot whose domain was wiped out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArcConsistencyFailure {
    pub slot_id: SlotId,
}

pub type ArcConsistencyResult = Result<ArcConsistencySuccess, ArcConsistencyFailure>;

/// Remove every word whose length doesn't match its slot's length, returning the number of words
/// removed.
pub fn enforce_node_consistency(
    config: &GridConfig,
    words: &WordList,
    domains: &mut DomainStore,
) -> usize {
    let mut total_removed = 0;

    for slot_config in &config.slot_configs {
        let length = slot_config.slot.length;
        let removed = domains.retain(slot_config.id, |&word_id| {
            words.word(word_id).len() == length
        });

        trace!(
            "Node consistency removed {} words from slot {}",
            removed,
            slot_config.id
        );
        total_removed += removed;
    }

    total_removed
}

/// Make slot `x` arc-consistent with slot `y` by removing every word from `x`'s domain that has no
/// compatible word in `y`'s domain. Returns whether anything was removed; slots that don't cross
/// are left alone.
pub fn revise(
    config: &GridConfig,
    words: &WordList,
    domains: &mut DomainStore,
    x: SlotId,
    y: SlotId,
) -> bool {
    revise_counting(config, words, domains, x, y) > 0
}

fn revise_counting(
    config: &GridConfig,
    words: &WordList,
    domains: &mut DomainStore,
    x: SlotId,
    y: SlotId,
) -> usize {
    let Some((x_cell, y_cell)) = config.overlap(x, y) else {
        return 0;
    };

    // The set of letters `y` can still put in the shared cell.
    let supported_glyphs: HashSet<char> = domains
        .get(y)
        .iter()
        .map(|&word_id| words.word(word_id).glyphs[y_cell])
        .collect();

    domains.retain(x, |&word_id| {
        supported_glyphs.contains(&words.word(word_id).glyphs[x_cell])
    })
}

/// Run AC-3 over the given arcs, or over every arc in the grid if `arcs` is `None`. Whenever a
/// slot's domain shrinks, the arcs pointing into it from its other neighbors are checked again.
/// Stops at the first slot whose domain ends up empty.
pub fn establish_arc_consistency(
    config: &GridConfig,
    words: &WordList,
    domains: &mut DomainStore,
    arcs: Option<&[(SlotId, SlotId)]>,
) -> ArcConsistencyResult {
    let mut queue: VecDeque<(SlotId, SlotId)> = match arcs {
        Some(arcs) => arcs.iter().copied().collect(),
        None => config.arcs().into_iter().collect(),
    };

    let mut success = ArcConsistencySuccess {
        arcs_checked: 0,
        eliminations: 0,
    };

    while let Some((x, y)) = queue.pop_front() {
        success.arcs_checked += 1;

        let removed = revise_counting(config, words, domains, x, y);
        success.eliminations += removed;

        if domains.is_empty(x) {
            debug!(
                "Arc consistency wiped out slot {} while revising against slot {}",
                x, y
            );
            return Err(ArcConsistencyFailure { slot_id: x });
        }

        if removed > 0 {
            trace!(
                "Revising slot {} against slot {} removed {} words",
                x, y, removed
            );
            queue.extend(config.neighbors(x).filter(|&z| z != y).map(|z| (z, x)));
        }
    }

    debug!(
        "Arc consistency established after {} arcs, {} words removed",
        success.arcs_checked, success.eliminations
    );

    Ok(success)
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use crate::arc_consistency::{
        enforce_node_consistency, establish_arc_consistency, revise, ArcConsistencyFailure,
    };
    use crate::domains::DomainStore;
    use crate::grid_config::{Direction, GridConfig, Slot};
    use crate::word_list::WordList;

    /// Two length-3 slots where the across slot's middle letter is the down slot's first letter.
    fn crossing_pair() -> GridConfig {
        GridConfig::new(
            3,
            3,
            vec![
                Slot::new(0, 0, 3, Direction::Across),
                Slot::new(0, 1, 3, Direction::Down),
            ],
        )
        .unwrap()
    }

    fn strings(words: &WordList, domains: &DomainStore, slot_id: usize) -> Vec<String> {
        domains
            .get(slot_id)
            .iter()
            .map(|&word_id| words.word(word_id).string.clone())
            .collect()
    }

    #[test]
    fn test_node_consistency_keeps_only_matching_lengths() {
        let config = GridConfig::new(3, 1, vec![Slot::new(0, 0, 3, Direction::Across)])
            .unwrap();
        let words = WordList::new(["AB", "ABCDE", "CAT"]);
        let mut domains = DomainStore::full(config.slot_count(), words.len());

        assert_eq!(enforce_node_consistency(&config, &words, &mut domains), 2);
        assert_eq!(strings(&words, &domains, 0), vec!["CAT"]);

        // Running it again changes nothing.
        assert_eq!(enforce_node_consistency(&config, &words, &mut domains), 0);
        assert_eq!(strings(&words, &domains, 0), vec!["CAT"]);
    }

    #[test]
    fn test_node_consistency_respects_each_slot_length() {
        let config = GridConfig::new(
            4,
            4,
            vec![
                Slot::new(0, 0, 4, Direction::Across),
                Slot::new(0, 0, 3, Direction::Down),
            ],
        )
        .unwrap();
        let words = WordList::new(["WORD", "CAT", "PLAY", "DOG", "AB"]);
        let mut domains = DomainStore::full(config.slot_count(), words.len());

        enforce_node_consistency(&config, &words, &mut domains);

        for slot_config in &config.slot_configs {
            for &word_id in domains.get(slot_config.id) {
                assert_eq!(words.word(word_id).len(), slot_config.slot.length);
            }
        }
        assert_eq!(strings(&words, &domains, 0), vec!["WORD", "PLAY"]);
        assert_eq!(strings(&words, &domains, 1), vec!["CAT", "DOG"]);
    }

    #[test]
    fn test_revise_removes_unsupported_words() {
        let config = crossing_pair();
        let words = WordList::new(["CAT", "DOG", "ACT"]);
        let mut domains = DomainStore::full(config.slot_count(), words.len());
        enforce_node_consistency(&config, &words, &mut domains);

        // The down slot starts with one of C, D, A, so only CAT and ACT survive in the across slot.
        assert!(revise(&config, &words, &mut domains, 0, 1));
        assert_eq!(strings(&words, &domains, 0), vec!["CAT", "ACT"]);

        assert!(!revise(&config, &words, &mut domains, 0, 1));
    }

    #[test]
    fn test_revise_ignores_slots_that_do_not_cross() {
        let config = GridConfig::new(
            3,
            2,
            vec![
                Slot::new(0, 0, 3, Direction::Across),
                Slot::new(1, 0, 3, Direction::Across),
            ],
        )
        .unwrap();
        let words = WordList::new(["CAT", "DOG"]);
        let mut domains = DomainStore::full(config.slot_count(), words.len());

        assert!(!revise(&config, &words, &mut domains, 0, 1));
        assert_eq!(domains.len(0), 2);
    }

    #[test]
    fn test_arc_consistency_prunes_to_fixed_point() {
        let config = crossing_pair();
        let words = WordList::new(["CAT", "DOG", "ACT"]);
        let mut domains = DomainStore::full(config.slot_count(), words.len());
        enforce_node_consistency(&config, &words, &mut domains);

        let success = establish_arc_consistency(&config, &words, &mut domains, None)
            .unwrap();

        assert_eq!(success.eliminations, 2);
        assert_eq!(strings(&words, &domains, 0), vec!["CAT", "ACT"]);
        assert_eq!(strings(&words, &domains, 1), vec!["CAT", "ACT"]);
    }

    #[test]
    fn test_arc_consistency_reports_wipeout() {
        let config = crossing_pair();
        let words = WordList::new(["CAT", "DOG"]);
        let mut domains = DomainStore::full(config.slot_count(), words.len());
        enforce_node_consistency(&config, &words, &mut domains);

        let result = establish_arc_consistency(&config, &words, &mut domains, None);

        assert_eq!(result, Err(ArcConsistencyFailure { slot_id: 0 }));
        assert!(domains.is_empty(0));
    }

    #[test]
    fn test_arc_consistency_without_crossings_prunes_nothing() {
        let config = GridConfig::new(
            3,
            2,
            vec![
                Slot::new(0, 0, 3, Direction::Across),
                Slot::new(1, 0, 3, Direction::Across),
            ],
        )
        .unwrap();
        let words = WordList::new(["CAT", "DOG", "XYZ"]);
        let mut domains = DomainStore::full(config.slot_count(), words.len());
        enforce_node_consistency(&config, &words, &mut domains);
        let before = domains.clone();

        let success = establish_arc_consistency(&config, &words, &mut domains, None)
            .unwrap();

        assert_eq!(success.arcs_checked, 0);
        assert_eq!(domains, before);
    }

    #[test]
    fn test_arc_consistency_with_explicit_arcs_only_checks_those() {
        let config = crossing_pair();
        let words = WordList::new(["CAT", "DOG", "ACT"]);
        let mut domains = DomainStore::full(config.slot_count(), words.len());
        enforce_node_consistency(&config, &words, &mut domains);

        // The across slot's middle letters are A, O and C, so DOG can't go down.
        let arcs = [(1, 0)];
        let success = establish_arc_consistency(&config, &words, &mut domains, Some(&arcs[..]))
            .unwrap();

        assert_eq!(strings(&words, &domains, 1), vec!["CAT", "ACT"]);
        // Shrinking the down slot re-checks the across slot's other neighbors, and it has none.
        assert_eq!(success.arcs_checked, 1);
        assert_eq!(strings(&words, &domains, 0), vec!["CAT", "DOG", "ACT"]);
    }

    /// CAT
    /// ##T
    /// TOE
    #[test]
    fn test_arc_consistency_requeues_arcs_along_a_chain() {
        let config = GridConfig::new(
            3,
            3,
            vec![
                Slot::new(0, 0, 3, Direction::Across),
                Slot::new(0, 2, 3, Direction::Down),
                Slot::new(2, 0, 3, Direction::Across),
            ],
        )
        .unwrap();
        assert_eq!(config.overlap(0, 2), None);

        let words = WordList::new(["CAT", "TOE", "BEE", "DOG"]);
        let mut domains = DomainStore::full(config.slot_count(), words.len());
        enforce_node_consistency(&config, &words, &mut domains);
        domains.retain(0, |&word_id| word_id == 0);

        // Only the down slot is checked against the top slot. Shrinking it has to queue the
        // bottom slot against it, which is the only way the bottom slot gets pruned.
        let arcs = [(1, 0)];
        let success = establish_arc_consistency(&config, &words, &mut domains, Some(&arcs[..]))
            .unwrap();

        assert_eq!(strings(&words, &domains, 1), vec!["TOE"]);
        assert_eq!(strings(&words, &domains, 2), vec!["TOE", "BEE"]);
        assert_eq!(success.arcs_checked, 2);
        assert_eq!(success.eliminations, 5);
        assert_eq!(strings(&words, &domains, 0), vec!["CAT"]);
    }
}
