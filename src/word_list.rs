use std::collections::HashMap;

use log::debug;
use smallvec::SmallVec;

use crate::MAX_SLOT_LENGTH;

/// An identifier for a given word, based on its index in the WordList's `words` field.
pub type WordId = usize;

/// A struct representing a word that can be chosen for a given slot.
#[derive(Debug, Clone)]
pub struct Word {
    pub string: String,
    pub glyphs: SmallVec<[char; MAX_SLOT_LENGTH]>,
}

impl Word {
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

/// The pool of candidate words. Words are normalized to upper case and deduplicated, keeping the
/// order in which they were first seen so that fills are reproducible.
#[derive(Debug, Clone, Default)]
pub struct WordList {
    pub words: Vec<Word>,
    word_ids_by_string: HashMap<String, WordId>,
}

impl WordList {
    pub fn new<I, S>(words: I) -> WordList
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut word_list = WordList::default();
        for word in words {
            word_list.add_word(word.as_ref());
        }
        word_list
    }

    /// Parse a word list file with one word per line.
    pub fn from_text(text: &str) -> WordList {
        let word_list = WordList::new(text.lines());
        debug!("Loaded {} distinct words", word_list.len());
        word_list
    }

    fn add_word(&mut self, raw: &str) {
        let string = raw.trim().to_uppercase();
        if string.is_empty() || self.word_ids_by_string.contains_key(&string) {
            return;
        }

        let word_id = self.words.len();
        self.words.push(Word {
            glyphs: string.chars().collect(),
            string: string.clone(),
        });
        self.word_ids_by_string.insert(string, word_id);
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn word(&self, word_id: WordId) -> &Word {
        &self.words[word_id]
    }

    pub fn word_id(&self, word: &str) -> Option<WordId> {
        self.word_ids_by_string
            .get(&word.trim().to_uppercase())
            .copied()
    }
}
