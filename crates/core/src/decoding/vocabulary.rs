use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;

/// Word emitted for class indices missing from the mapping.
pub const PLACEHOLDER_WORD: &str = "none";

#[derive(Error, Debug)]
pub enum VocabularyError {
    #[error("failed to read vocabulary file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse vocabulary file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Immutable class-index → word mapping.
///
/// Loaded once at startup and owned by the decoder; never mutated. The
/// on-disk form is a JSON object `{word: index}` (the training-side
/// word index), inverted at load.
#[derive(Clone, Debug)]
pub struct Vocabulary {
    index_to_word: HashMap<usize, String>,
}

impl Vocabulary {
    /// Loads a `{word: index}` JSON file and inverts it.
    pub fn load(path: &Path) -> Result<Self, VocabularyError> {
        let raw = std::fs::read_to_string(path)?;
        let word_index: HashMap<String, usize> = serde_json::from_str(&raw)?;
        Ok(Self::from_word_index(word_index))
    }

    pub fn from_word_index(word_index: HashMap<String, usize>) -> Self {
        let index_to_word = word_index
            .into_iter()
            .map(|(word, index)| (index, word))
            .collect();
        Self { index_to_word }
    }

    /// The word for a class index; unknown indices map to
    /// [`PLACEHOLDER_WORD`] rather than failing.
    pub fn word(&self, index: usize) -> &str {
        self.index_to_word
            .get(&index)
            .map(String::as_str)
            .unwrap_or(PLACEHOLDER_WORD)
    }

    pub fn len(&self) -> usize {
        self.index_to_word.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index_to_word.is_empty()
    }
}
