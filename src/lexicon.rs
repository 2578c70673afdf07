//! # Emotion Lexicon
//! Fixed mapping from emotion category → trigger words, with a reverse index
//! word → category indices for matching. Built once and immutable afterwards;
//! concurrent reads need no locking.
//!
//! The built-in lexicon (26 categories) ships as embedded JSON. Custom
//! lexicons can be constructed for tests or alternative vocabularies.

use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;

static BUILTIN: Lazy<Arc<EmotionLexicon>> = Lazy::new(|| {
    let raw = include_str!("../emotion_lexicon.json");
    Arc::new(EmotionLexicon::from_json_str(raw).expect("valid built-in emotion lexicon"))
});

/// One category as it appears in the JSON file.
#[derive(Debug, Clone, Deserialize)]
struct LexiconEntry {
    name: String,
    words: Vec<String>,
}

/// Immutable emotion lexicon: category names in declaration order plus a
/// reverse word index. Declaration order is load-bearing — score ties are
/// broken by it.
#[derive(Debug)]
pub struct EmotionLexicon {
    categories: Vec<String>,
    word_index: HashMap<String, Vec<usize>>,
}

impl EmotionLexicon {
    /// Shared handle to the built-in lexicon. Parsed once per process.
    pub fn builtin() -> Arc<Self> {
        Arc::clone(&BUILTIN)
    }

    /// Parse a lexicon from its JSON form: an ordered array of
    /// `{name, words}` entries.
    pub fn from_json_str(raw: &str) -> anyhow::Result<Self> {
        let entries: Vec<LexiconEntry> = serde_json::from_str(raw)?;
        Ok(Self::from_entries(
            entries.into_iter().map(|e| (e.name, e.words)),
        ))
    }

    /// Build from `(category, words)` pairs. Words are lowercased; duplicates
    /// within a category collapse to a single index entry.
    pub fn from_entries<I, W>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, W)>,
        W: IntoIterator<Item = String>,
    {
        let mut categories = Vec::new();
        let mut word_index: HashMap<String, Vec<usize>> = HashMap::new();

        for (idx, (name, words)) in entries.into_iter().enumerate() {
            categories.push(name);
            for word in words {
                let word = word.to_lowercase();
                let cats = word_index.entry(word).or_default();
                if cats.last() != Some(&idx) {
                    cats.push(idx);
                }
            }
        }

        Self {
            categories,
            word_index,
        }
    }

    /// Number of emotion categories.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Category names in declaration order.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Name of the category at `idx`. Panics on out-of-range index.
    pub fn category_name(&self, idx: usize) -> &str {
        &self.categories[idx]
    }

    /// Index of a category by name, if present.
    pub fn category_index(&self, name: &str) -> Option<usize> {
        self.categories.iter().position(|c| c == name)
    }

    /// Category indices triggered by `word` (empty slice when the word is not
    /// in the lexicon).
    pub fn categories_for(&self, word: &str) -> &[usize] {
        self.word_index.get(word).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total number of distinct trigger words.
    pub fn word_count(&self) -> usize {
        self.word_index.len()
    }
}
