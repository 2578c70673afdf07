//! # Emotion Extraction
//! Turns review text into per-category emotion counts and percentage scores
//! via lexicon matching, plus the cosine similarity used to compare the
//! resulting vectors.
//!
//! Score invariant: when at least one token matched the lexicon, scores sum
//! to 100 (each is the percentage of total matches); with no matches every
//! score is exactly 0.

use crate::lexicon::EmotionLexicon;
use crate::preprocess::TextPreprocessor;
use std::sync::Arc;

/// Per-category percentage scores, dense over the lexicon's categories in
/// declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct EmotionVector {
    scores: Vec<f64>,
}

impl EmotionVector {
    pub fn zeros(len: usize) -> Self {
        Self {
            scores: vec![0.0; len],
        }
    }

    pub fn from_scores(scores: Vec<f64>) -> Self {
        Self { scores }
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn get(&self, idx: usize) -> f64 {
        self.scores[idx]
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.scores.iter().copied()
    }

    pub fn sum(&self) -> f64 {
        self.scores.iter().sum()
    }

    /// True when every component is zero (no emotional signal).
    pub fn is_zero(&self) -> bool {
        self.scores.iter().all(|&s| s == 0.0)
    }

    /// Top-`n` `(category, score)` pairs, descending by score. Ties keep
    /// category declaration order (stable sort over the dense vector).
    pub fn top_emotions<'a>(&self, lexicon: &'a EmotionLexicon, n: usize) -> Vec<(&'a str, f64)> {
        let mut ranked: Vec<(usize, f64)> = self.scores.iter().copied().enumerate().collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked
            .into_iter()
            .take(n)
            .map(|(idx, score)| (lexicon.category_name(idx), score))
            .collect()
    }
}

/// Raw integer match counts, parallel to [`EmotionVector`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmotionCounts {
    counts: Vec<u32>,
}

impl EmotionCounts {
    pub fn zeros(len: usize) -> Self {
        Self {
            counts: vec![0; len],
        }
    }

    pub fn from_counts(counts: Vec<u32>) -> Self {
        Self { counts }
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn get(&self, idx: usize) -> u32 {
        self.counts[idx]
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    fn increment(&mut self, idx: usize) {
        self.counts[idx] += 1;
    }

    fn add(&mut self, other: &EmotionCounts) {
        for (acc, c) in self.counts.iter_mut().zip(&other.counts) {
            *acc += c;
        }
    }

    /// Derive percentage scores from these counts: `count / total * 100`, or
    /// all-zero when nothing matched.
    pub fn to_scores(&self) -> EmotionVector {
        let total = self.total();
        if total == 0 {
            return EmotionVector::zeros(self.counts.len());
        }
        EmotionVector::from_scores(
            self.counts
                .iter()
                .map(|&c| c as f64 / total as f64 * 100.0)
                .collect(),
        )
    }
}

/// Result of extracting emotions from a single text.
#[derive(Debug, Clone)]
pub struct EmotionBreakdown {
    pub counts: EmotionCounts,
    pub scores: EmotionVector,
    pub total_emotion_words: u32,
    pub total_words: usize,
}

/// Result of extracting emotions from a batch of texts. Scores derive from
/// the aggregate counts across all texts, never from averaging per-text
/// percentages.
#[derive(Debug, Clone)]
pub struct BatchBreakdown {
    pub counts: EmotionCounts,
    pub scores: EmotionVector,
    pub review_count: usize,
}

/// Cosine similarity between two emotion vectors of the same lexicon.
/// Returns 0.0 when either vector has no signal; otherwise in [0, 1] since
/// all components are non-negative.
pub fn cosine_similarity(a: &EmotionVector, b: &EmotionVector) -> f64 {
    debug_assert_eq!(a.len(), b.len(), "vectors must share a lexicon");

    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Lexicon-driven emotion extractor. Stateless across calls; the lexicon
/// handle is shared and read-only.
#[derive(Debug, Clone)]
pub struct EmotionExtractor {
    lexicon: Arc<EmotionLexicon>,
    preprocessor: TextPreprocessor,
}

impl EmotionExtractor {
    pub fn new(lexicon: Arc<EmotionLexicon>) -> Self {
        Self {
            lexicon,
            preprocessor: TextPreprocessor::new(),
        }
    }

    /// Extractor over the built-in 26-category lexicon.
    pub fn builtin() -> Self {
        Self::new(EmotionLexicon::builtin())
    }

    pub fn lexicon(&self) -> &Arc<EmotionLexicon> {
        &self.lexicon
    }

    /// Match one text against the lexicon. A token mapped to several
    /// categories increments each of them (and the match total once per
    /// category hit).
    pub fn extract_emotions(&self, text: &str) -> EmotionBreakdown {
        let tokens = self.preprocessor.preprocess(text);

        let mut counts = EmotionCounts::zeros(self.lexicon.len());
        let mut total_matches: u32 = 0;
        for token in &tokens {
            for &cat in self.lexicon.categories_for(token) {
                counts.increment(cat);
                total_matches += 1;
            }
        }

        let scores = counts.to_scores();
        EmotionBreakdown {
            counts,
            scores,
            total_emotion_words: total_matches,
            total_words: tokens.len(),
        }
    }

    /// Top-`n` emotions of one text, descending by score; ties keep category
    /// declaration order.
    pub fn top_emotions(&self, text: &str, n: usize) -> Vec<(&str, f64)> {
        self.extract_emotions(text).scores.top_emotions(&self.lexicon, n)
    }

    /// Aggregate emotion profile of a batch: counts are summed across all
    /// texts first, then scores derive from the aggregate.
    pub fn extract_emotions_batch<S: AsRef<str>>(&self, texts: &[S]) -> BatchBreakdown {
        let mut counts = EmotionCounts::zeros(self.lexicon.len());
        for text in texts {
            counts.add(&self.extract_emotions(text.as_ref()).counts);
        }

        let scores = counts.to_scores();
        BatchBreakdown {
            counts,
            scores,
            review_count: texts.len(),
        }
    }
}
