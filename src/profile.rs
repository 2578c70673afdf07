//! # Book Emotion Profiles
//! Aggregate per-book emotion vector, resolved from a precomputed cache when
//! one exists and recomputed from review texts otherwise.
//!
//! The cache is owned and written by an external batch job; this module only
//! reads it. A malformed cache entry is logged and silently replaced by live
//! recomputation — it never propagates past this boundary. Collaborator
//! errors (storage unavailable) do propagate unchanged.

use crate::extractor::{EmotionCounts, EmotionExtractor, EmotionVector};
use crate::lexicon::EmotionLexicon;
use crate::store::ProfileCache;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// One cached category entry, shaped `{count, score}` in the cache JSON.
#[derive(Debug, Clone, Deserialize)]
struct CachedEmotion {
    #[serde(default)]
    count: u32,
    #[serde(default)]
    score: f64,
}

/// Aggregate emotion profile of one book.
#[derive(Debug, Clone)]
pub struct BookEmotionProfile {
    pub book_id: String,
    pub title: String,
    /// Review count of the current call, not of the cache snapshot.
    pub review_count: usize,
    pub emotion_scores: EmotionVector,
    pub emotion_counts: EmotionCounts,
}

impl BookEmotionProfile {
    /// Top-`n` `(category, score)` pairs of this profile, descending; ties
    /// keep category declaration order.
    pub fn top_emotions<'a>(&self, lexicon: &'a EmotionLexicon, n: usize) -> Vec<(&'a str, f64)> {
        self.emotion_scores.top_emotions(lexicon, n)
    }
}

/// Resolves book profiles: cache first, live recomputation as fallback.
#[derive(Debug, Clone)]
pub struct ProfileResolver {
    extractor: Arc<EmotionExtractor>,
    cache: Arc<dyn ProfileCache>,
}

impl ProfileResolver {
    pub fn new(extractor: Arc<EmotionExtractor>, cache: Arc<dyn ProfileCache>) -> Self {
        Self { extractor, cache }
    }

    /// Resolve the profile for one book.
    ///
    /// 1. Try the cache; a parse failure falls through silently.
    /// 2. Otherwise extract from `review_texts` in one batch.
    pub fn resolve(
        &self,
        book_id: &str,
        title: &str,
        review_texts: &[String],
    ) -> anyhow::Result<BookEmotionProfile> {
        if let Some(raw) = self.cache.read(book_id)? {
            match self.parse_cached(&raw) {
                Ok((scores, counts)) => {
                    debug!(target: "profile", book_id, "loaded cached emotion profile");
                    return Ok(BookEmotionProfile {
                        book_id: book_id.to_string(),
                        title: title.to_string(),
                        review_count: review_texts.len(),
                        emotion_scores: scores,
                        emotion_counts: counts,
                    });
                }
                Err(err) => {
                    warn!(target: "profile", book_id, error = %err, "cached profile unreadable, rebuilding from reviews");
                }
            }
        }

        let batch = self.extractor.extract_emotions_batch(review_texts);
        Ok(BookEmotionProfile {
            book_id: book_id.to_string(),
            title: title.to_string(),
            review_count: review_texts.len(),
            emotion_scores: batch.scores,
            emotion_counts: batch.counts,
        })
    }

    /// Project a cached `{category: {count, score}}` blob onto the lexicon's
    /// category list. Categories unknown to the lexicon are ignored.
    fn parse_cached(&self, raw: &str) -> anyhow::Result<(EmotionVector, EmotionCounts)> {
        let entries: HashMap<String, CachedEmotion> = serde_json::from_str(raw)?;

        let lexicon = self.extractor.lexicon();
        let mut scores = vec![0.0; lexicon.len()];
        let mut counts = vec![0u32; lexicon.len()];
        for (category, entry) in &entries {
            if let Some(idx) = lexicon.category_index(category) {
                scores[idx] = entry.score;
                counts[idx] = entry.count;
            }
        }

        Ok((
            EmotionVector::from_scores(scores),
            EmotionCounts::from_counts(counts),
        ))
    }
}
