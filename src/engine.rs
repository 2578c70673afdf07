//! # Recommendation Engine
//! Orchestrates candidate selection, similarity computation, and the
//! rating-dependent ranking policies. Every call is a pure function of its
//! inputs plus the read-only collaborators it queries; no state survives
//! between invocations.
//!
//! Policy map:
//! - rating 1–2: compare the just-submitted review text against candidates;
//!   contrast mode (prefer dissimilar books) engages only when the review
//!   already tracks the seed book's profile closely.
//! - rating 3–4: compare seed profile against candidates, keeping only
//!   candidates rated strictly higher than the seed (or unrated ones).
//! - rating 5: same comparison, no rating filter.
//!
//! Domain outcomes are values: a missing seed book, no similar users, or an
//! empty candidate pool yield an empty list, never an error. Collaborator
//! failures propagate unchanged.

use crate::config::EngineConfig;
use crate::extractor::{cosine_similarity, EmotionExtractor, EmotionVector};
use crate::profile::ProfileResolver;
use crate::store::{Book, BookCatalog, ProfileCache, ReviewStore, ShelfStore};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;

/// Content-based recommendation: similarity to the comparison anchor, plus a
/// contrast score when contrast mode produced the ranking.
#[derive(Debug, Clone, Serialize)]
pub struct ContentBasedResult {
    pub book: Book,
    pub similarity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contrast_score: Option<f64>,
}

/// Collaborative recommendation: weighted blend of peer and global ratings.
#[derive(Debug, Clone, Serialize)]
pub struct CollaborativeResult {
    pub book: Book,
    pub score: f64,
}

/// The mood-based recommendation engine. Construct once and share; all
/// operations are synchronous and safe to call concurrently.
pub struct RecommendationEngine {
    catalog: Arc<dyn BookCatalog>,
    reviews: Arc<dyn ReviewStore>,
    shelves: Arc<dyn ShelfStore>,
    extractor: Arc<EmotionExtractor>,
    profiles: ProfileResolver,
    config: EngineConfig,
}

impl RecommendationEngine {
    /// Engine over the built-in lexicon with default policy constants.
    pub fn new(
        catalog: Arc<dyn BookCatalog>,
        reviews: Arc<dyn ReviewStore>,
        shelves: Arc<dyn ShelfStore>,
        cache: Arc<dyn ProfileCache>,
    ) -> Self {
        Self::with_parts(
            catalog,
            reviews,
            shelves,
            cache,
            Arc::new(EmotionExtractor::builtin()),
            EngineConfig::default(),
        )
    }

    /// Fully injected constructor (custom lexicon/extractor and config).
    pub fn with_parts(
        catalog: Arc<dyn BookCatalog>,
        reviews: Arc<dyn ReviewStore>,
        shelves: Arc<dyn ShelfStore>,
        cache: Arc<dyn ProfileCache>,
        extractor: Arc<EmotionExtractor>,
        config: EngineConfig,
    ) -> Self {
        let profiles = ProfileResolver::new(Arc::clone(&extractor), cache);
        Self {
            catalog,
            reviews,
            shelves,
            extractor,
            profiles,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Content-based recommendations for a just-submitted rating + review.
    ///
    /// Returns at most `top_k` results ordered by the active ranking score
    /// (descending; ties by ascending book id). Ratings outside 1–5 yield an
    /// empty list.
    pub fn recommend_content_based(
        &self,
        user_id: &str,
        book_id: &str,
        rating: u8,
        review_text: &str,
    ) -> anyhow::Result<Vec<ContentBasedResult>> {
        let excluded = self.exclusion_set(user_id, book_id)?;

        let Some(seed) = self.catalog.get_book(book_id)? else {
            debug!(target: "engine", book_id, "seed book not found");
            return Ok(Vec::new());
        };

        let seed_texts = self.review_texts(book_id)?;
        let seed_profile = self.profiles.resolve(book_id, &seed.title, &seed_texts)?;

        match rating {
            r if r < 3 => {
                // Anchor on the submitted review, not the book's aggregate.
                let review_vec = self.extractor.extract_emotions(review_text).scores;
                let base = cosine_similarity(&review_vec, &seed_profile.emotion_scores);
                let contrast_mode = base > self.config.contrast_threshold;
                debug!(
                    target: "engine",
                    book_id,
                    rating,
                    base_similarity = base,
                    contrast_mode,
                    "low-rating branch"
                );
                self.rank_by_review_emotions(&review_vec, &excluded, contrast_mode)
            }
            3 | 4 => {
                debug!(target: "engine", book_id, rating, "mid-rating branch");
                self.rank_by_book_similarity(book_id, &seed_profile.emotion_scores, &excluded, true)
            }
            5 => {
                debug!(target: "engine", book_id, rating, "high-rating branch");
                self.rank_by_book_similarity(
                    book_id,
                    &seed_profile.emotion_scores,
                    &excluded,
                    false,
                )
            }
            _ => Ok(Vec::new()),
        }
    }

    /// Collaborative recommendations: find the users whose reviews of the
    /// seed book feel most like the caller's, then surface the books those
    /// users rated highly.
    ///
    /// The score blends the peer average with the global average
    /// (`peer_weight` / `global_weight`); the global average falls back to
    /// the peer average when the book has none.
    pub fn recommend_collaborative(
        &self,
        user_id: &str,
        book_id: &str,
        review_text: &str,
    ) -> anyhow::Result<Vec<CollaborativeResult>> {
        let user_vec = self.extractor.extract_emotions(review_text).scores;

        // Per other user, the best similarity across all their reviews of
        // this book.
        let seed_reviews = self
            .reviews
            .get_reviews_by_book_id(book_id, self.config.review_fetch_limit)?;
        let mut best_by_user: HashMap<String, f64> = HashMap::new();
        for review in &seed_reviews {
            if review.user_id == user_id {
                continue;
            }
            let other_vec = self
                .extractor
                .extract_emotions(review.body.as_deref().unwrap_or(""))
                .scores;
            let sim = cosine_similarity(&user_vec, &other_vec);
            let best = best_by_user.entry(review.user_id.clone()).or_insert(-1.0);
            if sim > *best {
                *best = sim;
            }
        }
        if best_by_user.is_empty() {
            debug!(target: "engine", book_id, "no reviews from other users");
            return Ok(Vec::new());
        }

        // Peer pool: most similar users first, ties by ascending user id.
        let mut ranked_users: Vec<(String, f64)> = best_by_user.into_iter().collect();
        ranked_users.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        ranked_users.truncate(self.config.peer_pool_size);
        let peer_ids: Vec<String> = ranked_users.into_iter().map(|(u, _)| u).collect();
        debug!(target: "engine", book_id, peers = peer_ids.len(), "peer pool selected");

        let peer_reviews = self
            .reviews
            .get_reviews_by_users(&peer_ids, self.config.min_peer_rating)?;

        let excluded = self.exclusion_set(user_id, book_id)?;
        let candidate_ids: BTreeSet<&String> = peer_reviews
            .iter()
            .map(|r| &r.book_id)
            .filter(|id| !excluded.contains(id.as_str()))
            .collect();
        if candidate_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut scored = Vec::new();
        for candidate_id in candidate_ids {
            let Some(book) = self.catalog.get_book(candidate_id)? else {
                continue;
            };
            let peer_ratings: Vec<f64> = peer_reviews
                .iter()
                .filter(|r| &r.book_id == candidate_id)
                .map(|r| f64::from(r.rating))
                .collect();
            let similar_avg = peer_ratings.iter().sum::<f64>() / peer_ratings.len() as f64;
            let overall_avg = self
                .reviews
                .get_average_rating(candidate_id)?
                .unwrap_or(similar_avg);
            let score =
                self.config.peer_weight * similar_avg + self.config.global_weight * overall_avg;
            scored.push(CollaborativeResult { book, score });
        }

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.book.book_id.cmp(&b.book.book_id))
        });
        scored.truncate(self.config.top_k);
        Ok(scored)
    }

    /// Books excluded from every candidate pool: the caller's read shelf plus
    /// the seed book itself.
    fn exclusion_set(&self, user_id: &str, book_id: &str) -> anyhow::Result<HashSet<String>> {
        let mut excluded: HashSet<String> = self
            .shelves
            .list_read_shelf(user_id)?
            .into_iter()
            .map(|entry| entry.book_id)
            .collect();
        excluded.insert(book_id.to_string());
        Ok(excluded)
    }

    /// Non-empty review bodies of one book.
    fn review_texts(&self, book_id: &str) -> anyhow::Result<Vec<String>> {
        Ok(self
            .reviews
            .get_reviews_by_book_id(book_id, self.config.review_fetch_limit)?
            .into_iter()
            .filter_map(|r| r.body)
            .filter(|body| !body.is_empty())
            .collect())
    }

    /// Low-rating ranking: candidates scored against the submitted review's
    /// emotion vector; contrast mode inverts the ranking and reports the
    /// inverted value as `contrast_score`.
    fn rank_by_review_emotions(
        &self,
        review_vec: &EmotionVector,
        excluded: &HashSet<String>,
        contrast_mode: bool,
    ) -> anyhow::Result<Vec<ContentBasedResult>> {
        let mut ranked = Vec::new();
        for book in self.catalog.get_books()? {
            if excluded.contains(&book.book_id) {
                continue;
            }
            let texts = self.review_texts(&book.book_id)?;
            let profile = self.profiles.resolve(&book.book_id, &book.title, &texts)?;
            let similarity = cosine_similarity(review_vec, &profile.emotion_scores);
            let rank_score = if contrast_mode {
                1.0 - similarity
            } else {
                similarity
            };
            ranked.push((
                rank_score,
                ContentBasedResult {
                    book,
                    similarity,
                    contrast_score: contrast_mode.then_some(1.0 - similarity),
                },
            ));
        }
        Ok(self.take_top(ranked))
    }

    /// Mid/high-rating ranking: candidates scored against the seed book's
    /// profile. With `require_higher_rating`, a candidate with a recorded
    /// average at or below the seed's is skipped (unrated candidates stay;
    /// the filter is inert when the seed itself has no average).
    fn rank_by_book_similarity(
        &self,
        seed_id: &str,
        seed_vec: &EmotionVector,
        excluded: &HashSet<String>,
        require_higher_rating: bool,
    ) -> anyhow::Result<Vec<ContentBasedResult>> {
        let seed_avg = self.reviews.get_average_rating(seed_id)?;

        let mut ranked = Vec::new();
        for book in self.catalog.get_books()? {
            if excluded.contains(&book.book_id) {
                continue;
            }

            if require_higher_rating {
                if let Some(seed_avg) = seed_avg {
                    if let Some(candidate_avg) = self.reviews.get_average_rating(&book.book_id)? {
                        if candidate_avg <= seed_avg {
                            continue;
                        }
                    }
                }
            }

            let texts = self.review_texts(&book.book_id)?;
            let profile = self.profiles.resolve(&book.book_id, &book.title, &texts)?;
            let similarity = cosine_similarity(seed_vec, &profile.emotion_scores);
            ranked.push((
                similarity,
                ContentBasedResult {
                    book,
                    similarity,
                    contrast_score: None,
                },
            ));
        }
        Ok(self.take_top(ranked))
    }

    /// Sort by ranking score descending (ties by ascending book id) and keep
    /// the top `top_k`.
    fn take_top(&self, mut ranked: Vec<(f64, ContentBasedResult)>) -> Vec<ContentBasedResult> {
        ranked.sort_by(|a, b| {
            b.0.partial_cmp(&a.0)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.1.book.book_id.cmp(&b.1.book.book_id))
        });
        ranked
            .into_iter()
            .take(self.config.top_k)
            .map(|(_, result)| result)
            .collect()
    }
}
