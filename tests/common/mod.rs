// tests/common/mod.rs
// In-memory collaborator fakes shared by the engine integration tests.
#![allow(dead_code)]

use mood_recommender::{
    Book, BookCatalog, EngineConfig, ProfileCache, RecommendationEngine, Review, ReviewStore,
    ShelfEntry, ShelfStore,
};
use std::collections::HashMap;
use std::sync::Arc;

/// The acting user in every scenario.
pub const USER: &str = "u1";

#[derive(Debug, Default)]
pub struct MemCatalog {
    books: Vec<Book>,
}

impl BookCatalog for MemCatalog {
    fn get_books(&self) -> anyhow::Result<Vec<Book>> {
        Ok(self.books.clone())
    }

    fn get_book(&self, book_id: &str) -> anyhow::Result<Option<Book>> {
        Ok(self.books.iter().find(|b| b.book_id == book_id).cloned())
    }
}

#[derive(Debug, Default)]
pub struct MemReviews {
    all: Vec<Review>,
    averages: HashMap<String, f64>,
}

impl ReviewStore for MemReviews {
    fn get_reviews_by_book_id(&self, book_id: &str, limit: usize) -> anyhow::Result<Vec<Review>> {
        Ok(self
            .all
            .iter()
            .filter(|r| r.book_id == book_id)
            .take(limit)
            .cloned()
            .collect())
    }

    fn get_average_rating(&self, book_id: &str) -> anyhow::Result<Option<f64>> {
        Ok(self.averages.get(book_id).copied())
    }

    fn get_reviews_by_users(
        &self,
        user_ids: &[String],
        min_rating: u8,
    ) -> anyhow::Result<Vec<Review>> {
        Ok(self
            .all
            .iter()
            .filter(|r| user_ids.iter().any(|u| u == &r.user_id) && r.rating >= min_rating)
            .cloned()
            .collect())
    }
}

#[derive(Debug, Default)]
pub struct MemShelf {
    read_by_user: HashMap<String, Vec<String>>,
}

impl ShelfStore for MemShelf {
    fn list_read_shelf(&self, user_id: &str) -> anyhow::Result<Vec<ShelfEntry>> {
        Ok(self
            .read_by_user
            .get(user_id)
            .map(|ids| {
                ids.iter()
                    .map(|id| ShelfEntry {
                        book_id: id.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[derive(Debug, Default)]
pub struct MemCache {
    blobs: HashMap<String, String>,
}

impl ProfileCache for MemCache {
    fn read(&self, book_id: &str) -> anyhow::Result<Option<String>> {
        Ok(self.blobs.get(book_id).cloned())
    }
}

/// Everything a scenario needs, assembled in one place.
#[derive(Default)]
pub struct Scenario {
    pub books: Vec<Book>,
    pub reviews: Vec<Review>,
    pub averages: Vec<(String, f64)>,
    pub read_shelf: Vec<String>,
    pub cached_profiles: Vec<(String, String)>,
    pub config: Option<EngineConfig>,
}

impl Scenario {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn book(mut self, book_id: &str, title: &str) -> Self {
        self.books.push(Book::new(book_id, title));
        self
    }

    pub fn review(mut self, user_id: &str, book_id: &str, rating: u8, body: &str) -> Self {
        self.reviews.push(Review {
            user_id: user_id.to_string(),
            book_id: book_id.to_string(),
            rating,
            body: Some(body.to_string()),
        });
        self
    }

    pub fn average(mut self, book_id: &str, avg: f64) -> Self {
        self.averages.push((book_id.to_string(), avg));
        self
    }

    pub fn read(mut self, book_id: &str) -> Self {
        self.read_shelf.push(book_id.to_string());
        self
    }

    /// Cache a profile blob of `(category, count, score)` entries.
    pub fn cached(mut self, book_id: &str, entries: &[(&str, u32, f64)]) -> Self {
        let fields: Vec<String> = entries
            .iter()
            .map(|(cat, count, score)| {
                format!(r#""{cat}": {{"count": {count}, "score": {score}}}"#)
            })
            .collect();
        self.cached_profiles
            .push((book_id.to_string(), format!("{{{}}}", fields.join(", "))));
        self
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn engine(self) -> RecommendationEngine {
        let catalog = MemCatalog { books: self.books };
        let reviews = MemReviews {
            all: self.reviews,
            averages: self.averages.into_iter().collect(),
        };
        let shelf = MemShelf {
            read_by_user: HashMap::from([(USER.to_string(), self.read_shelf)]),
        };
        let cache = MemCache {
            blobs: self.cached_profiles.into_iter().collect(),
        };

        match self.config {
            Some(config) => RecommendationEngine::with_parts(
                Arc::new(catalog),
                Arc::new(reviews),
                Arc::new(shelf),
                Arc::new(cache),
                Arc::new(mood_recommender::EmotionExtractor::builtin()),
                config,
            ),
            None => RecommendationEngine::new(
                Arc::new(catalog),
                Arc::new(reviews),
                Arc::new(shelf),
                Arc::new(cache),
            ),
        }
    }
}
