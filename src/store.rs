//! # Storage Collaborators
//! Read-only contracts the engine consumes, and the records they exchange.
//! Concrete storage lives outside this crate; implementations here are only
//! the trait surface. Storage failures propagate unchanged through the
//! engine — nothing in this crate wraps or suppresses them.

use serde::{Deserialize, Serialize};

/// A catalog book. Only the fields the recommendation core needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub book_id: String,
    pub title: String,
}

impl Book {
    pub fn new(book_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            book_id: book_id.into(),
            title: title.into(),
        }
    }
}

/// One user review of one book. The body is optional; an absent body reads
/// as empty text during emotion extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub user_id: String,
    pub book_id: String,
    pub rating: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// A bookshelf entry with status "read".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShelfEntry {
    pub book_id: String,
}

/// Catalog of all books.
pub trait BookCatalog: Send + Sync {
    /// All books, in the catalog's own order. The engine does not rely on
    /// this order for its results.
    fn get_books(&self) -> anyhow::Result<Vec<Book>>;

    /// One book by id, or `None` if it does not exist.
    fn get_book(&self, book_id: &str) -> anyhow::Result<Option<Book>>;
}

/// Review lookups.
pub trait ReviewStore: Send + Sync {
    /// Reviews of one book, at most `limit`.
    fn get_reviews_by_book_id(&self, book_id: &str, limit: usize) -> anyhow::Result<Vec<Review>>;

    /// Global average rating of a book, or `None` when it has no ratings.
    fn get_average_rating(&self, book_id: &str) -> anyhow::Result<Option<f64>>;

    /// All reviews by any of `user_ids`, across any book, with
    /// `rating >= min_rating`.
    fn get_reviews_by_users(
        &self,
        user_ids: &[String],
        min_rating: u8,
    ) -> anyhow::Result<Vec<Review>>;
}

/// Bookshelf lookups.
pub trait ShelfStore: Send + Sync {
    /// The user's "read" shelf.
    fn list_read_shelf(&self, user_id: &str) -> anyhow::Result<Vec<ShelfEntry>>;
}

/// Precomputed emotion-profile cache, written by an external batch job.
/// This crate only ever reads it and tolerates staleness.
pub trait ProfileCache: Send + Sync + std::fmt::Debug {
    /// Raw cached JSON for a book, shaped `{category: {count, score}}`, or
    /// `None` when no entry exists.
    fn read(&self, book_id: &str) -> anyhow::Result<Option<String>>;
}

/// A cache that never has anything. Useful when no batch job runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProfileCache;

impl ProfileCache for NoProfileCache {
    fn read(&self, _book_id: &str) -> anyhow::Result<Option<String>> {
        Ok(None)
    }
}
