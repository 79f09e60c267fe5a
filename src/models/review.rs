// src/models/review.rs
// DOCUMENTATION: User review records and the keys used to keep them unique
// PURPOSE: A review links one user to exactly one book or movie

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Stand-in for a NULL target id inside the coalesced unique key.
/// Row ids start at 1, so 0 never names a real book or movie.
pub const NULL_TARGET_SENTINEL: i64 = 0;

/// Name of the coalesced unique index on user_reviews
pub const REVIEW_UNIQUE_INDEX: &str = "user_reviews_unique";

/// Review row as stored in user_reviews
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct UserReview {
    pub id: i64,
    pub user_id: i64,
    pub book_id: Option<i64>,
    pub movie_id: Option<i64>,
}

/// The thing a review is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "lowercase")]
pub enum ReviewTarget {
    Book(i64),
    Movie(i64),
}

impl UserReview {
    pub fn key(&self) -> ReviewKey {
        ReviewKey {
            user_id: self.user_id,
            book_id: self.book_id,
            movie_id: self.movie_id,
        }
    }

    /// Book wins when a permissive policy let both through
    pub fn target(&self) -> Option<ReviewTarget> {
        match (self.book_id, self.movie_id) {
            (Some(id), _) => Some(ReviewTarget::Book(id)),
            (None, Some(id)) => Some(ReviewTarget::Movie(id)),
            (None, None) => None,
        }
    }
}

/// Candidate review submitted by a caller
/// DOCUMENTATION: Every reference is optional here; the validator decides
/// whether the combination is acceptable
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateReviewRequest {
    pub user_id: Option<i64>,
    pub book_id: Option<i64>,
    pub movie_id: Option<i64>,
}

impl CreateReviewRequest {
    pub fn for_book(user_id: i64, book_id: i64) -> Self {
        Self {
            user_id: Some(user_id),
            book_id: Some(book_id),
            movie_id: None,
        }
    }

    pub fn for_movie(user_id: i64, movie_id: i64) -> Self {
        Self {
            user_id: Some(user_id),
            book_id: None,
            movie_id: Some(movie_id),
        }
    }

    /// Stored column triple, available once a user is named
    pub fn key(&self) -> Option<ReviewKey> {
        self.user_id.map(|user_id| ReviewKey {
            user_id,
            book_id: self.book_id,
            movie_id: self.movie_id,
        })
    }
}

/// Column values of a review row, NULLs kept as NULLs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReviewKey {
    pub user_id: i64,
    pub book_id: Option<i64>,
    pub movie_id: Option<i64>,
}

impl ReviewKey {
    pub fn book(user_id: i64, book_id: i64) -> Self {
        Self {
            user_id,
            book_id: Some(book_id),
            movie_id: None,
        }
    }

    pub fn movie(user_id: i64, movie_id: i64) -> Self {
        Self {
            user_id,
            book_id: None,
            movie_id: Some(movie_id),
        }
    }

    /// Key as seen by user_reviews_unique:
    /// (user_id, COALESCE(movie_id, 0), COALESCE(book_id, 0))
    pub fn coalesced(&self) -> (i64, i64, i64) {
        (
            self.user_id,
            self.movie_id.unwrap_or(NULL_TARGET_SENTINEL),
            self.book_id.unwrap_or(NULL_TARGET_SENTINEL),
        )
    }
}

/// A candidate that passed application-level validation
/// DOCUMENTATION: Only the review validator can build one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedReview {
    key: ReviewKey,
}

impl ValidatedReview {
    pub(crate) fn new(key: ReviewKey) -> Self {
        Self { key }
    }

    pub fn key(&self) -> &ReviewKey {
        &self.key
    }
}
