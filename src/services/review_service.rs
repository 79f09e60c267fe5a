// src/services/review_service.rs
// DOCUMENTATION: Business logic for user reviews
// PURPOSE: Validate, then write; read reviews back through their associations

use crate::db::Store;
use crate::errors::ReviewsError;
use crate::models::{CreateReviewRequest, UserReview};
use crate::services::ReviewValidator;

pub struct ReviewService;

impl ReviewService {
    /// Create a new review
    /// DOCUMENTATION: Validation failures come back as ReviewsError::Validation
    /// and nothing is written. A duplicate that slipped past validation
    /// (concurrent writer, stale read) comes back as a storage UniqueViolation.
    pub async fn create_review<S: Store>(
        store: &S,
        validator: &ReviewValidator,
        req: &CreateReviewRequest,
    ) -> Result<UserReview, ReviewsError> {
        let validated = validator.validate(store, req).await?;
        let review = store.insert_review(validated.key()).await?;
        log::info!(
            "User {} reviewed {:?} (review {})",
            review.user_id,
            review.target(),
            review.id
        );
        Ok(review)
    }

    /// Get a review by id
    pub async fn get_review<S: Store>(store: &S, id: i64) -> Result<UserReview, ReviewsError> {
        store
            .find_review(id)
            .await?
            .ok_or(ReviewsError::NotFound {
                resource: "Review",
                id,
            })
    }

    /// Reviews written by a user
    pub async fn reviews_for_user<S: Store>(store: &S, user_id: i64) -> Result<Vec<UserReview>, ReviewsError> {
        if store.find_user(user_id).await?.is_none() {
            return Err(ReviewsError::NotFound {
                resource: "User",
                id: user_id,
            });
        }
        Ok(store.reviews_for_user(user_id).await?)
    }

    /// Reviews of a book
    pub async fn reviews_for_book<S: Store>(store: &S, book_id: i64) -> Result<Vec<UserReview>, ReviewsError> {
        if store.find_book(book_id).await?.is_none() {
            return Err(ReviewsError::NotFound {
                resource: "Book",
                id: book_id,
            });
        }
        Ok(store.reviews_for_book(book_id).await?)
    }

    /// Reviews of a movie
    pub async fn reviews_for_movie<S: Store>(store: &S, movie_id: i64) -> Result<Vec<UserReview>, ReviewsError> {
        if store.find_movie(movie_id).await?.is_none() {
            return Err(ReviewsError::NotFound {
                resource: "Movie",
                id: movie_id,
            });
        }
        Ok(store.reviews_for_movie(movie_id).await?)
    }

    pub async fn count_reviews<S: Store>(store: &S) -> Result<i64, ReviewsError> {
        Ok(store.count_reviews().await?)
    }
}
