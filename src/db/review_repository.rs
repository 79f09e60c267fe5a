// src/db/review_repository.rs
// DOCUMENTATION: User review database operations
// PURPOSE: Insert reviews and query them by owner, target, or stored key

use crate::errors::StorageError;
use crate::models::{ReviewKey, UserReview};
use sqlx::PgPool;

pub struct ReviewRepository;

impl ReviewRepository {
    /// Insert a review row
    /// DOCUMENTATION: No validation happens here. user_reviews_unique and the
    /// foreign keys are the only checks, and their violations come back typed
    pub async fn create_review(pool: &PgPool, key: &ReviewKey) -> Result<UserReview, StorageError> {
        let review = sqlx::query_as::<_, UserReview>(
            r#"
            INSERT INTO user_reviews (user_id, book_id, movie_id)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, book_id, movie_id
            "#,
        )
        .bind(key.user_id)
        .bind(key.book_id)
        .bind(key.movie_id)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            let err = StorageError::from(e);
            match &err {
                StorageError::Database(_) => log::error!("Failed to create review {:?}: {}", key, err),
                _ => log::warn!("Review {:?} rejected by storage: {}", key, err),
            }
            err
        })?;

        log::info!("Created review with id: {}", review.id);
        Ok(review)
    }

    /// Get a review by id
    pub async fn get_by_id(pool: &PgPool, id: i64) -> Result<Option<UserReview>, StorageError> {
        sqlx::query_as::<_, UserReview>(
            "SELECT id, user_id, book_id, movie_id FROM user_reviews WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to fetch review {}: {}", id, e);
            StorageError::from(e)
        })
    }

    /// Find a review with exactly these stored column values
    /// DOCUMENTATION: NULL matches NULL, the same scoping the application-level
    /// uniqueness check uses
    pub async fn get_by_key(pool: &PgPool, key: &ReviewKey) -> Result<Option<UserReview>, StorageError> {
        sqlx::query_as::<_, UserReview>(
            r#"
            SELECT id, user_id, book_id, movie_id
            FROM user_reviews
            WHERE user_id = $1
              AND book_id IS NOT DISTINCT FROM $2
              AND movie_id IS NOT DISTINCT FROM $3
            LIMIT 1
            "#,
        )
        .bind(key.user_id)
        .bind(key.book_id)
        .bind(key.movie_id)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to look up review {:?}: {}", key, e);
            StorageError::from(e)
        })
    }

    /// Reviews written by a user
    pub async fn get_reviews_by_user(pool: &PgPool, user_id: i64) -> Result<Vec<UserReview>, StorageError> {
        sqlx::query_as::<_, UserReview>(
            r#"
            SELECT id, user_id, book_id, movie_id
            FROM user_reviews
            WHERE user_id = $1
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to fetch reviews for user {}: {}", user_id, e);
            StorageError::from(e)
        })
    }

    /// Reviews of a book
    pub async fn get_reviews_by_book(pool: &PgPool, book_id: i64) -> Result<Vec<UserReview>, StorageError> {
        sqlx::query_as::<_, UserReview>(
            r#"
            SELECT id, user_id, book_id, movie_id
            FROM user_reviews
            WHERE book_id = $1
            ORDER BY id
            "#,
        )
        .bind(book_id)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to fetch reviews for book {}: {}", book_id, e);
            StorageError::from(e)
        })
    }

    /// Reviews of a movie
    pub async fn get_reviews_by_movie(pool: &PgPool, movie_id: i64) -> Result<Vec<UserReview>, StorageError> {
        sqlx::query_as::<_, UserReview>(
            r#"
            SELECT id, user_id, book_id, movie_id
            FROM user_reviews
            WHERE movie_id = $1
            ORDER BY id
            "#,
        )
        .bind(movie_id)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to fetch reviews for movie {}: {}", movie_id, e);
            StorageError::from(e)
        })
    }

    /// Total number of stored reviews
    pub async fn count_reviews(pool: &PgPool) -> Result<i64, StorageError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM user_reviews")
            .fetch_one(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to count reviews: {}", e);
                StorageError::from(e)
            })
    }
}
