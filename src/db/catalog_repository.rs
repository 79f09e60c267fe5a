// src/db/catalog_repository.rs
// DOCUMENTATION: Book and movie database operations
// PURPOSE: Insert and look up the things users review

use crate::errors::StorageError;
use crate::models::{Book, CreateTitleRequest, Movie};
use sqlx::PgPool;

pub struct BookRepository;

impl BookRepository {
    /// Create a new book
    /// DOCUMENTATION: The unique index on title rejects duplicates
    pub async fn create_book(pool: &PgPool, req: &CreateTitleRequest) -> Result<Book, StorageError> {
        let book = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title)
            VALUES ($1)
            RETURNING id, title
            "#,
        )
        .bind(&req.title)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            let err = StorageError::from(e);
            log::error!("Failed to create book {}: {}", req.title, err);
            err
        })?;

        log::info!("Created book {} with id: {}", book.title, book.id);
        Ok(book)
    }

    pub async fn get_by_id(pool: &PgPool, id: i64) -> Result<Option<Book>, StorageError> {
        sqlx::query_as::<_, Book>("SELECT id, title FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to fetch book {}: {}", id, e);
                StorageError::from(e)
            })
    }

    pub async fn get_by_title(pool: &PgPool, title: &str) -> Result<Option<Book>, StorageError> {
        sqlx::query_as::<_, Book>("SELECT id, title FROM books WHERE title = $1")
            .bind(title)
            .fetch_optional(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to fetch book {}: {}", title, e);
                StorageError::from(e)
            })
    }
}

pub struct MovieRepository;

impl MovieRepository {
    /// Create a new movie
    pub async fn create_movie(pool: &PgPool, req: &CreateTitleRequest) -> Result<Movie, StorageError> {
        let movie = sqlx::query_as::<_, Movie>(
            r#"
            INSERT INTO movies (title)
            VALUES ($1)
            RETURNING id, title
            "#,
        )
        .bind(&req.title)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            let err = StorageError::from(e);
            log::error!("Failed to create movie {}: {}", req.title, err);
            err
        })?;

        log::info!("Created movie {} with id: {}", movie.title, movie.id);
        Ok(movie)
    }

    pub async fn get_by_id(pool: &PgPool, id: i64) -> Result<Option<Movie>, StorageError> {
        sqlx::query_as::<_, Movie>("SELECT id, title FROM movies WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to fetch movie {}: {}", id, e);
                StorageError::from(e)
            })
    }

    pub async fn get_by_title(pool: &PgPool, title: &str) -> Result<Option<Movie>, StorageError> {
        sqlx::query_as::<_, Movie>("SELECT id, title FROM movies WHERE title = $1")
            .bind(title)
            .fetch_optional(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to fetch movie {}: {}", title, e);
                StorageError::from(e)
            })
    }
}
