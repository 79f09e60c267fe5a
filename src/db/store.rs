// src/db/store.rs
// DOCUMENTATION: Storage engine seam
// PURPOSE: One interface over PostgreSQL and the in-memory engine so the
// review validator and services run unchanged against either

use crate::db::{BookRepository, MovieRepository, ReviewRepository, UserRepository};
use crate::errors::StorageError;
use crate::models::{Book, CreateTitleRequest, CreateUserRequest, Movie, ReviewKey, User, UserReview};
use sqlx::PgPool;

/// Row-level operations a storage engine must provide
/// DOCUMENTATION: Implementations enforce the unique indexes and foreign keys
/// declared in migrations/ and report violations as typed StorageErrors.
/// Nothing here runs application-level validation.
#[allow(async_fn_in_trait)]
pub trait Store {
    async fn insert_user(&self, req: &CreateUserRequest) -> Result<User, StorageError>;
    async fn insert_book(&self, req: &CreateTitleRequest) -> Result<Book, StorageError>;
    async fn insert_movie(&self, req: &CreateTitleRequest) -> Result<Movie, StorageError>;

    async fn find_user(&self, id: i64) -> Result<Option<User>, StorageError>;
    async fn find_user_by_login(&self, login: &str) -> Result<Option<User>, StorageError>;
    async fn find_book(&self, id: i64) -> Result<Option<Book>, StorageError>;
    async fn find_book_by_title(&self, title: &str) -> Result<Option<Book>, StorageError>;
    async fn find_movie(&self, id: i64) -> Result<Option<Movie>, StorageError>;
    async fn find_movie_by_title(&self, title: &str) -> Result<Option<Movie>, StorageError>;

    async fn insert_review(&self, key: &ReviewKey) -> Result<UserReview, StorageError>;
    async fn find_review(&self, id: i64) -> Result<Option<UserReview>, StorageError>;
    async fn find_review_by_key(&self, key: &ReviewKey) -> Result<Option<UserReview>, StorageError>;
    async fn reviews_for_user(&self, user_id: i64) -> Result<Vec<UserReview>, StorageError>;
    async fn reviews_for_book(&self, book_id: i64) -> Result<Vec<UserReview>, StorageError>;
    async fn reviews_for_movie(&self, movie_id: i64) -> Result<Vec<UserReview>, StorageError>;
    async fn count_reviews(&self) -> Result<i64, StorageError>;
}

/// PostgreSQL-backed store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl Store for PgStore {
    async fn insert_user(&self, req: &CreateUserRequest) -> Result<User, StorageError> {
        UserRepository::create_user(&self.pool, req).await
    }

    async fn insert_book(&self, req: &CreateTitleRequest) -> Result<Book, StorageError> {
        BookRepository::create_book(&self.pool, req).await
    }

    async fn insert_movie(&self, req: &CreateTitleRequest) -> Result<Movie, StorageError> {
        MovieRepository::create_movie(&self.pool, req).await
    }

    async fn find_user(&self, id: i64) -> Result<Option<User>, StorageError> {
        UserRepository::get_by_id(&self.pool, id).await
    }

    async fn find_user_by_login(&self, login: &str) -> Result<Option<User>, StorageError> {
        UserRepository::get_by_login(&self.pool, login).await
    }

    async fn find_book(&self, id: i64) -> Result<Option<Book>, StorageError> {
        BookRepository::get_by_id(&self.pool, id).await
    }

    async fn find_book_by_title(&self, title: &str) -> Result<Option<Book>, StorageError> {
        BookRepository::get_by_title(&self.pool, title).await
    }

    async fn find_movie(&self, id: i64) -> Result<Option<Movie>, StorageError> {
        MovieRepository::get_by_id(&self.pool, id).await
    }

    async fn find_movie_by_title(&self, title: &str) -> Result<Option<Movie>, StorageError> {
        MovieRepository::get_by_title(&self.pool, title).await
    }

    async fn insert_review(&self, key: &ReviewKey) -> Result<UserReview, StorageError> {
        ReviewRepository::create_review(&self.pool, key).await
    }

    async fn find_review(&self, id: i64) -> Result<Option<UserReview>, StorageError> {
        ReviewRepository::get_by_id(&self.pool, id).await
    }

    async fn find_review_by_key(&self, key: &ReviewKey) -> Result<Option<UserReview>, StorageError> {
        ReviewRepository::get_by_key(&self.pool, key).await
    }

    async fn reviews_for_user(&self, user_id: i64) -> Result<Vec<UserReview>, StorageError> {
        ReviewRepository::get_reviews_by_user(&self.pool, user_id).await
    }

    async fn reviews_for_book(&self, book_id: i64) -> Result<Vec<UserReview>, StorageError> {
        ReviewRepository::get_reviews_by_book(&self.pool, book_id).await
    }

    async fn reviews_for_movie(&self, movie_id: i64) -> Result<Vec<UserReview>, StorageError> {
        ReviewRepository::get_reviews_by_movie(&self.pool, movie_id).await
    }

    async fn count_reviews(&self) -> Result<i64, StorageError> {
        ReviewRepository::count_reviews(&self.pool).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema;
    use crate::models::REVIEW_UNIQUE_INDEX;
    use sqlx::postgres::PgPoolOptions;

    // Integration tests require a real database
    // Run with: DATABASE_URL=postgres://... cargo test -- --ignored

    async fn connect() -> PgStore {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = PgPoolOptions::new()
            .max_connections(2)
            .connect(&url)
            .await
            .expect("pool creation failed");
        schema::migrate(&pool).await.expect("migrations failed");
        PgStore::new(pool)
    }

    fn unique_name(prefix: &str) -> String {
        let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
        format!("{}-{}", prefix, nanos)
    }

    async fn seeded(store: &PgStore) -> (User, Book, Movie) {
        let user = store
            .insert_user(&CreateUserRequest::new(unique_name("bob")))
            .await
            .expect("user insert failed");
        let book = store
            .insert_book(&CreateTitleRequest::new(unique_name("Snow Crash")))
            .await
            .expect("book insert failed");
        let movie = store
            .insert_movie(&CreateTitleRequest::new(unique_name("Jaws")))
            .await
            .expect("movie insert failed");
        (user, book, movie)
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn raw_duplicate_insert_hits_coalesced_index() {
        let store = connect().await;
        let (user, book, _) = seeded(&store).await;

        store
            .insert_review(&ReviewKey::book(user.id, book.id))
            .await
            .expect("first review failed");

        let err = sqlx::query("INSERT INTO user_reviews (user_id, book_id) VALUES ($1, $2)")
            .bind(user.id)
            .bind(book.id)
            .execute(store.pool())
            .await
            .map_err(StorageError::from)
            .expect_err("duplicate row accepted");

        match err {
            StorageError::UniqueViolation { constraint } => assert_eq!(constraint, REVIEW_UNIQUE_INDEX),
            other => panic!("expected unique violation, got {:?}", other),
        }
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn book_and_movie_reviews_coexist() {
        let store = connect().await;
        let (user, book, movie) = seeded(&store).await;

        let by_book = store
            .insert_review(&ReviewKey::book(user.id, book.id))
            .await
            .expect("book review failed");
        store
            .insert_review(&ReviewKey::movie(user.id, movie.id))
            .await
            .expect("movie review failed");

        let stored = store.find_review(by_book.id).await.unwrap().unwrap();
        assert_eq!(stored.movie_id, None);
        assert_eq!(store.reviews_for_user(user.id).await.unwrap().len(), 2);
        assert!(store
            .find_review_by_key(&ReviewKey::movie(user.id, movie.id))
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn dangling_target_is_foreign_key_violation() {
        let store = connect().await;
        let (user, _, _) = seeded(&store).await;

        let err = store
            .insert_review(&ReviewKey::movie(user.id, i64::MAX))
            .await
            .expect_err("dangling movie accepted");
        assert!(err.is_foreign_key_violation());
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn duplicate_login_is_unique_violation() {
        let store = connect().await;
        let (user, _, _) = seeded(&store).await;

        let err = store
            .insert_user(&CreateUserRequest::new(user.login.clone()))
            .await
            .expect_err("duplicate login accepted");
        assert!(err.is_unique_violation());
        assert_eq!(
            store.find_user_by_login(&user.login).await.unwrap(),
            Some(user)
        );
    }
}
