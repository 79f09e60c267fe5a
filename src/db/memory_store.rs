// src/db/memory_store.rs
// DOCUMENTATION: In-memory storage engine
// PURPOSE: Same constraints as the PostgreSQL schema, without a server

use crate::db::Store;
use crate::errors::StorageError;
use crate::models::{
    Book, CreateTitleRequest, CreateUserRequest, Movie, ReviewKey, User, UserReview,
    REVIEW_UNIQUE_INDEX,
};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    books: BTreeMap<i64, Book>,
    movies: BTreeMap<i64, Movie>,
    reviews: BTreeMap<i64, UserReview>,

    // Unique indexes, value -> owning row id
    users_by_login: HashMap<String, i64>,
    books_by_title: HashMap<String, i64>,
    movies_by_title: HashMap<String, i64>,
    reviews_unique: HashMap<(i64, i64, i64), i64>,
}

fn next_id<V>(table: &BTreeMap<i64, V>) -> i64 {
    table.keys().next_back().map_or(1, |last| last + 1)
}

/// Thread-safe in-memory store
/// DOCUMENTATION: Every write takes the table lock, checks the unique index
/// and then the foreign keys, and only then stores the row. Conflicting
/// writers are serialized, so exactly one of two racing duplicates lands.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    async fn insert_user(&self, req: &CreateUserRequest) -> Result<User, StorageError> {
        let mut tables = self.tables.write().await;
        if tables.users_by_login.contains_key(&req.login) {
            return Err(StorageError::unique("index_users_on_login"));
        }

        let user = User {
            id: next_id(&tables.users),
            login: req.login.clone(),
        };
        tables.users_by_login.insert(user.login.clone(), user.id);
        tables.users.insert(user.id, user.clone());
        log::debug!("Stored user {} with id: {}", user.login, user.id);
        Ok(user)
    }

    async fn insert_book(&self, req: &CreateTitleRequest) -> Result<Book, StorageError> {
        let mut tables = self.tables.write().await;
        if tables.books_by_title.contains_key(&req.title) {
            return Err(StorageError::unique("index_books_on_title"));
        }

        let book = Book {
            id: next_id(&tables.books),
            title: req.title.clone(),
        };
        tables.books_by_title.insert(book.title.clone(), book.id);
        tables.books.insert(book.id, book.clone());
        log::debug!("Stored book {} with id: {}", book.title, book.id);
        Ok(book)
    }

    async fn insert_movie(&self, req: &CreateTitleRequest) -> Result<Movie, StorageError> {
        let mut tables = self.tables.write().await;
        if tables.movies_by_title.contains_key(&req.title) {
            return Err(StorageError::unique("index_movies_on_title"));
        }

        let movie = Movie {
            id: next_id(&tables.movies),
            title: req.title.clone(),
        };
        tables.movies_by_title.insert(movie.title.clone(), movie.id);
        tables.movies.insert(movie.id, movie.clone());
        log::debug!("Stored movie {} with id: {}", movie.title, movie.id);
        Ok(movie)
    }

    async fn find_user(&self, id: i64) -> Result<Option<User>, StorageError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_login(&self, login: &str) -> Result<Option<User>, StorageError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users_by_login
            .get(login)
            .and_then(|id| tables.users.get(id))
            .cloned())
    }

    async fn find_book(&self, id: i64) -> Result<Option<Book>, StorageError> {
        Ok(self.tables.read().await.books.get(&id).cloned())
    }

    async fn find_book_by_title(&self, title: &str) -> Result<Option<Book>, StorageError> {
        let tables = self.tables.read().await;
        Ok(tables
            .books_by_title
            .get(title)
            .and_then(|id| tables.books.get(id))
            .cloned())
    }

    async fn find_movie(&self, id: i64) -> Result<Option<Movie>, StorageError> {
        Ok(self.tables.read().await.movies.get(&id).cloned())
    }

    async fn find_movie_by_title(&self, title: &str) -> Result<Option<Movie>, StorageError> {
        let tables = self.tables.read().await;
        Ok(tables
            .movies_by_title
            .get(title)
            .and_then(|id| tables.movies.get(id))
            .cloned())
    }

    async fn insert_review(&self, key: &ReviewKey) -> Result<UserReview, StorageError> {
        let mut tables = self.tables.write().await;

        let index_key = key.coalesced();
        if let Some(existing) = tables.reviews_unique.get(&index_key) {
            log::warn!(
                "Review {:?} collides with review {} on {}",
                key,
                existing,
                REVIEW_UNIQUE_INDEX
            );
            return Err(StorageError::unique(REVIEW_UNIQUE_INDEX));
        }

        if !tables.users.contains_key(&key.user_id) {
            return Err(StorageError::foreign_key("user_reviews_user_id_fkey"));
        }
        if let Some(book_id) = key.book_id {
            if !tables.books.contains_key(&book_id) {
                return Err(StorageError::foreign_key("user_reviews_book_id_fkey"));
            }
        }
        if let Some(movie_id) = key.movie_id {
            if !tables.movies.contains_key(&movie_id) {
                return Err(StorageError::foreign_key("user_reviews_movie_id_fkey"));
            }
        }

        let review = UserReview {
            id: next_id(&tables.reviews),
            user_id: key.user_id,
            book_id: key.book_id,
            movie_id: key.movie_id,
        };
        tables.reviews_unique.insert(index_key, review.id);
        tables.reviews.insert(review.id, review.clone());
        log::debug!("Stored review with id: {}", review.id);
        Ok(review)
    }

    async fn find_review(&self, id: i64) -> Result<Option<UserReview>, StorageError> {
        Ok(self.tables.read().await.reviews.get(&id).cloned())
    }

    async fn find_review_by_key(&self, key: &ReviewKey) -> Result<Option<UserReview>, StorageError> {
        let tables = self.tables.read().await;
        Ok(tables
            .reviews
            .values()
            .find(|r| r.key() == *key)
            .cloned())
    }

    async fn reviews_for_user(&self, user_id: i64) -> Result<Vec<UserReview>, StorageError> {
        let tables = self.tables.read().await;
        Ok(tables
            .reviews
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn reviews_for_book(&self, book_id: i64) -> Result<Vec<UserReview>, StorageError> {
        let tables = self.tables.read().await;
        Ok(tables
            .reviews
            .values()
            .filter(|r| r.book_id == Some(book_id))
            .cloned()
            .collect())
    }

    async fn reviews_for_movie(&self, movie_id: i64) -> Result<Vec<UserReview>, StorageError> {
        let tables = self.tables.read().await;
        Ok(tables
            .reviews
            .values()
            .filter(|r| r.movie_id == Some(movie_id))
            .cloned()
            .collect())
    }

    async fn count_reviews(&self) -> Result<i64, StorageError> {
        Ok(self.tables.read().await.reviews.len() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    async fn seeded() -> (MemoryStore, User, Book, Movie) {
        let store = MemoryStore::new();
        let user = store.insert_user(&CreateUserRequest::new("bob")).await.unwrap();
        let book = store
            .insert_book(&CreateTitleRequest::new("Snow Crash"))
            .await
            .unwrap();
        let movie = store
            .insert_movie(&CreateTitleRequest::new("Jaws"))
            .await
            .unwrap();
        (store, user, book, movie)
    }

    #[tokio::test]
    async fn test_ids_start_above_sentinel() {
        let (_, user, book, movie) = seeded().await;
        assert_eq!(user.id, 1);
        assert_eq!(book.id, 1);
        assert_eq!(movie.id, 1);
    }

    #[tokio::test]
    async fn test_login_is_unique() {
        let (store, _, _, _) = seeded().await;
        let err = assert_err!(store.insert_user(&CreateUserRequest::new("bob")).await);
        assert!(err.is_unique_violation());
    }

    #[tokio::test]
    async fn test_titles_are_unique_per_table() {
        let (store, _, _, _) = seeded().await;
        let err = assert_err!(store.insert_book(&CreateTitleRequest::new("Snow Crash")).await);
        assert!(err.is_unique_violation());

        // A movie may share a book's title
        assert_ok!(store.insert_movie(&CreateTitleRequest::new("Snow Crash")).await);
    }

    #[tokio::test]
    async fn test_duplicate_book_review_is_unique_violation() {
        let (store, user, book, _) = seeded().await;
        assert_ok!(store.insert_review(&ReviewKey::book(user.id, book.id)).await);

        let err = assert_err!(store.insert_review(&ReviewKey::book(user.id, book.id)).await);
        match err {
            StorageError::UniqueViolation { constraint } => {
                assert_eq!(constraint, REVIEW_UNIQUE_INDEX)
            }
            other => panic!("expected unique violation, got {:?}", other),
        }
        assert_eq!(store.count_reviews().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_null_null_rows_collide() {
        let (store, user, _, _) = seeded().await;
        let blank = ReviewKey {
            user_id: user.id,
            book_id: None,
            movie_id: None,
        };
        assert_ok!(store.insert_review(&blank).await);
        let err = assert_err!(store.insert_review(&blank).await);
        assert!(err.is_unique_violation());
    }

    #[tokio::test]
    async fn test_book_and_movie_with_same_id_do_not_collide() {
        let (store, user, book, movie) = seeded().await;
        assert_eq!(book.id, movie.id);

        assert_ok!(store.insert_review(&ReviewKey::book(user.id, book.id)).await);
        assert_ok!(store.insert_review(&ReviewKey::movie(user.id, movie.id)).await);
        assert_eq!(store.count_reviews().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_foreign_keys_enforced() {
        let (store, user, book, _) = seeded().await;

        let err = assert_err!(store.insert_review(&ReviewKey::book(99, book.id)).await);
        assert!(err.is_foreign_key_violation());

        let err = assert_err!(store.insert_review(&ReviewKey::movie(user.id, 42)).await);
        match err {
            StorageError::ForeignKeyViolation { constraint } => {
                assert_eq!(constraint, "user_reviews_movie_id_fkey")
            }
            other => panic!("expected foreign key violation, got {:?}", other),
        }
        assert_eq!(store.count_reviews().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_book_review_keeps_movie_null() {
        let (store, user, book, _) = seeded().await;
        let review = store
            .insert_review(&ReviewKey::book(user.id, book.id))
            .await
            .unwrap();

        let stored = store.find_review(review.id).await.unwrap().unwrap();
        assert_eq!(stored.movie_id, None);
        assert_eq!(stored.book_id, Some(book.id));
        assert_eq!(stored.key().coalesced(), (user.id, 0, book.id));
    }

    #[tokio::test]
    async fn test_find_by_key_matches_nulls_exactly() {
        let (store, user, book, movie) = seeded().await;
        store
            .insert_review(&ReviewKey::book(user.id, book.id))
            .await
            .unwrap();

        assert!(store
            .find_review_by_key(&ReviewKey::book(user.id, book.id))
            .await
            .unwrap()
            .is_some());

        let both = ReviewKey {
            user_id: user.id,
            book_id: Some(book.id),
            movie_id: Some(movie.id),
        };
        assert!(store.find_review_by_key(&both).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_association_queries() {
        let (store, user, book, movie) = seeded().await;
        let alice = store.insert_user(&CreateUserRequest::new("alice")).await.unwrap();

        store.insert_review(&ReviewKey::book(user.id, book.id)).await.unwrap();
        store.insert_review(&ReviewKey::movie(user.id, movie.id)).await.unwrap();
        store.insert_review(&ReviewKey::book(alice.id, book.id)).await.unwrap();

        assert_eq!(store.reviews_for_user(user.id).await.unwrap().len(), 2);
        assert_eq!(store.reviews_for_user(alice.id).await.unwrap().len(), 1);
        assert_eq!(store.reviews_for_book(book.id).await.unwrap().len(), 2);
        assert_eq!(store.reviews_for_movie(movie.id).await.unwrap().len(), 1);
        assert_eq!(
            store.find_user_by_login("alice").await.unwrap(),
            Some(alice)
        );
    }
}
