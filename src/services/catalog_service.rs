// src/services/catalog_service.rs
// DOCUMENTATION: Business logic for users, books and movies
// PURPOSE: Validate leaf records before inserting them

use crate::db::Store;
use crate::errors::ReviewsError;
use crate::models::{Book, CreateTitleRequest, CreateUserRequest, Movie, User};
use validator::Validate;

pub struct CatalogService;

impl CatalogService {
    /// Create a new user
    pub async fn create_user<S: Store>(store: &S, req: CreateUserRequest) -> Result<User, ReviewsError> {
        if let Err(e) = req.validate() {
            return Err(ReviewsError::InvalidInput(e.to_string()));
        }
        Ok(store.insert_user(&req).await?)
    }

    /// Create a new book
    pub async fn create_book<S: Store>(store: &S, req: CreateTitleRequest) -> Result<Book, ReviewsError> {
        if let Err(e) = req.validate() {
            return Err(ReviewsError::InvalidInput(e.to_string()));
        }
        Ok(store.insert_book(&req).await?)
    }

    /// Create a new movie
    pub async fn create_movie<S: Store>(store: &S, req: CreateTitleRequest) -> Result<Movie, ReviewsError> {
        if let Err(e) = req.validate() {
            return Err(ReviewsError::InvalidInput(e.to_string()));
        }
        Ok(store.insert_movie(&req).await?)
    }

    /// Get a user by login, creating it when absent
    pub async fn find_or_create_user<S: Store>(store: &S, login: &str) -> Result<User, ReviewsError> {
        match store.find_user_by_login(login).await? {
            Some(user) => Ok(user),
            None => Self::create_user(store, CreateUserRequest::new(login)).await,
        }
    }

    /// Get a book by title, creating it when absent
    pub async fn find_or_create_book<S: Store>(store: &S, title: &str) -> Result<Book, ReviewsError> {
        match store.find_book_by_title(title).await? {
            Some(book) => Ok(book),
            None => Self::create_book(store, CreateTitleRequest::new(title)).await,
        }
    }

    /// Get a movie by title, creating it when absent
    pub async fn find_or_create_movie<S: Store>(store: &S, title: &str) -> Result<Movie, ReviewsError> {
        match store.find_movie_by_title(title).await? {
            Some(movie) => Ok(movie),
            None => Self::create_movie(store, CreateTitleRequest::new(title)).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use tokio_test::assert_err;

    #[tokio::test]
    async fn test_create_user() {
        let store = MemoryStore::new();
        let user = CatalogService::create_user(&store, CreateUserRequest::new("bob"))
            .await
            .unwrap();
        assert_eq!(user.login, "bob");
        assert_eq!(store.find_user(user.id).await.unwrap(), Some(user));
    }

    #[tokio::test]
    async fn test_blank_login_rejected_before_storage() {
        let store = MemoryStore::new();
        let err = assert_err!(CatalogService::create_user(&store, CreateUserRequest::new("")).await);
        assert_eq!(err.error_code(), "INVALID_INPUT");
        assert!(store.find_user_by_login("").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_long_title_rejected() {
        let store = MemoryStore::new();
        let title = "x".repeat(256);
        let err = assert_err!(CatalogService::create_movie(&store, CreateTitleRequest::new(title)).await);
        assert!(matches!(err, ReviewsError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_duplicate_title_surfaces_unique_violation() {
        let store = MemoryStore::new();
        CatalogService::create_book(&store, CreateTitleRequest::new("Snow Crash"))
            .await
            .unwrap();
        let err = assert_err!(
            CatalogService::create_book(&store, CreateTitleRequest::new("Snow Crash")).await
        );
        assert_eq!(err.error_code(), "UNIQUE_VIOLATION");
    }

    #[tokio::test]
    async fn test_find_or_create_is_idempotent() {
        let store = MemoryStore::new();
        let first = CatalogService::find_or_create_movie(&store, "Jaws").await.unwrap();
        let second = CatalogService::find_or_create_movie(&store, "Jaws").await.unwrap();
        assert_eq!(first, second);

        let bob = CatalogService::find_or_create_user(&store, "bob").await.unwrap();
        let book = CatalogService::find_or_create_book(&store, "Snow Crash").await.unwrap();
        assert_eq!(bob.id, 1);
        assert_eq!(book.id, 1);
    }
}
