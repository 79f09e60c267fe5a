// src/db/user_repository.rs
// DOCUMENTATION: User database operations
// PURPOSE: Insert and look up reviewer accounts

use crate::errors::StorageError;
use crate::models::{CreateUserRequest, User};
use sqlx::PgPool;

pub struct UserRepository;

impl UserRepository {
    /// Create a new user
    /// DOCUMENTATION: The unique index on login rejects duplicates
    pub async fn create_user(pool: &PgPool, req: &CreateUserRequest) -> Result<User, StorageError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (login)
            VALUES ($1)
            RETURNING id, login
            "#,
        )
        .bind(&req.login)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            let err = StorageError::from(e);
            log::error!("Failed to create user {}: {}", req.login, err);
            err
        })?;

        log::info!("Created user {} with id: {}", user.login, user.id);
        Ok(user)
    }

    /// Get a user by id
    pub async fn get_by_id(pool: &PgPool, id: i64) -> Result<Option<User>, StorageError> {
        sqlx::query_as::<_, User>("SELECT id, login FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to fetch user {}: {}", id, e);
                StorageError::from(e)
            })
    }

    /// Get a user by login
    pub async fn get_by_login(pool: &PgPool, login: &str) -> Result<Option<User>, StorageError> {
        sqlx::query_as::<_, User>("SELECT id, login FROM users WHERE login = $1")
            .bind(login)
            .fetch_optional(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to fetch user {}: {}", login, e);
                StorageError::from(e)
            })
    }
}
