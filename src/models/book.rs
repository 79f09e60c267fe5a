// src/models/book.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Book that can be reviewed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, Validate)]
pub struct Book {
    pub id: i64,
    #[validate(length(min = 1, max = 255))]
    pub title: String,
}

/// Request to create a new book or movie
/// DOCUMENTATION: Both catalog tables carry only a unique title
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTitleRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
}

impl CreateTitleRequest {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}
