// src/models/movie.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Movie that can be reviewed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, Validate)]
pub struct Movie {
    pub id: i64,
    #[validate(length(min = 1, max = 255))]
    pub title: String,
}
