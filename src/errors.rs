// src/errors.rs
// DOCUMENTATION: Custom error types and error bodies
// PURPOSE: Centralized error handling for entire application

use crate::models::REVIEW_UNIQUE_INDEX;
use serde::Serialize;
use serde_json::{json, Value};
use std::fmt;
use thiserror::Error;

/// Reason a candidate record was rejected by application-level validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationErrorKind {
    MissingUser,
    MissingTarget,
    AmbiguousTarget,
    DuplicateReview,
    ChildInvalid,
}

/// A single validation failure
/// DOCUMENTATION: `field` names the attribute the failure is attached to
/// ("user", "book", "movie", or "base" for record-wide failures)
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub kind: ValidationErrorKind,
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(kind: ValidationErrorKind, field: &'static str, message: impl Into<String>) -> Self {
        Self {
            kind,
            field,
            message: message.into(),
        }
    }

    pub fn missing_user() -> Self {
        Self::new(ValidationErrorKind::MissingUser, "user", "can't be blank")
    }

    pub fn missing_target() -> Self {
        Self::new(
            ValidationErrorKind::MissingTarget,
            "base",
            "Must belong to book or movie",
        )
    }

    pub fn ambiguous_target() -> Self {
        Self::new(
            ValidationErrorKind::AmbiguousTarget,
            "base",
            "Must belong to either a book or a movie, not both",
        )
    }

    pub fn duplicate_review() -> Self {
        Self::new(
            ValidationErrorKind::DuplicateReview,
            "user",
            "has already been taken",
        )
    }

    /// Wrap the field errors of an associated record
    pub fn child_invalid(field: &'static str, errors: &validator::ValidationErrors) -> Self {
        Self::new(
            ValidationErrorKind::ChildInvalid,
            field,
            format!("is invalid ({})", errors),
        )
    }
}

/// Every failure collected for one candidate record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: ValidationError) {
        self.0.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    pub fn contains(&self, kind: ValidationErrorKind) -> bool {
        self.0.iter().any(|e| e.kind == kind)
    }

    /// First failure in check order, if any
    pub fn first(&self) -> Option<&ValidationError> {
        self.0.first()
    }

    /// Ok when nothing was collected
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.0.iter().map(|e| e.to_string()).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        Self(vec![error])
    }
}

/// Storage-layer failures
/// DOCUMENTATION: Constraint violations are split out from generic database
/// faults so callers can tell "already reviewed" apart from connectivity issues
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    #[error("Foreign key constraint violated: {constraint}")]
    ForeignKeyViolation { constraint: String },

    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl StorageError {
    pub fn unique(constraint: impl Into<String>) -> Self {
        StorageError::UniqueViolation {
            constraint: constraint.into(),
        }
    }

    pub fn foreign_key(constraint: impl Into<String>) -> Self {
        StorageError::ForeignKeyViolation {
            constraint: constraint.into(),
        }
    }

    pub fn is_unique_violation(&self) -> bool {
        matches!(self, StorageError::UniqueViolation { .. })
    }

    pub fn is_foreign_key_violation(&self) -> bool {
        matches!(self, StorageError::ForeignKeyViolation { .. })
    }
}

impl From<sqlx::Error> for StorageError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &e {
            let constraint = db.constraint().unwrap_or("unknown").to_string();
            if db.is_unique_violation() {
                return StorageError::UniqueViolation { constraint };
            }
            if db.is_foreign_key_violation() {
                return StorageError::ForeignKeyViolation { constraint };
            }
        }
        StorageError::Database(e)
    }
}

/// Application-specific error types
/// DOCUMENTATION: Comprehensive error enum for all possible failures
/// Each variant maps to a stable error code used in rendered error bodies
#[derive(Error, Debug)]
pub enum ReviewsError {
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{resource} not found with id: {id}")]
    NotFound { resource: &'static str, id: i64 },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<ValidationErrors> for ReviewsError {
    fn from(errors: ValidationErrors) -> Self {
        ReviewsError::Validation(errors)
    }
}

impl ReviewsError {
    /// Stable machine-readable code
    pub fn error_code(&self) -> &'static str {
        match self {
            ReviewsError::Validation(errors) if errors.contains(ValidationErrorKind::DuplicateReview) => {
                "DUPLICATE_REVIEW"
            }
            ReviewsError::Validation(_) => "VALIDATION_ERROR",
            ReviewsError::Storage(StorageError::UniqueViolation { .. }) => "UNIQUE_VIOLATION",
            ReviewsError::Storage(StorageError::ForeignKeyViolation { .. }) => {
                "FOREIGN_KEY_VIOLATION"
            }
            ReviewsError::Storage(StorageError::Database(_)) => "DATABASE_ERROR",
            ReviewsError::InvalidInput(_) => "INVALID_INPUT",
            ReviewsError::NotFound { .. } => "NOT_FOUND",
            ReviewsError::Config(_) => "CONFIG_ERROR",
        }
    }

    /// True when either layer rejected the write as an already-existing review
    pub fn is_duplicate(&self) -> bool {
        match self {
            ReviewsError::Validation(errors) => errors.contains(ValidationErrorKind::DuplicateReview),
            ReviewsError::Storage(StorageError::UniqueViolation { constraint }) => {
                constraint == REVIEW_UNIQUE_INDEX
            }
            _ => false,
        }
    }

    /// Render the error as a JSON body for presentation
    /// DOCUMENTATION: Validation failures carry their per-field details
    pub fn to_body(&self) -> Value {
        let details = match self {
            ReviewsError::Validation(errors) => json!(errors),
            _ => Value::Null,
        };

        json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
                "details": details,
                "timestamp": chrono::Utc::now().to_rfc3339()
            }
        })
    }
}
