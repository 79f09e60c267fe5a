// src/services/review_validator.rs
// DOCUMENTATION: Application-level review validation
// PURPOSE: Reject bad reviews before they reach storage

use crate::config::Config;
use crate::db::Store;
use crate::errors::{ReviewsError, ValidationError, ValidationErrors};
use crate::models::{CreateReviewRequest, ValidatedReview};
use validator::Validate;

/// Knobs for review validation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReviewPolicy {
    /// Let a single review name both a book and a movie
    pub allow_dual_target: bool,
}

impl ReviewPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            allow_dual_target: config.allow_dual_target,
        }
    }
}

/// Validates candidate reviews against the current store contents
/// DOCUMENTATION: Runs every check and reports all failures at once.
/// The duplicate check is a plain read, so two concurrent writers can both
/// pass it; user_reviews_unique settles that race at insert time.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReviewValidator {
    policy: ReviewPolicy,
}

impl ReviewValidator {
    pub fn new(policy: ReviewPolicy) -> Self {
        Self { policy }
    }

    /// Check a candidate review
    /// DOCUMENTATION: Checks run in this order:
    /// 1. the user resolves (MissingUser)
    /// 2. the user, book and movie that resolved are themselves valid (ChildInvalid)
    /// 3. a book or a movie resolved (MissingTarget), and not both unless allowed (AmbiguousTarget)
    /// 4. no stored review has the same (user_id, book_id, movie_id) (DuplicateReview)
    ///
    /// A reference to a row that does not exist resolves to nothing, so a
    /// dangling book_id next to a real movie_id passes here and is left to
    /// the foreign key.
    pub async fn validate<S: Store>(
        &self,
        store: &S,
        req: &CreateReviewRequest,
    ) -> Result<ValidatedReview, ReviewsError> {
        let mut errors = ValidationErrors::new();

        let user = match req.user_id {
            Some(id) => store.find_user(id).await?,
            None => None,
        };
        match &user {
            None => errors.push(ValidationError::missing_user()),
            Some(user) => {
                if let Err(e) = user.validate() {
                    errors.push(ValidationError::child_invalid("user", &e));
                }
            }
        }

        let book = match req.book_id {
            Some(id) => store.find_book(id).await?,
            None => None,
        };
        if let Some(Err(e)) = book.as_ref().map(|b| b.validate()) {
            errors.push(ValidationError::child_invalid("book", &e));
        }

        let movie = match req.movie_id {
            Some(id) => store.find_movie(id).await?,
            None => None,
        };
        if let Some(Err(e)) = movie.as_ref().map(|m| m.validate()) {
            errors.push(ValidationError::child_invalid("movie", &e));
        }

        match (&book, &movie) {
            (None, None) => errors.push(ValidationError::missing_target()),
            (Some(_), Some(_)) if !self.policy.allow_dual_target => {
                errors.push(ValidationError::ambiguous_target())
            }
            _ => {}
        }

        let key = req.key();
        if let Some(key) = &key {
            if let Some(existing) = store.find_review_by_key(key).await? {
                log::debug!("Review {:?} already exists as {}", key, existing.id);
                errors.push(ValidationError::duplicate_review());
            }
        }

        if let Err(errors) = errors.into_result() {
            log::debug!("Rejected review {:?}: {}", req, errors);
            return Err(errors.into());
        }

        key.map(ValidatedReview::new)
            .ok_or_else(|| ValidationErrors::from(ValidationError::missing_user()).into())
    }
}
