// src/demo.rs
// DOCUMENTATION: Walkthrough of both uniqueness layers
// PURPOSE: bob reviews "Snow Crash" and "Jaws", then tries to repeat himself

use crate::db::Store;
use crate::errors::ReviewsError;
use crate::models::{CreateReviewRequest, ReviewKey, UserReview};
use crate::services::{CatalogService, ReviewService, ReviewValidator};
use serde::Serialize;
use serde_json::Value;

/// Result of one demo step
#[derive(Debug, Clone, Serialize)]
pub struct DemoStep {
    pub action: String,
    pub outcome: String,
    pub review_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

impl DemoStep {
    fn record(action: impl Into<String>, result: Result<UserReview, ReviewsError>) -> Self {
        let action = action.into();
        match result {
            Ok(review) => {
                log::info!("{}: created review {}", action, review.id);
                DemoStep {
                    action,
                    outcome: "CREATED".to_string(),
                    review_id: Some(review.id),
                    error: None,
                }
            }
            Err(e) => {
                log::info!("{}: rejected ({})", action, e);
                DemoStep {
                    action,
                    outcome: e.error_code().to_string(),
                    review_id: None,
                    error: Some(e.to_body()["error"].clone()),
                }
            }
        }
    }
}

/// Run the scenario against any store
/// DOCUMENTATION: Records are looked up before being created, so the demo can
/// be rerun against the same database; later runs report duplicates throughout
pub async fn run_demo<S: Store>(
    store: &S,
    validator: &ReviewValidator,
) -> Result<Vec<DemoStep>, ReviewsError> {
    let bob = CatalogService::find_or_create_user(store, "bob").await?;
    let snow_crash = CatalogService::find_or_create_book(store, "Snow Crash").await?;
    let jaws = CatalogService::find_or_create_movie(store, "Jaws").await?;

    let steps = vec![
        DemoStep::record(
            "bob reviews Snow Crash",
            ReviewService::create_review(store, validator, &CreateReviewRequest::for_book(bob.id, snow_crash.id))
                .await,
        ),
        DemoStep::record(
            "bob reviews Jaws",
            ReviewService::create_review(store, validator, &CreateReviewRequest::for_movie(bob.id, jaws.id))
                .await,
        ),
        DemoStep::record(
            "bob reviews Jaws again",
            ReviewService::create_review(store, validator, &CreateReviewRequest::for_movie(bob.id, jaws.id))
                .await,
        ),
        DemoStep::record(
            "bob reviews Snow Crash again, skipping validation",
            store
                .insert_review(&ReviewKey::book(bob.id, snow_crash.id))
                .await
                .map_err(ReviewsError::from),
        ),
    ];

    Ok(steps)
}
