//! Listing endpoint — GET /scheduled.
//!
//! Returns the full job collection in original insertion order, pending and
//! sent alike. No filtering, no pagination — the collection is expected to
//! stay small (single-tenant scheduler, not a queue).

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use tracing::error;

use crate::app::AppState;
use crate::http::ApiMessage;
use sendlater_scheduler::EmailJob;

/// GET /scheduled — 200 with every known job, 500 when the store is
/// unreadable.
pub async fn scheduled_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<EmailJob>>, (StatusCode, Json<ApiMessage>)> {
    let jobs = state.store.list_all().map_err(|e| {
        error!(error = %e, "failed to load scheduled emails");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiMessage::new("Failed to load scheduled emails")),
        )
    })?;
    Ok(Json(jobs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::schedule::{schedule_handler, ScheduleRequest};
    use sendlater_core::SendlaterConfig;
    use sendlater_scheduler::{JobStatus, JobStore};

    fn state() -> Arc<AppState> {
        let store = JobStore::new(rusqlite::Connection::open_in_memory().unwrap()).unwrap();
        Arc::new(AppState::new(SendlaterConfig::default(), store))
    }

    fn valid_request() -> ScheduleRequest {
        ScheduleRequest {
            recipient_email: Some("a@b.com".to_string()),
            subject: Some("Hi".to_string()),
            body: Some("Test".to_string()),
            scheduled_time: Some("2099-01-01T00:00:00Z".to_string()),
        }
    }

    #[tokio::test]
    async fn scheduled_job_appears_in_listing() {
        let state = state();

        let (code, created) = schedule_handler(State(state.clone()), Json(valid_request()))
            .await
            .unwrap();
        assert_eq!(code, StatusCode::CREATED);
        assert_eq!(created.email.status, JobStatus::Pending);

        let listed = scheduled_handler(State(state)).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, created.email.id);
        assert_eq!(listed[0].scheduled_time, "2099-01-01T00:00:00Z");
    }

    #[tokio::test]
    async fn rejected_request_persists_nothing() {
        let state = state();

        let bad = ScheduleRequest {
            scheduled_time: Some("2000-01-01T00:00:00Z".to_string()),
            ..valid_request()
        };
        let (code, body) = schedule_handler(State(state.clone()), Json(bad))
            .await
            .unwrap_err();
        assert_eq!(code, StatusCode::BAD_REQUEST);
        assert_eq!(body.message, "Scheduled time must be in the future");

        let listed = scheduled_handler(State(state)).await.unwrap();
        assert!(listed.is_empty());
    }

    #[tokio::test]
    async fn listing_an_empty_store_returns_empty_array() {
        let listed = scheduled_handler(State(state())).await.unwrap();
        assert!(listed.is_empty());
    }
}
