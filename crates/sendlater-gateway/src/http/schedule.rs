//! Schedule endpoint — POST /schedule.
//!
//! Validates the request, persists a new pending job, and returns it.
//! Validation runs in a fixed order and the first failing rule wins, so a
//! request that is missing fields *and* has a bad address reports the
//! missing fields.

use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

use crate::app::AppState;
use crate::http::ApiMessage;
use sendlater_scheduler::time::parse_scheduled_time;
use sendlater_scheduler::EmailJob;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
    #[serde(default)]
    pub recipient_email: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub scheduled_time: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ScheduleResponse {
    pub message: String,
    pub email: EmailJob,
}

/// POST /schedule — returns 201 + the created job, 400 on invalid input,
/// 500 when the store cannot persist it.
pub async fn schedule_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ScheduleRequest>,
) -> Result<(StatusCode, Json<ScheduleResponse>), (StatusCode, Json<ApiMessage>)> {
    let valid = validate(&req, Utc::now())
        .map_err(|msg| (StatusCode::BAD_REQUEST, Json(ApiMessage::new(msg))))?;

    let job = state
        .store
        .insert(&valid.recipient_email, &valid.subject, &valid.body, valid.scheduled_time)
        .map_err(|e| {
            error!(error = %e, "failed to persist scheduled email");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiMessage::new("Failed to save scheduled email")),
            )
        })?;

    info!(job_id = %job.id, scheduled_time = %job.scheduled_time, "email scheduled");
    Ok((
        StatusCode::CREATED,
        Json(ScheduleResponse {
            message: "Email scheduled successfully".to_string(),
            email: job,
        }),
    ))
}

#[derive(Debug)]
struct ValidRequest {
    recipient_email: String,
    subject: String,
    body: String,
    scheduled_time: DateTime<Utc>,
}

/// Apply the validation rules in order; first failure wins.
fn validate(req: &ScheduleRequest, now: DateTime<Utc>) -> Result<ValidRequest, &'static str> {
    let recipient_email = req.recipient_email.as_deref().unwrap_or("");
    let subject = req.subject.as_deref().unwrap_or("");
    let body = req.body.as_deref().unwrap_or("");
    let raw_time = req.scheduled_time.as_deref().unwrap_or("");

    if recipient_email.is_empty() || subject.is_empty() || body.is_empty() || raw_time.is_empty() {
        return Err("Missing required fields");
    }
    if !is_valid_email(recipient_email) {
        return Err("Invalid email format");
    }
    let scheduled_time = parse_scheduled_time(raw_time).ok_or("Invalid date format")?;
    if scheduled_time <= now {
        return Err("Scheduled time must be in the future");
    }

    Ok(ValidRequest {
        recipient_email: recipient_email.to_string(),
        subject: subject.to_string(),
        body: body.to_string(),
        scheduled_time,
    })
}

/// Basic `local@domain.tld` shape: no whitespace, exactly one `@` with a
/// non-empty local part, and a dot in the domain with text on both sides.
fn is_valid_email(addr: &str) -> bool {
    if addr.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = addr.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(
        recipient: Option<&str>,
        subject: Option<&str>,
        body: Option<&str>,
        time: Option<&str>,
    ) -> ScheduleRequest {
        ScheduleRequest {
            recipient_email: recipient.map(String::from),
            subject: subject.map(String::from),
            body: body.map(String::from),
            scheduled_time: time.map(String::from),
        }
    }

    fn now() -> DateTime<Utc> {
        "2026-08-30T12:00:00Z".parse().unwrap()
    }

    #[test]
    fn valid_request_passes() {
        let r = req(Some("a@b.com"), Some("Hi"), Some("Test"), Some("2026-08-30T12:00:01Z"));
        let v = validate(&r, now()).unwrap();
        assert_eq!(v.recipient_email, "a@b.com");
    }

    #[test]
    fn any_missing_field_is_rejected() {
        let cases = [
            req(None, Some("s"), Some("b"), Some("2027-01-01T00:00:00Z")),
            req(Some("a@b.com"), None, Some("b"), Some("2027-01-01T00:00:00Z")),
            req(Some("a@b.com"), Some("s"), None, Some("2027-01-01T00:00:00Z")),
            req(Some("a@b.com"), Some("s"), Some("b"), None),
            req(Some(""), Some("s"), Some("b"), Some("2027-01-01T00:00:00Z")),
        ];
        for c in cases {
            assert_eq!(validate(&c, now()).unwrap_err(), "Missing required fields");
        }
    }

    #[test]
    fn bad_addresses_are_rejected() {
        for addr in [
            "no-at-sign.com",
            "two@@ats.com",
            "a@b@c.com",
            "@nodomain.com",
            "no-dot@domain",
            "space in@local.com",
            "a@.com",
            "a@domain.",
        ] {
            let r = req(Some(addr), Some("s"), Some("b"), Some("2027-01-01T00:00:00Z"));
            assert_eq!(validate(&r, now()).unwrap_err(), "Invalid email format", "addr: {addr}");
        }
    }

    #[test]
    fn unparseable_time_is_rejected() {
        let r = req(Some("a@b.com"), Some("s"), Some("b"), Some("next tuesday"));
        assert_eq!(validate(&r, now()).unwrap_err(), "Invalid date format");
    }

    #[test]
    fn past_and_present_times_are_rejected() {
        for raw in ["2026-08-30T11:59:59Z", "2026-08-30T12:00:00Z", "2020-01-01T00:00:00Z"] {
            let r = req(Some("a@b.com"), Some("s"), Some("b"), Some(raw));
            assert_eq!(
                validate(&r, now()).unwrap_err(),
                "Scheduled time must be in the future",
                "time: {raw}"
            );
        }
    }

    #[test]
    fn field_order_first_failure_wins() {
        // Bad email AND bad date: the email rule fires first.
        let r = req(Some("not-an-email"), Some("s"), Some("b"), Some("junk"));
        assert_eq!(validate(&r, now()).unwrap_err(), "Invalid email format");
        // Missing subject outranks the bad email.
        let r = req(Some("not-an-email"), None, Some("b"), Some("junk"));
        assert_eq!(validate(&r, now()).unwrap_err(), "Missing required fields");
    }

    #[test]
    fn offset_time_is_compared_in_utc() {
        // 13:00+02:00 is 11:00 UTC — in the past relative to 12:00 UTC.
        let r = req(Some("a@b.com"), Some("s"), Some("b"), Some("2026-08-30T13:00:00+02:00"));
        assert_eq!(validate(&r, now()).unwrap_err(), "Scheduled time must be in the future");
    }
}
