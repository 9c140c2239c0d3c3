//! Delivery seam between the scheduler engine and the email transport.
//!
//! The engine only ever talks to a [`Mailer`]; production would plug in an
//! SMTP (or API-backed) transport here. [`LogMailer`] is the shipped stub:
//! it records the send in the log and always succeeds.

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use crate::types::EmailJob;

#[derive(Debug, Error)]
pub enum MailerError {
    /// The transport could not be reached.
    #[error("Transport unavailable: {0}")]
    Unavailable(String),

    /// The transport refused the message (bad recipient, policy, …).
    #[error("Send rejected: {0}")]
    Rejected(String),
}

/// An email transport. A failed send leaves the job `pending`; the engine
/// retries it on the next tick. Implementations own their own timeouts —
/// the tick loop applies none.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Transport name for logging and error messages.
    fn name(&self) -> &str;

    /// Deliver one email. Must not mutate stored state.
    async fn send(&self, job: &EmailJob) -> Result<(), MailerError>;
}

/// Stub transport: logs the send instead of performing it. Cannot fail.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    fn name(&self) -> &str {
        "log"
    }

    async fn send(&self, job: &EmailJob) -> Result<(), MailerError> {
        info!(
            job_id = %job.id,
            recipient = %job.recipient_email,
            subject = %job.subject,
            "sending email"
        );
        Ok(())
    }
}
