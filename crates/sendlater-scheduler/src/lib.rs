//! `sendlater-scheduler` — Tokio-based email scheduler with SQLite persistence.
//!
//! # Overview
//!
//! Scheduled emails are persisted to a SQLite `emails` table. The
//! [`engine::SchedulerEngine`] polls the store on a fixed cadence (one minute
//! by default) and hands every job whose `scheduled_time` has arrived to a
//! [`mailer::Mailer`], marking it `sent` afterwards. A job has exactly two
//! states:
//!
//! | Status    | Meaning                                   |
//! |-----------|-------------------------------------------|
//! | `pending` | Waiting for its scheduled time            |
//! | `sent`    | Delivery was attempted; terminal          |
//!
//! The transition `pending → sent` happens at most once per job; the store
//! guards it with a conditional UPDATE so a racing tick can never deliver
//! the same job twice.

pub mod db;
pub mod engine;
pub mod error;
pub mod mailer;
pub mod time;
pub mod types;

pub use db::JobStore;
pub use engine::SchedulerEngine;
pub use error::{Result, SchedulerError};
pub use mailer::{LogMailer, Mailer, MailerError};
pub use types::{EmailJob, JobStatus};
