use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::Result;
use crate::time::canonical;
use crate::types::{EmailJob, JobStatus};

/// Initialise the email-job schema in `conn`.
///
/// Creates the `emails` table (idempotent) and an index on `scheduled_time`
/// so the polling query stays efficient as the collection grows. On first
/// use the collection is simply empty — there is no seed step.
pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS emails (
            id              TEXT NOT NULL PRIMARY KEY,
            recipient_email TEXT NOT NULL,
            subject         TEXT NOT NULL,
            body            TEXT NOT NULL,
            scheduled_time  TEXT NOT NULL,  -- canonical RFC 3339 UTC
            status          TEXT NOT NULL DEFAULT 'pending',
            created_at      TEXT NOT NULL,
            sent_at         TEXT            -- canonical RFC 3339 UTC or NULL
        ) STRICT;

        -- Efficient polling: SELECT … WHERE status = 'pending' AND scheduled_time <= ?
        CREATE INDEX IF NOT EXISTS idx_emails_scheduled_time ON emails (scheduled_time);
        ",
    )?;
    Ok(())
}

/// Shared handle to the persisted email-job collection.
///
/// One `Connection` behind a mutex, cloned into the HTTP handlers and the
/// scheduler engine. Every read-modify-write goes through this single lock,
/// so an insert from a request handler can never interleave with a tick's
/// mark-sent update. The lock is never held across an await point.
#[derive(Clone)]
pub struct JobStore {
    conn: Arc<Mutex<Connection>>,
}

impl JobStore {
    pub fn new(conn: Connection) -> Result<Self> {
        init_db(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Persist a new pending job. Returns the fully populated record.
    pub fn insert(
        &self,
        recipient_email: &str,
        subject: &str,
        body: &str,
        scheduled_time: DateTime<Utc>,
    ) -> Result<EmailJob> {
        let conn = self.conn.lock().unwrap();
        let id = Uuid::new_v4().to_string();
        let scheduled = canonical(scheduled_time);
        let created = canonical(Utc::now());

        conn.execute(
            "INSERT INTO emails
             (id, recipient_email, subject, body, scheduled_time, status, created_at, sent_at)
             VALUES (?1, ?2, ?3, ?4, ?5, 'pending', ?6, NULL)",
            rusqlite::params![id, recipient_email, subject, body, scheduled, created],
        )?;
        info!(job_id = %id, scheduled_time = %scheduled, "email job added");

        Ok(EmailJob {
            id,
            recipient_email: recipient_email.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
            scheduled_time: scheduled,
            status: JobStatus::Pending,
            created_at: created,
            sent_at: None,
        })
    }

    /// Return all known jobs in original insertion order.
    pub fn list_all(&self) -> Result<Vec<EmailJob>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, recipient_email, subject, body, scheduled_time, status, created_at, sent_at
             FROM emails ORDER BY rowid",
        )?;
        let jobs = stmt
            .query_map([], row_to_tuple)?
            .filter_map(|r| r.ok().and_then(tuple_to_job))
            .collect();
        Ok(jobs)
    }

    /// Return every pending job whose scheduled time is at or before `now`.
    pub fn due(&self, now: DateTime<Utc>) -> Result<Vec<EmailJob>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare_cached(
            "SELECT id, recipient_email, subject, body, scheduled_time, status, created_at, sent_at
             FROM emails
             WHERE status = 'pending' AND scheduled_time <= ?1
             ORDER BY scheduled_time",
        )?;
        let jobs = stmt
            .query_map([canonical(now)], row_to_tuple)?
            .filter_map(|r| r.ok().and_then(tuple_to_job))
            .collect();
        Ok(jobs)
    }

    /// Transition a job `pending → sent`, recording the delivery instant.
    ///
    /// Returns `false` when the job was already sent (or does not exist) —
    /// the `status = 'pending'` guard makes the transition exactly-once.
    pub fn mark_sent(&self, id: &str, now: DateTime<Utc>) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let n = conn.execute(
            "UPDATE emails SET status = 'sent', sent_at = ?2
             WHERE id = ?1 AND status = 'pending'",
            rusqlite::params![id, canonical(now)],
        )?;
        Ok(n > 0)
    }

    /// Total number of jobs, any status. Used by the health endpoint.
    pub fn count(&self) -> Result<u64> {
        let conn = self.conn.lock().unwrap();
        let n: u64 = conn.query_row("SELECT COUNT(*) FROM emails", [], |row| row.get(0))?;
        Ok(n)
    }
}

type JobRow = (
    String,
    String,
    String,
    String,
    String,
    String,
    String,
    Option<String>,
);

fn row_to_tuple(row: &rusqlite::Row<'_>) -> rusqlite::Result<JobRow> {
    Ok((
        row.get(0)?, // id
        row.get(1)?, // recipient_email
        row.get(2)?, // subject
        row.get(3)?, // body
        row.get(4)?, // scheduled_time
        row.get(5)?, // status
        row.get(6)?, // created_at
        row.get(7)?, // sent_at
    ))
}

fn tuple_to_job(t: JobRow) -> Option<EmailJob> {
    let (id, recipient_email, subject, body, scheduled_time, status_str, created_at, sent_at) = t;
    let status: JobStatus = match status_str.parse() {
        Ok(s) => s,
        Err(e) => {
            warn!(job_id = %id, "skipping unreadable row: {e}");
            return None;
        }
    };
    Some(EmailJob {
        id,
        recipient_email,
        subject,
        body,
        scheduled_time,
        status,
        created_at,
        sent_at,
    })
}
