use serde::{Deserialize, Serialize};

/// Lifecycle state of a scheduled email.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Waiting for its scheduled time.
    Pending,
    /// Delivery was attempted. Terminal — a job is never un-sent.
    Sent,
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            JobStatus::Pending => "pending",
            JobStatus::Sent => "sent",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "pending" => Ok(JobStatus::Pending),
            "sent" => Ok(JobStatus::Sent),
            other => Err(format!("unknown job status: {other}")),
        }
    }
}

/// A persisted email job record.
///
/// Field names on the wire are camelCase (`recipientEmail`, `scheduledTime`,
/// …) to match the public API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailJob {
    /// UUID v4 string — primary key, assigned at creation.
    pub id: String,
    /// Destination address. Opaque after validation at the HTTP boundary.
    pub recipient_email: String,
    pub subject: String,
    pub body: String,
    /// Canonical UTC timestamp (`YYYY-MM-DDTHH:MM:SSZ`) of the requested
    /// send time. Fixed-width so lexicographic order equals time order.
    pub scheduled_time: String,
    pub status: JobStatus,
    /// Canonical UTC timestamp of job creation.
    pub created_at: String,
    /// Canonical UTC timestamp of the delivery attempt, once sent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<String>,
}
