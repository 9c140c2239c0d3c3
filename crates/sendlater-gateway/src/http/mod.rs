use serde::Serialize;

pub mod health;
pub mod schedule;
pub mod scheduled;

/// Uniform error body: `{"message": "..."}`. Internal detail never leaks
/// into responses; it goes to the log instead.
#[derive(Debug, Serialize)]
pub struct ApiMessage {
    pub message: String,
}

impl ApiMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
