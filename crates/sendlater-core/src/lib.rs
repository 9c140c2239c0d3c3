//! `sendlater-core` — configuration and shared error type for the
//! sendlater workspace.

pub mod config;
pub mod error;

pub use config::SendlaterConfig;
pub use error::{Result, SendlaterError};
