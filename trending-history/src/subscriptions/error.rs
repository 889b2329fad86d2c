//! Subscription store error types.

use thiserror::Error;

/// Errors that can occur while reading, validating or persisting subscriptions.
#[derive(Debug, Error)]
pub enum SubscriptionError {
    /// Failed to read or write the subscription file.
    #[error("Failed to access subscription file '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The subscription file isn't valid JSON of the expected shape.
    #[error("Invalid subscription file '{path}': {source}")]
    JsonError {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// The email address failed validation.
    #[error("Invalid email format: '{email}'")]
    InvalidEmail { email: String },
}
