//! Mail delivery error types.

use thiserror::Error;

/// Errors that can occur while building or sending an email.
#[derive(Debug, Error)]
pub enum MailError {
    /// An address couldn't be parsed.
    #[error("Invalid address '{address}': {source}")]
    InvalidAddress {
        address: String,
        #[source]
        source: lettre::address::AddressError,
    },

    /// The message couldn't be assembled.
    #[error("Failed to build message: {0}")]
    Message(#[from] lettre::error::Error),

    /// The SMTP transport failed.
    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}
