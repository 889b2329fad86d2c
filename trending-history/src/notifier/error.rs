//! Notifier error types.

use crate::mail::MailError;
use crate::templates::TemplateError;
use thiserror::Error;

/// Errors that can occur while composing or sending a single email.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The email body failed to render.
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// The email failed to send.
    #[error(transparent)]
    Mail(#[from] MailError),
}
