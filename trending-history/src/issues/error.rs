//! Issue intake error types.

use crate::subscriptions::SubscriptionError;
use thiserror::Error;

/// Errors that can occur while processing subscription issues.
#[derive(Debug, Error)]
pub enum IssueError {
    /// GitHub API error.
    #[error("GitHub API error: {0}")]
    GitHubError(#[from] octocrab::Error),

    /// The subscription store could not be updated.
    #[error(transparent)]
    Subscription(#[from] SubscriptionError),

    /// The configured repository is not in `owner/repo` form.
    #[error("Invalid issues repository '{value}', expected owner/repo")]
    InvalidRepository { value: String },
}
