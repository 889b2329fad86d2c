//! Issue processing outcomes.

use crate::subscriptions::SubscriptionRequest;
use serde::Serialize;

/// Which intake queue an issue came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// Labelled `subscription`.
    Subscribe,
    /// Labelled `unsubscribe`.
    Unsubscribe,
}

impl IssueKind {
    /// The GitHub label selecting this queue.
    pub fn label(self) -> &'static str {
        match self {
            Self::Subscribe => "subscription",
            Self::Unsubscribe => "unsubscribe",
        }
    }
}

/// What happened to one issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum IssueStatus {
    /// Subscription recorded.
    Subscribed {
        /// The request as parsed from the issue body.
        request: SubscriptionRequest,
    },

    /// Email removed from every list.
    Unsubscribed {
        /// Removed address.
        email: String,
    },

    /// The issue could not be acted on; it is closed with an explanation.
    Rejected {
        /// Reason shown to the issue author.
        reason: String,
    },

    /// Processing failed; the issue stays open for the next run.
    Failed {
        /// Error message.
        error: String,
    },
}

impl IssueStatus {
    /// Returns true if the issue should be closed after commenting.
    pub fn closes_issue(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }

    /// Comment posted on the issue.
    pub fn comment(&self) -> String {
        match self {
            Self::Subscribed { .. } => "Subscription processed successfully! \
                You will receive a confirmation email shortly."
                .to_string(),
            Self::Unsubscribed { .. } => "Unsubscription processed successfully!".to_string(),
            Self::Rejected { reason } => format!("Could not process this request: {reason}"),
            Self::Failed { error } => format!("Error processing this request: {error}"),
        }
    }
}

/// Result of processing one issue.
#[derive(Debug, Clone, Serialize)]
pub struct IssueOutcome {
    /// Issue number.
    pub number: u64,

    /// Queue the issue came from.
    pub kind: IssueKind,

    /// Processing status.
    #[serde(flatten)]
    pub status: IssueStatus,
}
