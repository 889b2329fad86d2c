//! Run summary types.

use super::result::DeliveryResult;
use crate::issues::{IssueOutcome, IssueStatus};

/// Summary of a complete run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Number of repositories fetched from the trending page.
    pub repositories_fetched: usize,

    /// Number of snapshots loaded from disk.
    pub snapshots_loaded: usize,

    /// Number of distinct repositories across all snapshots.
    pub repositories_tracked: usize,

    /// Number of repositories in today's snapshot.
    pub trending_today: usize,

    /// Whether the report pages were written.
    pub report_generated: bool,

    /// Whether email delivery was skipped (no mail configuration or no data).
    pub emails_skipped: bool,

    /// Number of emails sent.
    pub emails_sent: usize,

    /// Number of emails that failed to render or send.
    pub emails_failed: usize,

    /// Number of intake issues applied to the subscription store.
    pub issues_processed: usize,

    /// Number of intake issues closed without a change.
    pub issues_rejected: usize,

    /// Number of intake issues that failed and were left open.
    pub issues_failed: usize,

    /// Number of legacy snapshot files moved into the nested layout.
    pub snapshots_migrated: usize,

    /// Whether this was a dry run.
    pub dry_run: bool,
}

impl RunSummary {
    /// Creates a new empty summary.
    #[must_use]
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Default::default()
        }
    }

    /// Updates the summary with a delivery result.
    pub fn record_delivery(&mut self, result: &DeliveryResult) {
        match result {
            DeliveryResult::Sent { .. } => self.emails_sent += 1,
            DeliveryResult::Failed { .. } => self.emails_failed += 1,
        }
    }

    /// Updates the summary with an issue outcome.
    pub fn record_issue(&mut self, outcome: &IssueOutcome) {
        match outcome.status {
            IssueStatus::Subscribed { .. } | IssueStatus::Unsubscribed { .. } => {
                self.issues_processed += 1;
            }
            IssueStatus::Rejected { .. } => self.issues_rejected += 1,
            IssueStatus::Failed { .. } => self.issues_failed += 1,
        }
    }

    /// Returns true if any failures occurred.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.emails_failed > 0 || self.issues_failed > 0
    }

    /// Returns true if all operations were successful.
    #[must_use]
    pub fn all_success(&self) -> bool {
        !self.has_failures()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issues::IssueKind;

    #[test]
    fn can_record_delivery() {
        let mut summary = RunSummary::new(false);

        summary.record_delivery(&DeliveryResult::Sent {
            recipient: "a@example.com".to_string(),
            subject: "s".to_string(),
        });
        assert_eq!(summary.emails_sent, 1);
        assert!(summary.all_success());

        summary.record_delivery(&DeliveryResult::Failed {
            recipient: "b@example.com".to_string(),
            subject: "s".to_string(),
            error: "boom".to_string(),
        });
        assert_eq!(summary.emails_failed, 1);
        assert!(summary.has_failures());
    }

    #[test]
    fn rejected_issues_are_not_failures() {
        let mut summary = RunSummary::new(false);

        summary.record_issue(&IssueOutcome {
            number: 1,
            kind: IssueKind::Unsubscribe,
            status: IssueStatus::Rejected {
                reason: "not subscribed".to_string(),
            },
        });
        assert_eq!(summary.issues_rejected, 1);
        assert!(summary.all_success());

        summary.record_issue(&IssueOutcome {
            number: 2,
            kind: IssueKind::Subscribe,
            status: IssueStatus::Failed {
                error: "GitHub API error".to_string(),
            },
        });
        assert!(summary.has_failures());
    }
}
