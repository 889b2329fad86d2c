//! Subscription intake from GitHub issues.
//!
//! Open issues labelled `subscription` or `unsubscribe` in the configured
//! repository are applied to the [`SubscriptionStore`], answered with a
//! comment and closed. Issues that fail for transient reasons stay open so the
//! next run retries them.

mod error;
mod parse;
mod status;

pub use error::IssueError;
pub use parse::{extract_email, parse_issue_body};
pub use status::{IssueKind, IssueOutcome, IssueStatus};

use crate::subscriptions::{SubscriptionError, SubscriptionStore};
use octocrab::models::issues::Issue;
use octocrab::models::IssueState;
use octocrab::{params, Octocrab};
use tracing::{debug, info, info_span, warn, Instrument};

/// An `owner/repo` pair hosting the intake issues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueRepository {
    /// Repository owner.
    pub owner: String,
    /// Repository name.
    pub name: String,
}

impl IssueRepository {
    /// Parses `owner/repo`.
    ///
    /// # Errors
    ///
    /// Returns [`IssueError::InvalidRepository`] if the value isn't two
    /// non-empty segments.
    pub fn parse(value: &str) -> Result<Self, IssueError> {
        match value.trim().split_once('/') {
            Some((owner, name))
                if !owner.is_empty() && !name.is_empty() && !name.contains('/') =>
            {
                Ok(Self {
                    owner: owner.to_string(),
                    name: name.to_string(),
                })
            }
            _ => Err(IssueError::InvalidRepository {
                value: value.to_string(),
            }),
        }
    }

    /// Full `owner/repo` name.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

/// Applies a subscription issue body to the store.
///
/// # Errors
///
/// Returns [`SubscriptionError`] only for store I/O failures; unusable
/// requests become [`IssueStatus::Rejected`].
pub fn apply_subscription_issue(
    store: &mut SubscriptionStore,
    body: &str,
) -> Result<IssueStatus, SubscriptionError> {
    let Some(request) = parse_issue_body(body) else {
        return Ok(IssueStatus::Rejected {
            reason: "no **Email:** line found in the issue body".to_string(),
        });
    };

    match store.add(&request) {
        Ok(()) => Ok(IssueStatus::Subscribed { request }),
        Err(e @ SubscriptionError::InvalidEmail { .. }) => Ok(IssueStatus::Rejected {
            reason: e.to_string(),
        }),
        Err(e) => Err(e),
    }
}

/// Applies an unsubscribe issue to the store.
///
/// # Errors
///
/// Returns [`SubscriptionError`] only for store I/O failures.
pub fn apply_unsubscribe_issue(
    store: &mut SubscriptionStore,
    title: &str,
    body: &str,
) -> Result<IssueStatus, SubscriptionError> {
    let Some(email) = extract_email(title, body) else {
        return Ok(IssueStatus::Rejected {
            reason: "no email address found in the issue title or body".to_string(),
        });
    };
    let email = email.to_string();

    if store.remove(&email)? {
        Ok(IssueStatus::Unsubscribed { email })
    } else {
        Ok(IssueStatus::Rejected {
            reason: format!("{email} is not in the subscription list"),
        })
    }
}

/// Processes open intake issues of both kinds.
pub struct IssueProcessor<'a> {
    octocrab: &'a Octocrab,
    repository: &'a IssueRepository,
    dry_run: bool,
}

impl<'a> IssueProcessor<'a> {
    /// Creates a processor for `repository`.
    ///
    /// In dry-run mode issues are read and applied, but never commented on
    /// or closed.
    pub fn new(octocrab: &'a Octocrab, repository: &'a IssueRepository, dry_run: bool) -> Self {
        Self {
            octocrab,
            repository,
            dry_run,
        }
    }

    /// Processes every open subscription issue, then every open unsubscribe issue.
    ///
    /// # Errors
    ///
    /// Returns [`IssueError`] if an issue listing fails. Failures on a single
    /// issue are reported in its [`IssueOutcome`] instead.
    pub async fn process_all(
        &self,
        store: &mut SubscriptionStore,
    ) -> Result<Vec<IssueOutcome>, IssueError> {
        let mut outcomes = self.process(IssueKind::Subscribe, store).await?;
        outcomes.extend(self.process(IssueKind::Unsubscribe, store).await?);
        Ok(outcomes)
    }

    /// Processes open issues of one kind.
    ///
    /// # Errors
    ///
    /// Returns [`IssueError`] if the issue listing fails.
    pub async fn process(
        &self,
        kind: IssueKind,
        store: &mut SubscriptionStore,
    ) -> Result<Vec<IssueOutcome>, IssueError> {
        let span = info_span!(
            "process_issues",
            repo = %self.repository.full_name(),
            label = kind.label()
        );

        async {
            let issues = self.list_open(kind).await?;
            info!(count = issues.len(), "Found open issues");

            let mut outcomes = Vec::with_capacity(issues.len());
            for issue in &issues {
                let body = issue.body.as_deref().unwrap_or_default();
                let applied = match kind {
                    IssueKind::Subscribe => apply_subscription_issue(store, body),
                    IssueKind::Unsubscribe => apply_unsubscribe_issue(store, &issue.title, body),
                };
                let status = applied.unwrap_or_else(|e| IssueStatus::Failed {
                    error: e.to_string(),
                });

                let status = match self.respond(issue.number, &status).await {
                    Ok(()) => status,
                    Err(e) => IssueStatus::Failed {
                        error: e.to_string(),
                    },
                };
                log_outcome(issue.number, &status);

                outcomes.push(IssueOutcome {
                    number: issue.number,
                    kind,
                    status,
                });
            }
            Ok(outcomes)
        }
        .instrument(span)
        .await
    }

    async fn list_open(&self, kind: IssueKind) -> Result<Vec<Issue>, IssueError> {
        let labels = [kind.label().to_string()];
        let page = self
            .octocrab
            .issues(&self.repository.owner, &self.repository.name)
            .list()
            .state(params::State::Open)
            .labels(&labels)
            .per_page(100)
            .send()
            .await?;

        let issues = self.octocrab.all_pages(page).await?;
        Ok(issues
            .into_iter()
            .filter(|issue| issue.pull_request.is_none())
            .collect())
    }

    /// Comments on the issue and closes it unless processing failed.
    async fn respond(&self, number: u64, status: &IssueStatus) -> Result<(), IssueError> {
        if self.dry_run {
            info!(
                issue_number = number,
                close = status.closes_issue(),
                "[DRY RUN] Would comment on issue"
            );
            return Ok(());
        }

        let issues = self
            .octocrab
            .issues(&self.repository.owner, &self.repository.name);
        issues.create_comment(number, status.comment()).await?;

        if status.closes_issue() {
            issues
                .update(number)
                .state(IssueState::Closed)
                .send()
                .await?;
            debug!(issue_number = number, "Closed issue");
        }
        Ok(())
    }
}

fn log_outcome(number: u64, status: &IssueStatus) {
    match status {
        IssueStatus::Subscribed { request } => {
            info!(issue_number = number, email = %request.email, "Subscription processed");
        }
        IssueStatus::Unsubscribed { email } => {
            info!(issue_number = number, email = %email, "Unsubscription processed");
        }
        IssueStatus::Rejected { reason } => {
            warn!(issue_number = number, reason = %reason, "Issue rejected");
        }
        IssueStatus::Failed { error } => {
            warn!(issue_number = number, error = %error, "Issue processing failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(temp: &TempDir) -> SubscriptionStore {
        SubscriptionStore::open(temp.path().join("subscriptions.json")).unwrap()
    }

    #[test]
    fn parses_issue_repository() {
        let repo = IssueRepository::parse("octo/trending").unwrap();
        assert_eq!(repo.owner, "octo");
        assert_eq!(repo.full_name(), "octo/trending");

        for bad in ["octo", "/trending", "octo/", "a/b/c"] {
            assert!(matches!(
                IssueRepository::parse(bad),
                Err(IssueError::InvalidRepository { .. })
            ));
        }
    }

    #[test]
    fn subscription_issue_adds_subscriber() {
        let temp = TempDir::new().unwrap();
        let mut store = store_in(&temp);

        let status = apply_subscription_issue(
            &mut store,
            "**Email:** dev@example.com\n**Categories:** Mobile\n**Repositories:** None",
        )
        .unwrap();

        assert!(matches!(status, IssueStatus::Subscribed { .. }));
        assert_eq!(
            store.subscriptions().categories_for("dev@example.com"),
            vec!["Mobile"]
        );
    }

    #[test]
    fn subscription_issue_with_bad_email_is_rejected() {
        let temp = TempDir::new().unwrap();
        let mut store = store_in(&temp);

        let missing = apply_subscription_issue(&mut store, "hello").unwrap();
        let invalid = apply_subscription_issue(&mut store, "**Email:** nobody").unwrap();

        assert!(matches!(missing, IssueStatus::Rejected { .. }));
        assert!(matches!(invalid, IssueStatus::Rejected { .. }));
        assert!(store.subscriptions().emails.is_empty());
    }

    #[test]
    fn unsubscribe_issue_removes_subscriber() {
        let temp = TempDir::new().unwrap();
        let mut store = store_in(&temp);
        apply_subscription_issue(&mut store, "**Email:** dev@example.com\n**Categories:** AI/ML")
            .unwrap();

        let status =
            apply_unsubscribe_issue(&mut store, "Unsubscribe dev@example.com", "").unwrap();

        assert_eq!(
            status,
            IssueStatus::Unsubscribed {
                email: "dev@example.com".to_string()
            }
        );
        assert!(!store.subscriptions().contains("dev@example.com"));
    }

    #[test]
    fn unsubscribe_unknown_email_is_rejected() {
        let temp = TempDir::new().unwrap();
        let mut store = store_in(&temp);

        let status = apply_unsubscribe_issue(&mut store, "Unsubscribe", "ghost@example.com").unwrap();

        assert!(matches!(status, IssueStatus::Rejected { .. }));
    }
}
