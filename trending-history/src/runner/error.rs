//! Runner error types.

/// Errors that abort a run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// Configuration loading errors.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    /// Snapshot archive errors.
    #[error(transparent)]
    Snapshot(#[from] crate::snapshots::SnapshotError),

    /// Subscription store errors.
    #[error(transparent)]
    Subscription(#[from] crate::subscriptions::SubscriptionError),

    /// Trending page download errors.
    #[error(transparent)]
    Fetch(#[from] crate::fetcher::FetchError),

    /// Template registration errors.
    #[error(transparent)]
    Template(#[from] crate::templates::TemplateError),

    /// Report generation errors.
    #[error(transparent)]
    Report(#[from] crate::report::ReportError),

    /// Issue intake errors.
    #[error(transparent)]
    Issue(#[from] crate::issues::IssueError),

    /// GitHub API client initialization errors.
    #[error(transparent)]
    Octocrab(#[from] octocrab::Error),

    /// Issue intake was requested without a repository.
    #[error("No issues-repository configured")]
    MissingIssuesRepository,

    /// Issue intake was requested without credentials.
    #[error("GITHUB_TOKEN is required to process issues")]
    MissingGithubToken,
}
