#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod categorizer;
pub mod config;
pub mod fetcher;
pub mod history;
pub mod issues;
pub mod mail;
pub mod notifier;
pub mod report;
pub mod runner;
pub mod snapshots;
pub mod subscriptions;
pub mod summary;
pub mod templates;

pub use categorizer::{categorize, CategoryRule, LANGUAGE_FALLBACK, OTHER, TAXONOMY};
pub use config::{AppConfig, ConfigError, DEFAULT_CONFIG_FILE};
pub use fetcher::{parse_trending, FetchError, TrendingFetcher};
pub use history::{
    build_history, calc_streak, Analysis, CategoryStats, DaySummary, Observation,
    RepositoryHistory, TodayEntry,
};
pub use issues::{
    extract_email, parse_issue_body, IssueError, IssueKind, IssueOutcome, IssueProcessor,
    IssueRepository, IssueStatus,
};
pub use mail::{DryRunMailer, MailConfig, MailError, Mailer, OutgoingMail, SmtpMailer};
pub use notifier::{Notifier, NotifyError};
pub use report::{generate_report, ReportError, ReportOptions, ReportOutput};
pub use runner::{Runner, RunnerConfig, RunnerError};
pub use snapshots::{MigrationReport, Snapshot, SnapshotError, SnapshotStore, TrendingRecord};
pub use subscriptions::{
    SubscriptionError, SubscriptionRequest, SubscriptionResponse, SubscriptionStore,
    Subscriptions,
};
pub use summary::{DeliveryResult, RunSummary};
pub use templates::{create_handlebars_registry, SiteLinks, TemplateError, TemplateRenderer};
