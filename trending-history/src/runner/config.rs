//! Runner configuration.

use crate::config::AppConfig;
use crate::issues::IssueRepository;
use crate::mail::MailConfig;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use url::Url;

/// Configuration for a run.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Root of the snapshot archive.
    data_dir: PathBuf,
    /// Subscription JSON file.
    subscriptions_file: PathBuf,
    /// Report output directory.
    output_dir: PathBuf,
    /// Static assets copied into the report.
    static_dir: PathBuf,
    /// Public URL of the generated site.
    site_url: Url,
    /// Page the fetcher downloads.
    trending_url: Url,
    /// Repository hosting subscription issues.
    issues_repository: Option<IssueRepository>,
    /// GitHub token for issue intake.
    github_token: Option<String>,
    /// SMTP settings; `None` disables delivery.
    mail: Option<MailConfig>,
    /// Whether to preview changes without writing files or sending anything.
    dry_run: bool,
    /// Date treated as "today".
    today: NaiveDate,
}

impl RunnerConfig {
    /// Creates a configuration from validated settings.
    pub fn new(settings: AppConfig, today: NaiveDate, dry_run: bool) -> Self {
        Self {
            data_dir: settings.data_dir,
            subscriptions_file: settings.subscriptions_file,
            output_dir: settings.output_dir,
            static_dir: settings.static_dir,
            site_url: settings.site_url,
            trending_url: settings.trending_url,
            issues_repository: settings.issues_repository,
            github_token: None,
            mail: None,
            dry_run,
            today,
        }
    }

    /// Sets the SMTP configuration.
    pub fn with_mail(mut self, mail: Option<MailConfig>) -> Self {
        self.mail = mail;
        self
    }

    /// Sets the GitHub token used for issue intake.
    pub fn with_github_token(mut self, token: Option<String>) -> Self {
        self.github_token = token.filter(|t| !t.trim().is_empty());
        self
    }

    /// Overrides the trending page URL.
    pub fn with_trending_url(mut self, url: Url) -> Self {
        self.trending_url = url;
        self
    }

    /// Returns the snapshot archive root.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Returns the subscription file path.
    pub fn subscriptions_file(&self) -> &Path {
        &self.subscriptions_file
    }

    /// Returns the report output directory.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Returns the static asset directory.
    pub fn static_dir(&self) -> &Path {
        &self.static_dir
    }

    /// Returns the public site URL.
    pub fn site_url(&self) -> &Url {
        &self.site_url
    }

    /// Returns the trending page URL.
    pub fn trending_url(&self) -> &Url {
        &self.trending_url
    }

    /// Returns the issue intake repository, if configured.
    pub fn issues_repository(&self) -> Option<&IssueRepository> {
        self.issues_repository.as_ref()
    }

    /// Returns the GitHub token, if set.
    pub fn github_token(&self) -> Option<&str> {
        self.github_token.as_deref()
    }

    /// Returns the SMTP configuration, if set.
    pub fn mail(&self) -> Option<&MailConfig> {
        self.mail.as_ref()
    }

    /// Returns whether dry-run mode is enabled.
    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Returns the date treated as today.
    pub fn today(&self) -> NaiveDate {
        self.today
    }
}
