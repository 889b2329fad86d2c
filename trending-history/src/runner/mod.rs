//! Orchestrates the daily pipeline and subscription management.

mod config;
mod error;

pub use config::RunnerConfig;
pub use error::RunnerError;

use crate::fetcher::TrendingFetcher;
use crate::history::Analysis;
use crate::issues::{IssueProcessor, IssueStatus};
use crate::mail::{DryRunMailer, MailError, Mailer, OutgoingMail, SmtpMailer};
use crate::notifier::Notifier;
use crate::report::{generate_report, ReportOptions};
use crate::snapshots::SnapshotStore;
use crate::subscriptions::{
    SubscriptionRequest, SubscriptionResponse, SubscriptionStore, Subscriptions,
};
use crate::summary::RunSummary;
use crate::templates::{SiteLinks, TemplateRenderer};
use octocrab::Octocrab;
use tracing::{error, info, warn};

/// Runs pipeline stages against one configuration.
pub struct Runner {
    config: RunnerConfig,
    renderer: TemplateRenderer,
    snapshots: SnapshotStore,
    links: SiteLinks,
}

impl Runner {
    /// Builds a runner from the provided configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Template`] if the embedded templates fail to register.
    pub fn new(config: RunnerConfig) -> Result<Self, RunnerError> {
        Ok(Self {
            renderer: TemplateRenderer::new()?,
            snapshots: SnapshotStore::new(config.data_dir()),
            links: SiteLinks::new(config.site_url()),
            config,
        })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Downloads today's trending page and stores it as today's snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] if the download fails or the snapshot can't be written.
    pub async fn fetch(&self) -> Result<RunSummary, RunnerError> {
        let mut summary = RunSummary::new(self.config.dry_run());
        self.fetch_into(&mut summary).await?;
        Ok(summary)
    }

    /// Rebuilds the report from stored snapshots and emails today's digests.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] if the archive, subscriptions or report can't be
    /// read or written. Individual email failures are counted, not raised.
    pub async fn analyze(&self) -> Result<RunSummary, RunnerError> {
        let mut summary = RunSummary::new(self.config.dry_run());
        self.analyze_into(&mut summary).await?;
        Ok(summary)
    }

    /// Fetches, then analyzes if anything was fetched.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] if either stage fails.
    pub async fn full(&self) -> Result<RunSummary, RunnerError> {
        let mut summary = RunSummary::new(self.config.dry_run());

        if self.fetch_into(&mut summary).await? == 0 {
            warn!("Nothing fetched, skipping analysis");
            return Ok(summary);
        }
        self.analyze_into(&mut summary).await?;
        Ok(summary)
    }

    /// Applies open subscription and unsubscribe issues to the store.
    ///
    /// New subscribers receive a confirmation email when mail is configured.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] if intake isn't configured, the store can't be
    /// opened, or issues can't be listed.
    pub async fn process_issues(&self) -> Result<RunSummary, RunnerError> {
        let mut summary = RunSummary::new(self.config.dry_run());

        let repository = self
            .config
            .issues_repository()
            .ok_or(RunnerError::MissingIssuesRepository)?;
        let token = self
            .config
            .github_token()
            .ok_or(RunnerError::MissingGithubToken)?;
        let octocrab = Octocrab::builder()
            .personal_token(token.to_string())
            .build()?;

        let mut store = self.open_store()?;
        let processor = IssueProcessor::new(&octocrab, repository, self.config.dry_run());
        let outcomes = processor.process_all(&mut store).await?;

        let delivery = self.delivery();
        for outcome in &outcomes {
            summary.record_issue(outcome);

            if let (IssueStatus::Subscribed { request }, Some(mailer)) = (&outcome.status, &delivery) {
                self.welcome(mailer, request).await;
            }
        }

        info!(
            processed = summary.issues_processed,
            rejected = summary.issues_rejected,
            failed = summary.issues_failed,
            "Issue intake complete"
        );
        Ok(summary)
    }

    /// Moves legacy flat snapshot files into the nested layout.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Snapshot`] if the archive can't be reorganized.
    pub fn migrate_data(&self) -> Result<RunSummary, RunnerError> {
        let mut summary = RunSummary::new(self.config.dry_run());

        if self.config.dry_run() {
            info!(path = %self.snapshots.root().display(), "[DRY RUN] Would migrate snapshot files");
            return Ok(summary);
        }

        let report = self.snapshots.migrate_flat_files()?;
        info!(moved = report.moved, skipped = report.skipped, "Migration complete");
        summary.snapshots_migrated = report.moved;
        Ok(summary)
    }

    /// Subscribes an email and sends a confirmation when mail is configured.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Subscription`] if the store can't be opened.
    /// Validation and write failures are reported in the response.
    pub async fn subscribe(
        &self,
        request: &SubscriptionRequest,
    ) -> Result<SubscriptionResponse, RunnerError> {
        let mut store = self.open_store()?;
        let response = store.subscribe(request);

        if response.success {
            if let Some(mailer) = self.delivery() {
                self.welcome(&mailer, request).await;
            }
        }
        Ok(response)
    }

    /// Removes an email from every list.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Subscription`] if the store can't be opened.
    pub fn unsubscribe(&self, email: &str) -> Result<SubscriptionResponse, RunnerError> {
        let mut store = self.open_store()?;
        Ok(store.unsubscribe(email))
    }

    /// Loads the current subscription document.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Subscription`] if the file can't be read or parsed.
    pub fn subscriptions(&self) -> Result<Subscriptions, RunnerError> {
        Ok(self.open_store()?.subscriptions().clone())
    }

    /// Returns the number of records fetched.
    async fn fetch_into(&self, summary: &mut RunSummary) -> Result<usize, RunnerError> {
        let fetcher = TrendingFetcher::new(self.config.trending_url().clone())?;
        let records = fetcher.fetch().await?;
        summary.repositories_fetched = records.len();

        if records.is_empty() {
            warn!("Trending page contained no repositories, not saving a snapshot");
            return Ok(0);
        }

        let today = self.config.today();
        if self.config.dry_run() {
            info!(
                path = %self.snapshots.path_for(today).display(),
                count = records.len(),
                "[DRY RUN] Would save snapshot"
            );
        } else {
            self.snapshots.save(today, &records)?;
        }
        Ok(records.len())
    }

    async fn analyze_into(&self, summary: &mut RunSummary) -> Result<(), RunnerError> {
        let today = self.config.today();

        let snapshots = self.snapshots.scan()?;
        summary.snapshots_loaded = snapshots.len();

        let analysis = Analysis::build(&snapshots, today);
        summary.repositories_tracked = analysis.repositories.len();
        summary.trending_today = analysis.today.len();
        info!(
            snapshots = snapshots.len(),
            repositories = analysis.repositories.len(),
            today = analysis.today.len(),
            "Built trending history"
        );

        let options = ReportOptions {
            output_dir: self.config.output_dir().to_path_buf(),
            static_dir: self.config.static_dir().to_path_buf(),
            links: self.links.clone(),
            issues_repository: self.config.issues_repository().map(|r| r.full_name()),
        };
        generate_report(&analysis, today, &self.renderer, &options)?;
        summary.report_generated = true;

        if analysis.today.is_empty() {
            warn!(date = %today, "No snapshot for today, skipping emails");
            summary.emails_skipped = true;
            return Ok(());
        }

        let Some(mailer) = self.delivery() else {
            summary.emails_skipped = true;
            return Ok(());
        };

        let store = self.open_store()?;
        let notifier = Notifier::new(&mailer, &self.renderer, &self.links);
        for result in notifier
            .send_daily(&analysis, store.subscriptions(), today)
            .await
        {
            summary.record_delivery(&result);
        }
        Ok(())
    }

    fn open_store(&self) -> Result<SubscriptionStore, RunnerError> {
        let store = SubscriptionStore::open(self.config.subscriptions_file())?;
        Ok(if self.config.dry_run() {
            store.read_only()
        } else {
            store
        })
    }

    /// Picks the mail transport; `None` when delivery is unavailable.
    fn delivery(&self) -> Option<Delivery> {
        if self.config.dry_run() {
            return Some(Delivery::DryRun(DryRunMailer));
        }

        let Some(mail) = self.config.mail() else {
            warn!("Mail is not configured, skipping emails");
            return None;
        };
        match SmtpMailer::new(mail) {
            Ok(mailer) => Some(Delivery::Smtp(mailer)),
            Err(e) => {
                error!(error = %e, "Failed to configure SMTP, skipping emails");
                None
            }
        }
    }

    async fn welcome(&self, mailer: &Delivery, request: &SubscriptionRequest) {
        let notifier = Notifier::new(mailer, &self.renderer, &self.links);
        match notifier.send_welcome(request).await {
            Ok(()) => info!(email = %request.email.trim(), "Sent confirmation email"),
            Err(e) => warn!(email = %request.email.trim(), error = %e, "Failed to send confirmation email"),
        }
    }
}

/// Transport chosen for a run.
enum Delivery {
    Smtp(SmtpMailer),
    DryRun(DryRunMailer),
}

impl Mailer for Delivery {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        match self {
            Self::Smtp(mailer) => mailer.send(mail).await,
            Self::DryRun(mailer) => mailer.send(mail).await,
        }
    }
}
