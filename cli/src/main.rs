//! CLI for GitHub Trending History.
//!
//! Fetches the daily trending snapshot, regenerates the history report,
//! emails subscriber digests and manages subscriptions.

use chrono::NaiveDate;
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use trending_history::{
    AppConfig, MailConfig, RunSummary, Runner, RunnerConfig, RunnerError, SubscriptionRequest,
    SubscriptionResponse, Subscriptions, DEFAULT_CONFIG_FILE,
};
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// GitHub Trending History - Track trending repositories and email digests.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Preview changes without saving data, sending emails or touching issues.
    #[arg(long, global = true)]
    dry_run: bool,

    /// Date to treat as today (YYYY-MM-DD). Defaults to the local date.
    #[arg(long, global = true)]
    date: Option<NaiveDate>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch today's trending repositories.
    Fetch,

    /// Generate the report from stored snapshots and send digests.
    Analyze,

    /// Fetch, then analyze.
    Full,

    /// Subscribe an email to categories and/or repositories.
    Subscribe(SubscribeArgs),

    /// Remove an email from every list.
    Unsubscribe {
        /// Email to remove.
        #[arg(long)]
        email: String,
    },

    /// Show subscriptions, optionally for one email.
    Subscriptions {
        /// Only show what this email follows.
        #[arg(long)]
        email: Option<String>,
    },

    /// Apply subscription and unsubscribe requests filed as GitHub issues.
    ProcessIssues {
        /// GitHub Personal Access Token.
        #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
        token: Option<String>,
    },

    /// Move legacy `YYYY-MM-DD.json` snapshots into the `YYYY/MM/DD.json` layout.
    MigrateData,
}

#[derive(ClapArgs, Debug)]
struct SubscribeArgs {
    /// Subscriber email.
    #[arg(long, required_unless_present = "json", conflicts_with = "json")]
    email: Option<String>,

    /// Category to follow (repeatable).
    #[arg(long = "category")]
    categories: Vec<String>,

    /// Repository to follow as owner/repo (repeatable).
    #[arg(long = "repository")]
    repositories: Vec<String>,

    /// Full request as JSON: {"email": ..., "categories": [...], "repositories": [...]}.
    #[arg(long)]
    json: Option<String>,
}

impl SubscribeArgs {
    fn into_request(self) -> Result<SubscriptionRequest, String> {
        if let Some(json) = self.json {
            return serde_json::from_str(&json).map_err(|e| format!("Invalid request JSON: {e}"));
        }
        Ok(SubscriptionRequest::new(self.email.unwrap_or_default())
            .with_categories(self.categories)
            .with_repositories(self.repositories))
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    init_tracing();

    if rustls::crypto::aws_lc_rs::default_provider()
        .install_default()
        .is_err()
    {
        error!("Failed to install the TLS crypto provider");
        return ExitCode::from(2);
    }

    // Parse arguments
    let args = Args::parse();

    match run(args).await {
        Ok(Outcome::Summary(summary)) => {
            print_summary(&summary);

            if summary.has_failures() {
                ExitCode::from(1)
            } else {
                ExitCode::from(0)
            }
        }
        Ok(Outcome::Response(response)) => {
            println!("{}", response.message);
            if response.success {
                ExitCode::from(0)
            } else {
                ExitCode::from(1)
            }
        }
        Ok(Outcome::Listing) => ExitCode::from(0),
        Err(e) => {
            error!(error = %e, "Critical failure");
            ExitCode::from(2)
        }
    }
}

/// Initializes tracing with environment filter support.
///
/// Sets up the global tracing subscriber with:
/// - Compact log formatting (single-line output)
/// - Log level filtering via `RUST_LOG` env var (defaults to "info")
fn init_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

/// What a command produced.
enum Outcome {
    Summary(RunSummary),
    Response(SubscriptionResponse),
    Listing,
}

/// Main execution logic.
async fn run(args: Args) -> Result<Outcome, RunnerError> {
    let settings = AppConfig::load(&args.config)?;
    let today = args
        .date
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    let mut config = RunnerConfig::new(settings, today, args.dry_run)
        .with_mail(MailConfig::from_env());
    if let Command::ProcessIssues { token } = &args.command {
        config = config.with_github_token(token.clone());
    }
    let runner = Runner::new(config)?;

    let outcome = match args.command {
        Command::Fetch => Outcome::Summary(runner.fetch().await?),
        Command::Analyze => Outcome::Summary(runner.analyze().await?),
        Command::Full => Outcome::Summary(runner.full().await?),
        Command::ProcessIssues { .. } => Outcome::Summary(runner.process_issues().await?),
        Command::MigrateData => Outcome::Summary(runner.migrate_data()?),
        Command::Subscribe(subscribe) => match subscribe.into_request() {
            Ok(request) => Outcome::Response(runner.subscribe(&request).await?),
            Err(message) => Outcome::Response(SubscriptionResponse {
                success: false,
                message,
            }),
        },
        Command::Unsubscribe { email } => Outcome::Response(runner.unsubscribe(&email)?),
        Command::Subscriptions { email } => {
            print_subscriptions(&runner.subscriptions()?, email.as_deref());
            Outcome::Listing
        }
    };
    Ok(outcome)
}

/// Prints the final run summary.
fn print_summary(summary: &RunSummary) {
    println!("\nSummary:");
    println!(
        "  Mode: {}",
        if summary.dry_run { "Dry Run" } else { "Live" }
    );
    if summary.repositories_fetched > 0 {
        println!("  Repositories fetched: {}", summary.repositories_fetched);
    }
    if summary.report_generated {
        println!("  Snapshots loaded: {}", summary.snapshots_loaded);
        println!("  Repositories tracked: {}", summary.repositories_tracked);
        println!("  Trending today: {}", summary.trending_today);
        if summary.emails_skipped {
            println!("  Emails: skipped");
        } else {
            println!("  Emails sent: {}", summary.emails_sent);
            println!("  Emails failed: {}", summary.emails_failed);
        }
    }
    if summary.issues_processed + summary.issues_rejected + summary.issues_failed > 0 {
        println!("  Issues processed: {}", summary.issues_processed);
        println!("  Issues rejected: {}", summary.issues_rejected);
        println!("  Issues failed: {}", summary.issues_failed);
    }
    if summary.snapshots_migrated > 0 {
        println!("  Snapshots migrated: {}", summary.snapshots_migrated);
    }
}

/// Prints the subscription document, or one subscriber's entries.
fn print_subscriptions(subscriptions: &Subscriptions, email: Option<&str>) {
    if let Some(email) = email {
        let email = email.trim();
        if !subscriptions.contains(email) {
            println!("{email} is not subscribed");
            return;
        }
        println!("{email}");
        println!("  Categories: {}", join_or_none(&subscriptions.categories_for(email)));
        println!(
            "  Repositories: {}",
            join_or_none(&subscriptions.repositories_for(email))
        );
        return;
    }

    println!("Subscribers: {}", subscriptions.emails.len());
    for email in &subscriptions.emails {
        println!("  {email}");
    }
    println!("\nCategories:");
    for (category, emails) in &subscriptions.categories {
        println!("  {category}: {} subscriber(s)", emails.len());
    }
    println!("\nRepositories:");
    for (repository, emails) in &subscriptions.repositories {
        println!("  {repository}: {} subscriber(s)", emails.len());
    }
}

fn join_or_none(items: &[&str]) -> String {
    if items.is_empty() {
        "None".to_string()
    } else {
        items.join(", ")
    }
}
