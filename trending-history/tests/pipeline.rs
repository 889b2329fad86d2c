use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use trending_history::{
    AppConfig, Runner, RunnerConfig, SnapshotStore, SubscriptionRequest, SubscriptionStore,
};

fn fixtures_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn settings(data_dir: &Path, work: &Path) -> AppConfig {
    AppConfig {
        data_dir: data_dir.to_path_buf(),
        subscriptions_file: work.join("subscriptions.json"),
        output_dir: work.join("docs"),
        static_dir: fixtures_root().join("static"),
        site_url: Url::parse("https://octo.github.io/trending/").unwrap(),
        trending_url: Url::parse("https://github.com/trending").unwrap(),
        issues_repository: None,
    }
}

fn copy_subscriptions(work: &Path) {
    fs::copy(
        fixtures_root().join("subscriptions.json"),
        work.join("subscriptions.json"),
    )
    .unwrap();
}

#[tokio::test]
async fn analyze_writes_report_and_sends_digests_in_dry_run() {
    let work = TempDir::new().unwrap();
    copy_subscriptions(work.path());
    let before = fs::read_to_string(work.path().join("subscriptions.json")).unwrap();

    let config = RunnerConfig::new(
        settings(&fixtures_root().join("snapshots"), work.path()),
        date(2024, 1, 3),
        true,
    );
    let summary = Runner::new(config).unwrap().analyze().await.unwrap();

    assert_eq!(summary.snapshots_loaded, 3);
    assert_eq!(summary.repositories_tracked, 5);
    assert_eq!(summary.trending_today, 3);
    assert!(summary.report_generated);
    // AI/ML digest to ml@, torvalds/linux digest to kernel@; Security has nothing today.
    assert_eq!(summary.emails_sent, 2);
    assert!(summary.all_success());

    let index = fs::read_to_string(work.path().join("docs/index.html")).unwrap();
    assert!(index.contains("openai/gpt-4"));
    assert!(index.contains("2024-01-03"));
    assert!(work.path().join("docs/unsubscribe.html").is_file());
    assert!(work.path().join("docs/static/css/style.css").is_file());

    let after = fs::read_to_string(work.path().join("subscriptions.json")).unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn analyze_without_mail_config_skips_emails() {
    let work = TempDir::new().unwrap();
    copy_subscriptions(work.path());

    let config = RunnerConfig::new(
        settings(&fixtures_root().join("snapshots"), work.path()),
        date(2024, 1, 3),
        false,
    );
    let summary = Runner::new(config).unwrap().analyze().await.unwrap();

    assert!(summary.report_generated);
    assert!(summary.emails_skipped);
    assert_eq!(summary.emails_sent, 0);
}

#[tokio::test]
async fn analyze_fails_on_malformed_subscriptions() {
    let work = TempDir::new().unwrap();
    fs::write(work.path().join("subscriptions.json"), "{\"emails\": [").unwrap();

    let config = RunnerConfig::new(
        settings(&fixtures_root().join("snapshots"), work.path()),
        date(2024, 1, 3),
        true,
    );

    assert!(Runner::new(config).unwrap().analyze().await.is_err());
}

#[tokio::test]
async fn full_saves_todays_snapshot() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/trending"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(include_str!("fixtures/trending.html")),
        )
        .mount(&server)
        .await;

    let work = TempDir::new().unwrap();
    let data_dir = work.path().join("data");
    fs::create_dir_all(&data_dir).unwrap();
    let trending_url = Url::parse(&format!("{}/trending", server.uri())).unwrap();

    let config = RunnerConfig::new(settings(&data_dir, work.path()), date(2024, 2, 1), false)
        .with_trending_url(trending_url);
    let summary = Runner::new(config).unwrap().full().await.unwrap();

    assert_eq!(summary.repositories_fetched, 3);
    assert_eq!(summary.snapshots_loaded, 1);
    assert_eq!(summary.trending_today, 3);
    assert!(data_dir.join("2024/02/01.json").is_file());

    let saved = SnapshotStore::new(&data_dir)
        .load(date(2024, 2, 1))
        .unwrap();
    assert_eq!(saved[0].name, "openai/gpt-4");
    assert_eq!(saved[0].stars, Some(12_345));
}

#[tokio::test]
async fn subscribe_and_unsubscribe_through_runner() {
    let work = TempDir::new().unwrap();
    let config = RunnerConfig::new(
        settings(&fixtures_root().join("snapshots"), work.path()),
        date(2024, 1, 3),
        false,
    );
    let runner = Runner::new(config).unwrap();

    let response = runner
        .subscribe(&SubscriptionRequest::new(" new@example.com ").with_categories(["Mobile"]))
        .await
        .unwrap();
    assert!(response.success);

    let store = SubscriptionStore::open(work.path().join("subscriptions.json")).unwrap();
    assert_eq!(
        store.subscriptions().categories_for("new@example.com"),
        vec!["Mobile"]
    );

    assert!(runner.unsubscribe("new@example.com").unwrap().success);
    assert!(runner.subscriptions().unwrap().emails.is_empty());
}

#[test]
fn migrate_data_moves_flat_files() {
    let work = TempDir::new().unwrap();
    let data_dir = work.path().join("data");
    fs::create_dir_all(&data_dir).unwrap();
    fs::write(data_dir.join("2023-06-15.json"), "[]").unwrap();

    let config = RunnerConfig::new(settings(&data_dir, work.path()), date(2024, 1, 3), false);
    let summary = Runner::new(config).unwrap().migrate_data().unwrap();

    assert_eq!(summary.snapshots_migrated, 1);
    assert!(data_dir.join("2023/06/15.json").is_file());
    assert!(!data_dir.join("2023-06-15.json").exists());
}
