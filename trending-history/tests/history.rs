use chrono::NaiveDate;
use std::path::PathBuf;

use trending_history::{build_history, Analysis, SnapshotError, SnapshotStore};

fn fixtures_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn scan_skips_malformed_and_unrelated_files() {
    let store = SnapshotStore::new(fixtures_root().join("snapshots"));
    let snapshots = store.scan().unwrap();

    let dates: Vec<_> = snapshots.iter().map(|s| s.date).collect();
    assert_eq!(dates, vec![date(2024, 1, 1), date(2024, 1, 2), date(2024, 1, 3)]);
}

#[test]
fn scan_missing_root_is_an_error() {
    let store = SnapshotStore::new(fixtures_root().join("does-not-exist"));

    assert!(matches!(store.scan(), Err(SnapshotError::MissingRoot { .. })));
}

#[test]
fn formatted_counts_load_as_integers() {
    let store = SnapshotStore::new(fixtures_root().join("snapshots"));
    let records = store.load(date(2024, 1, 1)).unwrap();

    let rust = records.iter().find(|r| r.name == "rust-lang/rust").unwrap();
    assert_eq!(rust.stars, Some(99_120));
    assert_eq!(rust.forks, Some(12_800));
}

#[test]
fn history_from_fixture_archive() {
    let snapshots = SnapshotStore::new(fixtures_root().join("snapshots"))
        .scan()
        .unwrap();
    let histories = build_history(&snapshots);

    assert_eq!(histories.len(), 5);

    let gpt = &histories[0];
    assert_eq!(gpt.name, "openai/gpt-4");
    assert_eq!(gpt.streak, 3);
    assert_eq!(gpt.total_days, 3);
    assert_eq!(gpt.category, "AI/ML");
    let ranks: Vec<_> = gpt.observations.iter().map(|o| o.rank).collect();
    assert_eq!(ranks, vec![3, 2, 1]);

    let rust = &histories[1];
    assert_eq!(rust.name, "rust-lang/rust");
    assert_eq!(rust.streak, 2);
    assert_eq!(rust.category, "System/OS");
    assert_eq!(rust.last_seen(), Some(date(2024, 1, 2)));

    assert!(histories[2..].iter().all(|h| h.streak == 1));
}

#[test]
fn analysis_for_latest_day() {
    let snapshots = SnapshotStore::new(fixtures_root().join("snapshots"))
        .scan()
        .unwrap();

    let analysis = Analysis::build(&snapshots, date(2024, 1, 3));

    let today: Vec<_> = analysis
        .today
        .iter()
        .map(|e| (e.record.name.as_str(), e.category, e.streak))
        .collect();
    assert_eq!(
        today,
        vec![
            ("openai/gpt-4", "AI/ML", 3),
            ("torvalds/linux", "System/OS", 1),
            ("vercel/next.js", "Web Development", 1),
        ]
    );
    assert_eq!(analysis.days.first().map(|d| d.date), Some(date(2024, 1, 3)));

    let web = analysis
        .categories
        .iter()
        .find(|c| c.label == "Web Development")
        .unwrap();
    assert_eq!(web.count, 2);
    assert_eq!(analysis.categories.last().map(|c| c.label), Some("Other"));
}

#[test]
fn analysis_without_todays_snapshot_has_no_today_entries() {
    let snapshots = SnapshotStore::new(fixtures_root().join("snapshots"))
        .scan()
        .unwrap();

    let analysis = Analysis::build(&snapshots, date(2024, 1, 4));

    assert!(analysis.today.is_empty());
    assert_eq!(analysis.repositories.len(), 5);
}
