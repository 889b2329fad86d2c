//! Per-repository trending history.
//!
//! Folds every snapshot into one [`RepositoryHistory`] per repository, then
//! derives streaks, categories and per-category groupings.

mod analysis;
mod streak;

pub use analysis::{Analysis, CategoryStats, DaySummary, TodayEntry};
pub use streak::calc_streak;

use crate::categorizer::categorize;
use crate::snapshots::{Snapshot, TrendingRecord};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

/// Rank used for ordering when a repository has no observations.
const UNRANKED: u32 = 999;

/// A repository's appearance in one day's listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Observation {
    /// Day of the snapshot.
    pub date: NaiveDate,

    /// Rank within that day's listing.
    pub rank: u32,
}

/// Everything known about one repository across all snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryHistory {
    /// Repository name in "owner/repo" format.
    pub name: String,

    /// Record from the first day the repository appeared.
    pub first_seen_info: TrendingRecord,

    /// Appearances in date order.
    pub observations: Vec<Observation>,

    /// Trailing run of consecutive days ending at the latest observation.
    pub streak: usize,

    /// Category derived from the first-seen description and language.
    pub category: &'static str,

    /// Number of days the repository appeared.
    pub total_days: usize,
}

impl RepositoryHistory {
    /// Rank on the most recent day the repository appeared.
    #[must_use]
    pub fn latest_rank(&self) -> u32 {
        self.observations.last().map_or(UNRANKED, |o| o.rank)
    }

    /// Most recent day the repository appeared.
    #[must_use]
    pub fn last_seen(&self) -> Option<NaiveDate> {
        self.observations.last().map(|o| o.date)
    }
}

/// Builds histories for every repository found in `snapshots`.
///
/// Snapshots need not be pre-sorted. The result is ordered by streak
/// (longest first), then by latest rank.
#[must_use]
pub fn build_history(snapshots: &[Snapshot]) -> Vec<RepositoryHistory> {
    let mut ordered: Vec<&Snapshot> = snapshots.iter().collect();
    ordered.sort_by_key(|s| s.date);

    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut folded: Vec<(TrendingRecord, Vec<Observation>)> = Vec::new();

    for snapshot in ordered {
        for record in &snapshot.records {
            let observation = Observation {
                date: snapshot.date,
                rank: record.rank,
            };
            match index.get(record.name.as_str()) {
                Some(&i) => folded[i].1.push(observation),
                None => {
                    index.insert(record.name.as_str(), folded.len());
                    folded.push((record.clone(), vec![observation]));
                }
            }
        }
    }

    let mut histories: Vec<RepositoryHistory> = folded
        .into_iter()
        .map(|(first_seen_info, observations)| {
            let dates: Vec<NaiveDate> = observations.iter().map(|o| o.date).collect();
            RepositoryHistory {
                name: first_seen_info.name.clone(),
                category: categorize(&first_seen_info.description, &first_seen_info.language),
                streak: calc_streak(&dates),
                total_days: observations.len(),
                first_seen_info,
                observations,
            }
        })
        .collect();

    histories.sort_by(|a, b| {
        b.streak
            .cmp(&a.streak)
            .then_with(|| a.latest_rank().cmp(&b.latest_rank()))
    });
    histories
}
