//! Aggregated view over all snapshots used by the report and notifier.

use super::{build_history, RepositoryHistory};
use crate::categorizer::{categorize, labels};
use crate::snapshots::{Snapshot, TrendingRecord};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

/// A record from today's snapshot, enriched with derived statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TodayEntry {
    /// Today's record.
    #[serde(flatten)]
    pub record: TrendingRecord,

    /// Consecutive days on the listing, including today.
    pub streak: usize,

    /// Category label.
    pub category: &'static str,
}

/// Repositories grouped under one category label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryStats {
    /// Category label.
    pub label: &'static str,

    /// Number of repositories in the category.
    pub count: usize,

    /// Repository names in history order.
    pub repositories: Vec<String>,
}

/// One day's listing in compact form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DaySummary {
    /// Snapshot date.
    pub date: NaiveDate,

    /// That day's records with categories.
    pub entries: Vec<TodayEntry>,
}

/// Everything derived from the snapshot archive in one run.
#[derive(Debug, Clone, Default)]
pub struct Analysis {
    /// Snapshot dates, ascending.
    pub dates: Vec<NaiveDate>,

    /// Per-repository histories, longest streak first.
    pub repositories: Vec<RepositoryHistory>,

    /// Today's entries; empty unless the latest snapshot is from `today`.
    pub today: Vec<TodayEntry>,

    /// Category groupings in taxonomy order, ending with "Other".
    pub categories: Vec<CategoryStats>,

    /// Daily listings, newest first.
    pub days: Vec<DaySummary>,
}

impl Analysis {
    /// Builds the analysis for `today` from every snapshot.
    #[must_use]
    pub fn build(snapshots: &[Snapshot], today: NaiveDate) -> Self {
        let mut ordered: Vec<&Snapshot> = snapshots.iter().collect();
        ordered.sort_by_key(|s| s.date);

        let repositories = build_history(snapshots);
        let streaks: HashMap<&str, usize> = repositories
            .iter()
            .map(|h| (h.name.as_str(), h.streak))
            .collect();

        // Streaks in `days` are only meaningful for today; older days show the
        // current streak, which matches what the report displays.
        let enrich = |record: &TrendingRecord| TodayEntry {
            record: record.clone(),
            streak: streaks.get(record.name.as_str()).copied().unwrap_or(1),
            category: categorize(&record.description, &record.language),
        };

        let today_entries = match ordered.last() {
            Some(latest) if latest.date == today => latest.records.iter().map(enrich).collect(),
            _ => Vec::new(),
        };

        let days = ordered
            .iter()
            .rev()
            .map(|s| DaySummary {
                date: s.date,
                entries: s.records.iter().map(enrich).collect(),
            })
            .collect();

        let categories = labels()
            .map(|label| {
                let names: Vec<String> = repositories
                    .iter()
                    .filter(|h| h.category == label)
                    .map(|h| h.name.clone())
                    .collect();
                CategoryStats {
                    label,
                    count: names.len(),
                    repositories: names,
                }
            })
            .collect();

        Self {
            dates: ordered.iter().map(|s| s.date).collect(),
            today: today_entries,
            days,
            categories,
            repositories,
        }
    }

    /// Today's entries in the given category.
    pub fn today_in_category<'a>(
        &'a self,
        category: &'a str,
    ) -> impl Iterator<Item = &'a TodayEntry> + 'a {
        self.today.iter().filter(move |e| e.category == category)
    }

    /// Today's entry for a repository, if it is trending today.
    #[must_use]
    pub fn today_entry(&self, name: &str) -> Option<&TodayEntry> {
        self.today.iter().find(|e| e.record.name == name)
    }
}
