//! Serializable view models handed to templates.
//!
//! Every field is always present so templates can run in strict mode.

use crate::history::{Analysis, RepositoryHistory, TodayEntry};
use chrono::NaiveDate;
use serde::Serialize;

/// A repository as shown in lists and digests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoView {
    pub name: String,
    pub link: String,
    pub description: String,
    pub language: String,
    pub rank: u32,
    pub stars: Option<u64>,
    pub forks: Option<u64>,
    pub streak: usize,
    pub category: String,
}

impl From<&TodayEntry> for RepoView {
    fn from(entry: &TodayEntry) -> Self {
        Self {
            name: entry.record.name.clone(),
            link: entry.record.link.clone(),
            description: entry.record.description.clone(),
            language: entry.record.language.clone(),
            rank: entry.record.rank,
            stars: entry.record.stars,
            forks: entry.record.forks,
            streak: entry.streak,
            category: entry.category.to_string(),
        }
    }
}

/// One `(date, rank)` point in a repository's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObservationView {
    pub date: String,
    pub rank: u32,
}

/// A repository with its full history, for the report's archive section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryView {
    pub name: String,
    pub link: String,
    pub description: String,
    pub language: String,
    pub category: String,
    pub streak: usize,
    pub total_days: usize,
    pub latest_rank: u32,
    pub history: Vec<ObservationView>,
}

impl From<&RepositoryHistory> for HistoryView {
    fn from(history: &RepositoryHistory) -> Self {
        Self {
            name: history.name.clone(),
            link: history.first_seen_info.link.clone(),
            description: history.first_seen_info.description.clone(),
            language: history.first_seen_info.language.clone(),
            category: history.category.to_string(),
            streak: history.streak,
            total_days: history.total_days,
            latest_rank: history.latest_rank(),
            history: history
                .observations
                .iter()
                .map(|o| ObservationView {
                    date: o.date.to_string(),
                    rank: o.rank,
                })
                .collect(),
        }
    }
}

/// Category summary row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryView {
    pub label: String,
    pub count: usize,
    pub repositories: Vec<String>,
}

/// One day of the archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayView {
    pub date: String,
    pub count: usize,
    pub repos: Vec<RepoView>,
}

/// Context for `index.html`.
#[derive(Debug, Clone, Serialize)]
pub struct IndexView {
    pub today: String,
    pub site_url: String,
    pub today_repos: Vec<RepoView>,
    pub all_repos: Vec<HistoryView>,
    pub categories: Vec<CategoryView>,
    pub dates: Vec<String>,
    pub days: Vec<DayView>,
    pub total_days: usize,
    pub tracked_count: usize,
    /// Prefilled "new subscription issue" link; empty hides the subscribe form.
    pub subscribe_url: String,
}

impl IndexView {
    /// Builds the report context from an analysis.
    #[must_use]
    pub fn new(
        analysis: &Analysis,
        today: NaiveDate,
        site_url: &str,
        subscribe_url: &str,
    ) -> Self {
        Self {
            today: today.to_string(),
            site_url: site_url.to_string(),
            subscribe_url: subscribe_url.to_string(),
            today_repos: analysis.today.iter().map(RepoView::from).collect(),
            all_repos: analysis.repositories.iter().map(HistoryView::from).collect(),
            categories: analysis
                .categories
                .iter()
                .map(|c| CategoryView {
                    label: c.label.to_string(),
                    count: c.count,
                    repositories: c.repositories.clone(),
                })
                .collect(),
            dates: analysis.dates.iter().map(NaiveDate::to_string).collect(),
            days: analysis
                .days
                .iter()
                .map(|d| DayView {
                    date: d.date.to_string(),
                    count: d.entries.len(),
                    repos: d.entries.iter().map(RepoView::from).collect(),
                })
                .collect(),
            total_days: analysis.dates.len(),
            tracked_count: analysis.repositories.len(),
        }
    }
}

/// Context for a category digest email.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryDigestView {
    pub category: String,
    pub date: String,
    pub count: usize,
    pub repos: Vec<RepoView>,
    pub site_url: String,
    pub unsubscribe_url: String,
}

/// Context for a repository digest email.
#[derive(Debug, Clone, Serialize)]
pub struct RepositoryDigestView {
    pub date: String,
    pub repo: RepoView,
    pub site_url: String,
    pub unsubscribe_url: String,
}

/// Context for the subscription confirmation email.
#[derive(Debug, Clone, Serialize)]
pub struct WelcomeView {
    pub categories: Vec<String>,
    pub repositories: Vec<String>,
    pub site_url: String,
    pub unsubscribe_url: String,
}

/// Context for `unsubscribe.html`.
#[derive(Debug, Clone, Serialize)]
pub struct UnsubscribeView {
    pub site_url: String,
    pub issues_url: String,
}
