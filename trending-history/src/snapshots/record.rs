//! Trending record and snapshot types.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// One repository as listed on the trending page for a single day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendingRecord {
    /// Repository name in "owner/repo" format.
    pub name: String,

    /// Repository URL.
    pub link: String,

    /// Repository description; empty when the page shows none.
    #[serde(default)]
    pub description: String,

    /// Primary language; empty when the page shows none.
    #[serde(default)]
    pub language: String,

    /// 1-based position within that day's listing.
    pub rank: u32,

    /// Total stars at scrape time.
    #[serde(
        default,
        deserialize_with = "deserialize_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub stars: Option<u64>,

    /// Total forks at scrape time.
    #[serde(
        default,
        deserialize_with = "deserialize_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub forks: Option<u64>,
}

/// A single day's captured listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Day the listing was captured.
    pub date: NaiveDate,

    /// Records in page order.
    pub records: Vec<TrendingRecord>,
}

/// Parses a human-formatted count such as `"12,345"`, `"1.2k"` or `"3M"`.
///
/// Returns `None` for anything that isn't a count.
#[must_use]
pub fn parse_count(text: &str) -> Option<u64> {
    let cleaned: String = text
        .trim()
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    let (number, multiplier) = match cleaned.chars().last()? {
        'k' | 'K' => (&cleaned[..cleaned.len() - 1], 1_000.0),
        'm' | 'M' => (&cleaned[..cleaned.len() - 1], 1_000_000.0),
        _ => (cleaned.as_str(), 1.0),
    };

    if multiplier == 1.0 {
        return number.parse().ok();
    }
    let value: f64 = number.parse().ok()?;
    if value < 0.0 {
        return None;
    }
    Some((value * multiplier).round() as u64)
}

/// Accepts either a JSON integer or a formatted string for star/fork counts.
fn deserialize_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawCount {
        Number(u64),
        Text(String),
    }

    Ok(match Option::<RawCount>::deserialize(deserializer)? {
        Some(RawCount::Number(n)) => Some(n),
        Some(RawCount::Text(s)) => parse_count(&s),
        None => None,
    })
}
