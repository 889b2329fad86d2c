//! Trending page parser.

use super::html;
use crate::snapshots::{parse_count, TrendingRecord};
use tracing::{debug, warn};

const GITHUB: &str = "https://github.com";

/// Extracts ranked records from a trending page.
///
/// Each `<article class="Box-row">` is one repository; its rank is its
/// 1-based position on the page. Articles without a repository link are
/// skipped without shifting the ranks of later articles.
#[must_use]
pub fn parse_trending(page: &str) -> Vec<TrendingRecord> {
    let lower = html::to_lower(page);
    let mut records = Vec::new();

    let articles = html::blocks(page, &lower, "article")
        .filter(|block| html::has_classes(html::open_tag(block), &["Box-row"]));

    for (index, article) in articles.enumerate() {
        let rank = u32::try_from(index + 1).unwrap_or(u32::MAX);
        match parse_article(article, rank) {
            Some(record) => records.push(record),
            None => warn!(rank, "Skipping trending entry without a repository link"),
        }
    }

    debug!(count = records.len(), "Parsed trending page");
    records
}

fn parse_article(article: &str, rank: u32) -> Option<TrendingRecord> {
    let lower = html::to_lower(article);

    let heading = html::blocks(article, &lower, "h2").next()?;
    let heading_lower = html::to_lower(heading);
    let anchor = html::blocks(heading, &heading_lower, "a").next()?;
    let name = html::attr(html::open_tag(anchor), "href")?
        .trim()
        .trim_matches('/')
        .to_string();
    if name.is_empty() {
        return None;
    }

    let description = html::blocks(article, &lower, "p")
        .find(|p| html::has_classes(html::open_tag(p), &["col-9"]))
        .map(|p| html::text(html::inner(p)))
        .unwrap_or_default();

    let language = html::blocks(article, &lower, "span")
        .find(|span| {
            html::attr(html::open_tag(span), "itemprop") == Some("programmingLanguage")
        })
        .map(|span| html::text(html::inner(span)))
        .unwrap_or_default();

    let counter = |suffix: &str| {
        html::blocks(article, &lower, "a")
            .find(|a| {
                html::attr(html::open_tag(a), "href")
                    .is_some_and(|href| href.trim_end_matches('/').ends_with(suffix))
            })
            .and_then(|a| parse_count(&html::text(html::inner(a))))
    };

    Some(TrendingRecord {
        link: format!("{GITHUB}/{name}"),
        stars: counter("/stargazers"),
        forks: counter("/forks"),
        name,
        description,
        language,
        rank,
    })
}
