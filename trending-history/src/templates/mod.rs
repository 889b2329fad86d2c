//! HTML rendering using Handlebars.
//!
//! Renders the report pages (`index.html`, `unsubscribe.html`) and the digest
//! and welcome emails from templates embedded in the crate.

mod error;
mod links;
mod renderer;
pub mod views;

pub use error::TemplateError;
pub use links::SiteLinks;
pub use renderer::{compact_number, create_handlebars_registry, TemplateRenderer};

/// Subject line for a category digest.
///
/// Format: "GitHub Trending - {category} ({date})"
#[must_use]
pub fn category_digest_subject(category: &str, date: &str) -> String {
    format!("GitHub Trending - {category} ({date})")
}

/// Subject line for a repository digest.
///
/// Format: "Repository Trending - {repository} ({date})"
#[must_use]
pub fn repository_digest_subject(repository: &str, date: &str) -> String {
    format!("Repository Trending - {repository} ({date})")
}

/// Subject line for the subscription confirmation email.
pub const WELCOME_SUBJECT: &str = "Subscription Confirmed: GitHub Trending Updates";
