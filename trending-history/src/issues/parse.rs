//! Issue body parsing.

use crate::subscriptions::SubscriptionRequest;

const EMAIL_FIELD: &str = "**Email:**";
const CATEGORIES_FIELD: &str = "**Categories:**";
const REPOSITORIES_FIELD: &str = "**Repositories:**";

/// Parses a subscription issue body.
///
/// Expects lines of the form `**Email:** a@b.c`, `**Categories:** AI/ML, Mobile`
/// and `**Repositories:** owner/repo`. A list value of `None` means empty.
/// Returns `None` when no email field is present.
#[must_use]
pub fn parse_issue_body(body: &str) -> Option<SubscriptionRequest> {
    let email = field(body, EMAIL_FIELD).filter(|email| !email.is_empty())?;

    Some(
        SubscriptionRequest::new(email)
            .with_categories(list(field(body, CATEGORIES_FIELD)))
            .with_repositories(list(field(body, REPOSITORIES_FIELD))),
    )
}

/// Finds the first email-looking token in `title`, falling back to `body`.
#[must_use]
pub fn extract_email<'a>(title: &'a str, body: &'a str) -> Option<&'a str> {
    find_email(title).or_else(|| find_email(body))
}

fn field<'a>(body: &'a str, marker: &str) -> Option<&'a str> {
    body.lines().find_map(|line| {
        let start = line.find(marker)? + marker.len();
        Some(line[start..].trim())
    })
}

fn list(value: Option<&str>) -> Vec<&str> {
    match value {
        None | Some("None") => Vec::new(),
        Some(value) => value
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .collect(),
    }
}

fn find_email(text: &str) -> Option<&str> {
    text.split(|c: char| !is_email_char(c))
        .map(|token| token.trim_matches('.'))
        .find(|token| looks_like_email(token))
}

fn is_email_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '%' | '+' | '-' | '@')
}

fn looks_like_email(token: &str) -> bool {
    let Some((local, domain)) = token.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !host.is_empty() && tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic())
}
