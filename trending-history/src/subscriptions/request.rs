//! Subscribe/unsubscribe request and response types.

use super::SubscriptionError;
use serde::{Deserialize, Serialize};

/// A request to subscribe an email to categories and/or repositories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionRequest {
    /// Subscriber email.
    pub email: String,

    /// Category labels to follow.
    #[serde(default)]
    pub categories: Vec<String>,

    /// Repository names ("owner/repo") to follow.
    #[serde(default)]
    pub repositories: Vec<String>,
}

impl SubscriptionRequest {
    /// Creates a request for the given email.
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            ..Default::default()
        }
    }

    /// Adds categories to follow.
    #[must_use]
    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories.extend(categories.into_iter().map(Into::into));
        self
    }

    /// Adds repositories to follow.
    #[must_use]
    pub fn with_repositories<I, S>(mut self, repositories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.repositories
            .extend(repositories.into_iter().map(Into::into));
        self
    }

    /// Returns the trimmed email if it looks like an address.
    ///
    /// # Errors
    ///
    /// Returns [`SubscriptionError::InvalidEmail`] if the email lacks `@` or `.`.
    pub fn validated_email(&self) -> Result<&str, SubscriptionError> {
        validate_email(&self.email)
    }
}

/// Outcome of a subscribe or unsubscribe call, shaped for JSON responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionResponse {
    /// Whether the operation succeeded.
    pub success: bool,

    /// Human-readable message.
    pub message: String,
}

impl SubscriptionResponse {
    pub(crate) fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub(crate) fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Minimal address check: non-empty, contains `@` and `.`.
///
/// # Errors
///
/// Returns [`SubscriptionError::InvalidEmail`] when the check fails.
pub fn validate_email(email: &str) -> Result<&str, SubscriptionError> {
    let trimmed = email.trim();
    if trimmed.contains('@') && trimmed.contains('.') {
        Ok(trimmed)
    } else {
        Err(SubscriptionError::InvalidEmail {
            email: email.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plausible_addresses() {
        assert_eq!(validate_email(" dev@example.com ").unwrap(), "dev@example.com");
    }

    #[test]
    fn rejects_missing_at_or_dot() {
        assert!(validate_email("dev.example.com").is_err());
        assert!(validate_email("dev@example").is_err());
        assert!(validate_email("").is_err());
    }

    #[test]
    fn request_deserializes_without_lists() {
        let request: SubscriptionRequest =
            serde_json::from_str(r#"{"email":"dev@example.com"}"#).unwrap();

        assert_eq!(request, SubscriptionRequest::new("dev@example.com"));
    }
}
