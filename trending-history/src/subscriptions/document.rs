//! Persisted subscription document.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Subscriber lists as stored on disk.
///
/// Ordered collections keep the serialized file stable between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscriptions {
    /// Every subscribed email.
    #[serde(default)]
    pub emails: BTreeSet<String>,

    /// Category label to subscriber emails.
    #[serde(default)]
    pub categories: BTreeMap<String, BTreeSet<String>>,

    /// Repository name to subscriber emails.
    #[serde(default)]
    pub repositories: BTreeMap<String, BTreeSet<String>>,
}

impl Subscriptions {
    /// Subscribers of a category.
    #[must_use]
    pub fn category_subscribers(&self, category: &str) -> Option<&BTreeSet<String>> {
        self.categories.get(category)
    }

    /// Subscribers of a repository.
    #[must_use]
    pub fn repository_subscribers(&self, repository: &str) -> Option<&BTreeSet<String>> {
        self.repositories.get(repository)
    }

    /// Categories an email is subscribed to.
    #[must_use]
    pub fn categories_for(&self, email: &str) -> Vec<&str> {
        keys_containing(&self.categories, email)
    }

    /// Repositories an email is subscribed to.
    #[must_use]
    pub fn repositories_for(&self, email: &str) -> Vec<&str> {
        keys_containing(&self.repositories, email)
    }

    /// Returns true if the email appears anywhere in the document.
    #[must_use]
    pub fn contains(&self, email: &str) -> bool {
        self.emails.contains(email)
            || self.categories.values().any(|s| s.contains(email))
            || self.repositories.values().any(|s| s.contains(email))
    }
}

fn keys_containing<'a>(map: &'a BTreeMap<String, BTreeSet<String>>, email: &str) -> Vec<&'a str> {
    map.iter()
        .filter(|(_, emails)| emails.contains(email))
        .map(|(key, _)| key.as_str())
        .collect()
}
