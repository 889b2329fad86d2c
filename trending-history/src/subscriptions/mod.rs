//! Subscriber storage.
//!
//! Subscriptions live in a single JSON file that is fully rewritten after
//! every mutation. Concurrent writers aren't coordinated; the last write wins.

mod document;
mod error;
mod request;

pub use document::Subscriptions;
pub use error::SubscriptionError;
pub use request::{validate_email, SubscriptionRequest, SubscriptionResponse};

use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// File-backed subscription store.
#[derive(Debug, Clone)]
pub struct SubscriptionStore {
    path: PathBuf,
    subscriptions: Subscriptions,
    read_only: bool,
}

impl SubscriptionStore {
    /// Opens the store at `path`. A missing file yields an empty store.
    ///
    /// # Errors
    ///
    /// Returns [`SubscriptionError`] if the file exists but can't be read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SubscriptionError> {
        let path = path.into();
        let subscriptions = load_subscriptions(&path)?;
        Ok(Self {
            path,
            subscriptions,
            read_only: false,
        })
    }

    /// Keeps mutations in memory only; [`save`](Self::save) becomes a no-op.
    #[must_use]
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the current subscriptions.
    pub fn subscriptions(&self) -> &Subscriptions {
        &self.subscriptions
    }

    /// Subscribes an email to the requested categories and repositories.
    ///
    /// Adding an existing subscription is a no-op for that entry. Blank category
    /// and repository names are ignored. The file is rewritten afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`SubscriptionError::InvalidEmail`] without touching the store if
    /// the email fails validation, or an I/O error if saving fails.
    pub fn add(&mut self, request: &SubscriptionRequest) -> Result<(), SubscriptionError> {
        let email = request.validated_email()?.to_string();

        self.subscriptions.emails.insert(email.clone());
        add_to_each(&mut self.subscriptions.categories, &request.categories, &email);
        add_to_each(
            &mut self.subscriptions.repositories,
            &request.repositories,
            &email,
        );

        info!(
            email = %email,
            categories = request.categories.len(),
            repositories = request.repositories.len(),
            "Added subscription"
        );
        self.save()
    }

    /// Removes an email from every list.
    ///
    /// Categories and repositories left without subscribers by this removal are
    /// dropped. The file is rewritten afterwards.
    ///
    /// Returns whether the email was subscribed to anything.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if saving fails.
    pub fn remove(&mut self, email: &str) -> Result<bool, SubscriptionError> {
        let email = email.trim();
        let mut present = self.subscriptions.emails.remove(email);
        present |= remove_from_each(&mut self.subscriptions.categories, email);
        present |= remove_from_each(&mut self.subscriptions.repositories, email);

        if present {
            info!(email = %email, "Removed subscription");
        } else {
            debug!(email = %email, "Email was not subscribed");
        }
        self.save()?;
        Ok(present)
    }

    /// Subscribe operation for external callers; failures become a response.
    pub fn subscribe(&mut self, request: &SubscriptionRequest) -> SubscriptionResponse {
        match self.add(request) {
            Ok(()) => SubscriptionResponse::ok(format!(
                "Successfully subscribed {}",
                request.email.trim()
            )),
            Err(e) => {
                warn!(email = %request.email, error = %e, "Subscribe failed");
                SubscriptionResponse::failed(e.to_string())
            }
        }
    }

    /// Unsubscribe operation for external callers; failures become a response.
    pub fn unsubscribe(&mut self, email: &str) -> SubscriptionResponse {
        if let Err(e) = validate_email(email) {
            return SubscriptionResponse::failed(e.to_string());
        }
        match self.remove(email) {
            Ok(true) => SubscriptionResponse::ok(format!("Successfully unsubscribed {}", email.trim())),
            Ok(false) => SubscriptionResponse::failed(format!(
                "{} is not subscribed",
                email.trim()
            )),
            Err(e) => {
                warn!(email = %email, error = %e, "Unsubscribe failed");
                SubscriptionResponse::failed(e.to_string())
            }
        }
    }

    /// Writes the whole document to disk.
    ///
    /// # Errors
    ///
    /// Returns [`SubscriptionError`] if the file can't be written.
    pub fn save(&self) -> Result<(), SubscriptionError> {
        if self.read_only {
            info!(path = %self.path.display(), "[DRY RUN] Would write subscriptions");
            return Ok(());
        }
        save_subscriptions(&self.path, &self.subscriptions)
    }
}

/// Reads a subscription document; a missing file yields an empty document.
///
/// # Errors
///
/// Returns [`SubscriptionError`] if the file can't be read or parsed.
pub fn load_subscriptions(path: &Path) -> Result<Subscriptions, SubscriptionError> {
    if !path.exists() {
        debug!(path = %path.display(), "No subscription file, starting empty");
        return Ok(Subscriptions::default());
    }

    let content = std::fs::read_to_string(path).map_err(|e| SubscriptionError::IoError {
        path: path.display().to_string(),
        source: e,
    })?;
    serde_json::from_str(&content).map_err(|e| SubscriptionError::JsonError {
        path: path.display().to_string(),
        source: e,
    })
}

/// Replaces the subscription file with `subscriptions`, pretty-printed.
///
/// # Errors
///
/// Returns [`SubscriptionError`] if the file can't be written.
pub fn save_subscriptions(
    path: &Path,
    subscriptions: &Subscriptions,
) -> Result<(), SubscriptionError> {
    let io_error = |e: std::io::Error| SubscriptionError::IoError {
        path: path.display().to_string(),
        source: e,
    };

    let json = serde_json::to_string_pretty(subscriptions).map_err(|e| {
        SubscriptionError::JsonError {
            path: path.display().to_string(),
            source: e,
        }
    })?;

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent).map_err(io_error)?;

    let mut file = tempfile::NamedTempFile::new_in(parent).map_err(io_error)?;
    file.write_all(json.as_bytes()).map_err(io_error)?;
    file.persist(path).map_err(|e| io_error(e.error))?;
    Ok(())
}

fn add_to_each(map: &mut BTreeMap<String, BTreeSet<String>>, keys: &[String], email: &str) {
    for key in keys.iter().map(|k| k.trim()).filter(|k| !k.is_empty()) {
        map.entry(key.to_string())
            .or_default()
            .insert(email.to_string());
    }
}

/// Removes `email` from every set, dropping sets it leaves empty.
fn remove_from_each(map: &mut BTreeMap<String, BTreeSet<String>>, email: &str) -> bool {
    let mut removed = false;
    map.retain(|_, emails| {
        if emails.remove(email) {
            removed = true;
            !emails.is_empty()
        } else {
            true
        }
    });
    removed
}
