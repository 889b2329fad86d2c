//! Application configuration.
//!
//! Settings are read from an optional `trending.toml`:
//!
//! ```toml
//! data-dir = "data/trending_data"
//! subscriptions-file = "data/subscriptions.json"
//! output-dir = "docs"
//! static-dir = "web/static"
//! site-url = "https://example.github.io/trending/"
//! trending-url = "https://github.com/trending"
//! issues-repository = "owner/repo"
//! ```
//!
//! Every key is optional. Relative paths are resolved against the working
//! directory.

mod error;

pub use error::ConfigError;

use crate::issues::IssueRepository;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use url::Url;

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "trending.toml";

/// Keys as written in the TOML file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields, default)]
struct RawConfig {
    data_dir: PathBuf,
    subscriptions_file: PathBuf,
    output_dir: PathBuf,
    static_dir: PathBuf,
    site_url: String,
    trending_url: String,
    issues_repository: Option<String>,
}

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data/trending_data"),
            subscriptions_file: PathBuf::from("data/subscriptions.json"),
            output_dir: PathBuf::from("docs"),
            static_dir: PathBuf::from("web/static"),
            site_url: "http://localhost:8000/".to_string(),
            trending_url: crate::fetcher::DEFAULT_TRENDING_URL.to_string(),
            issues_repository: None,
        }
    }
}

/// Validated application settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Root of the snapshot archive.
    pub data_dir: PathBuf,

    /// Subscription JSON file.
    pub subscriptions_file: PathBuf,

    /// Directory receiving the generated report.
    pub output_dir: PathBuf,

    /// Static assets copied into the report.
    pub static_dir: PathBuf,

    /// Public URL of the generated site.
    pub site_url: Url,

    /// Page the fetcher downloads.
    pub trending_url: Url,

    /// Repository whose issues feed subscription intake.
    pub issues_repository: Option<IssueRepository>,
}

impl AppConfig {
    /// Loads settings from `path`. A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file can't be read, contains unknown keys,
    /// or holds invalid values.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Self::parse("", path);
        }

        info!(path = %path.display(), "Loading configuration");
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::parse(&content, path)
    }

    /// Parses settings from TOML text; `path` is used in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on syntax errors, unknown keys or invalid values.
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(content).map_err(|e| ConfigError::TomlError {
            path: path.display().to_string(),
            source: e,
        })?;
        validate(raw, path)
    }
}

fn validate(raw: RawConfig, path: &Path) -> Result<AppConfig, ConfigError> {
    let path_str = path.display().to_string();
    let invalid = |message: String| ConfigError::ValidationError {
        path: path_str.clone(),
        message,
    };

    let site_url = parse_http_url("site-url", &raw.site_url).map_err(&invalid)?;
    let trending_url = parse_http_url("trending-url", &raw.trending_url).map_err(&invalid)?;

    let issues_repository = raw
        .issues_repository
        .as_deref()
        .map(IssueRepository::parse)
        .transpose()
        .map_err(|e| invalid(e.to_string()))?;

    for (key, value) in [
        ("data-dir", &raw.data_dir),
        ("subscriptions-file", &raw.subscriptions_file),
        ("output-dir", &raw.output_dir),
    ] {
        if value.as_os_str().is_empty() {
            return Err(invalid(format!("{key} must not be empty")));
        }
    }

    Ok(AppConfig {
        data_dir: raw.data_dir,
        subscriptions_file: raw.subscriptions_file,
        output_dir: raw.output_dir,
        static_dir: raw.static_dir,
        site_url,
        trending_url,
        issues_repository,
    })
}

fn parse_http_url(key: &str, value: &str) -> Result<Url, String> {
    let url = Url::parse(value).map_err(|e| format!("{key} is not a valid URL ({e}): {value}"))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("{key} must be an http(s) URL: {value}"));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn missing_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let config = AppConfig::load(&temp.path().join(DEFAULT_CONFIG_FILE)).unwrap();

        assert_eq!(config.data_dir, PathBuf::from("data/trending_data"));
        assert_eq!(config.subscriptions_file, PathBuf::from("data/subscriptions.json"));
        assert_eq!(config.output_dir, PathBuf::from("docs"));
        assert_eq!(config.static_dir, PathBuf::from("web/static"));
        assert_eq!(config.site_url.as_str(), "http://localhost:8000/");
        assert_eq!(config.trending_url.as_str(), "https://github.com/trending");
        assert_eq!(config.issues_repository, None);
    }

    #[test]
    fn reads_kebab_case_keys() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(DEFAULT_CONFIG_FILE);
        fs::write(
            &path,
            r#"
data-dir = "archive"
site-url = "https://octo.github.io/trending/"
issues-repository = "octo/trending"
"#,
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();

        assert_eq!(config.data_dir, PathBuf::from("archive"));
        assert_eq!(config.site_url.as_str(), "https://octo.github.io/trending/");
        assert_eq!(
            config.issues_repository.unwrap().full_name(),
            "octo/trending"
        );
        assert_eq!(config.output_dir, PathBuf::from("docs"));
    }

    #[test]
    fn rejects_unknown_keys() {
        let result = AppConfig::parse("data_dir = \"x\"", Path::new("trending.toml"));
        assert!(matches!(result, Err(ConfigError::TomlError { .. })));
    }

    #[test]
    fn rejects_invalid_urls() {
        let result = AppConfig::parse("site-url = \"not a url\"", Path::new("trending.toml"));
        assert!(matches!(result, Err(ConfigError::ValidationError { .. })));

        let result = AppConfig::parse(
            "trending-url = \"ftp://github.com/trending\"",
            Path::new("trending.toml"),
        );
        assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
    }

    #[test]
    fn rejects_malformed_repository() {
        let result = AppConfig::parse("issues-repository = \"octo\"", Path::new("trending.toml"));
        assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
    }
}
