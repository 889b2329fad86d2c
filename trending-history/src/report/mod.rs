//! Static report site generation.
//!
//! Writes `index.html` and `unsubscribe.html` into the output directory and
//! mirrors the static asset directory into `<output>/static`.

mod error;

pub use error::ReportError;

use crate::history::Analysis;
use crate::issues::IssueKind;
use crate::templates::views::{IndexView, UnsubscribeView};
use crate::templates::{SiteLinks, TemplateRenderer};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Where and how the report is written.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Directory receiving the generated pages.
    pub output_dir: PathBuf,

    /// Asset directory copied to `<output_dir>/static`, if it exists.
    pub static_dir: PathBuf,

    /// Site root used for absolute links.
    pub links: SiteLinks,

    /// Repository ("owner/repo") accepting subscription issues, if any.
    pub issues_repository: Option<String>,
}

/// Files produced by [`generate_report`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOutput {
    /// Path of the main page.
    pub index: PathBuf,

    /// Path of the unsubscribe page.
    pub unsubscribe: PathBuf,

    /// Whether static assets were copied.
    pub static_copied: bool,
}

/// Renders the report pages for `analysis`.
///
/// # Errors
///
/// Returns [`ReportError`] if rendering fails or files can't be written.
pub fn generate_report(
    analysis: &Analysis,
    today: NaiveDate,
    renderer: &TemplateRenderer,
    options: &ReportOptions,
) -> Result<ReportOutput, ReportError> {
    create_dir(&options.output_dir)?;

    let static_copied = if options.static_dir.is_dir() {
        let target = options.output_dir.join("static");
        if target.exists() {
            std::fs::remove_dir_all(&target).map_err(|e| io_error(&target, e))?;
        }
        copy_dir_recursive(&options.static_dir, &target)?;
        info!(path = %target.display(), "Copied static files");
        true
    } else {
        debug!(path = %options.static_dir.display(), "No static directory, skipping copy");
        false
    };

    let site_url = options.links.home().to_string();
    let new_issue_url = options
        .issues_repository
        .as_deref()
        .map(|repo| format!("https://github.com/{repo}/issues/new"));
    let subscribe_url = new_issue_url
        .as_deref()
        .map(|url| format!("{url}?labels={}", IssueKind::Subscribe.label()))
        .unwrap_or_default();

    let index = options.output_dir.join("index.html");
    let html = renderer.render_index(&IndexView::new(
        analysis,
        today,
        &site_url,
        &subscribe_url,
    ))?;
    write(&index, &html)?;
    info!(path = %index.display(), "Generated report page");

    let unsubscribe = options.output_dir.join("unsubscribe.html");
    let html = renderer.render_unsubscribe(&UnsubscribeView {
        site_url,
        issues_url: new_issue_url.unwrap_or_default(),
    })?;
    write(&unsubscribe, &html)?;
    info!(path = %unsubscribe.display(), "Generated unsubscribe page");

    Ok(ReportOutput {
        index,
        unsubscribe,
        static_copied,
    })
}

/// Recursively copies `source` into `target`.
fn copy_dir_recursive(source: &Path, target: &Path) -> Result<(), ReportError> {
    create_dir(target)?;

    let entries = std::fs::read_dir(source).map_err(|e| io_error(source, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| io_error(source, e))?;
        let from = entry.path();
        let to = target.join(entry.file_name());

        if from.is_dir() {
            copy_dir_recursive(&from, &to)?;
        } else {
            std::fs::copy(&from, &to).map_err(|e| io_error(&from, e))?;
        }
    }

    Ok(())
}

fn create_dir(path: &Path) -> Result<(), ReportError> {
    std::fs::create_dir_all(path).map_err(|e| io_error(path, e))
}

fn write(path: &Path, contents: &str) -> Result<(), ReportError> {
    std::fs::write(path, contents).map_err(|e| io_error(path, e))
}

fn io_error(path: &Path, source: std::io::Error) -> ReportError {
    ReportError::IoError {
        path: path.display().to_string(),
        source,
    }
}
