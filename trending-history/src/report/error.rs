//! Report generation error types.

use crate::templates::TemplateError;
use thiserror::Error;

/// Errors that can occur while writing the report site.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Failed to write an output file or copy an asset.
    #[error("Failed to write '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A page failed to render.
    #[error(transparent)]
    Template(#[from] TemplateError),
}
