//! Snapshot store error types.

use thiserror::Error;

/// Errors that can occur while reading or writing snapshots.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Failed to read or write a file or directory.
    #[error("Failed to access '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse or serialize snapshot JSON.
    #[error("Invalid snapshot JSON in '{path}': {source}")]
    JsonError {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// The snapshot root directory does not exist.
    #[error("Snapshot directory not found: {path}")]
    MissingRoot { path: String },

    /// No snapshot exists for the requested date.
    #[error("No snapshot for {date} at '{path}'")]
    MissingSnapshot { date: String, path: String },
}
