//! Errors that abort an update run

use std::path::PathBuf;
use thiserror::Error;

use crate::catalog::CatalogError;

/// A source failed after committing to I/O; the run stops here.
#[derive(Error, Debug)]
pub enum UpdateError {
    #[error("Failed while gathering projects for source '{key}'")]
    Gather {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to create output file {path} for source '{key}'")]
    CreateOutput {
        key: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to store catalog to {path} for source '{key}'")]
    Store {
        key: String,
        path: PathBuf,
        #[source]
        source: CatalogError,
    },

    #[error("Failed to download {url} for source '{key}'")]
    Download {
        key: String,
        url: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to write {path} for source '{key}'")]
    Write {
        key: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl UpdateError {
    /// Key of the source that aborted the run
    pub fn source_key(&self) -> &str {
        match self {
            UpdateError::Gather { key, .. }
            | UpdateError::CreateOutput { key, .. }
            | UpdateError::Store { key, .. }
            | UpdateError::Download { key, .. }
            | UpdateError::Write { key, .. } => key,
        }
    }
}
