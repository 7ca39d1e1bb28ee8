//! Error types for the sizer.
//!
//! Only inventory and configuration problems are errors. Empty clusters are
//! valid input and show up as undefined values in the summary instead.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for sizer operations.
pub type Result<T> = std::result::Result<T, SizerError>;

#[derive(Error, Debug)]
pub enum SizerError {
    #[error("Cluster not found in inventory: {cluster}")]
    ClusterNotFound { cluster: String },

    #[error("Cluster name {cluster} matches {matches} clusters in inventory")]
    AmbiguousCluster { cluster: String, matches: usize },

    #[error("Failed to read inventory {path:?}: {source}")]
    InventoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse inventory {path:?}: {source}")]
    InventoryParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to render summary: {0}")]
    Render(#[from] serde_json::Error),

    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}
