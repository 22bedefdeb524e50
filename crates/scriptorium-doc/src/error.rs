use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}
