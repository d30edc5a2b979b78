use std::path::PathBuf;

use bgg_shelf_catalog::FetchError;
use bgg_shelf_collection::LoadError;

/// Errors that stop a dashboard from being produced.
#[derive(Debug, thiserror::Error)]
pub enum ShelfError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Enrichment cancelled after {enriched} of {total} game(s)")]
    Cancelled { enriched: usize, total: usize },

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("Cannot write {}: {source}", path.display())]
    Export {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ShelfError {
    pub fn settings(msg: impl Into<String>) -> Self {
        Self::Settings(msg.into())
    }
}
