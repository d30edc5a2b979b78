use thiserror::Error;

use bgg_shelf_catalog::FetchError;
use bgg_shelf_lib::ShelfError;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error on the terminal
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Loading, enriching, configuring or exporting failed
    #[error(transparent)]
    Shelf(#[from] ShelfError),

    /// Catalog client could not be set up
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Catch-all for other errors
    #[error("{0}")]
    Other(String),
}

impl CliError {
    pub(crate) fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}
