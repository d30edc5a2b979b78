//! Shared functionality for bgg-shelf frontends.
//!
//! Ties the collection loader and the catalog enricher together behind a
//! per-session cache, and provides the settings, layout and export helpers
//! the CLI builds on.

pub mod error;
pub mod export;
pub mod gallery;
pub mod session;
pub mod settings;

pub use error::ShelfError;
pub use export::{ExportFormat, export_to_path, write_csv, write_html, write_json};
pub use gallery::{
    DEFAULT_CARDS_PER_ROW, MAX_CARDS_PER_ROW, MIN_CARDS_PER_ROW, caption, clamp_cards_per_row, rows,
};
pub use session::{CollectionKey, Dashboard, DashboardLoad, LookupFailure, Session};
pub use settings::{Overrides, Setting, SettingSource, Settings, SettingsFile, settings_path};

// Re-export commonly used types from dependencies
pub use bgg_shelf_catalog::{
    BggClient, CancelToken, Catalog, EnrichEvent, Enricher, FailurePolicy, FetchError,
    FixedInterval, Pacer, Unpaced, error_chain,
};
pub use bgg_shelf_collection::LoadError;
pub use bgg_shelf_core::{GameRecord, SortKey, ViewOptions, compose_view};
