//! Per-session memoization of the enriched collection.
//!
//! Enriching a collection costs one paced network request per game, so a
//! session keeps the last result and hands it out again for as long as the
//! collection file is unchanged. The cache key is the file's canonical path
//! plus a SHA-1 of its contents; any edit to the file invalidates it.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use sha1::{Digest, Sha1};

use bgg_shelf_catalog::{Catalog, EnrichEvent, Enricher, Pacer};
use bgg_shelf_collection::{Collection, LoadError, parse_collection};
use bgg_shelf_core::GameRecord;

use crate::error::ShelfError;

/// Identity of a collection file's contents.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionKey {
    path: PathBuf,
    digest: Vec<u8>,
}

impl CollectionKey {
    pub fn new(path: &Path, contents: &[u8]) -> Self {
        let path = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        Self {
            path,
            digest: Sha1::digest(contents).to_vec(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lowercase hex SHA-1 of the file contents.
    pub fn digest_hex(&self) -> String {
        self.digest.iter().map(|b| format!("{b:02x}")).collect()
    }
}

/// A lookup that kept default details; see [`bgg_shelf_catalog::FailedLookup`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupFailure {
    pub id: String,
    pub title: String,
    pub message: String,
}

/// The enriched collection plus what was left out of it.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub key: CollectionKey,
    /// In collection-file order.
    pub records: Vec<GameRecord>,
    /// Items skipped by the loader for lacking an identifier.
    pub missing_id: usize,
    /// Items skipped by the loader as duplicates.
    pub duplicates: usize,
    /// Records whose catalog lookup failed.
    pub failures: Vec<LookupFailure>,
}

impl Dashboard {
    /// Whether every item in the file made it in with catalog details.
    pub fn is_complete(&self) -> bool {
        self.missing_id == 0 && self.duplicates == 0 && self.failures.is_empty()
    }
}

/// Result of [`Session::dashboard`].
#[derive(Debug, Clone)]
pub struct DashboardLoad {
    pub dashboard: Arc<Dashboard>,
    /// True when served from the cache without touching the catalog.
    pub from_cache: bool,
}

/// Loads, enriches and caches a collection for the lifetime of the session.
pub struct Session<C, P> {
    enricher: Enricher<C, P>,
    cached: Option<Arc<Dashboard>>,
}

impl<C: Catalog, P: Pacer> Session<C, P> {
    pub fn new(enricher: Enricher<C, P>) -> Self {
        Self {
            enricher,
            cached: None,
        }
    }

    /// The last dashboard produced, if any.
    pub fn cached(&self) -> Option<&Arc<Dashboard>> {
        self.cached.as_ref()
    }

    /// Drop the cached dashboard so the next call fetches again.
    pub fn invalidate(&mut self) {
        if self.cached.take().is_some() {
            log::debug!("Session cache invalidated");
        }
    }

    /// Produce the dashboard for the collection at `path`.
    ///
    /// The file is read on every call so that edits are noticed. When its
    /// contents match the cached dashboard, that dashboard is returned and no
    /// catalog request is made. Cancelled runs are reported as
    /// [`ShelfError::Cancelled`] and never cached.
    pub fn dashboard<F>(&mut self, path: &Path, on_event: F) -> Result<DashboardLoad, ShelfError>
    where
        F: FnMut(EnrichEvent<'_>),
    {
        let contents = fs::read(path).map_err(|e| LoadError::io(path, e))?;
        let key = CollectionKey::new(path, &contents);

        if let Some(cached) = &self.cached {
            if cached.key == key {
                log::debug!("Using cached dashboard for {}", path.display());
                return Ok(DashboardLoad {
                    dashboard: Arc::clone(cached),
                    from_cache: true,
                });
            }
            log::info!("{} changed, refreshing game details", path.display());
        }

        let Collection {
            items,
            missing_id,
            duplicates,
        } = parse_collection(&contents, path)?;

        let total = items.len();
        let enrichment = self.enricher.enrich(items, on_event)?;
        if enrichment.was_cancelled() {
            return Err(ShelfError::Cancelled {
                enriched: enrichment.records.len(),
                total,
            });
        }

        let failures = enrichment
            .failures
            .into_iter()
            .map(|f| LookupFailure {
                id: f.id,
                title: f.title,
                message: f.error.detailed(),
            })
            .collect();

        let dashboard = Arc::new(Dashboard {
            key,
            records: enrichment.records,
            missing_id,
            duplicates,
            failures,
        });
        self.cached = Some(Arc::clone(&dashboard));

        Ok(DashboardLoad {
            dashboard,
            from_cache: false,
        })
    }
}
