//! Batch enrichment of collection items with catalog details.
//!
//! One request is in flight at a time and every request passes through the
//! [`Pacer`] first. Records come out in the same order the items went in.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use bgg_shelf_core::{CollectionItem, GameRecord};

use crate::client::Catalog;
use crate::error::FetchError;
use crate::pacing::Pacer;

/// What happens when a single lookup fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop the batch and return the error.
    #[default]
    Abort,
    /// Keep the record with default details, note the failure, carry on.
    Isolate,
}

/// Shared flag that stops an enrichment run before its next request.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Progress notifications emitted during [`Enricher::enrich`].
#[derive(Debug)]
pub enum EnrichEvent<'a> {
    Started { total: usize },
    Fetching { index: usize, total: usize, item: &'a CollectionItem },
    Enriched { index: usize, record: &'a GameRecord },
    Failed { index: usize, item: &'a CollectionItem, error: &'a FetchError },
    Cancelled { completed: usize },
}

/// A lookup that failed under [`FailurePolicy::Isolate`].
#[derive(Debug)]
pub struct FailedLookup {
    /// Position of the record in the input (and output) sequence.
    pub index: usize,
    pub id: String,
    pub title: String,
    pub error: FetchError,
}

/// Outcome of an enrichment run.
#[derive(Debug, Default)]
pub struct Enrichment {
    /// One record per processed item, in input order.
    pub records: Vec<GameRecord>,
    /// Records that kept default details because their lookup failed.
    pub failures: Vec<FailedLookup>,
    /// Items never looked up because the run was cancelled.
    pub remaining: Vec<CollectionItem>,
}

impl Enrichment {
    pub fn was_cancelled(&self) -> bool {
        !self.remaining.is_empty()
    }

    /// Every item was looked up successfully.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && self.remaining.is_empty()
    }
}

/// Looks up each collection item in a [`Catalog`], one paced request at a time.
pub struct Enricher<C, P> {
    catalog: C,
    pacer: P,
    policy: FailurePolicy,
    cancel: CancelToken,
}

impl<C: Catalog, P: Pacer> Enricher<C, P> {
    pub fn new(catalog: C, pacer: P) -> Self {
        Self {
            catalog,
            pacer,
            policy: FailurePolicy::default(),
            cancel: CancelToken::default(),
        }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Enrich `items` in order.
    ///
    /// Under [`FailurePolicy::Abort`] the first failed lookup is returned as
    /// the error and no records are produced. Once the cancel token is set,
    /// no further requests are sent and the unprocessed items are handed back
    /// in [`Enrichment::remaining`].
    pub fn enrich<F>(
        &mut self,
        items: Vec<CollectionItem>,
        mut on_event: F,
    ) -> Result<Enrichment, FetchError>
    where
        F: FnMut(EnrichEvent<'_>),
    {
        let total = items.len();
        on_event(EnrichEvent::Started { total });

        let mut out = Enrichment {
            records: Vec::with_capacity(total),
            ..Default::default()
        };

        let mut queue = items.into_iter().enumerate();
        while let Some((index, item)) = queue.next() {
            if self.cancel.is_cancelled() {
                log::info!("Enrichment cancelled after {index} of {total} item(s)");
                out.remaining.push(item);
                out.remaining.extend(queue.by_ref().map(|(_, item)| item));
                on_event(EnrichEvent::Cancelled { completed: index });
                break;
            }

            on_event(EnrichEvent::Fetching {
                index,
                total,
                item: &item,
            });
            self.pacer.wait_turn();

            match self.catalog.lookup(&item.id) {
                Ok(details) => {
                    let record = GameRecord::enriched(item, details);
                    on_event(EnrichEvent::Enriched {
                        index,
                        record: &record,
                    });
                    out.records.push(record);
                }
                Err(error) => match self.policy {
                    FailurePolicy::Abort => {
                        log::debug!("Aborting enrichment at item {index}: {}", error.detailed());
                        return Err(error);
                    }
                    FailurePolicy::Isolate => {
                        log::warn!(
                            "{}; keeping defaults for '{}'",
                            error.detailed(),
                            item.title
                        );
                        on_event(EnrichEvent::Failed {
                            index,
                            item: &item,
                            error: &error,
                        });
                        out.failures.push(FailedLookup {
                            index,
                            id: item.id.clone(),
                            title: item.title.clone(),
                            error,
                        });
                        out.records.push(GameRecord::unenriched(item));
                    }
                },
            }
        }

        log::debug!(
            "Enriched {} record(s), {} failure(s), {} not fetched",
            out.records.len() - out.failures.len(),
            out.failures.len(),
            out.remaining.len(),
        );
        Ok(out)
    }
}
