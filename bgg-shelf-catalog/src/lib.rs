pub mod client;
pub mod enrich;
pub mod error;
pub mod pacing;
pub mod thing;

pub use client::{BggClient, Catalog, DEFAULT_API_URL};
pub use enrich::{CancelToken, EnrichEvent, Enricher, Enrichment, FailedLookup, FailurePolicy};
pub use error::{FetchError, error_chain};
pub use pacing::{DEFAULT_REQUEST_DELAY, FixedInterval, Pacer, Unpaced};
pub use thing::parse_thing;
