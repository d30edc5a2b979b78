use std::time::Duration;

use bgg_shelf_core::GameDetails;

use crate::error::FetchError;
use crate::thing::parse_thing;

/// Base URL of the BoardGameGeek XML API 2.
pub const DEFAULT_API_URL: &str = "https://boardgamegeek.com/xmlapi2";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!("bgg-shelf/", env!("CARGO_PKG_VERSION"));

/// A source of per-game catalog details.
pub trait Catalog {
    /// Look up one catalog entry by identifier, with statistics.
    fn lookup(&self, id: &str) -> Result<GameDetails, FetchError>;
}

impl<T: Catalog + ?Sized> Catalog for &T {
    fn lookup(&self, id: &str) -> Result<GameDetails, FetchError> {
        (**self).lookup(id)
    }
}

/// Blocking HTTP client for the catalog's `thing` endpoint.
///
/// Performs no pacing of its own; wrap it in an [`Enricher`](crate::Enricher)
/// with a [`Pacer`](crate::Pacer) for batch use.
pub struct BggClient {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl BggClient {
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        Self::from_builder(http_builder(), base_url)
    }

    fn from_builder(
        builder: reqwest::blocking::ClientBuilder,
        base_url: &str,
    ) -> Result<Self, FetchError> {
        let http = builder.build().map_err(FetchError::Client)?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn thing_url(&self) -> String {
        format!("{}/thing", self.base_url)
    }
}

fn http_builder() -> reqwest::blocking::ClientBuilder {
    reqwest::blocking::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(USER_AGENT)
}

impl Catalog for BggClient {
    fn lookup(&self, id: &str) -> Result<GameDetails, FetchError> {
        let url = self.thing_url();
        log::debug!("GET {url}?id={id}&stats=1");

        let resp = self
            .http
            .get(&url)
            .query(&[("id", id), ("stats", "1")])
            .send()
            .map_err(|source| FetchError::Http {
                id: id.to_string(),
                source,
            })?;

        let status = resp.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(FetchError::RateLimited { id: id.to_string() });
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                id: id.to_string(),
                status: status.as_u16(),
            });
        }

        let body = resp.bytes().map_err(|source| FetchError::Http {
            id: id.to_string(),
            source,
        })?;
        parse_thing(id, &body)
    }
}
