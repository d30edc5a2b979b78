use serde::Serialize;

/// Title used when the collection export has no name for an item.
pub const UNKNOWN_TITLE: &str = "Unknown";

/// Rank used when the catalog has no ranked "boardgame" entry.
pub const NOT_RANKED: &str = "Not Ranked";

/// Year used when the catalog entry has no `yearpublished`.
pub const NO_YEAR: &str = "";

/// Rating used when the catalog entry has no `statistics/ratings/average`.
pub const NO_RATING: &str = "";

/// One entry of the collection export, before catalog enrichment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionItem {
    /// Catalog identifier (the `objectid` attribute), never empty.
    pub id: String,
    pub title: String,
    /// Externally hosted image, or an empty string.
    pub image_url: String,
}

impl CollectionItem {
    pub fn new(id: impl Into<String>, title: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            image_url: image_url.into(),
        }
    }
}

/// Statistics reported by the catalog for a single entry.
///
/// Values are kept as the catalog sent them; nothing is validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameDetails {
    pub year_published: String,
    pub average_rating: String,
    pub rank: String,
}

impl Default for GameDetails {
    fn default() -> Self {
        Self {
            year_published: NO_YEAR.to_string(),
            average_rating: NO_RATING.to_string(),
            rank: NOT_RANKED.to_string(),
        }
    }
}

/// A collection entry merged with its catalog details.
///
/// Built once per item during enrichment and never modified afterwards.
/// The serialized field names are the column headers used by exports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameRecord {
    #[serde(rename = "Game ID")]
    pub id: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Image URL")]
    pub image_url: String,
    #[serde(rename = "Year Published")]
    pub year_published: String,
    #[serde(rename = "Average Rating")]
    pub average_rating: String,
    #[serde(rename = "BGG Rank")]
    pub rank: String,
}

impl GameRecord {
    /// Column headers, in serialization order.
    pub const COLUMNS: [&'static str; 6] = [
        "Game ID",
        "Title",
        "Image URL",
        "Year Published",
        "Average Rating",
        "BGG Rank",
    ];

    pub fn enriched(item: CollectionItem, details: GameDetails) -> Self {
        Self {
            id: item.id,
            title: item.title,
            image_url: item.image_url,
            year_published: details.year_published,
            average_rating: details.average_rating,
            rank: details.rank,
        }
    }

    /// A record whose catalog lookup did not happen or failed: all
    /// enrichment fields hold their defaults.
    pub fn unenriched(item: CollectionItem) -> Self {
        Self::enriched(item, GameDetails::default())
    }

    pub fn has_image(&self) -> bool {
        !self.image_url.is_empty()
    }

    pub fn is_ranked(&self) -> bool {
        self.rank != NOT_RANKED && !self.rank.is_empty()
    }
}
