//! Filtered and sorted projections of an enriched collection.
//!
//! A view borrows the records it shows. Building one never touches the
//! underlying collection, so dropping the filter and sort always brings back
//! the source order.

use std::cmp::Ordering;

use crate::record::GameRecord;

/// Field a view is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    Title,
    Year,
    Rating,
    Rank,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [SortKey::Title, SortKey::Year, SortKey::Rating, SortKey::Rank];

    /// Short lowercase name, as accepted on the command line.
    pub fn short_name(&self) -> &'static str {
        match self {
            SortKey::Title => "title",
            SortKey::Year => "year",
            SortKey::Rating => "rating",
            SortKey::Rank => "rank",
        }
    }

    /// Column header of the field this key sorts by.
    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Title => "Title",
            SortKey::Year => "Year Published",
            SortKey::Rating => "Average Rating",
            SortKey::Rank => "BGG Rank",
        }
    }

    fn aliases(&self) -> &'static [&'static str] {
        match self {
            SortKey::Title => &["name"],
            SortKey::Year => &["year-published", "yearpublished", "published"],
            SortKey::Rating => &["average", "avg", "average-rating"],
            SortKey::Rank => &["bgg-rank", "ranking"],
        }
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.short_name())
    }
}

/// Error returned when a string names no known sort key.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown sort key '{0}' (expected one of: title, year, rating, rank)")]
pub struct SortKeyParseError(pub String);

impl std::str::FromStr for SortKey {
    type Err = SortKeyParseError;

    /// Parse a sort key from its short name or an alias (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        for key in SortKey::ALL {
            if key.short_name() == lower || key.aliases().contains(&lower.as_str()) {
                return Ok(key);
            }
        }
        Err(SortKeyParseError(s.to_string()))
    }
}

/// Parameters of a view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewOptions {
    /// Case-insensitive title substring. `None` or empty keeps everything.
    pub search: Option<String>,
    /// `None` keeps the collection order.
    pub sort: Option<SortKey>,
    /// Flip the order of sortable values. Entries without a usable value
    /// stay at the end either way.
    pub reverse: bool,
}

impl ViewOptions {
    pub fn sorted_by(key: SortKey) -> Self {
        Self {
            sort: Some(key),
            ..Self::default()
        }
    }
}

/// Whether `title` contains `term`, ignoring case. An empty term matches.
pub fn matches_search(title: &str, term: &str) -> bool {
    term.is_empty() || title.to_lowercase().contains(&term.to_lowercase())
}

/// Build a view over `records`: filter by title, then stable-sort.
pub fn compose_view<'a>(records: &'a [GameRecord], options: &ViewOptions) -> Vec<&'a GameRecord> {
    let term = options.search.as_deref().unwrap_or("");
    let mut view: Vec<&GameRecord> = records
        .iter()
        .filter(|r| matches_search(&r.title, term))
        .collect();

    if let Some(key) = options.sort {
        view.sort_by(|a, b| compare(a, b, key, options.reverse));
    }
    view
}

fn compare(a: &GameRecord, b: &GameRecord, key: SortKey, reverse: bool) -> Ordering {
    match key {
        SortKey::Title => directed(a.title.to_lowercase().cmp(&b.title.to_lowercase()), reverse),
        SortKey::Year => compare_numeric_text(&a.year_published, &b.year_published, reverse),
        SortKey::Rating => compare_numeric_text(&a.average_rating, &b.average_rating, reverse),
        SortKey::Rank => compare_numeric_text(&a.rank, &b.rank, reverse),
    }
}

/// Numbers before everything else; sentinels ("Not Ranked", "") fall back to
/// plain string order after them.
fn compare_numeric_text(a: &str, b: &str, reverse: bool) -> Ordering {
    match (parse_number(a), parse_number(b)) {
        (Some(x), Some(y)) => directed(x.total_cmp(&y), reverse),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn directed(ordering: Ordering, reverse: bool) -> Ordering {
    if reverse { ordering.reverse() } else { ordering }
}
