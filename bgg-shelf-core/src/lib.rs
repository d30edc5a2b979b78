//! Core types shared by every bgg-shelf crate.
//!
//! A collection export yields [`CollectionItem`]s. Enrichment against the
//! catalog turns each one into a [`GameRecord`], and the presentation side
//! works on borrowed views built by [`compose_view`].

pub mod record;
pub mod view;

pub use record::{
    CollectionItem, GameDetails, GameRecord, NO_RATING, NO_YEAR, NOT_RANKED, UNKNOWN_TITLE,
};
pub use view::{SortKey, SortKeyParseError, ViewOptions, compose_view, matches_search};
