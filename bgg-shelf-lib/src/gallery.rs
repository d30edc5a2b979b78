//! Gallery layout helpers shared by the terminal and HTML renderers.

use bgg_shelf_core::GameRecord;

pub const MIN_CARDS_PER_ROW: usize = 2;
pub const MAX_CARDS_PER_ROW: usize = 6;
pub const DEFAULT_CARDS_PER_ROW: usize = 4;

pub fn clamp_cards_per_row(n: usize) -> usize {
    n.clamp(MIN_CARDS_PER_ROW, MAX_CARDS_PER_ROW)
}

/// Split a view into gallery rows of at most `cards_per_row` (clamped) records.
pub fn rows<'v, 'r>(
    view: &'v [&'r GameRecord],
    cards_per_row: usize,
) -> impl Iterator<Item = &'v [&'r GameRecord]> {
    view.chunks(clamp_cards_per_row(cards_per_row))
}

/// Two-line card caption: the title, then year, rating and rank.
pub fn caption(record: &GameRecord) -> String {
    format!(
        "{}\n\u{1F4C5} {}  \u{2B50} {}  \u{1F3C6} {}",
        record.title, record.year_published, record.average_rating, record.rank
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use bgg_shelf_core::{CollectionItem, GameDetails};

    fn record(id: &str) -> GameRecord {
        GameRecord::unenriched(CollectionItem::new(id, format!("Game {id}"), ""))
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp_cards_per_row(0), 2);
        assert_eq!(clamp_cards_per_row(4), 4);
        assert_eq!(clamp_cards_per_row(9), 6);
    }

    #[test]
    fn test_rows_chunk_view() {
        let records: Vec<GameRecord> = (0..7).map(|i| record(&i.to_string())).collect();
        let view: Vec<&GameRecord> = records.iter().collect();
        let sizes: Vec<usize> = rows(&view, 3).map(|row| row.len()).collect();
        assert_eq!(sizes, vec![3, 3, 1]);
        assert_eq!(rows(&view, 1).count(), 4);
        let empty: Vec<&GameRecord> = Vec::new();
        assert_eq!(rows(&empty, 4).count(), 0);
    }

    #[test]
    fn test_caption() {
        let record = GameRecord::enriched(
            CollectionItem::new("13", "Catan", ""),
            GameDetails {
                year_published: "1995".into(),
                average_rating: "7.1".into(),
                rank: "402".into(),
            },
        );
        assert_eq!(caption(&record), "Catan\n📅 1995  ⭐ 7.1  🏆 402");
    }
}
