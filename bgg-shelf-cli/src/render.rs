//! Terminal rendering of a gallery view.

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use bgg_shelf_core::{GameRecord, ViewOptions};
use bgg_shelf_lib::{Dashboard, rows};

const CARD_WIDTH: usize = 30;
const CARD_GAP: &str = "  ";

/// Print the view as rows of cards, `per_row` to a row.
pub(crate) fn print_gallery(view: &[&GameRecord], per_row: usize) {
    for row in rows(view, per_row) {
        let titles: Vec<String> = row
            .iter()
            .map(|r| {
                let cell = fit(&r.title, CARD_WIDTH);
                cell.if_supports_color(Stdout, |t| t.bold()).to_string()
            })
            .collect();
        log::info!("{}", titles.join(CARD_GAP));

        for (label, field) in [
            ("Year", field_year as fn(&GameRecord) -> &str),
            ("Rating", field_rating),
            ("Rank", field_rank),
        ] {
            let cells: Vec<String> = row
                .iter()
                .map(|r| fit(&format!("{label:<7}{}", or_dash(field(r))), CARD_WIDTH))
                .collect();
            log::info!("{}", cells.join(CARD_GAP));
        }

        let images: Vec<String> = row
            .iter()
            .map(|r| {
                let cell = fit(&r.image_url, CARD_WIDTH);
                cell.if_supports_color(Stdout, |t| t.dimmed()).to_string()
            })
            .collect();
        log::info!("{}", images.join(CARD_GAP));
        log::info!("");
    }
}

/// One-line description of what the view shows.
pub(crate) fn print_summary(dashboard: &Dashboard, shown: usize, options: &ViewOptions) {
    let mut line = format!("Showing {shown} of {} game(s)", dashboard.records.len());
    if let Some(term) = options.search.as_deref().filter(|s| !s.is_empty()) {
        line.push_str(&format!(" matching \"{term}\""));
    }
    if let Some(key) = options.sort {
        line.push_str(&format!(", sorted by {}", key.label()));
        if options.reverse {
            line.push_str(" (reversed)");
        }
    }
    log::info!("{}", line.if_supports_color(Stdout, |t| t.bold()));
    log::info!("");
}

/// Warn about anything that kept the dashboard from being complete.
pub(crate) fn print_gaps(dashboard: &Dashboard) {
    if dashboard.missing_id > 0 {
        log::warn!(
            "{} collection item(s) had no objectid and were skipped",
            dashboard.missing_id
        );
    }
    if dashboard.duplicates > 0 {
        log::warn!(
            "{} duplicate collection item(s) were skipped",
            dashboard.duplicates
        );
    }
    if !dashboard.failures.is_empty() {
        log::warn!(
            "{} game(s) are missing catalog details:",
            dashboard.failures.len()
        );
        for failure in &dashboard.failures {
            log::warn!("  {} ({}): {}", failure.title, failure.id, failure.message);
        }
    }
}

fn field_year(r: &GameRecord) -> &str {
    &r.year_published
}

fn field_rating(r: &GameRecord) -> &str {
    &r.average_rating
}

fn field_rank(r: &GameRecord) -> &str {
    &r.rank
}

fn or_dash(s: &str) -> &str {
    if s.is_empty() { "-" } else { s }
}

/// Truncate or pad `s` to exactly `width` characters.
fn fit(s: &str, width: usize) -> String {
    let count = s.chars().count();
    if count > width {
        let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
        out.push('\u{2026}');
        out
    } else {
        format!("{s:<width$}")
    }
}
