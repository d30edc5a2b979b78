//! Writing a view to CSV, JSON or a standalone HTML gallery.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use bgg_shelf_core::GameRecord;

use crate::error::ShelfError;
use crate::gallery::{caption, clamp_cards_per_row, rows};

/// Output format for `export`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
    Html,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Html => "html",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = ShelfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            "html" | "htm" => Ok(ExportFormat::Html),
            _ => Err(ShelfError::settings(format!(
                "unknown export format '{s}' (expected csv, json or html)"
            ))),
        }
    }
}

/// Write `view` to `path` in `format`.
pub fn export_to_path(
    format: ExportFormat,
    view: &[&GameRecord],
    cards_per_row: usize,
    path: &Path,
) -> Result<(), ShelfError> {
    let to_export_error = |source| ShelfError::Export {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(to_export_error)?;
    let mut out = BufWriter::new(file);

    match format {
        ExportFormat::Csv => write_csv(view, &mut out)?,
        ExportFormat::Json => write_json(view, &mut out)?,
        ExportFormat::Html => write_html(view, cards_per_row, &mut out).map_err(to_export_error)?,
    }
    out.flush().map_err(to_export_error)?;

    log::debug!("Exported {} record(s) as {format} to {}", view.len(), path.display());
    Ok(())
}

/// CSV with a header row, even when the view is empty.
pub fn write_csv<W: Write>(view: &[&GameRecord], out: W) -> Result<(), ShelfError> {
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(out);
    writer.write_record(GameRecord::COLUMNS)?;
    for record in view {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Pretty-printed JSON array of records.
pub fn write_json<W: Write>(view: &[&GameRecord], mut out: W) -> Result<(), ShelfError> {
    serde_json::to_writer_pretty(&mut out, view)?;
    writeln!(out)?;
    Ok(())
}

/// A self-contained HTML page laying the view out as rows of image cards.
pub fn write_html<W: Write>(
    view: &[&GameRecord],
    cards_per_row: usize,
    mut out: W,
) -> std::io::Result<()> {
    let per_row = clamp_cards_per_row(cards_per_row);
    let generated = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");

    writeln!(out, "<!DOCTYPE html>")?;
    writeln!(out, "<html lang=\"en\">")?;
    writeln!(out, "<head>")?;
    writeln!(out, "<meta charset=\"utf-8\">")?;
    writeln!(out, "<title>My Board Game Collection</title>")?;
    writeln!(out, "<style>")?;
    writeln!(out, "body {{ font-family: sans-serif; margin: 2em; }}")?;
    writeln!(
        out,
        ".row {{ display: grid; grid-template-columns: repeat({per_row}, 1fr); gap: 1em; margin-bottom: 1em; }}"
    )?;
    writeln!(out, ".card img {{ width: 100%; }}")?;
    writeln!(out, ".card figcaption {{ white-space: pre-line; }}")?;
    writeln!(out, "</style>")?;
    writeln!(out, "</head>")?;
    writeln!(out, "<body>")?;
    writeln!(out, "<h1>&#x1F3B2; My Board Game Collection</h1>")?;
    writeln!(out, "<p>{} game(s), generated {generated}.</p>", view.len())?;

    for row in rows(view, per_row) {
        writeln!(out, "<div class=\"row\">")?;
        for record in row {
            writeln!(out, "<figure class=\"card\">")?;
            if record.has_image() {
                writeln!(
                    out,
                    "<img src=\"{}\" alt=\"{}\" loading=\"lazy\">",
                    escape_html(&record.image_url),
                    escape_html(&record.title)
                )?;
            }
            writeln!(
                out,
                "<figcaption>{}</figcaption>",
                escape_html(&caption(record))
            )?;
            writeln!(out, "</figure>")?;
        }
        writeln!(out, "</div>")?;
    }

    writeln!(out, "</body>")?;
    writeln!(out, "</html>")?;
    Ok(())
}

fn escape_html(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use bgg_shelf_core::{CollectionItem, GameDetails};

    fn sample() -> Vec<GameRecord> {
        vec![
            GameRecord::enriched(
                CollectionItem::new("13", "Catan", ""),
                GameDetails {
                    year_published: "1995".into(),
                    average_rating: "7.1".into(),
                    rank: "402".into(),
                },
            ),
            GameRecord::unenriched(CollectionItem::new("9999", "Unknown", "http://x/img.png")),
        ]
    }

    #[test]
    fn test_csv_has_header_and_rows() {
        let records = sample();
        let view: Vec<&GameRecord> = records.iter().collect();
        let mut out = Vec::new();
        write_csv(&view, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Game ID,Title,Image URL,Year Published,Average Rating,BGG Rank",
                "13,Catan,,1995,7.1,402",
                "9999,Unknown,http://x/img.png,,,Not Ranked",
            ]
        );
    }

    #[test]
    fn test_csv_empty_view_still_has_header() {
        let mut out = Vec::new();
        write_csv(&[], &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap().trim_end(),
            "Game ID,Title,Image URL,Year Published,Average Rating,BGG Rank"
        );
    }

    #[test]
    fn test_json_uses_column_names() {
        let records = sample();
        let view: Vec<&GameRecord> = records.iter().collect();
        let mut out = Vec::new();
        write_json(&view, &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value[0]["Game ID"], "13");
        assert_eq!(value[0]["BGG Rank"], "402");
        assert_eq!(value[1]["Title"], "Unknown");
        assert_eq!(value[1]["Year Published"], "");
    }

    #[test]
    fn test_html_rows_and_escaping() {
        let mut records = sample();
        records.push(GameRecord::unenriched(CollectionItem::new(
            "1",
            "<script>alert(1)</script>",
            "",
        )));
        let view: Vec<&GameRecord> = records.iter().collect();
        let mut out = Vec::new();
        write_html(&view, 2, &mut out).unwrap();
        let html = String::from_utf8(out).unwrap();

        assert_eq!(html.matches("<div class=\"row\">").count(), 2);
        assert_eq!(html.matches("<figure class=\"card\">").count(), 3);
        assert_eq!(html.matches("<img ").count(), 1);
        assert!(html.contains("src=\"http://x/img.png\""));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains("<figcaption>Catan\n📅 1995  ⭐ 7.1  🏆 402</figcaption>"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("htm".parse::<ExportFormat>().unwrap(), ExportFormat::Html);
        assert!("xlsx".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_export_to_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("games.json");
        let records = sample();
        let view: Vec<&GameRecord> = records.iter().collect();
        export_to_path(ExportFormat::Json, &view, 4, &path).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);
    }
}
