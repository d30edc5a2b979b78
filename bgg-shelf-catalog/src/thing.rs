//! Parsing of catalog "thing" documents (`/thing?id=..&stats=1`).

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use bgg_shelf_core::{GameDetails, NO_RATING, NO_YEAR, NOT_RANKED};

use crate::error::FetchError;

/// Rank category the dashboard reports.
const RANK_CATEGORY: &str = "boardgame";

/// Extract year, average rating and rank from a thing document.
///
/// Only the first `item` under the root is read. Paths are relative to it:
///
/// - `yearpublished/@value`
/// - `statistics/ratings/average/@value`
/// - `statistics/ratings/ranks/rank[@name='boardgame']/@value`
///
/// The first element on each path wins. A missing element or attribute
/// yields the field's default rather than an error.
pub fn parse_thing(id: &str, body: &[u8]) -> Result<GameDetails, FetchError> {
    let mut xml = Reader::from_reader(body);
    xml.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut path: Vec<String> = Vec::new();
    let mut found = Found::default();

    loop {
        buf.clear();
        let event = xml.read_event_into(&mut buf).map_err(|e| {
            FetchError::malformed(id, format!("{e} (near byte {})", xml.buffer_position()))
        })?;
        match event {
            Event::Start(ref e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                found.visit(&path, &name, e, id)?;
                path.push(name);
            }
            Event::Empty(ref e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                found.visit(&path, &name, e, id)?;
            }
            Event::End(_) => {
                if path.pop().is_none() {
                    return Err(FetchError::malformed(id, "unexpected closing tag"));
                }
            }
            Event::Eof => {
                if !path.is_empty() {
                    return Err(FetchError::malformed(
                        id,
                        format!("document ends with {} unclosed element(s)", path.len()),
                    ));
                }
                break;
            }
            _ => {}
        }
    }

    if found.items == 0 {
        return Err(FetchError::MissingItem { id: id.to_string() });
    }

    Ok(GameDetails {
        year_published: found.year.unwrap_or_else(|| NO_YEAR.to_string()),
        average_rating: found.average.unwrap_or_else(|| NO_RATING.to_string()),
        rank: found.rank.unwrap_or_else(|| NOT_RANKED.to_string()),
    })
}

#[derive(Debug, Default)]
struct Found {
    /// `item` elements seen directly under the root.
    items: usize,
    year: Option<String>,
    average: Option<String>,
    rank: Option<String>,
}

impl Found {
    /// Record `name` (whose ancestors are `path`) if it is one of the fields.
    fn visit(
        &mut self,
        path: &[String],
        name: &str,
        e: &BytesStart<'_>,
        id: &str,
    ) -> Result<(), FetchError> {
        if path.len() == 1 && name == "item" {
            self.items += 1;
            return Ok(());
        }
        if self.items != 1 || path.len() < 2 || path[1] != "item" {
            return Ok(());
        }

        let relative: Vec<&str> = path[2..].iter().map(String::as_str).collect();
        match (relative.as_slice(), name) {
            ([], "yearpublished") if self.year.is_none() => {
                self.year = Some(attribute(e, b"value", id)?.unwrap_or_default());
            }
            (["statistics", "ratings"], "average") if self.average.is_none() => {
                self.average = Some(attribute(e, b"value", id)?.unwrap_or_default());
            }
            (["statistics", "ratings", "ranks"], "rank") if self.rank.is_none() => {
                if attribute(e, b"name", id)?.as_deref() == Some(RANK_CATEGORY) {
                    let value = attribute(e, b"value", id)?;
                    self.rank = Some(value.unwrap_or_else(|| NOT_RANKED.to_string()));
                }
            }
            _ => {}
        }
        Ok(())
    }
}

fn attribute(e: &BytesStart<'_>, key: &[u8], id: &str) -> Result<Option<String>, FetchError> {
    for attr in e.attributes() {
        let attr = attr.map_err(|err| FetchError::malformed(id, err.to_string()))?;
        if attr.key.as_ref() == key {
            let value = attr
                .unescape_value()
                .map_err(|err| FetchError::malformed(id, err.to_string()))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATAN: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<items termsofuse="https://boardgamegeek.com/xmlapi/termsofuse">
    <item type="boardgame" id="13">
        <thumbnail>https://cf.geekdo-images.com/thumb.jpg</thumbnail>
        <name type="primary" sortindex="1" value="CATAN"/>
        <name type="alternate" sortindex="1" value="Die Siedler von Catan"/>
        <description>Trade, build, settle.</description>
        <yearpublished value="1995"/>
        <minplayers value="3"/>
        <link type="boardgamecategory" id="1026" value="Negotiation"/>
        <statistics page="1">
            <ratings>
                <usersrated value="123456"/>
                <average value="7.1"/>
                <bayesaverage value="6.9"/>
                <ranks>
                    <rank type="family" id="5499" name="familygames" friendlyname="Family Game Rank" value="88" bayesaverage="6.9"/>
                    <rank type="subtype" id="1" name="boardgame" friendlyname="Board Game Rank" value="402" bayesaverage="6.9"/>
                </ranks>
                <stddev value="1.48"/>
            </ratings>
        </statistics>
    </item>
</items>"#;

    #[test]
    fn test_parse_full_thing() {
        let details = parse_thing("13", CATAN.as_bytes()).unwrap();
        assert_eq!(details.year_published, "1995");
        assert_eq!(details.average_rating, "7.1");
        assert_eq!(details.rank, "402");
    }

    #[test]
    fn test_no_ranks_element_is_not_ranked() {
        let xml = r#"<items><item type="boardgame" id="9999">
            <statistics page="1"><ratings><usersrated value="0"/></ratings></statistics>
        </item></items>"#;
        let details = parse_thing("9999", xml.as_bytes()).unwrap();
        assert_eq!(details, GameDetails::default());
    }

    #[test]
    fn test_only_boardgame_rank_counts() {
        let xml = r#"<items><item id="1"><statistics><ratings>
            <average value="6.5"/>
            <ranks><rank name="strategygames" value="12"/></ranks>
        </ratings></statistics></item></items>"#;
        let details = parse_thing("1", xml.as_bytes()).unwrap();
        assert_eq!(details.average_rating, "6.5");
        assert_eq!(details.rank, "Not Ranked");
    }

    #[test]
    fn test_rank_value_passes_through_unvalidated() {
        let xml = r#"<items><item id="2"><statistics><ratings><ranks>
            <rank name="boardgame" value="Not Ranked"/>
        </ranks></ratings></statistics></item></items>"#;
        assert_eq!(parse_thing("2", xml.as_bytes()).unwrap().rank, "Not Ranked");
    }

    #[test]
    fn test_missing_value_attributes_default() {
        let xml = r#"<items><item id="3"><yearpublished/><statistics><ratings>
            <average/><ranks><rank name="boardgame"/></ranks>
        </ratings></statistics></item></items>"#;
        let details = parse_thing("3", xml.as_bytes()).unwrap();
        assert_eq!(details.year_published, "");
        assert_eq!(details.average_rating, "");
        assert_eq!(details.rank, "Not Ranked");
    }

    #[test]
    fn test_elements_off_path_are_ignored() {
        let xml = r#"<items><item id="4">
            <statistics><average value="9.9"/></statistics>
            <versions><item id="5"><yearpublished value="2001"/></item></versions>
        </item></items>"#;
        let details = parse_thing("4", xml.as_bytes()).unwrap();
        assert_eq!(details, GameDetails::default());
    }

    #[test]
    fn test_only_first_item_is_read() {
        let xml = r#"<items>
            <item id="6"><yearpublished value="2017"/></item>
            <item id="7"><yearpublished value="1990"/><statistics><ratings><average value="5.0"/></ratings></statistics></item>
        </items>"#;
        let details = parse_thing("6", xml.as_bytes()).unwrap();
        assert_eq!(details.year_published, "2017");
        assert_eq!(details.average_rating, "");
    }

    #[test]
    fn test_missing_item_is_an_error() {
        let xml = r#"<items termsofuse="https://boardgamegeek.com/xmlapi/termsofuse"></items>"#;
        let err = parse_thing("404", xml.as_bytes()).unwrap_err();
        assert!(matches!(err, FetchError::MissingItem { .. }));
        assert_eq!(err.id(), Some("404"));
    }

    #[test]
    fn test_malformed_response_is_an_error() {
        let err = parse_thing("13", b"<items><item id=\"13\"><yearpublished value=\"1995\"></items>")
            .unwrap_err();
        assert!(matches!(err, FetchError::Malformed { .. }));
        assert!(err.to_string().contains("13"));
    }
}
