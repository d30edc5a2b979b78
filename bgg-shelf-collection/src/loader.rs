use std::collections::HashSet;
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use bgg_shelf_core::{CollectionItem, UNKNOWN_TITLE};

use crate::error::LoadError;

/// The items of a collection export, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collection {
    pub items: Vec<CollectionItem>,
    /// `item` elements skipped because they had no `objectid`.
    pub missing_id: usize,
    /// `item` elements skipped because their `objectid` was already seen.
    pub duplicates: usize,
}

impl Collection {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of `item` elements that did not make it into `items`.
    pub fn skipped(&self) -> usize {
        self.missing_id + self.duplicates
    }
}

/// Read and parse a collection export from disk.
pub fn load_collection(path: &Path) -> Result<Collection, LoadError> {
    let bytes = std::fs::read(path).map_err(|e| LoadError::io(path, e))?;
    parse_collection(&bytes, path)
}

/// Parse a collection export already in memory. `path` only labels errors.
///
/// Only `item` elements that are direct children of the root count. Each
/// takes its identifier from the `objectid` attribute and its title and image
/// from the first `name` and `image` child elements.
pub fn parse_collection(bytes: &[u8], path: &Path) -> Result<Collection, LoadError> {
    // Field text is trimmed once in `finish`, after text and CDATA chunks
    // are joined.
    let mut xml = Reader::from_reader(bytes);

    let mut buf = Vec::new();
    let mut collection = Collection::default();
    let mut seen: HashSet<String> = HashSet::new();

    let mut depth = 0usize;
    let mut saw_root = false;
    let mut current: Option<PendingItem> = None;
    let mut field: Option<Field> = None;

    loop {
        buf.clear();
        let event = xml.read_event_into(&mut buf).map_err(|e| {
            LoadError::malformed(path, format!("{e} (near byte {})", xml.buffer_position()))
        })?;
        match event {
            Event::Start(ref e) => {
                if depth == 0 && saw_root {
                    return Err(LoadError::malformed(path, "more than one root element"));
                }
                match depth {
                    0 => saw_root = true,
                    1 if e.name().as_ref() == b"item" => {
                        current = Some(PendingItem::from_start(e, path)?);
                    }
                    2 => {
                        if let Some(ref mut item) = current {
                            field = item.open_field(e.name().as_ref());
                        }
                    }
                    _ => {}
                }
                depth += 1;
            }
            Event::Empty(ref e) => {
                if depth == 0 && saw_root {
                    return Err(LoadError::malformed(path, "more than one root element"));
                }
                match depth {
                    0 => saw_root = true,
                    1 if e.name().as_ref() == b"item" => {
                        let item = PendingItem::from_start(e, path)?;
                        item.finish(&mut collection, &mut seen);
                    }
                    2 => {
                        if let Some(ref mut item) = current {
                            item.open_field(e.name().as_ref());
                        }
                    }
                    _ => {}
                }
            }
            Event::Text(ref e) => {
                if depth == 3 {
                    if let (Some(f), Some(item)) = (field, current.as_mut()) {
                        let text = e
                            .unescape()
                            .map_err(|err| LoadError::malformed(path, err.to_string()))?;
                        item.push_text(f, &text);
                    }
                }
            }
            Event::CData(ref e) => {
                if depth == 3 {
                    if let (Some(f), Some(item)) = (field, current.as_mut()) {
                        let text = std::str::from_utf8(e).map_err(|err| {
                            LoadError::malformed(path, format!("invalid UTF-8 in CDATA: {err}"))
                        })?;
                        item.push_text(f, text);
                    }
                }
            }
            Event::End(_) => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| LoadError::malformed(path, "unexpected closing tag"))?;
                match depth {
                    1 => {
                        if let Some(item) = current.take() {
                            item.finish(&mut collection, &mut seen);
                        }
                    }
                    2 => field = None,
                    _ => {}
                }
            }
            Event::Eof => {
                if depth > 0 {
                    return Err(LoadError::malformed(
                        path,
                        format!("document ends with {depth} unclosed element(s)"),
                    ));
                }
                if !saw_root {
                    return Err(LoadError::malformed(path, "no root element"));
                }
                break;
            }
            _ => {}
        }
    }

    if collection.skipped() > 0 {
        log::warn!(
            "Skipped {} item(s) in {} ({} without objectid, {} duplicate)",
            collection.skipped(),
            path.display(),
            collection.missing_id,
            collection.duplicates,
        );
    }
    log::debug!("Loaded {} item(s) from {}", collection.len(), path.display());

    Ok(collection)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Name,
    Image,
}

/// An `item` element whose children are still being read.
#[derive(Debug, Default)]
struct PendingItem {
    id: Option<String>,
    name: Option<String>,
    image: Option<String>,
}

impl PendingItem {
    fn from_start(e: &BytesStart<'_>, path: &Path) -> Result<Self, LoadError> {
        let mut item = Self::default();
        for attr in e.attributes() {
            let attr = attr.map_err(|err| LoadError::malformed(path, err.to_string()))?;
            if attr.key.as_ref() == b"objectid" {
                let value = attr
                    .unescape_value()
                    .map_err(|err| LoadError::malformed(path, err.to_string()))?;
                item.id = Some(value.trim().to_string());
            }
        }
        Ok(item)
    }

    /// Start collecting text for `tag` if it is the first `name`/`image`.
    fn open_field(&mut self, tag: &[u8]) -> Option<Field> {
        let (field, slot) = match tag {
            b"name" => (Field::Name, &mut self.name),
            b"image" => (Field::Image, &mut self.image),
            _ => return None,
        };
        if slot.is_some() {
            return None;
        }
        *slot = Some(String::new());
        Some(field)
    }

    fn push_text(&mut self, field: Field, text: &str) {
        let slot = match field {
            Field::Name => &mut self.name,
            Field::Image => &mut self.image,
        };
        if let Some(value) = slot {
            value.push_str(text);
        }
    }

    fn finish(self, collection: &mut Collection, seen: &mut HashSet<String>) {
        let title = self
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| UNKNOWN_TITLE.to_string());

        let id = match self.id {
            Some(id) if !id.is_empty() => id,
            _ => {
                log::warn!("Skipping collection item without objectid ({title})");
                collection.missing_id += 1;
                return;
            }
        };
        if !seen.insert(id.clone()) {
            log::warn!("Skipping duplicate collection item {id} ({title})");
            collection.duplicates += 1;
            return;
        }

        let image_url = self.image.map(|i| i.trim().to_string()).unwrap_or_default();
        collection
            .items
            .push(CollectionItem::new(id, title, image_url));
    }
}
