use std::cell::RefCell;
use std::collections::HashMap;
use std::time::{Duration, Instant};

use bgg_shelf_catalog::*;
use bgg_shelf_core::{CollectionItem, GameDetails};

const CATAN_THING: &str = r#"<items><item type="boardgame" id="13">
    <yearpublished value="1995"/>
    <statistics page="1"><ratings>
        <average value="7.1"/>
        <ranks><rank type="subtype" id="1" name="boardgame" value="402"/></ranks>
    </ratings></statistics>
</item></items>"#;

const UNRANKED_THING: &str = r#"<items><item type="boardgame" id="9999">
    <statistics page="1"><ratings><usersrated value="0"/></ratings></statistics>
</item></items>"#;

/// Serves canned thing documents and records every lookup.
#[derive(Default)]
struct FakeCatalog {
    documents: HashMap<String, String>,
    calls: RefCell<Vec<String>>,
}

impl FakeCatalog {
    fn with(mut self, id: &str, body: &str) -> Self {
        self.documents.insert(id.to_string(), body.to_string());
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl Catalog for FakeCatalog {
    fn lookup(&self, id: &str) -> Result<GameDetails, FetchError> {
        self.calls.borrow_mut().push(id.to_string());
        match self.documents.get(id) {
            Some(body) => parse_thing(id, body.as_bytes()),
            None => Err(FetchError::Status {
                id: id.to_string(),
                status: 404,
            }),
        }
    }
}

fn items() -> Vec<CollectionItem> {
    vec![
        CollectionItem::new("13", "Catan", ""),
        CollectionItem::new("9999", "Unknown", "http://x/img.png"),
    ]
}

fn catalog() -> FakeCatalog {
    FakeCatalog::default()
        .with("13", CATAN_THING)
        .with("9999", UNRANKED_THING)
}

#[test]
fn enriches_sample_collection() {
    let catalog = catalog();
    let mut enricher = Enricher::new(&catalog, Unpaced);
    let out = enricher.enrich(items(), |_| {}).unwrap();

    assert!(out.is_complete());
    assert_eq!(out.records.len(), 2);

    let catan = &out.records[0];
    assert_eq!(catan.id, "13");
    assert_eq!(catan.title, "Catan");
    assert_eq!(catan.year_published, "1995");
    assert_eq!(catan.average_rating, "7.1");
    assert_eq!(catan.rank, "402");

    let unknown = &out.records[1];
    assert_eq!(unknown.id, "9999");
    assert_eq!(unknown.image_url, "http://x/img.png");
    assert_eq!(unknown.year_published, "");
    assert_eq!(unknown.average_rating, "");
    assert_eq!(unknown.rank, "Not Ranked");
}

#[test]
fn preserves_input_order() {
    let mut catalog = catalog();
    let ids = ["9999", "13", "822", "30549"];
    for id in &ids[2..] {
        catalog = catalog.with(id, &CATAN_THING.replace("\"13\"", &format!("\"{id}\"")));
    }
    let items: Vec<CollectionItem> = ids
        .iter()
        .map(|id| CollectionItem::new(*id, format!("Game {id}"), ""))
        .collect();

    let mut enricher = Enricher::new(&catalog, Unpaced);
    let out = enricher.enrich(items.clone(), |_| {}).unwrap();

    for (base, record) in items.iter().zip(&out.records) {
        assert_eq!(base.id, record.id);
    }
    assert_eq!(catalog.calls(), ids.to_vec());
}

#[test]
fn abort_policy_stops_at_first_failure() {
    let catalog = FakeCatalog::default().with("13", CATAN_THING);
    let items = vec![
        CollectionItem::new("404", "Missing", ""),
        CollectionItem::new("13", "Catan", ""),
    ];
    let mut enricher = Enricher::new(&catalog, Unpaced).with_policy(FailurePolicy::Abort);
    let err = enricher.enrich(items, |_| {}).unwrap_err();

    assert_eq!(err.id(), Some("404"));
    assert_eq!(catalog.calls(), vec!["404"]);
}

#[test]
fn isolate_policy_keeps_defaults_and_continues() {
    let catalog = FakeCatalog::default().with("13", CATAN_THING);
    let items = vec![
        CollectionItem::new("404", "Missing", ""),
        CollectionItem::new("13", "Catan", ""),
    ];
    let mut enricher = Enricher::new(&catalog, Unpaced).with_policy(FailurePolicy::Isolate);
    let out = enricher.enrich(items, |_| {}).unwrap();

    assert!(!out.is_complete());
    assert_eq!(out.records.len(), 2);
    assert_eq!(out.records[0].id, "404");
    assert_eq!(out.records[0].rank, "Not Ranked");
    assert_eq!(out.records[1].rank, "402");

    assert_eq!(out.failures.len(), 1);
    assert_eq!(out.failures[0].index, 0);
    assert_eq!(out.failures[0].id, "404");
    assert!(matches!(out.failures[0].error, FetchError::Status { status: 404, .. }));
}

#[test]
fn cancel_stops_before_next_request() {
    let catalog = catalog();
    let cancel = CancelToken::new();
    let mut enricher = Enricher::new(&catalog, Unpaced).with_cancel(cancel.clone());

    let mut cancelled_at = None;
    let out = enricher
        .enrich(items(), |event| match event {
            EnrichEvent::Enriched { index: 0, .. } => cancel.cancel(),
            EnrichEvent::Cancelled { completed } => cancelled_at = Some(completed),
            _ => {}
        })
        .unwrap();

    assert!(out.was_cancelled());
    assert_eq!(cancelled_at, Some(1));
    assert_eq!(out.records.len(), 1);
    assert_eq!(out.records[0].rank, "402");
    assert_eq!(out.remaining, vec![CollectionItem::new("9999", "Unknown", "http://x/img.png")]);
    assert_eq!(catalog.calls(), vec!["13"]);
}

#[test]
fn events_follow_progress() {
    let catalog = FakeCatalog::default().with("13", CATAN_THING);
    let items = vec![
        CollectionItem::new("13", "Catan", ""),
        CollectionItem::new("404", "Missing", ""),
    ];
    let mut log = Vec::new();
    let mut enricher = Enricher::new(&catalog, Unpaced).with_policy(FailurePolicy::Isolate);
    enricher
        .enrich(items, |event| {
            log.push(match event {
                EnrichEvent::Started { total } => format!("start {total}"),
                EnrichEvent::Fetching { index, item, .. } => format!("fetch {index} {}", item.id),
                EnrichEvent::Enriched { index, record } => format!("ok {index} {}", record.rank),
                EnrichEvent::Failed { index, .. } => format!("fail {index}"),
                EnrichEvent::Cancelled { completed } => format!("cancel {completed}"),
            })
        })
        .unwrap();

    assert_eq!(
        log,
        vec!["start 2", "fetch 0 13", "ok 0 402", "fetch 1 404", "fail 1"]
    );
}

#[test]
fn paced_run_takes_at_least_n_minus_one_intervals() {
    let catalog = catalog();
    let interval = Duration::from_millis(30);
    let mut enricher = Enricher::new(&catalog, FixedInterval::new(interval));

    let start = Instant::now();
    let out = enricher.enrich(items(), |_| {}).unwrap();
    assert_eq!(out.records.len(), 2);
    assert!(start.elapsed() >= interval);
}

#[test]
fn empty_collection_makes_no_requests() {
    let catalog = catalog();
    let mut enricher = Enricher::new(&catalog, Unpaced);
    let out = enricher.enrich(Vec::new(), |_| {}).unwrap();
    assert!(out.records.is_empty());
    assert!(out.is_complete());
    assert!(catalog.calls().is_empty());
}
