pub(crate) mod browse;
pub(crate) mod config;
pub(crate) mod export;
pub(crate) mod show;

use bgg_shelf_lib::{
    BggClient, DashboardLoad, Enricher, FailurePolicy, FixedInterval, Session, Settings,
};

use crate::error::CliError;
use crate::progress::EnrichProgress;

pub(crate) type ShelfSession = Session<BggClient, FixedInterval>;

/// Build a session against the configured catalog and pacing.
pub(crate) fn open_session(settings: &Settings, strict: bool) -> Result<ShelfSession, CliError> {
    let client = BggClient::new(&settings.api_url.value)?;
    let pacer = FixedInterval::new(settings.delay.value);
    let policy = if strict {
        FailurePolicy::Abort
    } else {
        FailurePolicy::Isolate
    };
    log::debug!(
        "Catalog {} with {:.1}s between requests ({policy:?} on failure)",
        client.base_url(),
        settings.delay.value.as_secs_f64(),
    );
    Ok(Session::new(Enricher::new(client, pacer).with_policy(policy)))
}

/// Load the dashboard for the configured collection, showing progress while
/// the catalog is queried.
pub(crate) fn load_dashboard(
    session: &mut ShelfSession,
    settings: &Settings,
    quiet: bool,
) -> Result<DashboardLoad, CliError> {
    let path = &settings.collection.value;
    let progress = EnrichProgress::new(quiet);
    let result = session.dashboard(path, |event| progress.handle(event));
    progress.finish();

    let load = result?;
    if !load.from_cache {
        log::debug!(
            "Enriched {} game(s) from {}",
            load.dashboard.records.len(),
            path.display()
        );
    }
    Ok(load)
}
