use bgg_shelf_core::{ViewOptions, compose_view};
use bgg_shelf_lib::Settings;

use crate::error::CliError;
use crate::render;

use super::{load_dashboard, open_session};

/// Load, enrich and print the gallery once.
pub(crate) fn run_show(
    settings: &Settings,
    options: &ViewOptions,
    strict: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let mut session = open_session(settings, strict)?;
    let load = load_dashboard(&mut session, settings, quiet)?;
    let dashboard = &load.dashboard;

    let view = compose_view(&dashboard.records, options);
    render::print_summary(dashboard, view.len(), options);
    render::print_gallery(&view, settings.cards_per_row.value);
    render::print_gaps(dashboard);
    Ok(())
}
