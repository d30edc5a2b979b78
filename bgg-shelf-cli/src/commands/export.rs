use std::path::Path;

use bgg_shelf_core::{ViewOptions, compose_view};
use bgg_shelf_lib::{ExportFormat, Settings, export_to_path};

use crate::error::CliError;
use crate::render;

use super::{load_dashboard, open_session};

/// Write the gallery view to `output`.
pub(crate) fn run_export(
    settings: &Settings,
    options: &ViewOptions,
    output: &Path,
    format: Option<ExportFormat>,
    strict: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let format = match format {
        Some(f) => f,
        None => infer_format(output)?,
    };

    let mut session = open_session(settings, strict)?;
    let load = load_dashboard(&mut session, settings, quiet)?;
    let dashboard = &load.dashboard;

    let view = compose_view(&dashboard.records, options);
    export_to_path(format, &view, settings.cards_per_row.value, output)?;

    log::info!(
        "Wrote {} of {} game(s) to {} ({format})",
        view.len(),
        dashboard.records.len(),
        output.display()
    );
    render::print_gaps(dashboard);
    Ok(())
}

fn infer_format(output: &Path) -> Result<ExportFormat, CliError> {
    output
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(|ext| ext.parse().ok())
        .ok_or_else(|| {
            CliError::other(format!(
                "Cannot tell the export format from {}; pass --format csv|json|html",
                output.display()
            ))
        })
}
