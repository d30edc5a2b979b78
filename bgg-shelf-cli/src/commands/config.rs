use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use bgg_shelf_lib::{Setting, Settings, settings_path};

/// Show every effective setting and its source.
pub(crate) fn run_config_show(settings: &Settings) {
    log::info!(
        "{}",
        "bgg-shelf Configuration".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("");

    let path = settings_path();
    if path.exists() {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(exists)".if_supports_color(Stdout, |t| t.green()),
        );
    } else {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(not found)".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    log::info!("");

    print_setting(
        "collection",
        &settings.collection,
        settings.collection.value.display().to_string(),
    );
    print_setting(
        "delay",
        &settings.delay,
        format!("{}s", settings.delay.value.as_secs_f64()),
    );
    print_setting("api_url", &settings.api_url, settings.api_url.value.clone());
    print_setting(
        "cards_per_row",
        &settings.cards_per_row,
        settings.cards_per_row.value.to_string(),
    );
}

/// Print the settings file path.
pub(crate) fn run_config_path() {
    log::info!("{}", settings_path().display());
}

fn print_setting<T>(name: &str, setting: &Setting<T>, shown: String) {
    log::info!(
        "  {:<14} {} {}",
        name,
        shown,
        format!("({})", setting.source).if_supports_color(Stdout, |t| t.dimmed()),
    );
}
