use std::io::Write;

/// Route `log` output to stdout. Info lines print bare, as command output;
/// other levels carry a prefix. `RUST_LOG` overrides the verbosity flag.
pub(crate) fn init(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = format!(
        "warn,bgg_shelf={level},bgg_shelf_lib={level},bgg_shelf_catalog={level},bgg_shelf_collection={level}"
    );

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
        .target(env_logger::Target::Stdout)
        .format(|buf, record| match record.level() {
            log::Level::Info => writeln!(buf, "{}", record.args()),
            level => writeln!(buf, "{}: {}", level.as_str().to_lowercase(), record.args()),
        })
        .init();
}
