//! bgg-shelf CLI
//!
//! Browse a BoardGameGeek collection export as a searchable, sortable
//! gallery, with year, rating and rank pulled from the catalog API.

mod commands;
mod error;
mod logging;
mod progress;
mod render;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use bgg_shelf_core::{SortKey, ViewOptions};
use bgg_shelf_lib::{ExportFormat, Overrides, Settings, error_chain};

use crate::error::CliError;

#[derive(Parser)]
#[command(name = "bgg-shelf")]
#[command(about = "Browse your board game collection as a gallery", long_about = None)]
struct Cli {
    /// Collection export to read (defaults to collection.xml)
    #[arg(short, long, global = true)]
    collection: Option<PathBuf>,

    /// Seconds to wait between catalog requests (defaults to 1.5)
    #[arg(long, global = true)]
    delay: Option<f64>,

    /// Base URL of the catalog XML API
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Print debug output (repeat for more)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Hide the progress bar
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Search, sort and layout of the gallery.
#[derive(Args, Clone)]
struct ViewArgs {
    /// Only show games whose title contains this text (case-insensitive)
    #[arg(short, long)]
    search: Option<String>,

    /// Sort by title, year, rating or rank
    #[arg(long, default_value = "title")]
    sort: SortKey,

    /// Keep the collection file's order instead of sorting
    #[arg(long, conflicts_with_all = ["sort", "reverse"])]
    unsorted: bool,

    /// Reverse the sort order (games without a value stay last)
    #[arg(short, long)]
    reverse: bool,

    /// Cards per gallery row (2-6)
    #[arg(long)]
    per_row: Option<usize>,
}

impl ViewArgs {
    fn options(&self) -> ViewOptions {
        ViewOptions {
            search: self.search.clone().filter(|s| !s.is_empty()),
            sort: (!self.unsorted).then_some(self.sort),
            reverse: self.reverse,
        }
    }
}

/// How catalog failures are handled.
#[derive(Args, Clone, Copy)]
struct FetchArgs {
    /// Stop at the first failed catalog lookup instead of keeping defaults for that game
    #[arg(long)]
    strict: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the gallery in the terminal
    Show {
        #[command(flatten)]
        view: ViewArgs,

        #[command(flatten)]
        fetch: FetchArgs,
    },

    /// Write the gallery to a CSV, JSON or HTML file
    Export {
        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        /// Output format (csv, json, html); inferred from the output extension if omitted
        #[arg(short, long)]
        format: Option<ExportFormat>,

        #[command(flatten)]
        view: ViewArgs,

        #[command(flatten)]
        fetch: FetchArgs,
    },

    /// Interactive session: change search, sort and layout without refetching
    Browse {
        #[command(flatten)]
        view: ViewArgs,

        #[command(flatten)]
        fetch: FetchArgs,
    },

    /// Show the effective configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show each setting and where its value came from
    Show,

    /// Print the settings file path
    Path,
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli) {
        log::error!("{}", error_chain(&e));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let per_row = match &cli.command {
        Commands::Show { view, .. }
        | Commands::Export { view, .. }
        | Commands::Browse { view, .. } => view.per_row,
        Commands::Config { .. } => None,
    };
    let overrides = Overrides {
        collection: cli.collection,
        delay: cli.delay,
        api_url: cli.api_url,
        cards_per_row: per_row,
    };

    match cli.command {
        Commands::Show { view, fetch } => {
            let settings = Settings::resolve(overrides)?;
            commands::show::run_show(&settings, &view.options(), fetch.strict, cli.quiet)
        }
        Commands::Export {
            output,
            format,
            view,
            fetch,
        } => {
            let settings = Settings::resolve(overrides)?;
            commands::export::run_export(
                &settings,
                &view.options(),
                &output,
                format,
                fetch.strict,
                cli.quiet,
            )
        }
        Commands::Browse { view, fetch } => {
            let settings = Settings::resolve(overrides)?;
            commands::browse::run_browse(&settings, view.options(), fetch.strict, cli.quiet)
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => {
                let settings = Settings::resolve(overrides)?;
                commands::config::run_config_show(&settings);
                Ok(())
            }
            ConfigAction::Path => {
                commands::config::run_config_path();
                Ok(())
            }
        },
    }
}
