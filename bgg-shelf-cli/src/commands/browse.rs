//! Interactive gallery session.
//!
//! Every command re-renders from the session cache, so changing the search,
//! sort or layout never repeats the catalog requests. Editing the collection
//! file, or `reload`, refreshes the details.

use std::io::{BufRead, Write};

use bgg_shelf_core::{SortKey, ViewOptions, compose_view};
use bgg_shelf_lib::{Settings, clamp_cards_per_row, error_chain};

use crate::error::CliError;
use crate::render;

use super::{ShelfSession, load_dashboard, open_session};

/// A line typed at the browse prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum BrowseCommand {
    /// Set the search term; `None` clears it.
    Search(Option<String>),
    /// Set the sort key; `None` restores file order.
    Sort(Option<SortKey>),
    Reverse,
    PerRow(usize),
    Show,
    Reload,
    Help,
    Quit,
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum BrowseParseError {
    #[error("Unknown command '{0}'. Type 'help' for commands.")]
    Unknown(String),

    #[error("{0}")]
    Invalid(String),
}

impl std::str::FromStr for BrowseCommand {
    type Err = BrowseParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let line = s.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word.to_lowercase().as_str() {
            "search" | "find" | "/" => Ok(Self::Search((!rest.is_empty()).then(|| rest.to_string()))),
            "clear" => Ok(Self::Search(None)),
            "sort" => match rest.to_lowercase().as_str() {
                "" | "off" | "none" => Ok(Self::Sort(None)),
                key => key
                    .parse::<SortKey>()
                    .map(|k| Self::Sort(Some(k)))
                    .map_err(|e| BrowseParseError::Invalid(e.to_string())),
            },
            "reverse" => Ok(Self::Reverse),
            "per-row" | "cols" => rest
                .parse::<usize>()
                .map(Self::PerRow)
                .map_err(|_| BrowseParseError::Invalid(format!("'{rest}' is not a number of cards"))),
            "" | "show" => Ok(Self::Show),
            "reload" => Ok(Self::Reload),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            _ => Err(BrowseParseError::Unknown(word.to_string())),
        }
    }
}

/// Current search, sort and layout of the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BrowseState {
    pub(crate) options: ViewOptions,
    pub(crate) per_row: usize,
}

impl BrowseState {
    /// Apply a view-changing command. Others leave the state alone.
    pub(crate) fn apply(&mut self, command: &BrowseCommand) {
        match command {
            BrowseCommand::Search(term) => self.options.search = term.clone(),
            BrowseCommand::Sort(key) => self.options.sort = *key,
            BrowseCommand::Reverse => self.options.reverse = !self.options.reverse,
            BrowseCommand::PerRow(n) => self.per_row = clamp_cards_per_row(*n),
            BrowseCommand::Show | BrowseCommand::Reload | BrowseCommand::Help | BrowseCommand::Quit => {}
        }
    }
}

pub(crate) fn run_browse(
    settings: &Settings,
    options: ViewOptions,
    strict: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let mut session = open_session(settings, strict)?;
    let mut state = BrowseState {
        options,
        per_row: settings.cards_per_row.value,
    };

    render_state(&mut session, settings, &state, quiet)?;
    log::info!("Type 'help' for commands.");

    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut line = String::new();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }

        let command = match line.parse::<BrowseCommand>() {
            Ok(c) => c,
            Err(e) => {
                log::warn!("{e}");
                continue;
            }
        };

        match command {
            BrowseCommand::Quit => break,
            BrowseCommand::Help => print_help(),
            BrowseCommand::Reload => session.invalidate(),
            ref other => state.apply(other),
        }
        if matches!(command, BrowseCommand::Help) {
            continue;
        }

        // A broken file mid-session is reported, not fatal.
        if let Err(e) = render_state(&mut session, settings, &state, quiet) {
            log::error!("{}", error_chain(&e));
        }
    }
    Ok(())
}

fn render_state(
    session: &mut ShelfSession,
    settings: &Settings,
    state: &BrowseState,
    quiet: bool,
) -> Result<(), CliError> {
    let load = load_dashboard(session, settings, quiet)?;
    let dashboard = &load.dashboard;
    let view = compose_view(&dashboard.records, &state.options);

    render::print_summary(dashboard, view.len(), &state.options);
    render::print_gallery(&view, state.per_row);
    if !load.from_cache {
        render::print_gaps(dashboard);
    }
    Ok(())
}

fn print_help() {
    log::info!("Commands:");
    log::info!("  search <text>     only show titles containing <text> (no text clears)");
    log::info!("  clear             clear the search");
    log::info!("  sort <key>        sort by title, year, rating or rank ('sort off' for file order)");
    log::info!("  reverse           flip the sort order");
    log::info!("  per-row <n>       cards per row (2-6)");
    log::info!("  show              show the gallery again");
    log::info!("  reload            fetch catalog details again");
    log::info!("  quit              leave");
}
