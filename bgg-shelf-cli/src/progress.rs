//! Progress bar for catalog enrichment.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use bgg_shelf_catalog::EnrichEvent;

/// Turns [`EnrichEvent`]s into a progress bar on stderr.
pub(crate) struct EnrichProgress {
    bar: ProgressBar,
}

impl EnrichProgress {
    /// When `quiet` is true, nothing is drawn.
    pub(crate) fn new(quiet: bool) -> Self {
        let bar = ProgressBar::new(0);
        if quiet {
            bar.set_draw_target(ProgressDrawTarget::hidden());
        }
        let style = ProgressStyle::with_template(
            "  {spinner:.cyan} [{bar:30.cyan/blue}] {pos}/{len} {wide_msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ")
        .tick_chars("/-\\|");
        bar.set_style(style);
        Self { bar }
    }

    pub(crate) fn handle(&self, event: EnrichEvent<'_>) {
        match event {
            EnrichEvent::Started { total } => {
                self.bar.set_length(total as u64);
                self.bar.set_position(0);
                self.bar
                    .enable_steady_tick(std::time::Duration::from_millis(100));
            }
            EnrichEvent::Fetching { item, .. } => {
                self.bar.set_message(format!("Looking up {}", item.title));
            }
            // Failures are already logged by the enricher.
            EnrichEvent::Enriched { .. } | EnrichEvent::Failed { .. } => self.bar.inc(1),
            EnrichEvent::Cancelled { .. } => self.bar.abandon_with_message("Cancelled"),
        }
    }

    /// Clear the bar once enrichment is over.
    pub(crate) fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
