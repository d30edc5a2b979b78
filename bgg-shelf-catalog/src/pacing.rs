//! Request pacing for the shared catalog service.

use std::time::{Duration, Instant};

/// Default gap between two catalog requests.
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(1500);

/// Gate that every catalog request passes through before it is sent.
pub trait Pacer {
    /// Block until the next request may be issued.
    fn wait_turn(&mut self);
}

impl<P: Pacer + ?Sized> Pacer for &mut P {
    fn wait_turn(&mut self) {
        (**self).wait_turn();
    }
}

/// Keeps consecutive requests at least `interval` apart.
///
/// The first request goes out immediately, so N requests take at least
/// (N - 1) × `interval`.
#[derive(Debug, Clone)]
pub struct FixedInterval {
    interval: Duration,
    last: Option<Instant>,
}

impl FixedInterval {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Default for FixedInterval {
    fn default() -> Self {
        Self::new(DEFAULT_REQUEST_DELAY)
    }
}

impl Pacer for FixedInterval {
    fn wait_turn(&mut self) {
        if let Some(last) = self.last {
            let elapsed = last.elapsed();
            if elapsed < self.interval {
                std::thread::sleep(self.interval - elapsed);
            }
        }
        self.last = Some(Instant::now());
    }
}

/// Never waits.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unpaced;

impl Pacer for Unpaced {
    fn wait_turn(&mut self) {}
}
