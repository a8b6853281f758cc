//! Refresh Actor: background thread that keeps the ticker text current.
//!
//! Every cycle quotes each configured symbol, joins the priced ones into a
//! single line and publishes it to the [`SharedTextBuffer`]. Symbols without
//! a price are skipped; a cycle where nothing is priced publishes nothing,
//! so the strip keeps showing the last good line.
//!
//! ```text
//!   loop {
//!       shutdown? ──yes──▶ exit
//!       for symbol: fetch ─▶ "SYM: $P.PP   "
//!       any priced? ──yes──▶ publish(line × REPEAT_COUNT)
//!       sleep(interval)
//!   }
//! ```

use crate::fetch::PriceSource;
use crate::ticker::{SharedTextBuffer, TickerString};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Polling step used while waiting for the thread to exit.
const JOIN_POLL: Duration = Duration::from_millis(10);

/// One quote segment, trailing spacing included.
pub fn format_segment(symbol: &str, price: f64) -> String {
    format!("{symbol}: ${price:.2}   ")
}

/// Quote every symbol and join the priced ones into one line.
///
/// Returns `None` when no symbol produced a positive price.
pub fn compose_line(symbols: &[String], source: &dyn PriceSource) -> Option<String> {
    let mut line = String::new();
    for symbol in symbols {
        let price = source.fetch_price(symbol);
        if price > 0.0 && price.is_finite() {
            line.push_str(&format_segment(symbol, price));
        } else {
            debug!(symbol, "no price, skipping");
        }
    }
    (!line.is_empty()).then_some(line)
}

/// Run one refresh cycle. Returns whether anything was published.
pub fn run_cycle(symbols: &[String], source: &dyn PriceSource, buffer: &SharedTextBuffer) -> bool {
    match compose_line(symbols, source) {
        Some(line) => {
            buffer.publish(TickerString::from_unit(&line));
            true
        }
        None => false,
    }
}

/// What the loop fetches and how often. Read at the start of every cycle.
#[derive(Debug, Clone)]
struct Settings {
    symbols: Vec<String>,
    interval: Duration,
}

/// Refresh actor handle.
pub struct RefreshActor {
    /// Handle to the refresh thread.
    handle: Option<JoinHandle<()>>,
    /// Observed at the top of each cycle.
    shutdown: Arc<AtomicBool>,
    settings: Arc<Mutex<Settings>>,
}

impl RefreshActor {
    /// Spawn the refresh thread. The first cycle starts immediately.
    ///
    /// # Panics
    ///
    /// Panics if the OS fails to spawn the refresh thread.
    pub fn spawn(
        source: Arc<dyn PriceSource>,
        symbols: Vec<String>,
        interval: Duration,
        buffer: SharedTextBuffer,
    ) -> Self {
        let shutdown = Arc::new(AtomicBool::new(false));
        let settings = Arc::new(Mutex::new(Settings { symbols, interval }));

        let shutdown_clone = shutdown.clone();
        let settings_clone = settings.clone();
        let handle = thread::Builder::new()
            .name("tickertape-refresh".to_string())
            .spawn(move || {
                Self::run_loop(source.as_ref(), &settings_clone, &buffer, &shutdown_clone);
            })
            .expect("Failed to spawn refresh thread");

        Self {
            handle: Some(handle),
            shutdown,
            settings,
        }
    }

    /// Replace symbols and interval. Takes effect at the next cycle.
    pub fn update_settings(&self, symbols: Vec<String>, interval: Duration) {
        let mut settings = self.settings.lock().unwrap_or_else(PoisonError::into_inner);
        settings.symbols = symbols;
        settings.interval = interval;
    }

    /// Signal the thread to stop after its current cycle.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Whether the thread has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Signal shutdown and wait for the thread, however long that takes.
    pub fn join(mut self) {
        self.shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    /// Signal shutdown and wait up to `grace` for the thread to exit.
    ///
    /// The loop is not interrupted mid-fetch or mid-sleep. If it has not
    /// exited within `grace` it is detached and left to finish on its own.
    /// Returns whether the thread was joined.
    pub fn shutdown_within(mut self, grace: Duration) -> bool {
        self.shutdown();
        let deadline = Instant::now() + grace;
        while !self.is_finished() && Instant::now() < deadline {
            thread::sleep(JOIN_POLL);
        }

        let Some(handle) = self.handle.take() else {
            return true;
        };
        if handle.is_finished() {
            let _ = handle.join();
            true
        } else {
            info!(?grace, "refresh thread still busy, detaching");
            false
        }
    }

    fn run_loop(
        source: &dyn PriceSource,
        settings: &Mutex<Settings>,
        buffer: &SharedTextBuffer,
        shutdown: &AtomicBool,
    ) {
        loop {
            if shutdown.load(Ordering::Relaxed) {
                debug!("refresh loop exiting");
                break;
            }

            let Settings { symbols, interval } = settings
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone();

            let started = Instant::now();
            if run_cycle(&symbols, source, buffer) {
                info!(
                    symbols = symbols.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "ticker refreshed"
                );
            } else {
                info!(symbols = symbols.len(), "no prices this cycle, keeping previous text");
            }

            thread::sleep(interval);
        }
    }
}

impl Drop for RefreshActor {
    fn drop(&mut self) {
        self.shutdown();
    }
}
