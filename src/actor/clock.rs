//! Frame clock: paces the scroll animation from its own thread.
//!
//! One pulse means "advance the offset once and present one frame". The
//! channel holds a single pending pulse, so a slow frame coalesces the
//! pulses that arrive meanwhile instead of replaying them as a burst of
//! catch-up motion. Coalesced pulses are counted.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Default animation cadence (about 30 frames per second).
pub const TICK_INTERVAL: Duration = Duration::from_millis(33);

/// Longest single sleep, bounds how late a shutdown is noticed.
const MAX_NAP: Duration = Duration::from_millis(50);

/// Counters shared between the clock thread and its handle.
#[derive(Debug, Default)]
struct Pacing {
    stop: AtomicBool,
    skipped: AtomicU64,
}

/// Handle to the frame clock thread.
pub struct FrameClock {
    handle: Option<JoinHandle<()>>,
    pacing: Arc<Pacing>,
    pulses: Receiver<()>,
}

impl FrameClock {
    /// Start pulsing every `interval`. The first pulse comes one interval in.
    ///
    /// # Panics
    ///
    /// Panics if the OS fails to spawn the clock thread.
    pub fn start(interval: Duration) -> Self {
        let pacing = Arc::new(Pacing::default());
        let (tx, pulses) = bounded(1);

        let thread_pacing = pacing.clone();
        let handle = thread::Builder::new()
            .name("tickertape-clock".to_string())
            .spawn(move || Self::pace(&tx, &thread_pacing, interval))
            .expect("Failed to spawn clock thread");

        Self {
            handle: Some(handle),
            pacing,
            pulses,
        }
    }

    /// Pulse channel for the control loop's `select!`.
    #[inline]
    pub const fn pulses(&self) -> &Receiver<()> {
        &self.pulses
    }

    /// Pulses dropped because the previous one was still unread.
    pub fn skipped(&self) -> u64 {
        self.pacing.skipped.load(Ordering::Relaxed)
    }

    /// Stop the clock; the pulse channel disconnects once the thread exits.
    pub fn stop(&self) {
        self.pacing.stop.store(true, Ordering::Relaxed);
    }

    /// Stop and wait for the thread.
    pub fn join(mut self) {
        self.stop();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    fn pace(tx: &Sender<()>, pacing: &Pacing, interval: Duration) {
        let mut deadline = Instant::now() + interval;
        while !pacing.stop.load(Ordering::Relaxed) {
            let now = Instant::now();
            if now < deadline {
                thread::sleep((deadline - now).min(MAX_NAP));
                continue;
            }

            match tx.try_send(()) {
                Ok(()) => {}
                Err(TrySendError::Full(())) => {
                    pacing.skipped.fetch_add(1, Ordering::Relaxed);
                }
                Err(TrySendError::Disconnected(())) => break,
            }

            // After a stall, restart the cadence from now.
            deadline += interval;
            if deadline <= now {
                deadline = now + interval;
            }
        }
    }
}

impl Drop for FrameClock {
    fn drop(&mut self) {
        self.stop();
    }
}
