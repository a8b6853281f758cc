//! `SharedTextBuffer`: the one piece of state shared between the refresh
//! thread and the control thread.
//!
//! Publishing swaps the whole [`TickerString`] under the lock; reading
//! clones it under the same lock, so a reader never observes a value that
//! is half old and half new.

use super::text::TickerString;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug)]
struct Slot {
    ticker: TickerString,
    /// Bumped on every publish.
    generation: u64,
}

/// Thread-safe holder of the current ticker text.
///
/// Cloning the handle shares the same slot.
#[derive(Debug, Clone)]
pub struct SharedTextBuffer {
    slot: Arc<Mutex<Slot>>,
}

impl Default for SharedTextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedTextBuffer {
    /// Create a buffer holding the "Loading..." placeholder.
    pub fn new() -> Self {
        Self::with_initial(TickerString::loading())
    }

    /// Create a buffer holding `initial`.
    pub fn with_initial(initial: TickerString) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Slot {
                ticker: initial,
                generation: 0,
            })),
        }
    }

    // A panic while holding the lock cannot leave a torn value behind
    // (publish is a single move), so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Replace the current ticker text.
    pub fn publish(&self, ticker: TickerString) {
        let mut slot = self.lock();
        slot.ticker = ticker;
        slot.generation += 1;
    }

    /// Snapshot of the current ticker text.
    pub fn read(&self) -> TickerString {
        self.lock().ticker.clone()
    }

    /// Snapshot together with its publish generation.
    pub fn read_with_generation(&self) -> (TickerString, u64) {
        let slot = self.lock();
        (slot.ticker.clone(), slot.generation)
    }

    /// Number of publishes so far.
    pub fn generation(&self) -> u64 {
        self.lock().generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ticker::text::REPEAT_COUNT;
    use std::thread;

    #[test]
    fn test_read_before_publish_returns_placeholder() {
        let buffer = SharedTextBuffer::new();
        let ticker = buffer.read();
        assert_eq!(ticker.text(), "Loading...   ".repeat(REPEAT_COUNT));
        assert_eq!(buffer.generation(), 0);
    }

    #[test]
    fn test_publish_replaces_value() {
        let buffer = SharedTextBuffer::new();
        buffer.publish(TickerString::from_unit("X: $1.00   "));
        assert_eq!(buffer.read().unit(), "X: $1.00   ");
        assert_eq!(buffer.generation(), 1);
    }

    #[test]
    fn test_clones_share_state() {
        let buffer = SharedTextBuffer::new();
        let other = buffer.clone();
        other.publish(TickerString::from_unit("Y "));
        assert_eq!(buffer.read().unit(), "Y ");
    }

    #[test]
    fn test_concurrent_publish_and_read_never_tear() {
        let units: Vec<String> = (0..4)
            .map(|i| format!("{}: ${}.00   ", char::from(b'A' + i), i).repeat(8 + i as usize))
            .collect();
        let buffer = SharedTextBuffer::with_initial(TickerString::from_unit(&units[0]));

        let writers: Vec<_> = units
            .iter()
            .cloned()
            .map(|unit| {
                let buffer = buffer.clone();
                thread::spawn(move || {
                    for _ in 0..500 {
                        buffer.publish(TickerString::from_unit(&unit));
                    }
                })
            })
            .collect();

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let buffer = buffer.clone();
                let units = units.clone();
                thread::spawn(move || {
                    for _ in 0..500 {
                        let ticker = buffer.read();
                        let whole: Vec<String> =
                            units.iter().map(|u| u.repeat(REPEAT_COUNT)).collect();
                        assert!(
                            whole.iter().any(|w| w == ticker.text()),
                            "torn read: {ticker:?}"
                        );
                    }
                })
            })
            .collect();

        for handle in writers.into_iter().chain(readers) {
            handle.join().unwrap();
        }
        assert_eq!(buffer.generation(), 2000);
    }
}
