//! Ticker text and scroll state.
//!
//! - [`TickerString`]: the composed quote line, repeated for a seamless loop
//! - [`SharedTextBuffer`]: lock-guarded handoff from the refresh thread
//! - [`ScrollState`]: per-tick offset with modulo wraparound

mod animator;
mod shared;
mod text;

pub use animator::{next_offset, ScrollState};
pub use shared::SharedTextBuffer;
pub use text::{TickerString, LOADING_UNIT, RELOADING_UNIT, REPEAT_COUNT};
