//! Actor Model: Message-passing concurrency for the ticker.
//!
//! This module implements a simple actor system using crossbeam channels:
//! - **Frame Clock**: Fixed-rate animation pulses
//! - **Input Actor**: Polls terminal events, maps them to commands
//! - **Refresh Actor**: Quotes symbols and publishes the ticker text
//! - **Engine**: Control loop that owns the widget, shell and surface
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐        pulse        ┌──────────────┐
//! │ Clock Thread │ ─────────────────▶  │              │
//! └──────────────┘                     │              │
//! ┌──────────────┐     InputEvent      │    Engine    │ ──present──▶ terminal
//! │ Input Thread │ ─────────────────▶  │ (TickerWidget)│
//! └──────────────┘                     │              │
//!                 ShellNotification    │              │
//!   WorkAreaShell ─────────────────▶   └──────────────┘
//!                                             ▲
//! ┌──────────────┐   publish    ┌─────────────┴──┐
//! │Refresh Thread│ ───────────▶ │SharedTextBuffer│
//! └──────────────┘              └────────────────┘
//! ```

mod clock;
mod engine;
mod input;
mod messages;
mod refresh;

pub use clock::{FrameClock, TICK_INTERVAL};
pub use engine::{Engine, EngineConfig};
pub use input::{InputActor, Pointer, DOUBLE_CLICK};
pub use messages::{Command, InputEvent};
pub use refresh::{compose_line, format_segment, run_cycle, RefreshActor};
