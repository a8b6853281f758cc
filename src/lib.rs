//! # Tickertape
//!
//! A scrolling stock-quote strip for the terminal.
//!
//! A background thread quotes the configured symbols and publishes one line
//! of text; the control loop scrolls that line across a strip of the screen
//! at a fixed cadence and can dock the strip to the top or bottom edge.
//!
//! ## Core Concepts
//!
//! - **Seamless loop**: the quote line is repeated so scrolling past one
//!   copy shows the start of the next; the wrap width comes from one copy
//! - **Stale-but-valid**: a refresh that prices nothing publishes nothing
//! - **Single-write presentation**: each frame is composed off-screen and
//!   flushed to the terminal in one write
//! - **Docking protocol**: register, query, commit, with rollback on failure
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tickertape::{Engine, EngineConfig, TickerConfig, YahooChartSource};
//!
//! let config = TickerConfig::load(&TickerConfig::default_path())?;
//! let source = Arc::new(YahooChartSource::new()?);
//! Engine::new(EngineConfig::default(), config, source).run()?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod actor;
pub mod buffer;
pub mod compositor;
pub mod config;
pub mod dock;
pub mod error;
pub mod fetch;
pub mod layout;
pub mod terminal;
pub mod ticker;
pub mod widget;

// Re-exports for convenience
pub use actor::{Command, Engine, EngineConfig, InputEvent, RefreshActor};
pub use buffer::{Buffer, Cell, Modifiers, Rgb};
pub use compositor::{FontMetrics, FrameCompositor, PresentOutcome, RenderStyle, Surface};
pub use config::{ColorScheme, TickerConfig};
pub use dock::{BarId, DockController, DockEdge, DockError, DockShell, DockState, ShellNotification, WorkAreaShell};
pub use error::{Result, TickerError};
pub use fetch::{PriceSource, YahooChartSource};
pub use layout::{Point, Rect};
pub use terminal::TerminalSurface;
pub use ticker::{ScrollState, SharedTextBuffer, TickerString, REPEAT_COUNT};
pub use widget::{Flow, TickerWidget, WidgetState};
