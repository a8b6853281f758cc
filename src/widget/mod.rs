//! Ticker widget: the controller that owns the strip's display state.
//!
//! # Example
//!
//! ```rust,ignore
//! use tickertape::widget::TickerWidget;
//!
//! let mut widget = TickerWidget::new(&config, text.clone(), dock, &surface);
//! loop {
//!     select! {
//!         recv(ticks) -> _ => { widget.tick(&mut surface); }
//!         recv(input) -> cmd => match widget.handle(cmd?, &mut shell, &mut surface) {
//!             Flow::Exit => break,
//!             _ => {}
//!         },
//!     }
//! }
//! ```

mod ticker;

pub use ticker::{Flow, TickerWidget, WidgetState};
