//! Terminal host: ANSI encoding and the terminal-backed [`Surface`](crate::compositor::Surface).

mod output;
mod surface;

pub use output::OutputBuffer;
pub use surface::TerminalSurface;
