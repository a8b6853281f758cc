//! Docking: reserving a screen-edge strip through the host shell.

mod controller;
mod shell;

pub use controller::{DockController, DockError, DockState};
pub use shell::{BarId, DockEdge, DockShell, ShellNotification, WorkAreaShell};
