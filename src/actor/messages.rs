//! Message types for actor communication.
//!
//! These enums define the protocol between the input thread and the
//! control loop.

use crate::layout::Point;

/// User commands understood by the ticker widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Freeze the scroll offset.
    Pause,
    /// Continue scrolling from the frozen offset.
    Resume,
    /// Pause if running, resume if paused.
    TogglePause,
    /// Hide or show the strip.
    ToggleHidden,
    /// Dock to the top edge.
    DockTop,
    /// Dock to the bottom edge.
    DockBottom,
    /// Release the docked edge.
    Undock,
    /// Undock when docked, otherwise dock to the top edge.
    ToggleDock,
    /// Re-read the configuration file.
    Reload,
    /// Leave the control loop.
    Exit,
    /// Move the free-floating strip by a cell delta.
    MoveBy {
        /// Columns, positive to the right.
        dx: i16,
        /// Rows, positive downwards.
        dy: i16,
    },
}

/// Events from the input thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// A key mapped to a command.
    Command(Command),

    /// A mouse gesture mapped to a command. Only honoured when `at` is on
    /// the strip.
    Pointer {
        /// `ToggleDock` for a double-click, `MoveBy` for a drag step.
        command: Command,
        /// The clicked cell, or the cell the drag step started from.
        at: Point,
    },

    /// Terminal was resized.
    Resize {
        /// New width in columns.
        width: u16,
        /// New height in rows.
        height: u16,
    },

    /// Input thread encountered an error.
    Error(String),

    /// Input thread is shutting down.
    Shutdown,
}

impl From<Command> for InputEvent {
    fn from(command: Command) -> Self {
        Self::Command(command)
    }
}
