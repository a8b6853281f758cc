//! Input Actor: Dedicated thread for polling terminal events.
//!
//! This actor runs in its own thread and uses crossterm's event polling
//! to turn keyboard, mouse, and resize events into widget commands
//! without blocking the control loop.
//!
//! | Input                    | Command            |
//! |--------------------------|--------------------|
//! | `p`                      | `TogglePause`      |
//! | `h`                      | `ToggleHidden`     |
//! | `space`, `Enter`         | `Resume`           |
//! | `t` / `b` / `u`          | dock top / bottom / undock |
//! | `d`, double-click        | `ToggleDock`       |
//! | `r`                      | `Reload`           |
//! | `q`, `Esc`, `Ctrl+C`     | `Exit`             |
//! | arrows, left-drag        | `MoveBy`           |

use super::messages::{Command, InputEvent};
use crate::layout::Point;
use crossbeam_channel::Sender;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Two left clicks closer than this are a double-click.
pub const DOUBLE_CLICK: Duration = Duration::from_millis(500);

/// Mouse gesture state carried between events.
#[derive(Debug, Default)]
pub struct Pointer {
    last_click: Option<Instant>,
    drag_from: Option<Point>,
}

impl Pointer {
    /// Map one mouse event to a command and the cell it applies to.
    fn on_mouse(&mut self, mouse: MouseEvent, now: Instant) -> Option<(Command, Point)> {
        let at = Point::new(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let double = self
                    .last_click
                    .is_some_and(|at| now.saturating_duration_since(at) < DOUBLE_CLICK);
                if double {
                    self.last_click = None;
                    self.drag_from = None;
                    Some((Command::ToggleDock, at))
                } else {
                    self.last_click = Some(now);
                    self.drag_from = Some(at);
                    None
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let from = self.drag_from?;
                self.drag_from = Some(at);
                let dx = i32::from(at.x) - i32::from(from.x);
                let dy = i32::from(at.y) - i32::from(from.y);
                if dx == 0 && dy == 0 {
                    return None;
                }
                let command = Command::MoveBy {
                    dx: dx as i16,
                    dy: dy as i16,
                };
                Some((command, from))
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.drag_from = None;
                None
            }
            _ => None,
        }
    }
}

/// Input actor that polls terminal events.
pub struct InputActor {
    /// Handle to the input thread.
    handle: Option<JoinHandle<()>>,
    /// Flag to signal shutdown.
    shutdown: Arc<AtomicBool>,
}

impl InputActor {
    /// Spawn the input actor thread.
    ///
    /// # Arguments
    ///
    /// * `sender` - Channel to send input events to the control loop.
    /// * `poll_timeout` - How long to wait for events before checking shutdown.
    ///
    /// # Panics
    ///
    /// Panics if the OS fails to spawn the input thread.
    pub fn spawn(sender: Sender<InputEvent>, poll_timeout: Duration) -> Self {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();

        let handle = thread::Builder::new()
            .name("tickertape-input".to_string())
            .spawn(move || {
                Self::run_loop(&sender, &shutdown_clone, poll_timeout);
            })
            .expect("Failed to spawn input thread");

        Self {
            handle: Some(handle),
            shutdown,
        }
    }

    /// Signal the input thread to shutdown.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Wait for the input thread to finish.
    pub fn join(mut self) {
        self.shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    /// Main input polling loop.
    fn run_loop(sender: &Sender<InputEvent>, shutdown: &AtomicBool, poll_timeout: Duration) {
        let mut pointer = Pointer::default();
        loop {
            if shutdown.load(Ordering::Relaxed) {
                let _ = sender.try_send(InputEvent::Shutdown);
                break;
            }

            match event::poll(poll_timeout) {
                Ok(true) => match event::read() {
                    Ok(event) => {
                        if let Some(input_event) =
                            Self::convert_event(&mut pointer, event, Instant::now())
                        {
                            if sender.send(input_event).is_err() {
                                // Receiver dropped, exit
                                break;
                            }
                        }
                    }
                    Err(e) => {
                        let _ = sender.send(InputEvent::Error(e.to_string()));
                    }
                },
                Ok(false) => {}
                Err(e) => {
                    let _ = sender.send(InputEvent::Error(e.to_string()));
                }
            }
        }
    }

    /// Convert a crossterm event to an [`InputEvent`].
    pub fn convert_event(pointer: &mut Pointer, event: Event, now: Instant) -> Option<InputEvent> {
        match event {
            Event::Key(key) => Self::command_for_key(key).map(InputEvent::Command),
            Event::Mouse(mouse) => pointer
                .on_mouse(mouse, now)
                .map(|(command, at)| InputEvent::Pointer { command, at }),
            Event::Resize(width, height) => Some(InputEvent::Resize { width, height }),
            _ => None,
        }
    }

    /// Key binding table.
    pub fn command_for_key(key: KeyEvent) -> Option<Command> {
        // Only process key press events (not release or repeat)
        if key.kind != KeyEventKind::Press {
            return None;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return matches!(key.code, KeyCode::Char('c' | 'C')).then_some(Command::Exit);
        }

        Some(match key.code {
            KeyCode::Char('p' | 'P') => Command::TogglePause,
            KeyCode::Char('h' | 'H') => Command::ToggleHidden,
            KeyCode::Char(' ') | KeyCode::Enter => Command::Resume,
            KeyCode::Char('t' | 'T') => Command::DockTop,
            KeyCode::Char('b' | 'B') => Command::DockBottom,
            KeyCode::Char('u' | 'U') => Command::Undock,
            KeyCode::Char('d' | 'D') => Command::ToggleDock,
            KeyCode::Char('r' | 'R') => Command::Reload,
            KeyCode::Char('q' | 'Q') | KeyCode::Esc => Command::Exit,
            KeyCode::Left => Command::MoveBy { dx: -1, dy: 0 },
            KeyCode::Right => Command::MoveBy { dx: 1, dy: 0 },
            KeyCode::Up => Command::MoveBy { dx: 0, dy: -1 },
            KeyCode::Down => Command::MoveBy { dx: 0, dy: 1 },
            _ => return None,
        })
    }
}

impl Drop for InputActor {
    fn drop(&mut self) {
        self.shutdown();
    }
}
