//! Ticker Widget: the controller that owns all display-side state.
//!
//! The widget ties the pieces together on the control thread:
//!
//! ```text
//!   tick ──▶ ScrollState::advance ──▶ FrameCompositor::render_frame ──▶ Surface
//!                 ▲                          ▲
//!        cycle width from            SharedTextBuffer::read
//!        the current text
//!
//!   Command ──▶ pause / hide / DockController / move / reload / exit
//! ```
//!
//! Nothing here is shared with other threads except the text buffer.

use crate::actor::Command;
use crate::compositor::{FrameCompositor, PresentOutcome, Surface};
use crate::config::TickerConfig;
use crate::dock::{DockController, DockEdge, DockShell, DockState, ShellNotification};
use crate::layout::{Point, Rect};
use crate::ticker::{ScrollState, SharedTextBuffer, TickerString};
use tracing::{debug, info, warn};

/// Display-side state of the strip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WidgetState {
    /// Scroll offset and speed.
    pub scroll: ScrollState,
    /// Offset frozen, frames still presented on demand.
    pub paused: bool,
    /// Nothing advances or presents.
    pub hidden: bool,
    /// Screen rectangle of the strip.
    pub geometry: Rect,
}

/// What the control loop should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep running.
    Continue,
    /// Re-read the configuration and call [`TickerWidget::apply_config`].
    Reload,
    /// Leave the control loop.
    Exit,
}

/// The scrolling ticker strip.
#[derive(Debug)]
pub struct TickerWidget {
    state: WidgetState,
    text: SharedTextBuffer,
    compositor: FrameCompositor,
    dock: DockController,
}

impl TickerWidget {
    /// Create a widget drawing `text` onto `surface` with `config`'s style.
    pub fn new(
        config: &TickerConfig,
        text: SharedTextBuffer,
        dock: DockController,
        surface: &dyn Surface,
    ) -> Self {
        let style = config.render_style();
        let metrics = surface.font_metrics(&style);
        dock.set_strip_height(config.strip_height);
        Self {
            state: WidgetState {
                scroll: ScrollState::new(config.scroll_speed),
                paused: false,
                hidden: false,
                geometry: surface.bounds(),
            },
            text,
            compositor: FrameCompositor::new(style, metrics),
            dock,
        }
    }

    /// Current display state.
    pub const fn state(&self) -> &WidgetState {
        &self.state
    }

    /// Current docking state.
    pub fn dock_state(&self) -> DockState {
        self.dock.state()
    }

    /// The docking controller.
    pub const fn dock(&self) -> &DockController {
        &self.dock
    }

    /// The compositor (style, metrics, statistics).
    pub const fn compositor(&self) -> &FrameCompositor {
        &self.compositor
    }

    /// Handle to the shared text.
    pub const fn text(&self) -> &SharedTextBuffer {
        &self.text
    }

    /// One animation tick: advance the offset and present a frame.
    ///
    /// Paused and hidden widgets do nothing, so the offset stays frozen.
    pub fn tick(&mut self, surface: &mut dyn Surface) -> Option<PresentOutcome> {
        if self.state.paused || self.state.hidden {
            return None;
        }
        let ticker = self.text.read();
        if ticker.is_empty() {
            return None;
        }
        self.state
            .scroll
            .advance(ticker.cycle_width(self.compositor.metrics()));
        self.present(surface, &ticker)
    }

    /// Present the current text at the current offset without advancing.
    pub fn render(&mut self, surface: &mut dyn Surface) -> Option<PresentOutcome> {
        if self.state.hidden {
            return None;
        }
        let ticker = self.text.read();
        self.present(surface, &ticker)
    }

    fn present(&mut self, surface: &mut dyn Surface, ticker: &TickerString) -> Option<PresentOutcome> {
        if ticker.is_empty() || self.state.geometry.is_empty() {
            return None;
        }
        let outcome = self.compositor.render_frame(
            surface,
            ticker.text(),
            self.state.scroll.offset(),
            self.state.geometry,
        );
        Some(outcome)
    }

    /// Apply a user command.
    pub fn handle(
        &mut self,
        command: Command,
        shell: &mut dyn DockShell,
        surface: &mut dyn Surface,
    ) -> Flow {
        debug!(?command, "command");
        match command {
            Command::Pause => self.state.paused = true,
            Command::Resume => self.state.paused = false,
            Command::TogglePause => self.state.paused = !self.state.paused,
            Command::ToggleHidden => {
                self.state.hidden = !self.state.hidden;
                surface.set_visible(!self.state.hidden);
                info!(hidden = self.state.hidden, "visibility changed");
                self.render(surface);
            }
            Command::DockTop => self.dock_to(DockEdge::Top, shell, surface),
            Command::DockBottom => self.dock_to(DockEdge::Bottom, shell, surface),
            Command::Undock => {
                if let Some(rect) = self.dock.undock(shell, surface) {
                    self.after_geometry_change(rect, surface);
                }
            }
            Command::ToggleDock => match self.dock.toggle(shell, surface) {
                Ok(rect) => self.after_geometry_change(rect, surface),
                Err(e) => {
                    debug!(error = %e, "dock toggle failed");
                    self.after_geometry_change(surface.bounds(), surface);
                }
            },
            Command::MoveBy { dx, dy } => self.move_by(dx, dy, shell.screen(), surface),
            Command::Reload => return Flow::Reload,
            Command::Exit => return Flow::Exit,
        }
        Flow::Continue
    }

    /// Apply a mouse gesture that landed on `at`. Gestures off the strip,
    /// or on a hidden strip, are ignored.
    pub fn handle_pointer(
        &mut self,
        command: Command,
        at: Point,
        shell: &mut dyn DockShell,
        surface: &mut dyn Surface,
    ) -> Flow {
        if self.state.hidden || !self.state.geometry.contains(at) {
            debug!(?command, ?at, "gesture off the strip");
            return Flow::Continue;
        }
        self.handle(command, shell, surface)
    }

    fn dock_to(&mut self, edge: DockEdge, shell: &mut dyn DockShell, surface: &mut dyn Surface) {
        let rect = match self.dock.dock(edge, shell, surface) {
            Ok(rect) => rect,
            // Rolled back: the surface is wherever the controller left it.
            Err(_) => surface.bounds(),
        };
        self.after_geometry_change(rect, surface);
    }

    fn after_geometry_change(&mut self, rect: Rect, surface: &mut dyn Surface) {
        self.state.geometry = rect;
        self.recalculate_metrics(surface);
        self.render(surface);
    }

    fn move_by(&mut self, dx: i16, dy: i16, screen: Rect, surface: &mut dyn Surface) {
        if self.dock.state().is_docked() {
            return;
        }
        let g = self.state.geometry;
        let max_x = i32::from(screen.right().saturating_sub(g.width));
        let max_y = i32::from(screen.bottom().saturating_sub(g.height));
        let x = (i32::from(g.x) + i32::from(dx)).clamp(i32::from(screen.x), max_x.max(0));
        let y = (i32::from(g.y) + i32::from(dy)).clamp(i32::from(screen.y), max_y.max(0));
        let moved = Rect::new(x as u16, y as u16, g.width, g.height);
        if moved == g {
            return;
        }
        if surface.set_bounds(moved) {
            self.state.geometry = moved;
            self.render(surface);
        } else {
            warn!(?moved, "surface refused move");
        }
    }

    /// The shell says the layout changed: redraw at the current geometry.
    pub fn on_shell_notification(
        &mut self,
        notification: ShellNotification,
        surface: &mut dyn Surface,
    ) {
        let ShellNotification::PositionChanged(bar) = notification;
        if bar != self.dock.bar() {
            return;
        }
        debug!(?bar, "shell layout changed");
        self.state.geometry = surface.bounds();
        self.render(surface);
    }

    /// The screen changed size. Docked strips renegotiate their edge;
    /// floating strips span the new width and stay on screen.
    pub fn on_screen_resized(&mut self, shell: &mut dyn DockShell, surface: &mut dyn Surface) {
        match self.dock.state().edge() {
            Some(edge) => self.dock_to(edge, shell, surface),
            None => self.refloat(shell.screen(), surface),
        }
    }

    fn refloat(&mut self, screen: Rect, surface: &mut dyn Surface) {
        let g = surface.bounds();
        let floating =
            Rect::new(g.x, g.y, screen.width, self.dock.strip_height()).clamp_within(&screen);
        if !surface.set_bounds(floating) {
            warn!(?floating, "surface refused floating bounds");
        }
        self.after_geometry_change(surface.bounds(), surface);
    }

    /// Re-derive glyph metrics from the surface for the active style.
    pub fn recalculate_metrics(&mut self, surface: &dyn Surface) {
        let metrics = surface.font_metrics(self.compositor.style());
        self.compositor.set_metrics(metrics);
    }

    /// Apply a reloaded configuration.
    ///
    /// Shows the reloading placeholder until the next refresh publishes.
    pub fn apply_config(
        &mut self,
        config: &TickerConfig,
        shell: &mut dyn DockShell,
        surface: &mut dyn Surface,
    ) {
        self.compositor.set_style(config.render_style());
        self.state.scroll.set_speed(config.scroll_speed);
        self.dock.set_strip_height(config.strip_height);
        self.text.publish(TickerString::reloading());
        info!(symbols = config.symbols.len(), "config applied");

        match self.dock.state().edge() {
            Some(edge) => self.dock_to(edge, shell, surface),
            None => self.refloat(shell.screen(), surface),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dock::{BarId, WorkAreaShell};
    use crate::terminal::TerminalSurface;
    use crossbeam_channel::unbounded;

    struct Rig {
        widget: TickerWidget,
        shell: WorkAreaShell,
        surface: TerminalSurface<Vec<u8>>,
    }

    fn rig(text: &str) -> Rig {
        let (tx, _rx) = unbounded();
        let surface = TerminalSurface::new(Vec::new(), 40, 10, Rect::new(0, 4, 40, 1));
        let buffer = SharedTextBuffer::with_initial(TickerString::from_unit(text));
        let config = TickerConfig {
            scroll_speed: 3.0,
            ..TickerConfig::default()
        };
        let widget = TickerWidget::new(&config, buffer, DockController::new(BarId(1), tx, 1), &surface);
        Rig {
            widget,
            shell: WorkAreaShell::new(40, 10),
            surface,
        }
    }

    impl Rig {
        fn handle(&mut self, command: Command) -> Flow {
            self.widget.handle(command, &mut self.shell, &mut self.surface)
        }
    }

    #[test]
    fn test_tick_advances_and_wraps() {
        let mut r = rig("ABCDEFGHIJ");
        for _ in 0..3 {
            r.widget.tick(&mut r.surface);
        }
        assert_eq!(r.widget.state().scroll.offset(), 9.0);
        r.widget.tick(&mut r.surface);
        assert_eq!(r.widget.state().scroll.offset(), 2.0);
    }

    #[test]
    fn test_pause_freezes_offset() {
        let mut r = rig("ABCDEFGHIJ");
        r.widget.tick(&mut r.surface);
        r.handle(Command::Pause);
        for _ in 0..10 {
            assert_eq!(r.widget.tick(&mut r.surface), None);
        }
        assert_eq!(r.widget.state().scroll.offset(), 3.0);
        r.handle(Command::Resume);
        r.widget.tick(&mut r.surface);
        assert_eq!(r.widget.state().scroll.offset(), 6.0);
    }

    #[test]
    fn test_hidden_suspends_ticks_and_presentation() {
        let mut r = rig("ABCDEFGHIJ");
        r.handle(Command::ToggleHidden);
        assert!(r.widget.state().hidden);
        assert_eq!(r.widget.tick(&mut r.surface), None);
        assert_eq!(r.widget.render(&mut r.surface), None);
        assert_eq!(r.widget.state().scroll.offset(), 0.0);

        r.handle(Command::ToggleHidden);
        assert_eq!(r.widget.tick(&mut r.surface), Some(PresentOutcome::Presented));
    }

    #[test]
    fn test_empty_text_is_not_rendered() {
        let mut r = rig("");
        assert_eq!(r.widget.tick(&mut r.surface), None);
        assert_eq!(r.widget.state().scroll.offset(), 0.0);
    }

    #[test]
    fn test_dock_commands_update_geometry() {
        let mut r = rig("AAPL: $1.00   ");
        r.handle(Command::DockBottom);
        assert_eq!(r.widget.dock_state(), DockState::DockedBottom);
        assert_eq!(r.widget.state().geometry, Rect::new(0, 9, 40, 1));

        r.handle(Command::ToggleDock);
        assert_eq!(r.widget.dock_state(), DockState::Undocked);
        assert_eq!(r.widget.state().geometry, Rect::new(0, 4, 40, 1));

        r.handle(Command::ToggleDock);
        assert_eq!(r.widget.dock_state(), DockState::DockedTop);
        assert_eq!(r.widget.state().geometry, Rect::new(0, 0, 40, 1));
    }

    #[test]
    fn test_move_only_while_floating() {
        let mut r = rig("X");
        r.handle(Command::MoveBy { dx: 0, dy: 2 });
        assert_eq!(r.widget.state().geometry, Rect::new(0, 6, 40, 1));

        // Clamped to the screen.
        r.handle(Command::MoveBy { dx: 0, dy: 50 });
        assert_eq!(r.widget.state().geometry, Rect::new(0, 9, 40, 1));

        r.handle(Command::DockTop);
        r.handle(Command::MoveBy { dx: 0, dy: 3 });
        assert_eq!(r.widget.state().geometry, Rect::new(0, 0, 40, 1));
    }

    #[test]
    fn test_gestures_only_act_on_the_strip() {
        let mut r = rig("X");
        let off_strip = Point::new(20, 8);
        let flow = r.widget.handle_pointer(Command::ToggleDock, off_strip, &mut r.shell, &mut r.surface);
        assert_eq!(flow, Flow::Continue);
        assert_eq!(r.widget.dock_state(), DockState::Undocked);

        let drag = Command::MoveBy { dx: 0, dy: 2 };
        r.widget.handle_pointer(drag, off_strip, &mut r.shell, &mut r.surface);
        assert_eq!(r.widget.state().geometry, Rect::new(0, 4, 40, 1));

        r.widget.handle_pointer(drag, Point::new(20, 4), &mut r.shell, &mut r.surface);
        assert_eq!(r.widget.state().geometry, Rect::new(0, 6, 40, 1));

        r.widget
            .handle_pointer(Command::ToggleDock, Point::new(5, 6), &mut r.shell, &mut r.surface);
        assert_eq!(r.widget.dock_state(), DockState::DockedTop);
    }

    #[test]
    fn test_reload_and_exit_are_returned() {
        let mut r = rig("X");
        assert_eq!(r.handle(Command::Reload), Flow::Reload);
        assert_eq!(r.handle(Command::Exit), Flow::Exit);
        assert_eq!(r.handle(Command::TogglePause), Flow::Continue);
        assert!(r.widget.state().paused);
    }

    #[test]
    fn test_apply_config_shows_placeholder_and_new_height() {
        let mut r = rig("X");
        let config = TickerConfig {
            strip_height: 3,
            scroll_speed: 7.0,
            ..TickerConfig::default()
        };
        r.widget.apply_config(&config, &mut r.shell, &mut r.surface);
        assert_eq!(r.widget.text().read(), TickerString::reloading());
        assert_eq!(r.widget.state().scroll.speed(), 7.0);
        assert_eq!(r.widget.state().geometry, Rect::new(0, 4, 40, 3));
    }

    #[test]
    fn test_screen_resize_redocks() {
        let mut r = rig("X");
        r.handle(Command::DockBottom);
        r.shell.resize_screen(60, 20);
        r.surface.set_screen_size(60, 20);
        r.widget.on_screen_resized(&mut r.shell, &mut r.surface);
        assert_eq!(r.widget.dock_state(), DockState::DockedBottom);
        assert_eq!(r.widget.state().geometry, Rect::new(0, 19, 60, 1));
    }

    #[test]
    fn test_notification_for_other_bar_is_ignored() {
        let mut r = rig("X");
        let before = r.widget.compositor().stats().presented;
        r.widget
            .on_shell_notification(ShellNotification::PositionChanged(BarId(99)), &mut r.surface);
        assert_eq!(r.widget.compositor().stats().presented, before);
        r.widget
            .on_shell_notification(ShellNotification::PositionChanged(BarId(1)), &mut r.surface);
        assert_eq!(r.widget.compositor().stats().presented, before + 1);
    }
}
