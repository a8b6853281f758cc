//! Engine: Main coordinator that ties actors together.
//!
//! The Engine is the entry point for running the ticker in a terminal.
//! It sets up the terminal, spawns the actors, and runs the control loop
//! that owns the widget, the docking shell and the presentation surface.

use super::messages::InputEvent;
use super::{FrameClock, InputActor, RefreshActor, TICK_INTERVAL};
use crate::config::TickerConfig;
use crate::dock::{BarId, DockController, WorkAreaShell};
use crate::error::{Result, TickerError};
use crate::fetch::PriceSource;
use crate::layout::Rect;
use crate::terminal::TerminalSurface;
use crate::ticker::SharedTextBuffer;
use crate::widget::{Flow, TickerWidget};
use crossbeam_channel::{bounded, select};
use crossterm::{
    cursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Configuration for the Engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Animation tick interval.
    pub tick_interval: Duration,
    /// Input poll timeout.
    pub input_poll_timeout: Duration,
    /// Whether to enable mouse capture (drag, double-click).
    pub enable_mouse: bool,
    /// Whether to use alternate screen buffer.
    pub alternate_screen: bool,
    /// How long exit waits for the refresh thread before detaching it.
    pub refresh_grace: Duration,
    /// Configuration file re-read on `Reload`.
    pub config_path: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval: TICK_INTERVAL,
            input_poll_timeout: Duration::from_millis(10),
            enable_mouse: true,
            alternate_screen: true,
            refresh_grace: Duration::from_secs(2),
            config_path: TickerConfig::default_path(),
        }
    }
}

/// Raw mode and screen setup, undone on drop.
struct TerminalGuard {
    mouse: bool,
    alternate_screen: bool,
}

impl TerminalGuard {
    fn enter(config: &EngineConfig) -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let guard = Self {
            mouse: config.enable_mouse,
            alternate_screen: config.alternate_screen,
        };

        let mut stdout = io::stdout();
        if config.alternate_screen {
            execute!(stdout, EnterAlternateScreen)?;
        }
        if config.enable_mouse {
            execute!(stdout, EnableMouseCapture)?;
        }
        execute!(stdout, cursor::Hide)?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut stdout = io::stdout();
        let _ = execute!(stdout, cursor::Show);
        if self.mouse {
            let _ = execute!(stdout, DisableMouseCapture);
        }
        if self.alternate_screen {
            let _ = execute!(stdout, LeaveAlternateScreen);
        }
        let _ = terminal::disable_raw_mode();
    }
}

/// The ticker engine.
pub struct Engine {
    config: EngineConfig,
    ticker: TickerConfig,
    source: Arc<dyn PriceSource>,
}

impl Engine {
    /// Create an engine for `ticker` settings quoting from `source`.
    pub fn new(config: EngineConfig, ticker: TickerConfig, source: Arc<dyn PriceSource>) -> Self {
        Self {
            config,
            ticker,
            source,
        }
    }

    /// Current ticker settings (updated by `Reload`).
    pub const fn ticker_config(&self) -> &TickerConfig {
        &self.ticker
    }

    /// Take over the terminal and run until `Exit`.
    ///
    /// # Errors
    ///
    /// Returns [`TickerError::Terminal`] if the terminal cannot be set up.
    pub fn run(mut self) -> Result<()> {
        let (width, height) = terminal::size().map_err(TickerError::Terminal)?;
        let _guard = TerminalGuard::enter(&self.config).map_err(TickerError::Terminal)?;

        let strip = self.ticker.strip_height.min(height);
        let start = Rect::new(0, height.saturating_sub(strip) / 2, width, strip);
        let mut surface = TerminalSurface::new(io::stdout(), width, height, start);
        let mut shell = WorkAreaShell::new(width, height);

        let (notify_tx, notify_rx) = bounded(16);
        let dock = DockController::new(BarId(std::process::id()), notify_tx, strip);
        let text = SharedTextBuffer::new();
        let mut widget = TickerWidget::new(&self.ticker, text.clone(), dock, &surface);

        let refresh = RefreshActor::spawn(
            self.source.clone(),
            self.ticker.symbols.clone(),
            self.ticker.refresh_interval(),
            text,
        );
        let (input_tx, input_rx) = bounded::<InputEvent>(64);
        let input = InputActor::spawn(input_tx, self.config.input_poll_timeout);
        let clock = FrameClock::start(self.config.tick_interval);

        info!(width, height, symbols = self.ticker.symbols.len(), "engine started");
        widget.render(&mut surface);

        loop {
            select! {
                recv(clock.pulses()) -> pulse => {
                    if pulse.is_err() {
                        break;
                    }
                    widget.tick(&mut surface);
                }
                recv(input_rx) -> event => match event {
                    Ok(InputEvent::Command(command)) => {
                        let flow = widget.handle(command, &mut shell, &mut surface);
                        if self.follow(flow, &mut widget, &refresh, &mut shell, &mut surface) {
                            break;
                        }
                    }
                    Ok(InputEvent::Pointer { command, at }) => {
                        let flow = widget.handle_pointer(command, at, &mut shell, &mut surface);
                        if self.follow(flow, &mut widget, &refresh, &mut shell, &mut surface) {
                            break;
                        }
                    }
                    Ok(InputEvent::Resize { width, height }) => {
                        shell.resize_screen(width, height);
                        surface.set_screen_size(width, height);
                        widget.on_screen_resized(&mut shell, &mut surface);
                    }
                    Ok(InputEvent::Error(e)) => warn!(error = %e, "input error"),
                    Ok(InputEvent::Shutdown) | Err(_) => break,
                },
                recv(notify_rx) -> notification => {
                    if let Ok(notification) = notification {
                        widget.on_shell_notification(notification, &mut surface);
                    }
                }
            }
        }

        info!(
            stats = ?widget.compositor().stats(),
            skipped_frames = clock.skipped(),
            "engine stopping"
        );
        clock.join();
        input.join();
        if !refresh.shutdown_within(self.config.refresh_grace) {
            warn!("refresh thread abandoned at exit");
        }
        Ok(())
    }

    /// Act on a widget's [`Flow`]. Returns true when the loop should exit.
    fn follow(
        &mut self,
        flow: Flow,
        widget: &mut TickerWidget,
        refresh: &RefreshActor,
        shell: &mut WorkAreaShell,
        surface: &mut TerminalSurface<Stdout>,
    ) -> bool {
        match flow {
            Flow::Continue => false,
            Flow::Reload => {
                self.reload(widget, refresh, shell, surface);
                false
            }
            Flow::Exit => true,
        }
    }

    fn reload(
        &mut self,
        widget: &mut TickerWidget,
        refresh: &RefreshActor,
        shell: &mut WorkAreaShell,
        surface: &mut TerminalSurface<Stdout>,
    ) {
        match TickerConfig::load(&self.config.config_path) {
            Ok(ticker) => {
                refresh.update_settings(ticker.symbols.clone(), ticker.refresh_interval());
                widget.apply_config(&ticker, shell, surface);
                info!(path = %self.config.config_path.display(), "config reloaded");
                self.ticker = ticker;
            }
            Err(e) => warn!(error = %e, "reload failed, keeping current config"),
        }
    }
}
