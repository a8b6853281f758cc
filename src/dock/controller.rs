//! `DockController`: negotiates the strip's screen edge with the shell.
//!
//! ```text
//!              dock(Top|Bottom)
//!   Undocked ───────────────────▶ DockedTop / DockedBottom
//!      ▲                                   │
//!      └──────────── undock ───────────────┘
//! ```
//!
//! Switching edges is an undock followed by a fresh dock. Any failed step
//! removes the partial registration and leaves the controller `Undocked`.
//! Transitions are single-flight: a request arriving while another one is
//! running is rejected with [`DockError::Busy`].

use super::shell::{BarId, DockEdge, DockShell, ShellNotification};
use crate::compositor::Surface;
use crate::layout::{Point, Rect};
use crossbeam_channel::Sender;
use std::sync::atomic::{AtomicBool, AtomicU16, AtomicU8, Ordering};
use std::sync::Mutex;
use tracing::{debug, info, warn};

/// Docking state of the strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DockState {
    /// Free-floating.
    Undocked,
    /// Reserved along the top edge.
    DockedTop,
    /// Reserved along the bottom edge.
    DockedBottom,
}

impl DockState {
    /// The docked edge, if any.
    pub const fn edge(self) -> Option<DockEdge> {
        match self {
            Self::Undocked => None,
            Self::DockedTop => Some(DockEdge::Top),
            Self::DockedBottom => Some(DockEdge::Bottom),
        }
    }

    /// Whether the strip is docked.
    pub const fn is_docked(self) -> bool {
        !matches!(self, Self::Undocked)
    }

    const fn from_edge(edge: DockEdge) -> Self {
        match edge {
            DockEdge::Top => Self::DockedTop,
            DockEdge::Bottom => Self::DockedBottom,
        }
    }

    const fn to_u8(self) -> u8 {
        match self {
            Self::Undocked => 0,
            Self::DockedTop => 1,
            Self::DockedBottom => 2,
        }
    }

    const fn from_u8(v: u8) -> Self {
        match v {
            1 => Self::DockedTop,
            2 => Self::DockedBottom,
            _ => Self::Undocked,
        }
    }
}

/// Why a dock request did not complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DockError {
    /// Another transition is still running.
    #[error("a dock transition is already in progress")]
    Busy,
    /// The shell refused to register the bar.
    #[error("shell refused registration")]
    RegisterFailed,
    /// The shell could not propose a position on the edge.
    #[error("shell position query failed")]
    QueryFailed,
    /// The shell refused the final position.
    #[error("shell refused the final position")]
    SetPosFailed,
    /// The surface could not be moved to the negotiated rectangle.
    #[error("surface rejected the docked bounds")]
    BoundsRejected,
}

/// Clears the busy flag when a transition ends, including early returns.
struct TransitionGuard<'a>(&'a AtomicBool);

impl<'a> TransitionGuard<'a> {
    fn try_begin(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for TransitionGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// State machine for docking the strip to a screen edge.
///
/// All methods take `&self` so a transition can detect a re-entrant
/// request (for example one issued from inside a surface callback).
#[derive(Debug)]
pub struct DockController {
    bar: BarId,
    notify: Sender<ShellNotification>,
    state: AtomicU8,
    busy: AtomicBool,
    strip_height: AtomicU16,
    /// Top-left of the strip before it was docked.
    floating_origin: Mutex<Point>,
}

impl DockController {
    /// Create an undocked controller for `bar`.
    pub fn new(bar: BarId, notify: Sender<ShellNotification>, strip_height: u16) -> Self {
        Self {
            bar,
            notify,
            state: AtomicU8::new(DockState::Undocked.to_u8()),
            busy: AtomicBool::new(false),
            strip_height: AtomicU16::new(strip_height.max(1)),
            floating_origin: Mutex::new(Point::default()),
        }
    }

    /// The bar identity used with the shell.
    pub const fn bar(&self) -> BarId {
        self.bar
    }

    /// Current state.
    pub fn state(&self) -> DockState {
        DockState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Whether a transition is running.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Configured strip height.
    pub fn strip_height(&self) -> u16 {
        self.strip_height.load(Ordering::Relaxed)
    }

    /// Change the strip height used by the next transition.
    pub fn set_strip_height(&self, height: u16) {
        self.strip_height.store(height.max(1), Ordering::Relaxed);
    }

    fn set_state(&self, state: DockState) {
        self.state.store(state.to_u8(), Ordering::Release);
    }

    fn floating_origin(&self) -> Point {
        *self
            .floating_origin
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn remember_floating_origin(&self, origin: Point) {
        *self
            .floating_origin
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = origin;
    }

    /// Dock to `edge`. Returns the rectangle the surface now occupies.
    ///
    /// When already docked, the strip is undocked first and then docked
    /// to `edge` from scratch.
    pub fn dock(
        &self,
        edge: DockEdge,
        shell: &mut dyn DockShell,
        surface: &mut dyn Surface,
    ) -> Result<Rect, DockError> {
        let Some(_guard) = TransitionGuard::try_begin(&self.busy) else {
            debug!(?edge, "dock request rejected: transition in progress");
            return Err(DockError::Busy);
        };

        if self.state().is_docked() {
            self.release(shell, surface);
        } else {
            self.remember_floating_origin(surface.bounds().top_left());
        }

        match self.negotiate(edge, shell, surface) {
            Ok(rect) => {
                self.set_state(DockState::from_edge(edge));
                info!(?edge, ?rect, "docked");
                Ok(rect)
            }
            Err(e) => {
                warn!(?edge, error = %e, "dock failed, staying undocked");
                self.set_state(DockState::Undocked);
                Err(e)
            }
        }
    }

    fn negotiate(
        &self,
        edge: DockEdge,
        shell: &mut dyn DockShell,
        surface: &mut dyn Surface,
    ) -> Result<Rect, DockError> {
        if !shell.register(self.bar, self.notify.clone()) {
            return Err(DockError::RegisterFailed);
        }

        let proposed = shell.work_area();
        let Some(allotted) = shell.query_pos(self.bar, edge, proposed) else {
            shell.remove(self.bar);
            return Err(DockError::QueryFailed);
        };

        let height = self.strip_height();
        let wanted = match edge {
            DockEdge::Top => allotted.top_strip(height),
            DockEdge::Bottom => allotted.bottom_strip(height),
        };

        let Some(reserved) = shell.set_pos(self.bar, edge, wanted) else {
            shell.remove(self.bar);
            return Err(DockError::SetPosFailed);
        };

        // Repositioning is done with layered presentation switched off.
        let layered = surface.is_layered();
        surface.set_layered(false);
        let moved = surface.set_bounds(reserved);
        surface.set_layered(layered);

        if !moved {
            shell.remove(self.bar);
            return Err(DockError::BoundsRejected);
        }
        Ok(reserved)
    }

    /// Undock. Returns the restored free-floating rectangle, or `None`
    /// when not docked or another transition is running.
    pub fn undock(&self, shell: &mut dyn DockShell, surface: &mut dyn Surface) -> Option<Rect> {
        let _guard = TransitionGuard::try_begin(&self.busy)?;
        if !self.state().is_docked() {
            return None;
        }
        let rect = self.release(shell, surface);
        info!(?rect, "undocked");
        Some(rect)
    }

    /// Double-click behaviour: undock when docked, otherwise dock to the top.
    pub fn toggle(
        &self,
        shell: &mut dyn DockShell,
        surface: &mut dyn Surface,
    ) -> Result<Rect, DockError> {
        if self.state().is_docked() {
            self.undock(shell, surface).ok_or(DockError::Busy)
        } else {
            self.dock(DockEdge::Top, shell, surface)
        }
    }

    /// Deregister and restore a full-width floating strip at the pre-dock origin.
    fn release(&self, shell: &mut dyn DockShell, surface: &mut dyn Surface) -> Rect {
        if !shell.remove(self.bar) {
            debug!(bar = ?self.bar, "shell had no registration to remove");
        }
        self.set_state(DockState::Undocked);

        let screen = shell.screen();
        let origin = self.floating_origin();
        let floating = Rect::new(origin.x, origin.y, screen.width, self.strip_height())
            .clamp_within(&screen);
        if !surface.set_bounds(floating) {
            warn!(?floating, "surface rejected floating bounds");
        }
        surface.bounds()
    }
}
