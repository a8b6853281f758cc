//! The host shell's docking service.
//!
//! A docked strip reserves a band along a screen edge so that the usable
//! work area for everything else shrinks. The service is reached through
//! [`DockShell`]; each step reports failure as `false`/`None`.
//!
//! [`WorkAreaShell`] is an in-process implementation over one terminal
//! screen: it stacks reserved strips per edge and notifies every docked bar
//! when the layout changes.

use crate::layout::Rect;
use crossbeam_channel::Sender;
use tracing::debug;

/// Identifies one registered bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BarId(pub u32);

/// Screen edge a bar can be docked to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DockEdge {
    /// Top of the screen.
    Top,
    /// Bottom of the screen.
    Bottom,
}

/// Asynchronous notification from the shell to a registered bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellNotification {
    /// The layout of reserved strips changed; the bar should redraw.
    PositionChanged(BarId),
}

/// The shell docking protocol.
pub trait DockShell {
    /// Register `bar`; notifications are delivered on `notify`.
    fn register(&mut self, bar: BarId, notify: Sender<ShellNotification>) -> bool;

    /// Ask where `bar` may go on `edge`, given a proposed rectangle.
    fn query_pos(&mut self, bar: BarId, edge: DockEdge, proposed: Rect) -> Option<Rect>;

    /// Commit the final rectangle; returns the rectangle actually reserved.
    fn set_pos(&mut self, bar: BarId, edge: DockEdge, rect: Rect) -> Option<Rect>;

    /// Deregister `bar` and release its reservation.
    fn remove(&mut self, bar: BarId) -> bool;

    /// Screen area not reserved by any docked bar.
    fn work_area(&self) -> Rect;

    /// The whole screen.
    fn screen(&self) -> Rect;
}

#[derive(Debug)]
struct Bar {
    id: BarId,
    notify: Sender<ShellNotification>,
    placement: Option<(DockEdge, Rect)>,
}

/// In-process docking service for a single terminal screen.
#[derive(Debug)]
pub struct WorkAreaShell {
    screen: Rect,
    /// Registered bars, in registration order.
    bars: Vec<Bar>,
}

impl WorkAreaShell {
    /// Create a shell for a `width` x `height` screen.
    pub const fn new(width: u16, height: u16) -> Self {
        Self {
            screen: Rect::from_size(width, height),
            bars: Vec::new(),
        }
    }

    /// Reserved rectangle of `bar`, if it is docked.
    pub fn placement(&self, bar: BarId) -> Option<(DockEdge, Rect)> {
        self.bars.iter().find(|b| b.id == bar)?.placement
    }

    /// Whether `bar` is registered.
    pub fn is_registered(&self, bar: BarId) -> bool {
        self.bars.iter().any(|b| b.id == bar)
    }

    /// The screen changed size: re-stack every docked bar and notify them.
    pub fn resize_screen(&mut self, width: u16, height: u16) {
        self.screen = Rect::from_size(width, height);

        let placed: Vec<(BarId, DockEdge, u16)> = self
            .bars
            .iter()
            .filter_map(|b| b.placement.map(|(edge, rect)| (b.id, edge, rect.height)))
            .collect();
        for bar in &mut self.bars {
            bar.placement = None;
        }
        for (id, edge, height) in placed {
            let area = self.available(id);
            let rect = strip_on(edge, area, height);
            if let Some(bar) = self.bars.iter_mut().find(|b| b.id == id) {
                bar.placement = (!rect.is_empty()).then_some((edge, rect));
            }
        }

        self.notify_docked(None);
    }

    /// Work area ignoring `bar`'s own reservation.
    fn available(&self, bar: BarId) -> Rect {
        let mut top = self.screen.y;
        let mut bottom = self.screen.bottom();
        for other in self.bars.iter().filter(|b| b.id != bar) {
            match other.placement {
                Some((DockEdge::Top, rect)) => top = top.max(rect.bottom()),
                Some((DockEdge::Bottom, rect)) => bottom = bottom.min(rect.y),
                None => {}
            }
        }
        if bottom <= top {
            return Rect::new(self.screen.x, top, self.screen.width, 0);
        }
        Rect::new(self.screen.x, top, self.screen.width, bottom - top)
    }

    fn notify_docked(&self, except: Option<BarId>) {
        for bar in &self.bars {
            if bar.placement.is_some() && Some(bar.id) != except {
                let _ = bar.notify.try_send(ShellNotification::PositionChanged(bar.id));
            }
        }
    }
}

fn strip_on(edge: DockEdge, area: Rect, height: u16) -> Rect {
    match edge {
        DockEdge::Top => area.top_strip(height),
        DockEdge::Bottom => area.bottom_strip(height),
    }
}

fn intersection(a: Rect, b: Rect) -> Rect {
    let x = a.x.max(b.x);
    let y = a.y.max(b.y);
    let right = a.right().min(b.right());
    let bottom = a.bottom().min(b.bottom());
    if right <= x || bottom <= y {
        return Rect::ZERO;
    }
    Rect::new(x, y, right - x, bottom - y)
}

impl DockShell for WorkAreaShell {
    fn register(&mut self, bar: BarId, notify: Sender<ShellNotification>) -> bool {
        if self.is_registered(bar) {
            return false;
        }
        self.bars.push(Bar {
            id: bar,
            notify,
            placement: None,
        });
        true
    }

    fn query_pos(&mut self, bar: BarId, edge: DockEdge, proposed: Rect) -> Option<Rect> {
        if !self.is_registered(bar) {
            return None;
        }
        let area = intersection(proposed, self.available(bar));
        if area.is_empty() {
            return None;
        }
        debug!(?bar, ?edge, ?area, "query_pos");
        Some(area)
    }

    fn set_pos(&mut self, bar: BarId, edge: DockEdge, rect: Rect) -> Option<Rect> {
        let area = self.query_pos(bar, edge, rect)?;
        let reserved = strip_on(edge, area, rect.height);

        let entry = self.bars.iter_mut().find(|b| b.id == bar)?;
        entry.placement = Some((edge, reserved));
        self.notify_docked(Some(bar));
        Some(reserved)
    }

    fn remove(&mut self, bar: BarId) -> bool {
        let Some(idx) = self.bars.iter().position(|b| b.id == bar) else {
            return false;
        };
        let removed = self.bars.remove(idx);
        if removed.placement.is_some() {
            self.notify_docked(None);
        }
        true
    }

    fn work_area(&self) -> Rect {
        let mut top = self.screen.y;
        let mut bottom = self.screen.bottom();
        for bar in &self.bars {
            match bar.placement {
                Some((DockEdge::Top, rect)) => top = top.max(rect.bottom()),
                Some((DockEdge::Bottom, rect)) => bottom = bottom.min(rect.y),
                None => {}
            }
        }
        Rect::new(self.screen.x, top, self.screen.width, bottom.saturating_sub(top))
    }

    fn screen(&self) -> Rect {
        self.screen
    }
}
