//! Scripted collaborators shared by the integration tests.

#![allow(dead_code)]

use crossbeam_channel::Sender;
use tickertape::{
    BarId, Buffer, DockEdge, DockShell, FontMetrics, Point, Rect, RenderStyle, ShellNotification,
    Surface,
};

/// One call made against [`ScriptedShell`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Register(BarId),
    Query(BarId, DockEdge),
    SetPos(BarId, DockEdge, Rect),
    Remove(BarId),
}

/// Docking service that records every call and fails on demand.
#[derive(Debug)]
pub struct ScriptedShell {
    pub screen: Rect,
    pub calls: Vec<Call>,
    pub fail_register: bool,
    pub fail_query: bool,
    pub fail_set_pos: bool,
}

impl ScriptedShell {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            screen: Rect::from_size(width, height),
            calls: Vec::new(),
            fail_register: false,
            fail_query: false,
            fail_set_pos: false,
        }
    }

    pub fn count(&self, f: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|c| f(c)).count()
    }

    pub fn removes(&self) -> usize {
        self.count(|c| matches!(c, Call::Remove(_)))
    }

    pub fn registers(&self) -> usize {
        self.count(|c| matches!(c, Call::Register(_)))
    }
}

impl DockShell for ScriptedShell {
    fn register(&mut self, bar: BarId, _notify: Sender<ShellNotification>) -> bool {
        self.calls.push(Call::Register(bar));
        !self.fail_register
    }

    fn query_pos(&mut self, bar: BarId, edge: DockEdge, proposed: Rect) -> Option<Rect> {
        self.calls.push(Call::Query(bar, edge));
        (!self.fail_query).then_some(proposed)
    }

    fn set_pos(&mut self, bar: BarId, edge: DockEdge, rect: Rect) -> Option<Rect> {
        self.calls.push(Call::SetPos(bar, edge, rect));
        (!self.fail_set_pos).then_some(rect)
    }

    fn remove(&mut self, bar: BarId) -> bool {
        self.calls.push(Call::Remove(bar));
        true
    }

    fn work_area(&self) -> Rect {
        self.screen
    }

    fn screen(&self) -> Rect {
        self.screen
    }
}

/// One accepted or rejected present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presented {
    pub dest: Option<Point>,
    pub opacity: u8,
    pub accepted: bool,
    pub row: String,
}

/// Surface that records presents and can reject them.
pub struct RecordingSurface {
    pub bounds: Rect,
    pub layered: bool,
    pub visible: bool,
    pub presents: Vec<Presented>,
    /// Reject this many upcoming presents.
    pub reject_presents: usize,
    /// Reject every present that carries a destination.
    pub reject_with_destination: bool,
    pub reject_bounds: bool,
    /// `is_layered()` as seen at each `set_bounds` call.
    pub layered_at_set_bounds: Vec<bool>,
    /// Runs inside `set_bounds`, before the bounds change.
    pub on_set_bounds: Option<Box<dyn FnMut(Rect)>>,
}

impl RecordingSurface {
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            layered: true,
            visible: true,
            presents: Vec::new(),
            reject_presents: 0,
            reject_with_destination: false,
            reject_bounds: false,
            layered_at_set_bounds: Vec::new(),
            on_set_bounds: None,
        }
    }

    pub fn accepted(&self) -> Vec<&Presented> {
        self.presents.iter().filter(|p| p.accepted).collect()
    }
}

impl Surface for RecordingSurface {
    fn present(&mut self, frame: &Buffer, dest: Option<Point>, opacity: u8) -> bool {
        let accepted = if self.reject_presents > 0 {
            self.reject_presents -= 1;
            false
        } else {
            !(self.reject_with_destination && dest.is_some())
        };
        self.presents.push(Presented {
            dest,
            opacity,
            accepted,
            row: frame.row_text(frame.height() / 2),
        });
        accepted
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn set_bounds(&mut self, bounds: Rect) -> bool {
        self.layered_at_set_bounds.push(self.layered);
        if let Some(hook) = self.on_set_bounds.as_mut() {
            hook(bounds);
        }
        if self.reject_bounds {
            return false;
        }
        self.bounds = bounds;
        true
    }

    fn is_layered(&self) -> bool {
        self.layered
    }

    fn set_layered(&mut self, layered: bool) {
        self.layered = layered;
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn font_metrics(&self, _style: &RenderStyle) -> FontMetrics {
        FontMetrics::TERMINAL
    }
}
