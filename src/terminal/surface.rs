//! `TerminalSurface`: the ticker strip as a region of a terminal screen.
//!
//! Presenting encodes the composed frame into one ANSI stream positioned at
//! the strip's top-left and flushes it with a single write. When the strip
//! moves, the area it used to cover is blanked in the same write.

use super::output::OutputBuffer;
use crate::buffer::Buffer;
use crate::compositor::{FontMetrics, RenderStyle, Surface};
use crate::layout::{Point, Rect};
use std::io::Write;
use tracing::debug;

/// A [`Surface`] drawing into a terminal through any `Write` sink.
#[derive(Debug)]
pub struct TerminalSurface<W: Write> {
    out: W,
    screen: Rect,
    bounds: Rect,
    layered: bool,
    visible: bool,
    output: OutputBuffer,
    /// Screen area covered by the last successful present.
    painted: Option<Rect>,
}

impl<W: Write> TerminalSurface<W> {
    /// Create a surface for a `width` x `height` screen, placed at `bounds`.
    pub fn new(out: W, width: u16, height: u16, bounds: Rect) -> Self {
        let screen = Rect::from_size(width, height);
        Self {
            out,
            screen,
            bounds: bounds.clamp_within(&screen),
            layered: true,
            visible: true,
            output: OutputBuffer::new(),
            painted: None,
        }
    }

    /// The whole terminal screen.
    pub const fn screen(&self) -> Rect {
        self.screen
    }

    /// The terminal was resized. Whatever was painted is gone.
    pub fn set_screen_size(&mut self, width: u16, height: u16) {
        self.screen = Rect::from_size(width, height);
        self.bounds = self.bounds.clamp_within(&self.screen);
        self.painted = None;
    }

    /// The underlying sink.
    pub const fn writer(&self) -> &W {
        &self.out
    }

    fn flush(&mut self) -> bool {
        match self.output.flush_to(&mut self.out) {
            Ok(()) => true,
            Err(e) => {
                debug!(error = %e, "terminal write failed");
                false
            }
        }
    }
}

impl<W: Write> Surface for TerminalSurface<W> {
    fn present(&mut self, frame: &Buffer, dest: Option<Point>, opacity: u8) -> bool {
        if !self.layered || !self.visible {
            return false;
        }

        let origin = dest.unwrap_or_else(|| self.bounds.top_left());
        let target = Rect::new(origin.x, origin.y, frame.width(), frame.height());
        if !self.screen.contains_rect(&target) {
            return false;
        }

        self.output.clear();
        if let Some(old) = self.painted.filter(|old| *old != target) {
            self.output.erase_rect(old);
        }
        self.output.write_frame(frame, origin, opacity);

        if self.flush() {
            self.painted = Some(target);
            true
        } else {
            false
        }
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn set_bounds(&mut self, bounds: Rect) -> bool {
        if bounds.is_empty() || !self.screen.contains_rect(&bounds) {
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
        if !visible {
            if let Some(old) = self.painted.take() {
                self.output.clear();
                self.output.erase_rect(old);
                self.flush();
            }
        }
    }

    fn font_metrics(&self, _style: &RenderStyle) -> FontMetrics {
        FontMetrics::TERMINAL
    }
}
