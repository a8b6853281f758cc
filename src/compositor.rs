//! Frame compositor: draws the ticker text into an off-screen buffer and
//! presents it to the host surface in one operation.
//!
//! ```text
//!   SharedTextBuffer ──read──▶ FrameCompositor ──present──▶ Surface
//!        (text)                 fill bg, draw at -offset        (host)
//! ```

use crate::buffer::{Buffer, Cell, Modifiers, Rgb};
use crate::layout::{Point, Rect};
use tracing::{debug, warn};

/// Full opacity. The frame's own cells decide what is visible.
pub const OPAQUE: u8 = 255;

/// Fixed-width glyph metrics in surface units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontMetrics {
    /// Horizontal advance of one glyph column.
    pub char_width: u16,
    /// Height of one text line.
    pub line_height: u16,
}

impl FontMetrics {
    /// A terminal cell: one column wide, one row tall.
    pub const TERMINAL: Self = Self::new(1, 1);

    /// Create new metrics. Zero values are raised to 1.
    pub const fn new(char_width: u16, line_height: u16) -> Self {
        Self {
            char_width: if char_width == 0 { 1 } else { char_width },
            line_height: if line_height == 0 { 1 } else { line_height },
        }
    }
}

/// How the ticker text is drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderStyle {
    /// Font family requested from hosts that have fonts.
    pub font_name: String,
    /// Font size in points.
    pub font_size: u16,
    /// Glyph color.
    pub text_color: Rgb,
    /// Strip background.
    pub background: Rgb,
    /// Text modifiers (bold etc.).
    pub modifiers: Modifiers,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            font_name: "Consolas".to_string(),
            font_size: 16,
            text_color: Rgb::new(0, 255, 0),
            background: Rgb::BLACK,
            modifiers: Modifiers::empty(),
        }
    }
}

/// The host's presentation surface.
///
/// Every call reports failure as a plain `bool`; nothing here is fatal.
pub trait Surface {
    /// Show `frame` at `dest` (screen top-left) with a global `opacity`.
    ///
    /// `dest = None` lets the surface keep its current position.
    fn present(&mut self, frame: &Buffer, dest: Option<Point>, opacity: u8) -> bool;

    /// Current screen rectangle of the surface.
    fn bounds(&self) -> Rect;

    /// Move/resize the surface.
    fn set_bounds(&mut self, bounds: Rect) -> bool;

    /// Whether alpha-composited ("layered") presentation is enabled.
    fn is_layered(&self) -> bool;

    /// Toggle layered presentation. Native repositioning is done with it off.
    fn set_layered(&mut self, layered: bool);

    /// Show or hide the surface.
    fn set_visible(&mut self, visible: bool);

    /// Measure the fixed-width glyph cell for `style`.
    fn font_metrics(&self, style: &RenderStyle) -> FontMetrics;
}

/// Result of one [`FrameCompositor::render_frame`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentOutcome {
    /// Presented at the requested position.
    Presented,
    /// The first attempt was rejected; presenting without a destination worked.
    PresentedWithoutDestination,
    /// Both attempts were rejected; the frame was discarded.
    Dropped,
}

impl PresentOutcome {
    /// Whether anything reached the screen.
    pub const fn is_presented(self) -> bool {
        !matches!(self, Self::Dropped)
    }
}

/// Compositor statistics.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameStats {
    /// Frames that reached the screen.
    pub presented: u64,
    /// Frames that needed the no-destination retry.
    pub fallbacks: u64,
    /// Frames dropped after both attempts failed.
    pub dropped: u64,
}

/// Renders the ticker into an off-screen buffer and presents it.
#[derive(Debug)]
pub struct FrameCompositor {
    style: RenderStyle,
    metrics: FontMetrics,
    /// Reused between frames; reallocated when the strip size changes.
    frame: Option<Buffer>,
    stats: FrameStats,
}

impl FrameCompositor {
    /// Create a compositor for the given style.
    pub const fn new(style: RenderStyle, metrics: FontMetrics) -> Self {
        Self {
            style,
            metrics,
            frame: None,
            stats: FrameStats {
                presented: 0,
                fallbacks: 0,
                dropped: 0,
            },
        }
    }

    /// Active style.
    pub const fn style(&self) -> &RenderStyle {
        &self.style
    }

    /// Replace the style (configuration reload).
    pub fn set_style(&mut self, style: RenderStyle) {
        self.style = style;
    }

    /// Active glyph metrics.
    pub const fn metrics(&self) -> FontMetrics {
        self.metrics
    }

    /// Replace the glyph metrics (after a font or geometry change).
    pub const fn set_metrics(&mut self, metrics: FontMetrics) {
        self.metrics = metrics;
    }

    /// Counters since creation.
    pub const fn stats(&self) -> FrameStats {
        self.stats
    }

    /// The most recently composed frame.
    pub const fn last_frame(&self) -> Option<&Buffer> {
        self.frame.as_ref()
    }

    /// Compose `text` scrolled left by `offset` pixels into a frame the
    /// size of `area`, without presenting it.
    pub fn compose(&mut self, text: &str, offset: f64, area: Rect) -> &Buffer {
        let frame = self
            .frame
            .get_or_insert_with(|| Buffer::new(area.width, area.height));
        frame.resize(area.width, area.height);
        frame.fill(Cell::blank(self.style.background));

        let x = -(offset.floor() as i32);
        let y = area.height.saturating_sub(self.metrics.line_height) / 2;
        frame.draw_text(
            x,
            y,
            text,
            self.metrics.char_width,
            (self.style.text_color, self.style.background, self.style.modifiers),
        );

        frame
    }

    /// Compose and present one frame.
    ///
    /// A rejected present is retried once without a destination; if that
    /// also fails the frame is dropped and the next tick replaces it.
    pub fn render_frame(
        &mut self,
        surface: &mut dyn Surface,
        text: &str,
        offset: f64,
        area: Rect,
    ) -> PresentOutcome {
        debug_assert!(!area.is_empty(), "render_frame called with an empty area");
        debug_assert!(!text.is_empty(), "render_frame called with empty text");

        self.compose(text, offset, area);
        let Some(frame) = self.frame.as_ref() else {
            return PresentOutcome::Dropped;
        };

        if surface.present(frame, Some(area.top_left()), OPAQUE) {
            self.stats.presented += 1;
            return PresentOutcome::Presented;
        }

        warn!(?area, "present rejected, retrying without destination");
        if surface.present(frame, None, OPAQUE) {
            self.stats.presented += 1;
            self.stats.fallbacks += 1;
            return PresentOutcome::PresentedWithoutDestination;
        }

        debug!(?area, "frame dropped");
        self.stats.dropped += 1;
        PresentOutcome::Dropped
    }
}
