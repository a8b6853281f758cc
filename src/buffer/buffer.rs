//! Buffer: the off-screen surface a frame is composed into.
//!
//! Cells are stored in row-major order in one contiguous `Vec`.

use super::cell::{Cell, Modifiers, Rgb};
use unicode_segmentation::UnicodeSegmentation;

/// A grid of cells sized to the visible ticker strip.
///
/// Access is in row-major order: `index = y * width + x`.
#[derive(Clone, PartialEq, Eq)]
pub struct Buffer {
    cells: Vec<Cell>,
    width: u16,
    height: u16,
}

impl Buffer {
    /// Create a new buffer with the given dimensions.
    ///
    /// # Panics
    /// Panics if width or height is 0.
    pub fn new(width: u16, height: u16) -> Self {
        assert!(width > 0 && height > 0, "Buffer dimensions must be non-zero");
        let size = (width as usize) * (height as usize);
        Self {
            cells: vec![Cell::EMPTY; size],
            width,
            height,
        }
    }

    /// Get the buffer width.
    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Get the buffer height.
    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Get a reference to the underlying cell slice.
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Convert (x, y) coordinates to a linear index.
    ///
    /// Returns `None` if coordinates are out of bounds.
    #[inline]
    pub fn index_of(&self, x: u16, y: u16) -> Option<usize> {
        if x < self.width && y < self.height {
            Some((y as usize) * (self.width as usize) + (x as usize))
        } else {
            None
        }
    }

    /// Get a reference to a cell at (x, y).
    #[inline]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index_of(x, y).map(|i| &self.cells[i])
    }

    /// Set a cell at (x, y).
    ///
    /// Returns `false` if coordinates are out of bounds.
    #[inline]
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) -> bool {
        if let Some(idx) = self.index_of(x, y) {
            self.cells[idx] = cell;
            true
        } else {
            false
        }
    }

    /// Get one row of cells.
    pub fn row(&self, y: u16) -> Option<&[Cell]> {
        if y >= self.height {
            return None;
        }
        let start = (y as usize) * (self.width as usize);
        Some(&self.cells[start..start + self.width as usize])
    }

    /// Fill the whole buffer with one cell.
    pub fn fill(&mut self, cell: Cell) {
        self.cells.fill(cell);
    }

    /// Resize the buffer. Content is discarded; every frame repaints.
    ///
    /// # Panics
    /// Panics if width or height is 0.
    pub fn resize(&mut self, width: u16, height: u16) {
        assert!(width > 0 && height > 0, "Buffer dimensions must be non-zero");
        if width == self.width && height == self.height {
            return;
        }
        self.cells = vec![Cell::EMPTY; (width as usize) * (height as usize)];
        self.width = width;
        self.height = height;
    }

    /// Draw a run of text on row `y` starting at column `x`.
    ///
    /// `x` may be negative: glyphs left of column 0 are clipped, which is
    /// how a scrolled-off prefix disappears. Each glyph advances by its
    /// display width times `advance` columns. Drawing stops at the right edge.
    ///
    /// Returns the column just past the last glyph laid out.
    pub fn draw_text(
        &mut self,
        x: i32,
        y: u16,
        text: &str,
        advance: u16,
        style: (Rgb, Rgb, Modifiers),
    ) -> i32 {
        let (fg, bg, modifiers) = style;
        let right = i32::from(self.width);
        let advance = i32::from(advance.max(1));
        let mut col = x;

        if y >= self.height {
            return col;
        }

        for grapheme in text.graphemes(true) {
            if col >= right {
                break;
            }
            let glyph_width = unicode_width::UnicodeWidthStr::width(grapheme) as i32;
            if glyph_width == 0 {
                continue;
            }
            let step = glyph_width * advance;
            if col + step <= 0 {
                col += step;
                continue;
            }

            let cell = Cell::from_grapheme(grapheme)
                .unwrap_or_else(|| Cell::from_char(char::REPLACEMENT_CHARACTER))
                .with_fg(fg)
                .with_bg(bg)
                .with_modifiers(modifiers);

            // A wide glyph straddling either edge is left as background.
            let fits = col >= 0 && col + glyph_width <= right;
            if fits {
                self.set(col as u16, y, cell);
                if glyph_width == 2 {
                    self.set(col as u16 + 1, y, Cell::wide_continuation().with_bg(bg));
                }
            }
            col += step;
        }

        col
    }

    /// Row text with continuation cells skipped (test and debug helper).
    pub fn row_text(&self, y: u16) -> String {
        self.row(y)
            .map(|cells| cells.iter().filter_map(Cell::grapheme).collect())
            .unwrap_or_default()
    }
}

impl std::fmt::Debug for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Buffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}
