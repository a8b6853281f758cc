//! `OutputBuffer`: single-syscall output buffer for ANSI sequences.

use crate::buffer::{Buffer, Modifiers, Rgb};
use crate::layout::{Point, Rect};
use std::io::Write;

/// Pre-allocated buffer for building ANSI escape sequences.
///
/// A whole frame is accumulated here, then flushed in a single `write()`
/// so the strip never shows a half-drawn frame.
#[derive(Debug)]
pub struct OutputBuffer {
    data: Vec<u8>,
}

impl OutputBuffer {
    /// Create a new output buffer with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    /// Create a buffer sized for a typical strip (4KB).
    pub fn new() -> Self {
        Self::with_capacity(4096)
    }

    /// Clear the buffer for reuse.
    #[inline]
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Get the buffer contents.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Check if buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Write a string.
    #[inline]
    pub fn write_str(&mut self, s: &str) {
        self.data.extend_from_slice(s.as_bytes());
    }

    /// Move cursor to (x, y) position (1-indexed for ANSI).
    #[inline]
    pub fn cursor_move(&mut self, x: u16, y: u16) {
        let _ = write!(self.data, "\x1b[{};{}H", y + 1, x + 1);
    }

    /// Hide cursor.
    #[inline]
    pub fn cursor_hide(&mut self) {
        self.data.extend_from_slice(b"\x1b[?25l");
    }

    /// Set foreground color (true color).
    #[inline]
    pub fn set_fg(&mut self, color: Rgb) {
        let _ = write!(self.data, "\x1b[38;2;{};{};{}m", color.r, color.g, color.b);
    }

    /// Set background color (true color).
    #[inline]
    pub fn set_bg(&mut self, color: Rgb) {
        let _ = write!(self.data, "\x1b[48;2;{};{};{}m", color.r, color.g, color.b);
    }

    /// Emit SGR sequences for a set of modifiers.
    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        if modifiers.contains(Modifiers::BOLD) {
            self.data.extend_from_slice(b"\x1b[1m");
        }
        if modifiers.contains(Modifiers::DIM) {
            self.data.extend_from_slice(b"\x1b[2m");
        }
        if modifiers.contains(Modifiers::ITALIC) {
            self.data.extend_from_slice(b"\x1b[3m");
        }
        if modifiers.contains(Modifiers::UNDERLINE) {
            self.data.extend_from_slice(b"\x1b[4m");
        }
    }

    /// Reset all attributes.
    #[inline]
    pub fn reset_attrs(&mut self) {
        self.data.extend_from_slice(b"\x1b[0m");
    }

    /// Encode a whole frame with its top-left corner at `origin`.
    ///
    /// Colors are scaled by `opacity`; SGR sequences are only emitted when
    /// a cell's style differs from the previous cell.
    pub fn write_frame(&mut self, frame: &Buffer, origin: Point, opacity: u8) {
        self.cursor_hide();
        self.reset_attrs();

        let mut last_fg: Option<Rgb> = None;
        let mut last_bg: Option<Rgb> = None;
        let mut last_mods = Modifiers::empty();

        for y in 0..frame.height() {
            self.cursor_move(origin.x, origin.y + y);
            let Some(row) = frame.row(y) else { break };

            for cell in row {
                if cell.is_wide_continuation() {
                    continue;
                }

                // Dropping a modifier needs a full reset, which also clears colors.
                if cell.modifiers() != last_mods {
                    if !last_mods.difference(cell.modifiers()).is_empty() {
                        self.reset_attrs();
                        last_fg = None;
                        last_bg = None;
                    }
                    self.set_modifiers(cell.modifiers());
                    last_mods = cell.modifiers();
                }

                let fg = cell.fg().scaled(opacity);
                if last_fg != Some(fg) {
                    self.set_fg(fg);
                    last_fg = Some(fg);
                }
                let bg = cell.bg().scaled(opacity);
                if last_bg != Some(bg) {
                    self.set_bg(bg);
                    last_bg = Some(bg);
                }

                self.write_str(cell.grapheme().unwrap_or(" "));
            }
        }

        self.reset_attrs();
    }

    /// Paint `rect` with blanks in the terminal's default colors.
    pub fn erase_rect(&mut self, rect: Rect) {
        self.reset_attrs();
        let blanks = " ".repeat(rect.width as usize);
        for y in rect.y..rect.bottom() {
            self.cursor_move(rect.x, y);
            self.write_str(&blanks);
        }
    }

    /// Flush to a writer in a single syscall.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails.
    pub fn flush_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(&self.data)?;
        writer.flush()
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}
