//! `TickerString`: the composed quote line, repeated for a seamless loop.
//!
//! The line is stored once as a *unit* and laid out `REPEAT_COUNT` times.
//! Both the composed text and the wrap width are derived from that one
//! unit, so string construction and wrap math can never disagree about
//! how many repetitions there are.

use crate::compositor::FontMetrics;
use unicode_width::UnicodeWidthStr;

/// How many back-to-back copies of the unit make up the rendered text.
///
/// Must be at least 2 so scrolling past one repetition shows the next.
pub const REPEAT_COUNT: usize = 3;

const _: () = assert!(REPEAT_COUNT >= 2, "a seamless loop needs at least two repetitions");

/// Placeholder shown before the first successful refresh.
pub const LOADING_UNIT: &str = "Loading...   ";

/// Placeholder shown right after a configuration reload.
pub const RELOADING_UNIT: &str = "Reloading...   ";

/// The current display string of the ticker.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct TickerString {
    /// The unit repeated `REPEAT_COUNT` times.
    text: String,
    /// Byte length of one unit inside `text`.
    unit_len: usize,
    /// Display columns of one unit under the fixed-width font model.
    unit_columns: usize,
}

impl TickerString {
    /// Build the seamless-loop text from one composed line.
    pub fn from_unit(unit: &str) -> Self {
        let ticker = Self {
            text: unit.repeat(REPEAT_COUNT),
            unit_len: unit.len(),
            unit_columns: unit.width(),
        };
        debug_assert_eq!(ticker.text.len(), ticker.unit_len * REPEAT_COUNT);
        ticker
    }

    /// The empty ticker; rendering it is a no-op.
    pub const fn empty() -> Self {
        Self {
            text: String::new(),
            unit_len: 0,
            unit_columns: 0,
        }
    }

    /// The "Loading..." placeholder.
    pub fn loading() -> Self {
        Self::from_unit(LOADING_UNIT)
    }

    /// The "Reloading..." placeholder.
    pub fn reloading() -> Self {
        Self::from_unit(RELOADING_UNIT)
    }

    /// Full text to draw (the unit, repeated).
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// One repetition of the composed line.
    #[inline]
    pub fn unit(&self) -> &str {
        &self.text[..self.unit_len]
    }

    /// Whether there is anything to draw.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Character count of one repetition.
    pub fn cycle_chars(&self) -> usize {
        self.unit().chars().count()
    }

    /// Pixel width of one repetition: the modulus for scroll wraparound.
    #[inline]
    pub fn cycle_width(&self, metrics: FontMetrics) -> f64 {
        (self.unit_columns * metrics.char_width as usize) as f64
    }
}

impl std::fmt::Debug for TickerString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TickerString")
            .field("unit", &self.unit())
            .field("repeat", &REPEAT_COUNT)
            .finish()
    }
}

impl std::fmt::Display for TickerString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}
