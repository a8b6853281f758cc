//! Scroll animation: advance the offset by `speed` each tick and wrap
//! it modulo the cycle width.
//!
//! Wrapping uses `%` rather than a reset to zero, so a speed that does
//! not divide the cycle width evenly still moves by exactly `speed` pixels
//! across the seam.

/// Compute the next scroll offset.
///
/// With a zero cycle width (empty text) the offset does not move.
#[inline]
pub fn next_offset(current: f64, cycle_width: f64, speed: f64) -> f64 {
    if cycle_width <= 0.0 {
        return current;
    }
    let next = current + speed;
    if next >= cycle_width {
        next % cycle_width
    } else {
        next
    }
}

/// Scroll position of the strip, owned by the control thread.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollState {
    offset: f64,
    speed: f64,
}

impl ScrollState {
    /// Start at offset 0 with the given speed (pixels per tick).
    pub const fn new(speed: f64) -> Self {
        Self { offset: 0.0, speed }
    }

    /// Current offset in pixels (fractional).
    #[inline]
    pub const fn offset(&self) -> f64 {
        self.offset
    }

    /// Pixels advanced per tick.
    #[inline]
    pub const fn speed(&self) -> f64 {
        self.speed
    }

    /// Change the speed; the offset is kept.
    pub const fn set_speed(&mut self, speed: f64) {
        self.speed = speed;
    }

    /// Advance one tick against the current cycle width and return the new offset.
    pub fn advance(&mut self, cycle_width: f64) -> f64 {
        self.offset = next_offset(self.offset, cycle_width, self.speed);
        self.offset
    }
}
