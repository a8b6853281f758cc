//! Buffer module: the off-screen surface frames are composed into.
//!
//! This module contains:
//! - [`Cell`]: one styled grapheme
//! - [`Buffer`]: a grid of cells sized to the ticker strip
//! - [`Rgb`]: true-color representation
//! - [`Modifiers`]: text style bitflags

mod cell;
#[allow(clippy::module_inception)]
mod buffer;

pub use cell::{Cell, Modifiers, Rgb};
pub use buffer::Buffer;
