//! Layout module: screen geometry of the ticker strip.

mod rect;

pub use rect::{Point, Rect};
