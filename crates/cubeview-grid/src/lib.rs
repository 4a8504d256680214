//! Character-grid presentation of rendered frames.
//!
//! A [`Grid`] is `height` [`Line`]s of `width` [`Cell`]s. Cell `(x, y)` shows
//! pixel `(y * width + x)` of the frame; rows keep the frame's bottom-left
//! origin, so line `0` is the bottom scanline.

mod cell;
mod grid;
mod text;

pub use cell::{Cell, BLANK_TEXT};
pub use grid::{Grid, Line};
pub use text::CellText;
