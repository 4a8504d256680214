use cubeview_engine::color::{channels_to_hex, hex_to_rgb};

use crate::CellText;

/// Label shown on black (background) cells.
pub const BLANK_TEXT: [char; 2] = ['_', '_'];

const BLACK: &str = "#000000";

/// One display unit: a pixel's color and a two-character label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub x: u32,
    pub y: u32,
    /// `#rrggbb`.
    pub color: String,
    pub text: [char; 2],
}

impl Cell {
    /// Builds the cell at `(x, y)` from raw RGBA bytes laid out `width` pixels
    /// per row.
    ///
    /// Channels past the end of `bytes` read as `0`, so a short or empty
    /// buffer yields black cells. Lit cells draw a label from `text`.
    pub fn from_bytes(bytes: &[u8], x: u32, y: u32, width: u32, text: &mut CellText) -> Self {
        let i = (y as usize * width as usize + x as usize) * 4;
        let channel = |offset: usize| bytes.get(i + offset).copied();
        let color = channels_to_hex([channel(0), channel(1), channel(2)]);

        let text = if color == BLACK {
            BLANK_TEXT
        } else {
            text.next_label()
        };

        Self { x, y, color, text }
    }

    /// `true` for background cells.
    pub fn is_blank(&self) -> bool {
        self.color == BLACK
    }

    /// Color as bytes.
    pub fn rgb(&self) -> [u8; 3] {
        // `color` is always produced by `channels_to_hex`.
        hex_to_rgb(&self.color).unwrap_or([0, 0, 0])
    }

    /// Stable identifier, `CELL:x:y`.
    pub fn key(&self) -> String {
        format!("CELL:{}:{}", self.x, self.y)
    }
}
