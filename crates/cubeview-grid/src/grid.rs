use cubeview_engine::PixelBuffer;

use crate::{Cell, CellText};

/// One row of cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub y: u32,
    pub cells: Vec<Cell>,
}

impl Line {
    /// Stable identifier, `LINE:y`.
    pub fn key(&self) -> String {
        format!("LINE:{}", self.y)
    }

    /// Labels concatenated, two characters per cell.
    pub fn text(&self) -> String {
        self.cells.iter().flat_map(|c| c.text).collect()
    }
}

/// A frame laid out as `height` lines of `width` cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: u32,
    height: u32,
    lines: Vec<Line>,
}

impl Grid {
    /// Builds a grid from raw RGBA bytes.
    ///
    /// `bytes` is indexed with the grid's own `width`; it may be shorter than
    /// `width * height * 4` (e.g. before the first frame arrives), in which
    /// case the missing cells are black.
    pub fn from_bytes(bytes: &[u8], width: u32, height: u32, text: &mut CellText) -> Self {
        let lines: Vec<Line> = (0..height)
            .map(|y| Line {
                y,
                cells: (0..width)
                    .map(|x| Cell::from_bytes(bytes, x, y, width, text))
                    .collect(),
            })
            .collect();

        if bytes.len() < width as usize * height as usize * 4 {
            log::trace!(
                "grid {width}x{height} built from a short buffer ({} bytes)",
                bytes.len()
            );
        }

        Self {
            width,
            height,
            lines,
        }
    }

    /// Builds a grid the size of `frame`.
    pub fn from_frame(frame: &PixelBuffer, text: &mut CellText) -> Self {
        Self::from_bytes(frame.as_bytes(), frame.width(), frame.height(), text)
    }

    /// An all-black grid.
    pub fn blank(width: u32, height: u32) -> Self {
        Self::from_bytes(&[], width, height, &mut CellText::default())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn cell(&self, x: u32, y: u32) -> Option<&Cell> {
        self.lines.get(y as usize)?.cells.get(x as usize)
    }

    /// Number of non-background cells.
    pub fn lit_cells(&self) -> usize {
        self.lines
            .iter()
            .flat_map(|l| &l.cells)
            .filter(|c| !c.is_blank())
            .count()
    }

    /// Plain-text rendering, one line per row, no colors.
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity((self.width as usize * 2 + 1) * self.height as usize);
        for line in &self.lines {
            out.push_str(&line.text());
            out.push('\n');
        }
        out
    }
}
