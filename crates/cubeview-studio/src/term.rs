//! Draws a [`Grid`] to the terminal, one cell per two columns.

use std::io::{self, Write};

use anyhow::Result;
use crossterm::{
    cursor,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal, QueueableCommand,
};

use cubeview_grid::Grid;

pub struct TerminalView {
    stdout: io::Stdout,
    needs_clear: bool,
}

impl TerminalView {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            needs_clear: true,
        }
    }

    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.stdout.queue(terminal::EnterAlternateScreen)?;
        self.stdout.queue(cursor::Hide)?;
        self.stdout.queue(terminal::DisableLineWrap)?;
        self.stdout.flush()?;
        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        self.stdout.queue(ResetColor)?;
        self.stdout.queue(SetAttribute(Attribute::Reset))?;
        self.stdout.queue(terminal::EnableLineWrap)?;
        self.stdout.queue(cursor::Show)?;
        self.stdout.queue(terminal::LeaveAlternateScreen)?;
        self.stdout.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Clears the screen before the next draw. Call on terminal resize.
    pub fn invalidate(&mut self) {
        self.needs_clear = true;
    }

    /// Draws `grid` from the top-left corner and `status` on the row below it,
    /// clipped to the terminal size.
    pub fn draw(&mut self, grid: &Grid, status: &str) -> Result<()> {
        let (cols, rows) = terminal::size().unwrap_or((80, 24));

        if self.needs_clear {
            self.stdout.queue(terminal::Clear(terminal::ClearType::All))?;
            self.needs_clear = false;
        }

        let visible_cells = usize::from(cols / 2);
        let mut current: Option<[u8; 3]> = None;

        for (row, line) in grid.lines().iter().enumerate().take(usize::from(rows)) {
            self.stdout.queue(cursor::MoveTo(0, row as u16))?;
            for cell in line.cells.iter().take(visible_cells) {
                let rgb = cell.rgb();
                if current != Some(rgb) {
                    self.stdout.queue(SetBackgroundColor(rgb_color(rgb)))?;
                    self.stdout.queue(SetForegroundColor(foreground_for(rgb)))?;
                    current = Some(rgb);
                }
                let [a, b] = cell.text;
                self.stdout.queue(Print(a))?;
                self.stdout.queue(Print(b))?;
            }
        }

        self.stdout.queue(ResetColor)?;
        if let Ok(status_row) = u16::try_from(grid.lines().len()) {
            if status_row < rows {
                self.stdout.queue(cursor::MoveTo(0, status_row))?;
                self.stdout.queue(terminal::Clear(terminal::ClearType::UntilNewLine))?;
                let status: String = status.chars().take(usize::from(cols)).collect();
                self.stdout.queue(Print(status))?;
            }
        }

        self.stdout.flush()?;
        Ok(())
    }
}

impl Default for TerminalView {
    fn default() -> Self {
        Self::new()
    }
}

fn rgb_color([r, g, b]: [u8; 3]) -> Color {
    Color::Rgb { r, g, b }
}

/// Black or white, whichever reads better on `bg`.
pub fn foreground_for([r, g, b]: [u8; 3]) -> Color {
    let luma = (299 * u32::from(r) + 587 * u32::from(g) + 114 * u32::from(b)) / 1000;
    if luma > 128 { Color::Black } else { Color::White }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn light_faces_get_dark_text() {
        assert_eq!(foreground_for([0xff, 0xf2, 0x00]), Color::Black);
        assert_eq!(foreground_for([0xff, 0x7f, 0x27]), Color::Black);
    }

    #[test]
    fn dark_faces_get_light_text() {
        assert_eq!(foreground_for([0, 0, 0]), Color::White);
        assert_eq!(foreground_for([0x3f, 0x48, 0xcc]), Color::White);
        assert_eq!(foreground_for([0xed, 0x1c, 0x24]), Color::White);
    }
}
