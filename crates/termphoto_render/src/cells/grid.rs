use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};

/// Glyph used for every cell; a full block approximates one pixel.
pub const BLOCK_GLYPH: char = '█';

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellColor {
    /// Index into the 256-color table.
    Indexed(u8),
    Rgb([u8; 3]),
}

impl From<CellColor> for Color {
    fn from(color: CellColor) -> Self {
        match color {
            CellColor::Indexed(index) => Color::AnsiValue(index),
            CellColor::Rgb([r, g, b]) => Color::Rgb { r, g, b },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TerminalCell {
    pub color: CellColor,
    pub glyph: char,
}

impl TerminalCell {
    pub fn new(color: CellColor) -> Self {
        Self { color, glyph: BLOCK_GLYPH }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameItem {
    Cell(TerminalCell),
    RowBreak,
}

/// One rendered image: row-major cells, each row terminated by a row break.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub width: u16,
    pub height: u16,
    items: Vec<FrameItem>,
}

impl Frame {
    pub fn with_capacity(width: u16, height: u16) -> Self {
        let capacity = (usize::from(width) + 1) * usize::from(height);
        Self { width, height, items: Vec::with_capacity(capacity) }
    }

    pub fn push_cell(&mut self, cell: TerminalCell) {
        self.items.push(FrameItem::Cell(cell));
    }

    pub fn end_row(&mut self) {
        self.items.push(FrameItem::RowBreak);
    }

    pub fn items(&self) -> &[FrameItem] {
        &self.items
    }

    pub fn cells(&self) -> impl Iterator<Item = &TerminalCell> + '_ {
        self.items.iter().filter_map(|item| match item {
            FrameItem::Cell(cell) => Some(cell),
            FrameItem::RowBreak => None,
        })
    }

    pub fn row_breaks(&self) -> usize {
        self.items.iter().filter(|item| matches!(item, FrameItem::RowBreak)).count()
    }

    /// Encode the frame as ANSI escape sequences.
    ///
    /// Every cell resets its color after the glyph, so nothing leaks into the
    /// next cell or the next frame. With `home_cursor` the frame starts at the
    /// top-left corner and replaces whatever was drawn before.
    pub fn encode(&self, home_cursor: bool) -> io::Result<Vec<u8>> {
        // Roughly 16 bytes per indexed cell.
        let mut buffer = Vec::with_capacity(self.items.len() * 16);
        if home_cursor {
            queue!(buffer, MoveTo(0, 0), Clear(ClearType::FromCursorDown))?;
        }

        for item in &self.items {
            match item {
                FrameItem::Cell(cell) => {
                    queue!(
                        buffer,
                        SetForegroundColor(cell.color.into()),
                        Print(cell.glyph),
                        ResetColor
                    )?;
                },
                FrameItem::RowBreak => buffer.push(b'\n'),
            }
        }

        Ok(buffer)
    }

    /// Write the whole frame in one go and flush, so it never shows half drawn.
    pub fn present<W: Write>(&self, out: &mut W, home_cursor: bool) -> io::Result<()> {
        let buffer = self.encode(home_cursor)?;
        out.write_all(&buffer)?;
        out.flush()
    }
}
