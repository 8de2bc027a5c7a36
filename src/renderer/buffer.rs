//! FrameBuffer and drawing primitives.
//!
//! A 2D grid of [`Cell`]s, row-major. Drawing takes signed coordinates and a
//! clip [`Rect`]: anything outside the clip or the buffer is dropped, so
//! callers can draw elements that hang off the viewport without checks.
//!
//! Wide glyphs occupy two cells, the second a continuation cell (`char == 0`).
//! A wide glyph that would be cut in half by the clip is drawn as a space,
//! and overwriting either half of one blanks the other half.

use crate::layout::char_width;
use crate::types::{Attr, BorderKind, Cell, Rect, Rgba};

/// Colors and attributes for a draw call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Brush {
    pub fg: Rgba,
    pub bg: Rgba,
    pub attrs: Attr,
}

impl Brush {
    pub const fn new(fg: Rgba, bg: Rgba, attrs: Attr) -> Self {
        Self { fg, bg, attrs }
    }

    fn cell(&self, ch: char) -> Cell {
        Cell::styled(ch, self.fg, self.bg, self.attrs)
    }
}

/// A 2D buffer of terminal cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    /// Create a buffer filled with default cells.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); width as usize * height as usize],
        }
    }

    #[inline]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u16 {
        self.height
    }

    /// The whole buffer as a rect.
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    pub fn get(&self, row: u16, col: u16) -> Option<&Cell> {
        if row < self.height && col < self.width {
            Some(&self.cells[row as usize * self.width as usize + col as usize])
        } else {
            None
        }
    }

    /// One row of cells (empty past the bottom).
    pub fn row(&self, row: u16) -> &[Cell] {
        if row >= self.height {
            return &[];
        }
        let start = row as usize * self.width as usize;
        &self.cells[start..start + self.width as usize]
    }

    /// Visible characters of a row; continuation cells are skipped.
    pub fn row_text(&self, row: u16) -> String {
        self.row(row).iter().filter_map(Cell::symbol).collect()
    }

    /// Index of a signed cell if it lies inside both the buffer and `clip`.
    fn slot(&self, row: i32, col: i32, clip: &Rect) -> Option<usize> {
        if !clip.contains(col, row) || !self.bounds().contains(col, row) {
            return None;
        }
        Some(row as usize * self.width as usize + col as usize)
    }

    /// Blank the other half of a wide glyph that has a half at `idx`.
    ///
    /// Called before `idx` is overwritten; the partner may lie outside any clip.
    fn split_wide(&mut self, idx: usize) {
        let col = idx % self.width as usize;
        if self.cells[idx].is_continuation() && col > 0 {
            self.cells[idx - 1].char = ' ' as u32;
        }
        if col + 1 < self.width as usize && self.cells[idx + 1].is_continuation() {
            self.cells[idx + 1].char = ' ' as u32;
        }
    }

    /// Write one cell. Returns false when clipped.
    pub fn set(&mut self, row: i32, col: i32, cell: Cell, clip: &Rect) -> bool {
        match self.slot(row, col, clip) {
            Some(idx) => {
                self.split_wide(idx);
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Fill `rect` with blanks in the brush's colors.
    pub fn fill(&mut self, rect: Rect, brush: Brush, clip: &Rect) {
        let Some(area) = rect.intersect(clip).and_then(|r| r.intersect(&self.bounds())) else {
            return;
        };
        let blank = brush.cell(' ');
        for row in area.row..area.bottom() {
            let start = row as usize * self.width as usize;
            self.split_wide(start + area.col as usize);
            self.split_wide(start + area.right() as usize - 1);
            self.cells[start + area.col as usize..start + area.right() as usize].fill(blank);
        }
    }

    /// Draw text starting at a cell. Returns the columns advanced.
    pub fn draw_text(&mut self, row: i32, col: i32, text: &str, brush: Brush, clip: &Rect) -> u16 {
        let mut x = col;
        for ch in text.chars() {
            let width = char_width(ch);
            match width {
                0 => continue,
                1 => {
                    self.set(row, x, brush.cell(ch), clip);
                }
                _ => {
                    let lead = self.slot(row, x, clip);
                    let tail = self.slot(row, x + 1, clip);
                    for idx in [lead, tail].into_iter().flatten() {
                        self.split_wide(idx);
                    }
                    match (lead, tail) {
                        (Some(lead), Some(tail)) => {
                            self.cells[lead] = brush.cell(ch);
                            self.cells[tail] = Cell { char: 0, ..brush.cell(' ') };
                        }
                        (Some(idx), None) | (None, Some(idx)) => self.cells[idx] = brush.cell(' '),
                        (None, None) => {}
                    }
                }
            }
            x += width as i32;
        }
        u16::try_from(x - col).unwrap_or(u16::MAX)
    }

    /// Draw a border along the edges of `rect`.
    ///
    /// `Line` borders use box-drawing glyphs; `Bg` borders are blanks in the
    /// brush's background.
    pub fn draw_border(&mut self, rect: Rect, kind: BorderKind, brush: Brush, clip: &Rect) {
        if kind == BorderKind::None || rect.width == 0 || rect.height == 0 {
            return;
        }
        let (horiz, vert, tl, tr, br, bl) = kind.chars();
        let (top, left) = (rect.row, rect.col);
        let (bottom, right) = (rect.bottom() - 1, rect.right() - 1);

        for x in left + 1..right {
            self.set(top, x, brush.cell(horiz), clip);
            self.set(bottom, x, brush.cell(horiz), clip);
        }
        for y in top + 1..bottom {
            self.set(y, left, brush.cell(vert), clip);
            self.set(y, right, brush.cell(vert), clip);
        }
        self.set(top, left, brush.cell(tl), clip);
        self.set(top, right, brush.cell(tr), clip);
        self.set(bottom, right, brush.cell(br), clip);
        self.set(bottom, left, brush.cell(bl), clip);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BRUSH: Brush = Brush::new(Rgba::WHITE, Rgba::MAGENTA, Attr::NONE);

    #[test]
    fn test_framebuffer_creation() {
        let buf = FrameBuffer::new(10, 3);
        assert_eq!(buf.row(2).len(), 10);
        assert_eq!(buf.get(2, 9), Some(&Cell::default()));
        assert_eq!(buf.get(3, 0), None);
        assert_eq!(buf.row_text(0), " ".repeat(10));
    }

    #[test]
    fn test_fill_clipped() {
        let mut buf = FrameBuffer::new(10, 5);
        let clip = Rect::new(0, 0, 10, 2);
        buf.fill(Rect::new(-1, 8, 5, 5), BRUSH, &clip);

        assert_eq!(buf.get(0, 8).unwrap().bg, Rgba::MAGENTA);
        assert_eq!(buf.get(1, 9).unwrap().bg, Rgba::MAGENTA);
        assert_eq!(buf.get(2, 9).unwrap().bg, Rgba::TERMINAL_DEFAULT);
        assert_eq!(buf.get(0, 7).unwrap().bg, Rgba::TERMINAL_DEFAULT);
    }

    #[test]
    fn test_draw_text_negative_start() {
        let mut buf = FrameBuffer::new(5, 1);
        let bounds = buf.bounds();
        let advanced = buf.draw_text(0, -2, "abcdefg", BRUSH, &bounds);
        assert_eq!(advanced, 7);
        assert_eq!(buf.row_text(0), "cdefg");
    }

    #[test]
    fn test_wide_chars() {
        let mut buf = FrameBuffer::new(5, 1);
        let bounds = buf.bounds();
        buf.draw_text(0, 0, "日本", BRUSH, &bounds);
        assert!(buf.get(0, 1).unwrap().is_continuation());
        assert_eq!(buf.row_text(0), "日本 ");

        // Cut by the clip: drawn as a blank
        let mut buf = FrameBuffer::new(5, 1);
        buf.draw_text(0, 3, "日本", BRUSH, &Rect::new(0, 0, 4, 1));
        assert_eq!(buf.row_text(0), "     ");
        assert!(!buf.get(0, 3).unwrap().is_continuation());
    }

    #[test]
    fn test_overwriting_half_a_wide_glyph_blanks_the_other() {
        let mut buf = FrameBuffer::new(4, 1);
        let bounds = buf.bounds();

        buf.draw_text(0, 0, "日", BRUSH, &bounds);
        buf.set(0, 0, Cell::default(), &bounds);
        assert!(!buf.get(0, 1).unwrap().is_continuation());
        assert_eq!(buf.get(0, 1).unwrap().bg, Rgba::MAGENTA);
        assert_eq!(buf.row_text(0), "    ");

        buf.draw_text(0, 2, "日", BRUSH, &bounds);
        buf.draw_text(0, 3, "z", BRUSH, &bounds);
        assert_eq!(buf.row_text(0), "   z");

        // A wide glyph landing on the tail of another
        let mut buf = FrameBuffer::new(5, 1);
        let bounds = buf.bounds();
        buf.draw_text(0, 0, "日", BRUSH, &bounds);
        buf.draw_text(0, 1, "本", BRUSH, &bounds);
        assert_eq!(buf.row_text(0), " 本  ");
        assert!(buf.get(0, 2).unwrap().is_continuation());

        // Fill edges cut through wide glyphs
        let mut buf = FrameBuffer::new(6, 1);
        let bounds = buf.bounds();
        buf.draw_text(0, 0, "日本語", BRUSH, &bounds);
        buf.fill(Rect::new(0, 1, 4, 1), BRUSH, &bounds);
        assert_eq!(buf.row_text(0), "      ");
        assert!(buf.row(0).iter().all(|cell| !cell.is_continuation()));
    }

    #[test]
    fn test_draw_text_advance_saturates() {
        let mut buf = FrameBuffer::new(2, 1);
        let bounds = buf.bounds();
        let long = "a".repeat(70_000);
        assert_eq!(buf.draw_text(0, 0, &long, BRUSH, &bounds), u16::MAX);
        assert_eq!(buf.row_text(0), "aa");
    }

    #[test]
    fn test_line_border() {
        let mut buf = FrameBuffer::new(4, 3);
        let bounds = buf.bounds();
        buf.draw_border(bounds, BorderKind::Line, BRUSH, &bounds);
        assert_eq!(buf.row_text(0), "┌──┐");
        assert_eq!(buf.row_text(1), "│  │");
        assert_eq!(buf.row_text(2), "└──┘");
    }

    #[test]
    fn test_bg_border() {
        let mut buf = FrameBuffer::new(3, 3);
        let bounds = buf.bounds();
        buf.draw_border(bounds, BorderKind::Bg, BRUSH, &bounds);
        assert_eq!(buf.row_text(0), "   ");
        assert_eq!(buf.get(0, 0).unwrap().bg, Rgba::MAGENTA);
        assert_eq!(buf.get(1, 1).unwrap().bg, Rgba::TERMINAL_DEFAULT);
    }
}
