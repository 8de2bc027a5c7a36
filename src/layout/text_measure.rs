//! Text Measurement
//!
//! Utilities for measuring text dimensions in terminal cells.
//!
//! Terminal text width depends on Unicode character widths:
//! - ASCII characters: 1 cell
//! - CJK characters: 2 cells (fullwidth)
//! - Emoji: 2 cells (most)
//! - Zero-width characters: 0 cells

use unicode_width::UnicodeWidthChar;

/// Display width of a single character in terminal cells.
#[inline]
pub fn char_width(c: char) -> u16 {
    match c as u32 {
        // Emoji blocks terminals draw two cells wide
        0x1F300..=0x1F64F | 0x1F680..=0x1F6FF | 0x1F900..=0x1F9FF => 2,
        _ => c.width().unwrap_or(0) as u16,
    }
}

/// Measure the display width of a string in terminal cells.
pub fn string_width(s: &str) -> u16 {
    s.chars().fold(0u16, |width, c| width.saturating_add(char_width(c)))
}
