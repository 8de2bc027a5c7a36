//! Core types for mentalitty.
//!
//! These types define the foundation that everything builds on.
//! Layout produces [`Rect`]s, the compositor fills [`Cell`]s, the renderer
//! turns changed cells into escape sequences.

use serde::Deserialize;

use crate::error::SpecError;

// =============================================================================
// Color
// =============================================================================

/// RGBA color with 8-bit channels (0-255).
///
/// Using integers for exact comparison - no floating point epsilon needed.
/// Special values: r=-1 means "terminal default", r=-2 marks an ANSI palette
/// index stored in `g`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub struct Rgba {
    pub r: i16,
    pub g: i16,
    pub b: i16,
    pub a: i16,
}

impl Rgba {
    /// Create a new RGBA color.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as i16,
            g: g as i16,
            b: b as i16,
            a: a as i16,
        }
    }

    /// Create an opaque RGB color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Terminal default color (let terminal decide).
    pub const TERMINAL_DEFAULT: Self = Self {
        r: -1,
        g: -1,
        b: -1,
        a: -1,
    };

    pub const BLACK: Self = Self::ansi(0);
    pub const RED: Self = Self::ansi(1);
    pub const GREEN: Self = Self::ansi(2);
    pub const YELLOW: Self = Self::ansi(3);
    pub const BLUE: Self = Self::ansi(4);
    pub const MAGENTA: Self = Self::ansi(5);
    pub const CYAN: Self = Self::ansi(6);
    pub const WHITE: Self = Self::ansi(7);

    /// Create an ANSI palette color (0-255).
    ///
    /// - 0-7: Standard colors
    /// - 8-15: Bright colors
    /// - 16-231: 6x6x6 RGB cube
    /// - 232-255: Grayscale
    pub const fn ansi(index: u8) -> Self {
        Self {
            r: -2,
            g: index as i16,
            b: 0,
            a: 255,
        }
    }

    /// Check if this is the terminal default color.
    #[inline]
    pub const fn is_terminal_default(&self) -> bool {
        self.r == -1
    }

    /// Check if this is an ANSI palette color.
    #[inline]
    pub const fn is_ansi(&self) -> bool {
        self.r == -2
    }

    /// Get ANSI palette index (only valid if is_ansi() returns true).
    #[inline]
    pub const fn ansi_index(&self) -> u8 {
        self.g as u8
    }

    /// Create from 0xRRGGBB integer format.
    pub const fn from_rgb_int(rgb: u32) -> Self {
        Self::rgb(
            ((rgb >> 16) & 0xFF) as u8,
            ((rgb >> 8) & 0xFF) as u8,
            (rgb & 0xFF) as u8,
        )
    }

    /// Parse hex color string (#RGB, #RRGGBB).
    ///
    /// Returns None for invalid format.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');

        fn hex_digit(c: u8) -> Option<u8> {
            match c {
                b'0'..=b'9' => Some(c - b'0'),
                b'a'..=b'f' => Some(c - b'a' + 10),
                b'A'..=b'F' => Some(c - b'A' + 10),
                _ => None,
            }
        }

        fn hex_byte(s: &[u8], i: usize) -> Option<u8> {
            let high = hex_digit(s[i])?;
            let low = hex_digit(s[i + 1])?;
            Some((high << 4) | low)
        }

        let bytes = hex.as_bytes();
        match bytes.len() {
            // #RGB -> expand to #RRGGBB
            3 => {
                let r = hex_digit(bytes[0])?;
                let g = hex_digit(bytes[1])?;
                let b = hex_digit(bytes[2])?;
                Some(Self::rgb((r << 4) | r, (g << 4) | g, (b << 4) | b))
            }
            6 => {
                let r = hex_byte(bytes, 0)?;
                let g = hex_byte(bytes, 2)?;
                let b = hex_byte(bytes, 4)?;
                Some(Self::rgb(r, g, b))
            }
            _ => None,
        }
    }

    /// Look up a named terminal color.
    ///
    /// Accepts the eight standard names, their `light-`/`bright-` variants,
    /// and `gray`/`grey` for bright black.
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.trim().to_ascii_lowercase();
        let (bright, base) = match lower
            .strip_prefix("light-")
            .or_else(|| lower.strip_prefix("bright-"))
            .or_else(|| lower.strip_prefix("light"))
            .or_else(|| lower.strip_prefix("bright"))
        {
            Some(rest) => (true, rest),
            None => (false, lower.as_str()),
        };

        let index = match base {
            "black" => 0,
            "red" => 1,
            "green" => 2,
            "yellow" => 3,
            "blue" => 4,
            "magenta" => 5,
            "cyan" => 6,
            "white" => 7,
            "gray" | "grey" => return Some(Self::ansi(8)),
            _ => return None,
        };

        Some(Self::ansi(if bright { index + 8 } else { index }))
    }

    /// Parse any supported color format.
    ///
    /// Supports:
    /// - named colors (`red`, `light-blue`, `grey`)
    /// - hex (#RGB, #RRGGBB)
    /// - "default" for terminal default
    ///
    /// # Examples
    ///
    /// ```
    /// use mentalitty::types::Rgba;
    ///
    /// assert_eq!(Rgba::parse("magenta"), Some(Rgba::MAGENTA));
    /// assert_eq!(Rgba::parse("#f0f0f0"), Some(Rgba::rgb(240, 240, 240)));
    /// assert!(Rgba::parse("default").unwrap().is_terminal_default());
    /// assert!(Rgba::parse("invalid-color").is_none());
    /// ```
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        if input.eq_ignore_ascii_case("default") {
            return Some(Self::TERMINAL_DEFAULT);
        }

        if input.starts_with('#') {
            return Self::from_hex(input);
        }

        Self::from_name(input)
    }
}

impl TryFrom<String> for Rgba {
    type Error = SpecError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or(SpecError {
            kind: "color",
            value,
        })
    }
}

// =============================================================================
// Cell Attributes (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Text attributes as a bitfield for efficient storage and comparison.
    ///
    /// Combine with bitwise OR: `Attr::BOLD | Attr::UNDERLINE`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Attr: u8 {
        const NONE = 0;
        const BOLD = 1 << 0;
        const DIM = 1 << 1;
        const ITALIC = 1 << 2;
        const UNDERLINE = 1 << 3;
        const BLINK = 1 << 4;
        const INVERSE = 1 << 5;
        const HIDDEN = 1 << 6;
        const STRIKETHROUGH = 1 << 7;
    }
}

// =============================================================================
// Cell - The atomic unit of terminal rendering
// =============================================================================

/// A single terminal cell.
///
/// This is what the renderer deals with. Nothing more complex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// Unicode codepoint (32 for space, 0 for the right half of a wide glyph).
    pub char: u32,
    pub fg: Rgba,
    pub bg: Rgba,
    pub attrs: Attr,
}

impl Cell {
    /// Build a cell from a character and its style.
    pub const fn styled(ch: char, fg: Rgba, bg: Rgba, attrs: Attr) -> Self {
        Self {
            char: ch as u32,
            fg,
            bg,
            attrs,
        }
    }

    /// The character stored in this cell, or `None` for a continuation cell.
    pub fn symbol(&self) -> Option<char> {
        if self.is_continuation() {
            None
        } else {
            char::from_u32(self.char)
        }
    }

    /// Whether this cell is the trailing half of a wide character.
    #[inline]
    pub const fn is_continuation(&self) -> bool {
        self.char == 0
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            char: b' ' as u32,
            fg: Rgba::TERMINAL_DEFAULT,
            bg: Rgba::TERMINAL_DEFAULT,
            attrs: Attr::NONE,
        }
    }
}

// =============================================================================
// Rect - Resolved geometry
// =============================================================================

/// An absolute rectangle of terminal cells.
///
/// `row`/`col` may be negative for elements pushed off the top or left edge;
/// everything outside the viewport is clipped when drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub row: i32,
    pub col: i32,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub const fn new(row: i32, col: i32, width: u16, height: u16) -> Self {
        Self {
            row,
            col,
            width,
            height,
        }
    }

    #[inline]
    pub const fn bottom(&self) -> i32 {
        self.row + self.height as i32
    }

    #[inline]
    pub const fn right(&self) -> i32 {
        self.col + self.width as i32
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Check if a cell is inside this rect.
    #[inline]
    pub fn contains(&self, col: i32, row: i32) -> bool {
        col >= self.col && col < self.right() && row >= self.row && row < self.bottom()
    }

    /// Compute intersection of two rects.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let row = self.row.max(other.row);
        let col = self.col.max(other.col);
        let bottom = self.bottom().min(other.bottom());
        let right = self.right().min(other.right());

        if right > col && bottom > row {
            Some(Rect {
                row,
                col,
                width: (right - col) as u16,
                height: (bottom - row) as u16,
            })
        } else {
            None
        }
    }

    /// Shrink by `n` cells on every side (saturating to an empty rect).
    pub fn inset(&self, n: u16) -> Rect {
        Rect {
            row: self.row + n as i32,
            col: self.col + n as i32,
            width: self.width.saturating_sub(n * 2),
            height: self.height.saturating_sub(n * 2),
        }
    }
}

// =============================================================================
// Border
// =============================================================================

/// Border kind of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderKind {
    #[default]
    None,
    /// ─ │ ┌ ┐ └ ┘
    Line,
    /// Blank cells painted with the border background.
    Bg,
}

impl BorderKind {
    /// Border thickness in cells on each side.
    pub const fn thickness(&self) -> u16 {
        match self {
            Self::None => 0,
            Self::Line | Self::Bg => 1,
        }
    }

    /// Get the border characters for this kind.
    ///
    /// Returns: (horizontal, vertical, top_left, top_right, bottom_right, bottom_left)
    pub const fn chars(&self) -> (char, char, char, char, char, char) {
        match self {
            Self::None | Self::Bg => (' ', ' ', ' ', ' ', ' ', ' '),
            Self::Line => ('─', '│', '┌', '┐', '┘', '└'),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
