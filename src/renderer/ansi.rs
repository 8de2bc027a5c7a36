//! ANSI escape sequences for terminal control.
//!
//! Only the sequences the screen actually emits:
//! - cursor positioning and visibility
//! - alternate screen and clearing
//! - SGR colors (ANSI 16, 256, TrueColor) and attributes
//! - synchronized output, window title

use std::io::{Result, Write};

use crate::types::{Attr, Rgba};

// =============================================================================
// Cursor
// =============================================================================

/// Move the cursor to a 0-based cell (emitted 1-based).
#[inline]
pub fn cursor_to<W: Write>(w: &mut W, row: u16, col: u16) -> Result<()> {
    write!(w, "\x1b[{};{}H", row as u32 + 1, col as u32 + 1)
}

#[inline]
pub fn cursor_hide<W: Write>(w: &mut W) -> Result<()> {
    w.write_all(b"\x1b[?25l")
}

#[inline]
pub fn cursor_show<W: Write>(w: &mut W) -> Result<()> {
    w.write_all(b"\x1b[?25h")
}

// =============================================================================
// Screen
// =============================================================================

/// Clear the viewport and home the cursor.
#[inline]
pub fn clear_screen<W: Write>(w: &mut W) -> Result<()> {
    w.write_all(b"\x1b[2J\x1b[H")
}

#[inline]
pub fn enter_alt_screen<W: Write>(w: &mut W) -> Result<()> {
    w.write_all(b"\x1b[?1049h")
}

#[inline]
pub fn exit_alt_screen<W: Write>(w: &mut W) -> Result<()> {
    w.write_all(b"\x1b[?1049l")
}

/// Begin synchronized output (terminal buffers until [`end_sync`]).
#[inline]
pub fn begin_sync<W: Write>(w: &mut W) -> Result<()> {
    w.write_all(b"\x1b[?2026h")
}

#[inline]
pub fn end_sync<W: Write>(w: &mut W) -> Result<()> {
    w.write_all(b"\x1b[?2026l")
}

/// Set the window title (OSC 0).
#[inline]
pub fn set_title<W: Write>(w: &mut W, title: &str) -> Result<()> {
    // Control characters would terminate the OSC early
    let clean: String = title.chars().filter(|c| !c.is_control()).collect();
    write!(w, "\x1b]0;{clean}\x07")
}

// =============================================================================
// SGR
// =============================================================================

/// Reset all attributes and colors.
#[inline]
pub fn reset<W: Write>(w: &mut W) -> Result<()> {
    w.write_all(b"\x1b[0m")
}

/// SGR parameters selecting `color`; `base` is 30 for foreground, 40 for
/// background.
fn color_params(color: Rgba, base: u8) -> String {
    if color.is_terminal_default() {
        format!("{}", base + 9)
    } else if color.is_ansi() {
        match color.ansi_index() {
            i @ 0..=7 => format!("{}", base + i),
            i @ 8..=15 => format!("{}", base + 60 + i - 8),
            i => format!("{};5;{}", base + 8, i),
        }
    } else {
        format!("{};2;{};{};{}", base + 8, color.r, color.g, color.b)
    }
}

#[inline]
pub fn fg<W: Write>(w: &mut W, color: Rgba) -> Result<()> {
    write!(w, "\x1b[{}m", color_params(color, 30))
}

#[inline]
pub fn bg<W: Write>(w: &mut W, color: Rgba) -> Result<()> {
    write!(w, "\x1b[{}m", color_params(color, 40))
}

const ATTR_CODES: [(Attr, u8); 8] = [
    (Attr::BOLD, 1),
    (Attr::DIM, 2),
    (Attr::ITALIC, 3),
    (Attr::UNDERLINE, 4),
    (Attr::BLINK, 5),
    (Attr::INVERSE, 7),
    (Attr::HIDDEN, 8),
    (Attr::STRIKETHROUGH, 9),
];

/// Set text attributes from bitflags. Emits nothing for an empty set.
pub fn attrs<W: Write>(w: &mut W, attr: Attr) -> Result<()> {
    if attr.is_empty() {
        return Ok(());
    }
    let codes: Vec<String> = ATTR_CODES
        .iter()
        .filter(|(flag, _)| attr.contains(*flag))
        .map(|(_, code)| code.to_string())
        .collect();
    write!(w, "\x1b[{}m", codes.join(";"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_string<F: FnOnce(&mut Vec<u8>) -> Result<()>>(f: F) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_cursor_to() {
        assert_eq!(to_string(|w| cursor_to(w, 0, 0)), "\x1b[1;1H");
        assert_eq!(to_string(|w| cursor_to(w, 6, 20)), "\x1b[7;21H");
    }

    #[test]
    fn test_screen_control() {
        assert_eq!(to_string(cursor_hide), "\x1b[?25l");
        assert_eq!(to_string(enter_alt_screen), "\x1b[?1049h");
        assert_eq!(to_string(exit_alt_screen), "\x1b[?1049l");
        assert_eq!(to_string(begin_sync), "\x1b[?2026h");
        assert_eq!(to_string(end_sync), "\x1b[?2026l");
    }

    #[test]
    fn test_title_strips_control_chars() {
        assert_eq!(to_string(|w| set_title(w, "MentaliTTY")), "\x1b]0;MentaliTTY\x07");
        assert_eq!(to_string(|w| set_title(w, "a\x07b")), "\x1b]0;ab\x07");
    }

    #[test]
    fn test_colors() {
        assert_eq!(to_string(|w| fg(w, Rgba::TERMINAL_DEFAULT)), "\x1b[39m");
        assert_eq!(to_string(|w| fg(w, Rgba::WHITE)), "\x1b[37m");
        assert_eq!(to_string(|w| fg(w, Rgba::ansi(8))), "\x1b[90m");
        assert_eq!(to_string(|w| fg(w, Rgba::ansi(196))), "\x1b[38;5;196m");
        assert_eq!(to_string(|w| bg(w, Rgba::MAGENTA)), "\x1b[45m");
        assert_eq!(to_string(|w| bg(w, Rgba::ansi(9))), "\x1b[101m");
        assert_eq!(to_string(|w| bg(w, Rgba::TERMINAL_DEFAULT)), "\x1b[49m");
        assert_eq!(
            to_string(|w| fg(w, Rgba::rgb(240, 240, 240))),
            "\x1b[38;2;240;240;240m"
        );
    }

    #[test]
    fn test_attrs() {
        assert_eq!(to_string(|w| attrs(w, Attr::NONE)), "");
        assert_eq!(to_string(|w| attrs(w, Attr::BOLD)), "\x1b[1m");
        assert_eq!(to_string(|w| attrs(w, Attr::BOLD | Attr::UNDERLINE)), "\x1b[1;4m");
    }
}
