//! Escape sequence parser for terminal input.
//!
//! Turns raw stdin bytes into [`KeyEvent`]s:
//! - printable ASCII and UTF-8 characters
//! - control bytes (`C-a`..`C-z`, `enter`, `tab`, `backspace`)
//! - CSI sequences (arrows, home/end, insert/delete, page up/down, F1-F12,
//!   with xterm modifier parameters)
//! - SS3 sequences (arrows, F1-F4)
//! - Alt+key (ESC + char)
//!
//! Incomplete sequences stay buffered until more bytes arrive or the caller
//! gives up and calls [`InputParser::flush_pending`].

use std::fmt;

use tracing::warn;

// =============================================================================
// Types
// =============================================================================

/// Key code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    Char(char),
    Enter,
    Tab,
    Backspace,
    Escape,
    Delete,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Insert,
    F(u8),
}

bitflags::bitflags! {
    /// Keyboard modifiers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Modifier: u8 {
        const NONE  = 0;
        const SHIFT = 1 << 0;
        const ALT   = 1 << 1;
        const CTRL  = 1 << 2;
    }
}

/// A decoded key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifier,
    /// The literal character typed, when there is one.
    pub ch: Option<char>,
}

impl KeyEvent {
    pub fn new(code: KeyCode, modifiers: Modifier) -> Self {
        let ch = match code {
            KeyCode::Char(c) if modifiers.intersection(Modifier::CTRL | Modifier::ALT).is_empty() => {
                Some(c)
            }
            _ => None,
        };
        Self { code, modifiers, ch }
    }

    /// A plain printable character.
    pub fn char(c: char) -> Self {
        Self::new(KeyCode::Char(c), Modifier::NONE)
    }

    /// Canonical binding name: `a`, `S-a`, `C-c`, `M-x`, `S-tab`, `f5`,
    /// `space`, `enter`, `escape`, `up`, `pagedown`.
    ///
    /// Prefixes come in `C-`, `M-`, `S-` order.
    pub fn name(&self) -> String {
        let mut modifiers = self.modifiers;
        let base = match self.code {
            KeyCode::Char(' ') => "space".to_string(),
            KeyCode::Char(c) if c.is_ascii_uppercase() => {
                modifiers |= Modifier::SHIFT;
                c.to_ascii_lowercase().to_string()
            }
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Enter => "enter".into(),
            KeyCode::Tab => "tab".into(),
            KeyCode::Backspace => "backspace".into(),
            KeyCode::Escape => "escape".into(),
            KeyCode::Delete => "delete".into(),
            KeyCode::Up => "up".into(),
            KeyCode::Down => "down".into(),
            KeyCode::Left => "left".into(),
            KeyCode::Right => "right".into(),
            KeyCode::Home => "home".into(),
            KeyCode::End => "end".into(),
            KeyCode::PageUp => "pageup".into(),
            KeyCode::PageDown => "pagedown".into(),
            KeyCode::Insert => "insert".into(),
            KeyCode::F(n) => format!("f{n}"),
        };

        let mut name = String::with_capacity(base.len() + 6);
        if modifiers.contains(Modifier::CTRL) {
            name.push_str("C-");
        }
        if modifiers.contains(Modifier::ALT) {
            name.push_str("M-");
        }
        if modifiers.contains(Modifier::SHIFT) {
            name.push_str("S-");
        }
        name.push_str(&base);
        name
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

// =============================================================================
// Parser
// =============================================================================

const ESC: u8 = 0x1B;

enum Parsed {
    Key(KeyEvent),
    Incomplete,
    /// Bytes consumed, nothing produced.
    Dropped,
}

fn key(code: KeyCode, modifiers: Modifier) -> Parsed {
    Parsed::Key(KeyEvent::new(code, modifiers))
}

/// Input parser state machine.
#[derive(Debug, Default)]
pub struct InputParser {
    buf: Vec<u8>,
}

impl InputParser {
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(64),
        }
    }

    /// Feed bytes; returns every key completed so far.
    pub fn parse(&mut self, data: &[u8]) -> Vec<KeyEvent> {
        self.buf.extend_from_slice(data);
        let mut events = Vec::new();

        while !self.buf.is_empty() {
            match self.try_parse_one() {
                Parsed::Key(ev) => events.push(ev),
                Parsed::Dropped => {}
                Parsed::Incomplete => break,
            }
        }
        events
    }

    /// Whether bytes of an unfinished sequence are buffered.
    pub fn has_pending(&self) -> bool {
        !self.buf.is_empty()
    }

    /// Give up waiting: a pending ESC becomes a literal `escape`, the bytes
    /// after it are decoded as ordinary keys.
    pub fn flush_pending(&mut self) -> Vec<KeyEvent> {
        let mut events = Vec::new();
        while !self.buf.is_empty() {
            match self.try_parse_one() {
                Parsed::Key(ev) => events.push(ev),
                Parsed::Dropped => {}
                Parsed::Incomplete if self.buf[0] == ESC => {
                    self.consume(1);
                    events.push(KeyEvent::new(KeyCode::Escape, Modifier::NONE));
                }
                Parsed::Incomplete => {
                    warn!(bytes = ?self.buf, "dropping truncated input");
                    self.buf.clear();
                }
            }
        }
        events
    }

    fn try_parse_one(&mut self) -> Parsed {
        let first = self.buf[0];

        match first {
            ESC => self.parse_escape(),
            0x00 => {
                self.consume(1);
                key(KeyCode::Char(' '), Modifier::CTRL)
            }
            0x08 | 0x7F => {
                self.consume(1);
                key(KeyCode::Backspace, Modifier::NONE)
            }
            0x09 => {
                self.consume(1);
                key(KeyCode::Tab, Modifier::NONE)
            }
            0x0A | 0x0D => {
                self.consume(1);
                key(KeyCode::Enter, Modifier::NONE)
            }
            0x01..=0x1A => {
                self.consume(1);
                key(KeyCode::Char((first + b'a' - 1) as char), Modifier::CTRL)
            }
            0x1C..=0x1F => {
                self.consume(1);
                warn!(byte = first, "dropping unbound control byte");
                Parsed::Dropped
            }
            0x20..=0x7E => {
                self.consume(1);
                key(KeyCode::Char(first as char), Modifier::NONE)
            }
            0x80..=0xFF => self.parse_utf8(),
        }
    }

    fn parse_escape(&mut self) -> Parsed {
        if self.buf.len() < 2 {
            return Parsed::Incomplete;
        }

        match self.buf[1] {
            b'[' => self.parse_csi(),
            b'O' => self.parse_ss3(),
            0x20..=0x7E => {
                let ch = self.buf[1] as char;
                self.consume(2);
                key(KeyCode::Char(ch), Modifier::ALT)
            }
            ESC => {
                self.consume(2);
                key(KeyCode::Escape, Modifier::ALT)
            }
            _ => {
                self.consume(1);
                key(KeyCode::Escape, Modifier::NONE)
            }
        }
    }

    fn parse_csi(&mut self) -> Parsed {
        if self.buf.len() < 3 {
            return Parsed::Incomplete;
        }

        // Final byte is in 0x40..=0x7E
        let Some(end) = self.buf[2..]
            .iter()
            .position(|b| (0x40..=0x7E).contains(b))
            .map(|i| i + 2)
        else {
            return Parsed::Incomplete;
        };

        let final_byte = self.buf[end];
        let params: Vec<u32> = String::from_utf8_lossy(&self.buf[2..end])
            .split(';')
            .map(|s| s.parse::<u32>().unwrap_or(0))
            .collect();
        let modifiers = match params.get(1) {
            Some(&p) if p > 0 => decode_modifier(p),
            _ => Modifier::NONE,
        };

        let code = match final_byte {
            b'A' => Some(KeyCode::Up),
            b'B' => Some(KeyCode::Down),
            b'C' => Some(KeyCode::Right),
            b'D' => Some(KeyCode::Left),
            b'H' => Some(KeyCode::Home),
            b'F' => Some(KeyCode::End),
            b'P' => Some(KeyCode::F(1)),
            b'Q' => Some(KeyCode::F(2)),
            b'R' => Some(KeyCode::F(3)),
            b'S' => Some(KeyCode::F(4)),
            b'Z' => {
                self.consume(end + 1);
                return key(KeyCode::Tab, Modifier::SHIFT);
            }
            b'~' => match params.first().copied().unwrap_or(0) {
                1 | 7 => Some(KeyCode::Home),
                2 => Some(KeyCode::Insert),
                3 => Some(KeyCode::Delete),
                4 | 8 => Some(KeyCode::End),
                5 => Some(KeyCode::PageUp),
                6 => Some(KeyCode::PageDown),
                // rxvt
                11 => Some(KeyCode::F(1)),
                12 => Some(KeyCode::F(2)),
                13 => Some(KeyCode::F(3)),
                14 => Some(KeyCode::F(4)),
                15 => Some(KeyCode::F(5)),
                17 => Some(KeyCode::F(6)),
                18 => Some(KeyCode::F(7)),
                19 => Some(KeyCode::F(8)),
                20 => Some(KeyCode::F(9)),
                21 => Some(KeyCode::F(10)),
                23 => Some(KeyCode::F(11)),
                24 => Some(KeyCode::F(12)),
                _ => None,
            },
            _ => None,
        };

        let sequence = self.buf[..=end].to_vec();
        self.consume(end + 1);
        match code {
            Some(code) => key(code, modifiers),
            None => {
                warn!(sequence = ?String::from_utf8_lossy(&sequence), "dropping unknown escape sequence");
                Parsed::Dropped
            }
        }
    }

    fn parse_ss3(&mut self) -> Parsed {
        if self.buf.len() < 3 {
            return Parsed::Incomplete;
        }

        let code = match self.buf[2] {
            b'A' => Some(KeyCode::Up),
            b'B' => Some(KeyCode::Down),
            b'C' => Some(KeyCode::Right),
            b'D' => Some(KeyCode::Left),
            b'H' => Some(KeyCode::Home),
            b'F' => Some(KeyCode::End),
            b'P' => Some(KeyCode::F(1)),
            b'Q' => Some(KeyCode::F(2)),
            b'R' => Some(KeyCode::F(3)),
            b'S' => Some(KeyCode::F(4)),
            _ => None,
        };

        let last = self.buf[2];
        self.consume(3);
        match code {
            Some(code) => key(code, Modifier::NONE),
            None => {
                warn!(byte = last, "dropping unknown SS3 sequence");
                Parsed::Dropped
            }
        }
    }

    fn parse_utf8(&mut self) -> Parsed {
        let first = self.buf[0];
        let expected = match first {
            b if b & 0xE0 == 0xC0 => 2,
            b if b & 0xF0 == 0xE0 => 3,
            b if b & 0xF8 == 0xF0 => 4,
            _ => {
                self.consume(1);
                return Parsed::Dropped;
            }
        };

        if self.buf.len() < expected {
            return Parsed::Incomplete;
        }

        let decoded = std::str::from_utf8(&self.buf[..expected])
            .ok()
            .and_then(|s| s.chars().next());
        match decoded {
            Some(ch) => {
                self.consume(expected);
                key(KeyCode::Char(ch), Modifier::NONE)
            }
            None => {
                // Not a valid sequence: skip the lead byte and resync
                self.consume(1);
                Parsed::Dropped
            }
        }
    }

    fn consume(&mut self, n: usize) {
        self.buf.drain(..n);
    }
}

/// Decode an xterm modifier parameter (1-based bitmask).
fn decode_modifier(param: u32) -> Modifier {
    let val = param.saturating_sub(1);
    let mut m = Modifier::NONE;
    if val & 1 != 0 {
        m |= Modifier::SHIFT;
    }
    if val & 2 != 0 {
        m |= Modifier::ALT;
    }
    if val & 4 != 0 {
        m |= Modifier::CTRL;
    }
    m
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn names(data: &[u8]) -> Vec<String> {
        InputParser::new().parse(data).iter().map(KeyEvent::name).collect()
    }

    #[test]
    fn test_printable_chars() {
        assert_eq!(names(b"aZ1 "), vec!["a", "S-z", "1", "space"]);
        let events = InputParser::new().parse(b"q");
        assert_eq!(events[0].ch, Some('q'));
    }

    #[test]
    fn test_utf8() {
        let events = InputParser::new().parse("é日".as_bytes());
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].ch, Some('日'));
    }

    #[test]
    fn test_control_keys() {
        assert_eq!(names(b"\r\n\t\x7f\x08"), vec!["enter", "enter", "tab", "backspace", "backspace"]);
        assert_eq!(names(b"\x03\x01\x1a\x00"), vec!["C-c", "C-a", "C-z", "C-space"]);
        assert_eq!(InputParser::new().parse(b"\x03")[0].ch, None);
    }

    #[test]
    fn test_csi_keys() {
        assert_eq!(names(b"\x1b[A\x1b[B\x1b[C\x1b[D"), vec!["up", "down", "right", "left"]);
        assert_eq!(names(b"\x1b[H\x1b[F\x1b[2~\x1b[3~"), vec!["home", "end", "insert", "delete"]);
        assert_eq!(names(b"\x1b[5~\x1b[6~"), vec!["pageup", "pagedown"]);
        assert_eq!(names(b"\x1b[Z"), vec!["S-tab"]);
    }

    #[test]
    fn test_function_keys() {
        assert_eq!(names(b"\x1bOP\x1b[15~\x1b[24~\x1b[11~"), vec!["f1", "f5", "f12", "f1"]);
    }

    #[test]
    fn test_modified_keys() {
        assert_eq!(names(b"\x1b[1;5A"), vec!["C-up"]);
        assert_eq!(names(b"\x1b[1;2D"), vec!["S-left"]);
        assert_eq!(names(b"\x1b[15;7~"), vec!["C-M-f5"]);
        assert_eq!(names(b"\x1bx"), vec!["M-x"]);
    }

    #[test]
    fn test_unknown_sequences_dropped() {
        assert_eq!(names(b"\x1b[99~a\x1bOZb"), vec!["a", "b"]);
        assert_eq!(names(b"\x1ca"), vec!["a"]);
    }

    #[test]
    fn test_incomplete_sequence_waits() {
        let mut parser = InputParser::new();
        assert!(parser.parse(b"\x1b[1;").is_empty());
        assert!(parser.has_pending());

        let events = parser.parse(b"5A");
        assert_eq!(events[0].name(), "C-up");
        assert!(!parser.has_pending());
    }

    #[test]
    fn test_flush_pending_escape() {
        let mut parser = InputParser::new();
        assert!(parser.parse(b"\x1b").is_empty());
        let events: Vec<_> = parser.flush_pending().iter().map(KeyEvent::name).collect();
        assert_eq!(events, vec!["escape"]);

        assert!(parser.parse(b"\x1b[").is_empty());
        let events: Vec<_> = parser.flush_pending().iter().map(KeyEvent::name).collect();
        assert_eq!(events, vec!["escape", "["]);
        assert!(!parser.has_pending());
    }

    #[test]
    fn test_flush_drops_truncated_utf8() {
        let mut parser = InputParser::new();
        assert!(parser.parse(&[0xE6, 0x97]).is_empty());
        assert!(parser.flush_pending().is_empty());
        assert!(!parser.has_pending());
    }

    #[test]
    fn test_modifier_decode() {
        assert_eq!(decode_modifier(2), Modifier::SHIFT);
        assert_eq!(decode_modifier(3), Modifier::ALT);
        assert_eq!(decode_modifier(5), Modifier::CTRL);
        assert_eq!(decode_modifier(8), Modifier::SHIFT | Modifier::ALT | Modifier::CTRL);
    }
}
