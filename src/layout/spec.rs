//! Declarative position and size values.
//!
//! Both accept the same textual forms an application would write:
//!
//! | input        | position                 | size                      |
//! |--------------|--------------------------|---------------------------|
//! | `4`          | 4 cells from the origin  | 4 cells                   |
//! | `"50%"`      | half of the parent       | half of the parent        |
//! | `"50%-2"`    | half of the parent, -2   | half of the parent, -2    |
//! | `"center"`   | centered on the parent   | -                         |
//! | `"shrink"`   | -                        | fit the content           |

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::SpecError;

/// Offset of an element along one axis, relative to its parent's content box.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "SpecValue")]
pub enum Position {
    /// Absolute offset in cells (may be negative).
    Cells(i32),
    /// Percentage of the parent size (floored) plus a cell offset.
    Percent { percent: f32, offset: i32 },
    /// Centered: `(parent - own) / 2`, floored, never negative.
    Center,
}

impl Position {
    pub const fn percent(percent: f32) -> Self {
        Self::Percent { percent, offset: 0 }
    }
}

/// Extent of an element along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "SpecValue")]
pub enum Size {
    /// Absolute size in cells.
    Cells(u16),
    /// Percentage of the parent size (floored) plus a cell offset.
    Percent { percent: f32, offset: i32 },
    /// Content-driven: widest line / line count, plus border.
    Shrink,
}

impl Size {
    pub const fn percent(percent: f32) -> Self {
        Self::Percent { percent, offset: 0 }
    }
}

impl From<u16> for Size {
    fn from(value: u16) -> Self {
        Self::Cells(value)
    }
}

impl From<i32> for Position {
    fn from(value: i32) -> Self {
        Self::Cells(value)
    }
}

/// Raw value as it appears in configuration: a number or a string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SpecValue {
    Number(i64),
    Text(String),
}

/// Parse `"<float>%"` with an optional `+n`/`-n` suffix.
fn parse_percent(input: &str) -> Option<(f32, i32)> {
    let (number, rest) = input.split_once('%')?;
    let percent: f32 = number.trim().parse().ok()?;
    if !percent.is_finite() || percent < 0.0 {
        return None;
    }

    let rest = rest.trim();
    let offset = if rest.is_empty() {
        0
    } else if let Some(n) = rest.strip_prefix('+') {
        n.trim().parse().ok()?
    } else if let Some(n) = rest.strip_prefix('-') {
        -n.trim().parse::<i32>().ok()?
    } else {
        return None;
    };

    Some((percent, offset))
}

impl FromStr for Position {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || SpecError {
            kind: "position",
            value: s.to_string(),
        };

        if trimmed.eq_ignore_ascii_case("center") {
            return Ok(Self::Center);
        }
        if trimmed.contains('%') {
            let (percent, offset) = parse_percent(trimmed).ok_or_else(invalid)?;
            return Ok(Self::Percent { percent, offset });
        }
        trimmed.parse().map(Self::Cells).map_err(|_| invalid())
    }
}

impl FromStr for Size {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || SpecError {
            kind: "size",
            value: s.to_string(),
        };

        if trimmed.eq_ignore_ascii_case("shrink") {
            return Ok(Self::Shrink);
        }
        if trimmed.eq_ignore_ascii_case("half") {
            return Ok(Self::percent(50.0));
        }
        if trimmed.contains('%') {
            let (percent, offset) = parse_percent(trimmed).ok_or_else(invalid)?;
            return Ok(Self::Percent { percent, offset });
        }
        trimmed.parse().map(Self::Cells).map_err(|_| invalid())
    }
}

impl TryFrom<SpecValue> for Position {
    type Error = SpecError;

    fn try_from(value: SpecValue) -> Result<Self, Self::Error> {
        match value {
            SpecValue::Number(n) => i32::try_from(n).map(Self::Cells).map_err(|_| SpecError {
                kind: "position",
                value: n.to_string(),
            }),
            SpecValue::Text(s) => s.parse(),
        }
    }
}

impl TryFrom<SpecValue> for Size {
    type Error = SpecError;

    fn try_from(value: SpecValue) -> Result<Self, Self::Error> {
        match value {
            SpecValue::Number(n) => u16::try_from(n).map(Self::Cells).map_err(|_| SpecError {
                kind: "size",
                value: n.to_string(),
            }),
            SpecValue::Text(s) => s.parse(),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cells(n) => write!(f, "{n}"),
            Self::Percent { percent, offset } => fmt_percent(f, *percent, *offset),
            Self::Center => f.write_str("center"),
        }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cells(n) => write!(f, "{n}"),
            Self::Percent { percent, offset } => fmt_percent(f, *percent, *offset),
            Self::Shrink => f.write_str("shrink"),
        }
    }
}

fn fmt_percent(f: &mut fmt::Formatter<'_>, percent: f32, offset: i32) -> fmt::Result {
    match offset {
        0 => write!(f, "{percent}%"),
        n if n > 0 => write!(f, "{percent}%+{n}"),
        n => write!(f, "{percent}%{n}"),
    }
}
