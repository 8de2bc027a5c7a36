//! Declarative element options.
//!
//! Mirrors what an application passes when creating a box:
//!
//! ```toml
//! top = "center"
//! left = "center"
//! width = "50%"
//! height = "50%"
//! content = "Hello {bold}world{/bold}!"
//! tags = true
//! border = { type = "line" }
//!
//! [style]
//! fg = "white"
//! bg = "magenta"
//! border = { fg = "#f0f0f0" }
//! hover = { bg = "green" }
//! ```

use serde::Deserialize;

use crate::layout::{Position, Size};
use crate::types::{BorderKind, Rgba};

/// A foreground/background pair, either side optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorPair {
    pub fg: Option<Rgba>,
    pub bg: Option<Rgba>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BorderOptions {
    #[serde(rename = "type")]
    pub kind: BorderKind,
    pub fg: Option<Rgba>,
    pub bg: Option<Rgba>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StyleOptions {
    pub fg: Option<Rgba>,
    pub bg: Option<Rgba>,
    pub bold: bool,
    pub underline: bool,
    pub border: ColorPair,
    pub hover: ColorPair,
}

/// Everything needed to build an [`Element`](super::Element).
///
/// Elements are focusable unless told otherwise.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ElementOptions {
    pub top: Option<Position>,
    pub left: Option<Position>,
    pub right: Option<u16>,
    pub bottom: Option<u16>,
    pub width: Option<Size>,
    pub height: Option<Size>,
    pub content: String,
    pub tags: bool,
    pub border: BorderOptions,
    pub style: StyleOptions,
    pub focusable: bool,
    pub hidden: bool,
}

impl Default for ElementOptions {
    fn default() -> Self {
        Self {
            top: None,
            left: None,
            right: None,
            bottom: None,
            width: None,
            height: None,
            content: String::new(),
            tags: false,
            border: BorderOptions::default(),
            style: StyleOptions::default(),
            focusable: true,
            hidden: false,
        }
    }
}

impl ElementOptions {
    /// Parse options from a TOML table.
    pub fn from_toml_str(input: &str) -> crate::error::Result<Self> {
        Ok(toml::from_str(input)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_box() {
        let options = ElementOptions::from_toml_str(
            r##"
            top = "center"
            left = "center"
            width = "50%"
            height = "50%"
            content = "Hello {bold}world{/bold}!"
            tags = true
            border = { type = "line" }

            [style]
            fg = "white"
            bg = "magenta"
            border = { fg = "#f0f0f0" }
            hover = { bg = "green" }
            "##,
        )
        .unwrap();

        assert_eq!(options.top, Some(Position::Center));
        assert_eq!(options.width, Some(Size::percent(50.0)));
        assert_eq!(options.border.kind, BorderKind::Line);
        assert_eq!(options.style.bg, Some(Rgba::MAGENTA));
        assert_eq!(options.style.border.fg, Some(Rgba::rgb(240, 240, 240)));
        assert_eq!(options.style.hover.bg, Some(Rgba::GREEN));
        assert!(options.tags);
        assert!(options.focusable);
    }

    #[test]
    fn test_numeric_geometry() {
        let options = ElementOptions::from_toml_str("top = 2\nleft = -1\nwidth = 10\nright = 3").unwrap();
        assert_eq!(options.top, Some(Position::Cells(2)));
        assert_eq!(options.left, Some(Position::Cells(-1)));
        assert_eq!(options.width, Some(Size::Cells(10)));
        assert_eq!(options.right, Some(3));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(ElementOptions::from_toml_str("width = \"wide\"").is_err());
        assert!(ElementOptions::from_toml_str("style = { fg = \"ultraviolet\" }").is_err());
        assert!(ElementOptions::from_toml_str("colour = \"red\"").is_err());
    }
}
