//! Element tree.
//!
//! A single [`Element`] type covers every renderable node: geometry specs,
//! content, border, style and key bindings. Capabilities are flags, not
//! subclasses. Elements are owned by a [`Tree`] and addressed by
//! [`ElementId`].

mod options;
mod tree;

pub use options::{BorderOptions, ColorPair, ElementOptions, StyleOptions};
pub use tree::{ElementId, Tree};

use crate::error::ContentParseError;
use crate::keys::{Bindings, KeyHandler, KeyNames};
use crate::layout::{Position, Size};
use crate::markup::{self, Markup};
use crate::screen::Screen;
use crate::input::KeyEvent;
use crate::types::{Attr, BorderKind, Rgba};

// =============================================================================
// Style
// =============================================================================

/// Resolved colors and attributes of an element.
///
/// `None` colors inherit from the parent when composited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    pub fg: Option<Rgba>,
    pub bg: Option<Rgba>,
    pub attrs: Attr,
    pub border_fg: Option<Rgba>,
    pub border_bg: Option<Rgba>,
    pub hover_fg: Option<Rgba>,
    pub hover_bg: Option<Rgba>,
}

impl Style {
    fn from_options(options: &ElementOptions) -> Self {
        let mut attrs = Attr::NONE;
        if options.style.bold {
            attrs |= Attr::BOLD;
        }
        if options.style.underline {
            attrs |= Attr::UNDERLINE;
        }
        Self {
            fg: options.style.fg,
            bg: options.style.bg,
            attrs,
            border_fg: options.style.border.fg.or(options.border.fg),
            border_bg: options.style.border.bg.or(options.border.bg),
            hover_fg: options.style.hover.fg,
            hover_bg: options.style.hover.bg,
        }
    }
}

// =============================================================================
// Element
// =============================================================================

#[derive(Debug)]
pub struct Element {
    pub top: Option<Position>,
    pub left: Option<Position>,
    pub right: Option<u16>,
    pub bottom: Option<u16>,
    pub width: Option<Size>,
    pub height: Option<Size>,
    /// Parse inline style tags in content.
    pub tags: bool,
    pub border: BorderKind,
    pub style: Style,
    pub focusable: bool,
    pub hidden: bool,
    /// Draw with the hover colors.
    pub hovered: bool,
    lines: Vec<String>,
    pub(crate) bindings: Bindings,
}

impl Default for Element {
    fn default() -> Self {
        Self::new(ElementOptions::default())
    }
}

impl From<ElementOptions> for Element {
    fn from(options: ElementOptions) -> Self {
        Self::new(options)
    }
}

impl Element {
    pub fn new(options: ElementOptions) -> Self {
        let style = Style::from_options(&options);
        let mut element = Self {
            top: options.top,
            left: options.left,
            right: options.right,
            bottom: options.bottom,
            width: options.width,
            height: options.height,
            tags: options.tags,
            border: options.border.kind,
            style,
            focusable: options.focusable,
            hidden: options.hidden,
            hovered: false,
            lines: Vec::new(),
            bindings: Bindings::new(),
        };
        element.set_content(&options.content);
        element
    }

    // -------------------------------------------------------------------------
    // Content
    // -------------------------------------------------------------------------

    /// Replace the content. `\n` separates lines.
    pub fn set_content(&mut self, content: &str) {
        self.lines = if content.is_empty() {
            Vec::new()
        } else {
            content.split('\n').map(str::to_string).collect()
        };
    }

    pub fn get_content(&self) -> String {
        self.lines.join("\n")
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn get_line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    /// Overwrite line `index`, padding with empty lines when past the end.
    pub fn set_line(&mut self, index: usize, text: &str) {
        if index >= self.lines.len() {
            self.lines.resize(index + 1, String::new());
        }
        self.lines[index] = text.to_string();
    }

    /// Insert a line before `index`, padding with empty lines when past the end.
    pub fn insert_line(&mut self, index: usize, text: &str) {
        if index > self.lines.len() {
            self.lines.resize(index, String::new());
        }
        self.lines.insert(index, text.to_string());
    }

    /// Remove line `index`; out-of-range indexes are ignored.
    pub fn delete_line(&mut self, index: usize) {
        if index < self.lines.len() {
            self.lines.remove(index);
        }
    }

    /// Content as styled lines.
    ///
    /// With tags off the text is taken literally. Malformed tags fall back to
    /// the stripped text and the parse error is returned alongside.
    pub fn markup(&self) -> (Markup, Option<ContentParseError>) {
        let content = self.get_content();
        if self.tags {
            markup::parse_lossy(&content)
        } else {
            (Markup::plain(&content), None)
        }
    }

    // -------------------------------------------------------------------------
    // Visibility
    // -------------------------------------------------------------------------

    pub fn show(&mut self) {
        self.hidden = false;
    }

    pub fn hide(&mut self) {
        self.hidden = true;
    }

    pub fn toggle(&mut self) {
        self.hidden = !self.hidden;
    }

    // -------------------------------------------------------------------------
    // Key bindings
    // -------------------------------------------------------------------------

    /// Bind `names` to a handler that runs while this element has focus.
    pub fn key<F>(&mut self, names: impl Into<KeyNames>, handler: F)
    where
        F: FnMut(&mut Screen, &KeyEvent) -> crate::error::Result<()> + 'static,
    {
        let handler: KeyHandler = Box::new(handler);
        self.bindings.add(names.into(), handler);
    }

    /// Remove `names` from this element's bindings.
    pub fn unkey(&mut self, names: impl Into<KeyNames>) {
        self.bindings.remove_names(&names.into());
    }

    /// Effective foreground: hover color while hovered, else the style's.
    pub fn fg(&self) -> Option<Rgba> {
        if self.hovered {
            self.style.hover_fg.or(self.style.fg)
        } else {
            self.style.fg
        }
    }

    /// Effective background: hover color while hovered, else the style's.
    pub fn bg(&self) -> Option<Rgba> {
        if self.hovered {
            self.style.hover_bg.or(self.style.bg)
        } else {
            self.style.bg
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_line_editing_sequence() {
        let mut element = Element::default();
        element.set_content("{right}Even different {black-fg}content{/black-fg}.{/right}\n");
        element.set_line(1, "bar");
        element.insert_line(1, "foo");

        assert_eq!(
            element.lines(),
            &[
                "{right}Even different {black-fg}content{/black-fg}.{/right}".to_string(),
                "foo".to_string(),
                "bar".to_string(),
            ]
        );
    }

    #[test]
    fn test_line_padding() {
        let mut element = Element::default();
        element.set_line(2, "c");
        assert_eq!(element.get_content(), "\n\nc");

        element.insert_line(5, "x");
        assert_eq!(element.lines().len(), 6);
        assert_eq!(element.get_line(5), Some("x"));

        element.delete_line(0);
        element.delete_line(42);
        assert_eq!(element.get_line(1), Some("c"));
    }

    #[test]
    fn test_empty_content_has_no_lines() {
        let mut element = Element::default();
        element.set_content("");
        assert!(element.lines().is_empty());
        assert_eq!(element.get_content(), "");
    }

    #[test]
    fn test_markup_respects_tags_flag() {
        let mut element = Element::new(ElementOptions {
            content: "{bold}x{/bold}".into(),
            ..Default::default()
        });
        assert_eq!(element.markup().0.text(), "{bold}x{/bold}");

        element.tags = true;
        let (markup, err) = element.markup();
        assert!(err.is_none());
        assert_eq!(markup.text(), "x");
    }

    #[test]
    fn test_hover_colors() {
        let mut element = Element::new(ElementOptions {
            style: StyleOptions {
                bg: Some(Rgba::MAGENTA),
                hover: ColorPair {
                    fg: None,
                    bg: Some(Rgba::GREEN),
                },
                ..Default::default()
            },
            ..Default::default()
        });
        assert_eq!(element.bg(), Some(Rgba::MAGENTA));
        element.hovered = true;
        assert_eq!(element.bg(), Some(Rgba::GREEN));
        assert_eq!(element.fg(), None);
    }

    #[test]
    fn test_style_from_options() {
        let element = Element::new(ElementOptions {
            border: BorderOptions {
                kind: BorderKind::Line,
                fg: Some(Rgba::RED),
                bg: None,
            },
            style: StyleOptions {
                bold: true,
                underline: true,
                border: ColorPair {
                    fg: Some(Rgba::rgb(240, 240, 240)),
                    bg: None,
                },
                ..Default::default()
            },
            ..Default::default()
        });
        assert_eq!(element.style.attrs, Attr::BOLD | Attr::UNDERLINE);
        assert_eq!(element.style.border_fg, Some(Rgba::rgb(240, 240, 240)));
        assert_eq!(element.border, BorderKind::Line);
    }
}
