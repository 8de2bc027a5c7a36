//! Inline style tags.
//!
//! Element content may carry tags that style spans of text:
//!
//! ```text
//! Hello {bold}world{/bold}!
//! {right}Even different {black-fg}content{/black-fg}.{/right}
//! ```
//!
//! Supported tags:
//! - attributes: `bold`, `underline` (`ul`), `italic`, `dim`, `blink`,
//!   `inverse`, `invisible`
//! - colors: `<color>-fg`, `<color>-bg` where color is a name or `#rrggbb`
//! - alignment: `left`, `center`, `right` (applies to the line it opens on
//!   and every line started while it is open)
//! - `{/}` closes everything, `{open}` / `{close}` produce literal braces
//!
//! Tags must nest: `{bold}{red-fg}x{/bold}{/red-fg}` is rejected, as are
//! unknown names, stray closes and tags left open at the end.

use crate::error::ContentParseError;
use crate::layout::text_measure::string_width;
use crate::types::{Attr, Rgba};

// =============================================================================
// Types
// =============================================================================

/// Horizontal alignment of a content line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// Style of a run. `None` colors fall back to the element's colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunStyle {
    pub fg: Option<Rgba>,
    pub bg: Option<Rgba>,
    pub attrs: Attr,
}

/// A span of text sharing one style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub text: String,
    pub style: RunStyle,
}

/// One line of styled runs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Line {
    pub align: Align,
    pub runs: Vec<Run>,
}

impl Line {
    fn push(&mut self, ch: char, style: RunStyle) {
        match self.runs.last_mut() {
            Some(run) if run.style == style => run.text.push(ch),
            _ => self.runs.push(Run {
                text: ch.to_string(),
                style,
            }),
        }
    }

    /// The line's characters without styling.
    pub fn plain(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }

    /// Display width in cells.
    pub fn width(&self) -> u16 {
        self.runs
            .iter()
            .fold(0u16, |w, run| w.saturating_add(string_width(&run.text)))
    }
}

/// Content split into styled lines.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Markup {
    pub lines: Vec<Line>,
}

impl Markup {
    /// Content taken literally: one unstyled run per line.
    pub fn plain(content: &str) -> Self {
        if content.is_empty() {
            return Self::default();
        }
        let lines = content
            .split('\n')
            .map(|text| Line {
                align: Align::Left,
                runs: if text.is_empty() {
                    Vec::new()
                } else {
                    vec![Run {
                        text: text.to_string(),
                        style: RunStyle::default(),
                    }]
                },
            })
            .collect();
        Self { lines }
    }

    /// All characters in order, lines joined by `\n`.
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(Line::plain)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// (widest line, line count) in cells.
    pub fn size(&self) -> (u16, u16) {
        let width = self.lines.iter().map(Line::width).max().unwrap_or(0);
        (width, self.lines.len().min(u16::MAX as usize) as u16)
    }
}

// =============================================================================
// Scanner
// =============================================================================

/// A lexical piece of content.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece<'a> {
    Text(&'a str),
    /// `{body}`; body is `name` or `/name` (or `/` alone).
    Tag { body: &'a str, offset: usize },
    /// `{...}` whose body is not a tag name.
    Literal { text: &'a str, offset: usize },
    /// `{` with no closing brace; runs to the end of the content.
    Unterminated { text: &'a str, offset: usize },
}

struct Pieces<'a> {
    content: &'a str,
    pos: usize,
}

fn is_tag_body(body: &str) -> bool {
    let name = body.strip_prefix('/').unwrap_or(body);
    if name.is_empty() {
        return body == "/";
    }
    name.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '#')
}

impl<'a> Iterator for Pieces<'a> {
    type Item = Piece<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = &self.content[self.pos..];
        if rest.is_empty() {
            return None;
        }
        let offset = self.pos;

        if !rest.starts_with('{') {
            let end = rest.find('{').unwrap_or(rest.len());
            self.pos += end;
            return Some(Piece::Text(&rest[..end]));
        }

        match rest.find('}') {
            None => {
                self.pos = self.content.len();
                Some(Piece::Unterminated { text: rest, offset })
            }
            Some(close) => {
                self.pos += close + 1;
                let body = &rest[1..close];
                if is_tag_body(body) {
                    Some(Piece::Tag { body, offset })
                } else {
                    Some(Piece::Literal {
                        text: &rest[..=close],
                        offset,
                    })
                }
            }
        }
    }
}

fn pieces(content: &str) -> Pieces<'_> {
    Pieces { content, pos: 0 }
}

// =============================================================================
// Parser
// =============================================================================

#[derive(Debug, Clone, Copy)]
enum TagKind {
    Attr(Attr),
    Fg(Rgba),
    Bg(Rgba),
    Align(Align),
}

struct OpenTag<'a> {
    name: &'a str,
    kind: TagKind,
}

fn classify(name: &str) -> Option<TagKind> {
    let kind = match name {
        "bold" => TagKind::Attr(Attr::BOLD),
        "underline" | "ul" => TagKind::Attr(Attr::UNDERLINE),
        "italic" => TagKind::Attr(Attr::ITALIC),
        "dim" => TagKind::Attr(Attr::DIM),
        "blink" => TagKind::Attr(Attr::BLINK),
        "inverse" => TagKind::Attr(Attr::INVERSE),
        "invisible" => TagKind::Attr(Attr::HIDDEN),
        "left" => TagKind::Align(Align::Left),
        "center" => TagKind::Align(Align::Center),
        "right" => TagKind::Align(Align::Right),
        _ => {
            if let Some(color) = name.strip_suffix("-fg") {
                TagKind::Fg(Rgba::parse(color)?)
            } else if let Some(color) = name.strip_suffix("-bg") {
                TagKind::Bg(Rgba::parse(color)?)
            } else {
                return None;
            }
        }
    };
    Some(kind)
}

fn current_style(stack: &[OpenTag<'_>]) -> RunStyle {
    stack.iter().fold(RunStyle::default(), |mut style, open| {
        match open.kind {
            TagKind::Attr(attr) => style.attrs |= attr,
            TagKind::Fg(color) => style.fg = Some(color),
            TagKind::Bg(color) => style.bg = Some(color),
            TagKind::Align(_) => {}
        }
        style
    })
}

fn current_align(stack: &[OpenTag<'_>]) -> Align {
    stack
        .iter()
        .rev()
        .find_map(|open| match open.kind {
            TagKind::Align(align) => Some(align),
            _ => None,
        })
        .unwrap_or_default()
}

/// Parse tagged content into styled lines.
///
/// # Examples
///
/// ```
/// use mentalitty::markup;
/// use mentalitty::types::Attr;
///
/// let markup = markup::parse("Hello {bold}world{/bold}!").unwrap();
/// assert_eq!(markup.text(), "Hello world!");
/// assert_eq!(markup.lines[0].runs[1].style.attrs, Attr::BOLD);
/// ```
pub fn parse(content: &str) -> Result<Markup, ContentParseError> {
    if content.is_empty() {
        return Ok(Markup::default());
    }

    let mut stack: Vec<OpenTag<'_>> = Vec::new();
    let mut style = RunStyle::default();
    let mut lines = vec![Line::default()];

    fn push_text(lines: &mut Vec<Line>, text: &str, style: RunStyle, align: Align) {
        for ch in text.chars() {
            if ch == '\n' {
                lines.push(Line {
                    align,
                    runs: Vec::new(),
                });
            } else if let Some(line) = lines.last_mut() {
                line.push(ch, style);
            }
        }
    }

    for piece in pieces(content) {
        match piece {
            Piece::Text(text) => push_text(&mut lines, text, style, current_align(&stack)),
            Piece::Unterminated { offset, .. } => {
                return Err(ContentParseError::Unterminated { offset });
            }
            Piece::Literal { text, offset } => {
                return Err(ContentParseError::Malformed {
                    text: text.to_string(),
                    offset,
                });
            }
            Piece::Tag { body, offset } => {
                if let Some(name) = body.strip_prefix('/') {
                    if name.is_empty() {
                        stack.clear();
                    } else {
                        match stack.last() {
                            Some(open) if open.name == name => {
                                stack.pop();
                            }
                            Some(open) if stack.iter().any(|o| o.name == name) => {
                                return Err(ContentParseError::Crossed {
                                    tag: name.to_string(),
                                    open: open.name.to_string(),
                                    offset,
                                });
                            }
                            _ => {
                                return Err(ContentParseError::UnmatchedClose {
                                    tag: name.to_string(),
                                    offset,
                                });
                            }
                        }
                    }
                } else if body == "open" {
                    push_text(&mut lines, "{", style, current_align(&stack));
                } else if body == "close" {
                    push_text(&mut lines, "}", style, current_align(&stack));
                } else {
                    let kind = classify(body).ok_or_else(|| ContentParseError::UnknownTag {
                        tag: body.to_string(),
                        offset,
                    })?;
                    if let (TagKind::Align(align), Some(line)) = (kind, lines.last_mut()) {
                        line.align = align;
                    }
                    stack.push(OpenTag { name: body, kind });
                }
                style = current_style(&stack);
            }
        }
    }

    if let Some(open) = stack.last() {
        return Err(ContentParseError::Unclosed {
            tag: open.name.to_string(),
        });
    }

    Ok(Markup { lines })
}

/// Remove every tag from content, keeping all other text verbatim.
///
/// `{open}`/`{close}` become literal braces; brace groups that are not tags
/// and an unterminated `{` are kept as written.
pub fn strip_tags(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    for piece in pieces(content) {
        match piece {
            Piece::Text(text) => out.push_str(text),
            Piece::Literal { text, .. } | Piece::Unterminated { text, .. } => out.push_str(text),
            Piece::Tag { body: "open", .. } => out.push('{'),
            Piece::Tag { body: "close", .. } => out.push('}'),
            Piece::Tag { .. } => {}
        }
    }
    out
}

/// Parse tagged content, falling back to tag-stripped literal text.
///
/// The error is returned alongside the fallback so the caller can report it.
pub fn parse_lossy(content: &str) -> (Markup, Option<ContentParseError>) {
    match parse(content) {
        Ok(markup) => (markup, None),
        Err(err) => (Markup::plain(&strip_tags(content)), Some(err)),
    }
}

// =============================================================================
// Tests
// =============================================================================
