//! Error taxonomy.
//!
//! - [`LayoutError`]: geometry that cannot be resolved; fails the render pass.
//! - [`ContentParseError`]: malformed style tags; recovered by the compositor.
//! - [`TerminalError`]: terminal read/write failures; fatal to the runtime.
//!
//! Escape-sequence timeouts have no error type: the decoder resolves them to
//! a literal `escape` key on the spot.

use std::io;

use thiserror::Error;

use crate::element::ElementId;

/// Geometry that cannot be resolved for the current viewport.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("element {id} resolved to a degenerate {width}x{height} rect")]
    Degenerate { id: ElementId, width: u16, height: u16 },

    #[error("element {0} is not part of the tree")]
    Detached(ElementId),
}

/// Malformed inline style tags in element content.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentParseError {
    #[error("unterminated tag starting at byte {offset}")]
    Unterminated { offset: usize },

    #[error("malformed tag `{text}` at byte {offset}")]
    Malformed { text: String, offset: usize },

    #[error("unknown tag `{tag}` at byte {offset}")]
    UnknownTag { tag: String, offset: usize },

    #[error("closing tag `{tag}` at byte {offset} has no matching open tag")]
    UnmatchedClose { tag: String, offset: usize },

    #[error("closing tag `{tag}` at byte {offset} crosses open tag `{open}`")]
    Crossed {
        tag: String,
        open: String,
        offset: usize,
    },

    #[error("tag `{tag}` is never closed")]
    Unclosed { tag: String },
}

/// Terminal read/write failures.
#[derive(Debug, Error)]
pub enum TerminalError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("terminal reported an empty {cols}x{rows} window")]
    EmptyWindow { cols: u16, rows: u16 },
}

/// A position, size or color value that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind} `{value}`")]
pub struct SpecError {
    pub kind: &'static str,
    pub value: String,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error(transparent)]
    Terminal(#[from] TerminalError),

    #[error(transparent)]
    Spec(#[from] SpecError),

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("element {0} does not exist")]
    UnknownElement(ElementId),

    #[error("cannot attach {child} under {parent}: it would create a cycle or a second parent")]
    InvalidAttach { parent: ElementId, child: ElementId },

    #[error("logging setup failed: {0}")]
    Logging(#[from] tracing_subscriber::util::TryInitError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
