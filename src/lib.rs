//! # mentalitty
//!
//! Terminal rendering and key-dispatch engine.
//!
//! Elements live in a tree owned by a [`Screen`]. Each render resolves
//! their position and size specs into cell rectangles, composites them
//! into a frame, and writes only the cells that changed since the last
//! frame. Key events are decoded from raw terminal bytes and routed to the
//! focused element and to screen-level bindings.
//!
//! ## Architecture
//!
//! ```text
//! stdin → StdinReader → Keys → Screen::dispatch → handlers
//! timers ─────────────────────→ Screen::fire_timers ─┤
//!                                                   │
//!                         Screen::render ←──────────┘
//!                           │
//!            layout::resolve → compose → DiffRenderer → encode → Backend
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use mentalitty::{CrosstermBackend, ElementOptions, Runtime, Screen, ScreenOptions, StdinReader};
//!
//! # fn main() -> mentalitty::Result<()> {
//! let mut screen = Screen::new(ScreenOptions::default().with_title("demo"), (80, 24));
//! let id = screen.append(ElementOptions::from_toml_str(r#"
//!     top = "center"
//!     left = "center"
//!     width = "50%"
//!     height = "50%"
//!     content = "Hello {bold}world{/bold}!"
//!     tags = true
//! "#)?)?;
//! screen.focus(id);
//! screen.key(["escape", "q", "C-c"], |screen, _| {
//!     screen.exit(0);
//!     Ok(())
//! });
//! screen.render()?;
//!
//! let (_reader, input) = StdinReader::spawn()?;
//! let code = Runtime::new(screen, CrosstermBackend::new(), input)?.run()?;
//! std::process::exit(code);
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`types`] - colors, cells, rects, borders
//! - [`layout`] - position/size specs and the layout pass
//! - [`markup`] - inline style tags
//! - [`element`] - elements and the tree that owns them
//! - [`screen`] - focus, key routing, timers, rendering
//! - [`timers`] - repeating and one-shot timers
//! - [`renderer`] - frame buffer, compositor, differ, ANSI encoder
//! - [`input`] - stdin reader and key decoder
//! - [`terminal`] - backends and the restore guard
//! - [`runtime`] - the run loop

pub mod config;
pub mod element;
pub mod error;
pub mod input;
pub mod keys;
pub mod layout;
pub mod logging;
pub mod markup;
pub mod renderer;
pub mod runtime;
pub mod screen;
pub mod signals;
pub mod terminal;
pub mod timers;
pub mod types;

pub use types::*;

pub use config::ScreenOptions;
pub use element::{Element, ElementId, ElementOptions, Tree};
pub use error::{ContentParseError, Error, LayoutError, Result, TerminalError};
pub use input::{ByteSource, Chunk, KeyCode, KeyEvent, Keys, Modifier, ScriptedInput, StdinReader};
pub use keys::{KeyHandler, KeyNames};
pub use layout::{Layout, Position, Size, Viewport};
pub use markup::Markup;
pub use renderer::{DiffRenderer, FrameBuffer, WriteOp};
pub use runtime::{Runtime, Step};
pub use screen::{RenderStats, Screen};
pub use terminal::{Backend, CrosstermBackend, TerminalGuard, TestBackend};
pub use timers::{TimerHandler, TimerId};
