//! Keyboard input.
//!
//! ```text
//! stdin ─→ StdinReader (thread) ─→ mpsc ─→ Keys (decoder) ─→ KeyEvent
//! ```

pub mod decoder;
pub mod parser;
pub mod reader;

pub use decoder::{ByteSource, Chunk, Keys, Poll, ScriptedInput};
pub use parser::{InputParser, KeyCode, KeyEvent, Modifier};
pub use reader::StdinReader;
