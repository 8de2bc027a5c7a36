//! Terminal renderer.
//!
//! ```text
//! Tree + Layout → compose → FrameBuffer → DiffRenderer → WriteOps → encode → bytes
//! ```
//!
//! - [`compose`] paints elements into a [`FrameBuffer`]
//! - [`DiffRenderer`] keeps the previous frame and yields changed runs
//! - [`encode`] turns runs into cursor moves, SGR and characters

pub mod ansi;
pub mod buffer;
pub mod compose;
pub mod diff;
pub mod output;

pub use buffer::{Brush, FrameBuffer};
pub use compose::compose;
pub use diff::{DiffRenderer, WriteOp};
pub use output::{encode, encode_into, OutputBuffer, StatefulCellRenderer};
