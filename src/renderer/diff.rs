//! Differential rendering.
//!
//! [`DiffRenderer`] holds the previous frame and compares each new frame to
//! it cell by cell. Contiguous changed cells of a row become one
//! [`WriteOp`]. Without a previous frame (first render, after
//! [`DiffRenderer::invalidate`], or on a size change) every cell is emitted.

use super::buffer::FrameBuffer;
use crate::types::Cell;

/// A run of cells to write starting at (row, col).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOp {
    pub row: u16,
    pub col: u16,
    pub cells: Vec<Cell>,
}

/// Keeps exactly one previous frame to diff against.
#[derive(Debug, Default)]
pub struct DiffRenderer {
    previous: Option<FrameBuffer>,
}

impl DiffRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Changed runs of `frame`; `frame` then becomes the previous frame.
    pub fn diff(&mut self, frame: &FrameBuffer) -> Vec<WriteOp> {
        let previous = self
            .previous
            .as_ref()
            .filter(|p| p.width() == frame.width() && p.height() == frame.height());

        let mut ops = Vec::new();
        for row in 0..frame.height() {
            let cells = frame.row(row);
            let old = previous.map(|p| p.row(row));
            let mut run: Option<WriteOp> = None;

            for (col, cell) in cells.iter().enumerate() {
                let changed = old.is_none_or(|old| old[col] != *cell);
                if !changed {
                    ops.extend(run.take());
                    continue;
                }
                match run.as_mut() {
                    Some(op) => op.cells.push(*cell),
                    None => {
                        run = Some(WriteOp {
                            row,
                            col: col as u16,
                            cells: vec![*cell],
                        })
                    }
                }
            }
            ops.extend(run);
        }

        self.previous = Some(frame.clone());
        ops
    }

    /// Drop the previous frame so the next diff is a full redraw.
    pub fn invalidate(&mut self) {
        self.previous = None;
    }

    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }

    /// The frame the next diff compares against.
    pub fn previous(&self) -> Option<&FrameBuffer> {
        self.previous.as_ref()
    }
}

// =============================================================================
// Tests
// =============================================================================
