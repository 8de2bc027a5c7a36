//! Output buffering and stateful cell encoding.
//!
//! Write operations from the differ are turned into bytes by tracking the
//! terminal's cursor and pen:
//! - cursor moves only when a cell is not directly after the previous one
//! - SGR only when attributes or colors change
//! - one synchronized-output block per batch

use std::io::{self, Write};

use super::ansi;
use super::diff::WriteOp;
use crate::layout::char_width;
use crate::types::{Attr, Cell, Rgba};

// =============================================================================
// OutputBuffer
// =============================================================================

/// Bytes accumulated for a single write to the terminal.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OutputBuffer {
    data: Vec<u8>,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::with_capacity(16384)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn clear(&mut self) {
        self.data.clear();
    }

    #[inline]
    pub fn write_char(&mut self, c: char) {
        let mut buf = [0u8; 4];
        self.data.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Lossy text view, for tests and logging.
    pub fn as_str(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.data)
    }

    /// Move the accumulated bytes out, leaving the buffer empty.
    pub fn take(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.data)
    }

    /// Write everything to `writer` and clear.
    pub fn flush_to<W: Write>(&mut self, writer: &mut W) -> io::Result<()> {
        if self.data.is_empty() {
            return Ok(());
        }
        writer.write_all(&self.data)?;
        writer.flush()?;
        self.data.clear();
        Ok(())
    }
}

impl Write for OutputBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.data.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// =============================================================================
// StatefulCellRenderer
// =============================================================================

/// Encodes cells while tracking cursor position and pen state, emitting
/// only what changed.
#[derive(Debug, Default)]
pub struct StatefulCellRenderer {
    /// Cell the cursor sits on after the last write.
    cursor: Option<(u16, u32)>,
    fg: Option<Rgba>,
    bg: Option<Rgba>,
    attrs: Attr,
}

impl StatefulCellRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode one cell at (row, col).
    pub fn render_cell(&mut self, output: &mut OutputBuffer, row: u16, col: u16, cell: &Cell) {
        // Covered by the wide glyph before it, nothing to write
        if cell.is_continuation() {
            return;
        }

        if self.cursor != Some((row, col as u32)) {
            ansi::cursor_to(output, row, col).ok();
        }

        if cell.attrs != self.attrs {
            ansi::reset(output).ok();
            ansi::attrs(output, cell.attrs).ok();
            self.fg = None;
            self.bg = None;
            self.attrs = cell.attrs;
        }
        if self.fg != Some(cell.fg) {
            ansi::fg(output, cell.fg).ok();
            self.fg = Some(cell.fg);
        }
        if self.bg != Some(cell.bg) {
            ansi::bg(output, cell.bg).ok();
            self.bg = Some(cell.bg);
        }

        let ch = cell.symbol().unwrap_or(' ');
        output.write_char(ch);
        self.cursor = Some((row, col as u32 + char_width(ch).max(1) as u32));
    }
}

/// Append the bytes for `ops` to `output`.
///
/// Nothing is written for an empty batch.
pub fn encode_into(output: &mut OutputBuffer, ops: &[WriteOp]) {
    if ops.is_empty() {
        return;
    }
    let mut renderer = StatefulCellRenderer::new();

    ansi::begin_sync(output).ok();
    for op in ops {
        for (i, cell) in op.cells.iter().enumerate() {
            renderer.render_cell(output, op.row, op.col + i as u16, cell);
        }
    }
    ansi::reset(output).ok();
    ansi::end_sync(output).ok();
}

/// Encode `ops` into a fresh byte vector.
pub fn encode(ops: &[WriteOp]) -> Vec<u8> {
    let mut output = OutputBuffer::new();
    encode_into(&mut output, ops);
    output.take()
}
