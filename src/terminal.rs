//! Terminal setup, teardown and output.
//!
//! A [`Backend`] is where frames go and where the size comes from.
//! [`CrosstermBackend`] drives the real terminal; [`TestBackend`] records
//! everything in memory for tests. [`TerminalGuard`] holds a backend in the
//! entered state and restores it on drop, including during unwinding.

use std::io::{self, Write};

use tracing::{debug, warn};

use crate::error::TerminalError;
use crate::renderer::{ansi, OutputBuffer};

/// A terminal the runtime can draw to.
pub trait Backend {
    /// Current size as `(cols, rows)`.
    fn size(&self) -> io::Result<(u16, u16)>;

    /// Raw mode, alternate screen, hidden cursor, optional window title.
    fn enter(&mut self, title: Option<&str>) -> io::Result<()>;

    /// Undo [`Backend::enter`].
    fn leave(&mut self) -> io::Result<()>;

    /// Write and flush a batch of bytes.
    fn write(&mut self, bytes: &[u8]) -> io::Result<()>;
}

impl<B: Backend + ?Sized> Backend for &mut B {
    fn size(&self) -> io::Result<(u16, u16)> {
        (**self).size()
    }

    fn enter(&mut self, title: Option<&str>) -> io::Result<()> {
        (**self).enter(title)
    }

    fn leave(&mut self) -> io::Result<()> {
        (**self).leave()
    }

    fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        (**self).write(bytes)
    }
}

/// Query the size, rejecting a window with no cells.
pub fn checked_size<B: Backend + ?Sized>(backend: &B) -> Result<(u16, u16), TerminalError> {
    let (cols, rows) = backend.size()?;
    if cols == 0 || rows == 0 {
        return Err(TerminalError::EmptyWindow { cols, rows });
    }
    Ok((cols, rows))
}

// =============================================================================
// Crossterm
// =============================================================================

/// The process's controlling terminal on stdout.
#[derive(Debug, Default)]
pub struct CrosstermBackend {
    is_raw: bool,
    is_fullscreen: bool,
}

impl CrosstermBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Backend for CrosstermBackend {
    fn size(&self) -> io::Result<(u16, u16)> {
        crossterm::terminal::size()
    }

    fn enter(&mut self, title: Option<&str>) -> io::Result<()> {
        let mut out = OutputBuffer::new();

        crossterm::terminal::enable_raw_mode()?;
        self.is_raw = true;

        ansi::enter_alt_screen(&mut out)?;
        ansi::cursor_hide(&mut out)?;
        ansi::clear_screen(&mut out)?;
        if let Some(title) = title {
            ansi::set_title(&mut out, title)?;
        }

        out.flush_to(&mut io::stdout())?;
        self.is_fullscreen = true;
        debug!("terminal entered");
        Ok(())
    }

    fn leave(&mut self) -> io::Result<()> {
        let mut out = OutputBuffer::new();

        if self.is_fullscreen {
            ansi::reset(&mut out)?;
            ansi::cursor_show(&mut out)?;
            ansi::exit_alt_screen(&mut out)?;
            out.flush_to(&mut io::stdout())?;
            self.is_fullscreen = false;
        }

        if self.is_raw {
            crossterm::terminal::disable_raw_mode()?;
            self.is_raw = false;
        }
        debug!("terminal restored");
        Ok(())
    }

    fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(bytes)?;
        stdout.flush()
    }
}

// =============================================================================
// In-memory
// =============================================================================

/// Records output and reports a settable size.
#[derive(Debug, Clone, Default)]
pub struct TestBackend {
    size: (u16, u16),
    written: Vec<u8>,
    writes: usize,
    entered: bool,
    title: Option<String>,
}

impl TestBackend {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            size: (cols, rows),
            ..Default::default()
        }
    }

    /// Simulate a window resize.
    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.size = (cols, rows);
    }

    /// Every byte written so far.
    pub fn written(&self) -> &[u8] {
        &self.written
    }

    /// Number of non-empty write batches.
    pub fn writes(&self) -> usize {
        self.writes
    }

    pub fn is_entered(&self) -> bool {
        self.entered
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }
}

impl Backend for TestBackend {
    fn size(&self) -> io::Result<(u16, u16)> {
        Ok(self.size)
    }

    fn enter(&mut self, title: Option<&str>) -> io::Result<()> {
        self.entered = true;
        self.title = title.map(str::to_string);
        Ok(())
    }

    fn leave(&mut self) -> io::Result<()> {
        self.entered = false;
        Ok(())
    }

    fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        if !bytes.is_empty() {
            self.written.extend_from_slice(bytes);
            self.writes += 1;
        }
        Ok(())
    }
}

// =============================================================================
// Guard
// =============================================================================

/// Keeps a backend entered for as long as it lives.
pub struct TerminalGuard<B: Backend> {
    backend: B,
}

impl<B: Backend> TerminalGuard<B> {
    pub fn enter(mut backend: B, title: Option<&str>) -> Result<Self, TerminalError> {
        if let Err(err) = backend.enter(title) {
            // Partially entered: undo whatever did succeed
            let _ = backend.leave();
            return Err(err.into());
        }
        Ok(Self { backend })
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}

impl<B: Backend> Drop for TerminalGuard<B> {
    fn drop(&mut self) {
        if let Err(err) = self.backend.leave() {
            warn!(error = %err, "failed to restore terminal");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_leaves_on_drop() {
        let mut backend = TestBackend::new(80, 24);
        {
            let guard = TerminalGuard::enter(&mut backend, Some("MentaliTTY")).unwrap();
            assert!(guard.backend().is_entered());
        }
        assert!(!backend.is_entered());
        assert_eq!(backend.title(), Some("MentaliTTY"));
    }

    #[test]
    fn test_guard_leaves_on_panic() {
        let mut backend = TestBackend::new(80, 24);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = TerminalGuard::enter(&mut backend, None).unwrap();
            panic!("handler blew up");
        }));
        assert!(result.is_err());
        assert!(!backend.is_entered());
    }

    #[test]
    fn test_empty_writes_not_counted() {
        let mut backend = TestBackend::new(80, 24);
        backend.write(b"").unwrap();
        backend.write(b"abc").unwrap();
        assert_eq!(backend.writes(), 1);
        assert_eq!(backend.written(), b"abc");
    }

    #[test]
    fn test_checked_size_rejects_empty() {
        let backend = TestBackend::new(0, 24);
        assert!(matches!(
            checked_size(&backend),
            Err(TerminalError::EmptyWindow { cols: 0, rows: 24 })
        ));
    }
}
