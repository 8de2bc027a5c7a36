//! The run loop.
//!
//! ```text
//! loop {
//!     exit requested / signal?  → stop
//!     re-query size             → resize + full redraw when changed
//!     wait up to tick for a key → Screen::dispatch
//!       (less if a timer is due sooner)
//!     fire due timers           → Screen::fire_timers
//!     flush queued output       → Backend::write
//! }
//! ```
//!
//! Everything runs on the caller's thread. The only other thread is the
//! stdin reader feeding the byte source.

use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::error::{Error, Result, TerminalError};
use crate::input::{ByteSource, Keys, Poll};
use crate::screen::Screen;
use crate::signals;
use crate::terminal::{checked_size, Backend, TerminalGuard};

/// Outcome of one [`Runtime::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue,
    Exit(i32),
}

pub struct Runtime<B: Backend, S: ByteSource> {
    screen: Screen,
    terminal: TerminalGuard<B>,
    keys: Keys<S>,
    last_input: Instant,
    watch_signals: bool,
}

impl<B: Backend, S: ByteSource> Runtime<B, S> {
    /// Enter the terminal and paint the screen.
    ///
    /// The screen is resized to the terminal and rendered if it has no
    /// frame yet; output already queued on it (an earlier render, a title
    /// change) is flushed first.
    pub fn new(screen: Screen, backend: B, source: S) -> Result<Self> {
        let terminal = TerminalGuard::enter(backend, screen.title())?;
        let keys = Keys::new(source, screen.options().escape_timeout());

        let mut runtime = Self {
            screen,
            terminal,
            keys,
            last_input: Instant::now(),
            watch_signals: false,
        };

        let size = checked_size(runtime.terminal.backend())?;
        runtime.screen.resize(size);
        if runtime.screen.frame().is_none() {
            runtime.screen.render()?;
        }
        runtime.flush()?;
        info!(cols = size.0, rows = size.1, "runtime started");
        Ok(runtime)
    }

    /// Stop on SIGTERM, SIGHUP or SIGINT with exit code `128 + signo`.
    pub fn watch_signals(mut self) -> Result<Self> {
        signals::install()?;
        self.watch_signals = true;
        Ok(self)
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn screen_mut(&mut self) -> &mut Screen {
        &mut self.screen
    }

    pub fn backend(&self) -> &B {
        self.terminal.backend()
    }

    pub fn backend_mut(&mut self) -> &mut B {
        self.terminal.backend_mut()
    }

    /// How long to wait for input: one tick, or until the next timer.
    fn wait(&self) -> Duration {
        let tick = self.screen.options().tick();
        match self.screen.next_deadline() {
            Some(deadline) => tick.min(deadline.saturating_duration_since(Instant::now())),
            None => tick,
        }
    }

    /// Handle at most one key event, then any timers that came due.
    pub fn step(&mut self) -> Result<Step> {
        if let Some(code) = self.screen.exit_requested() {
            return Ok(Step::Exit(code));
        }
        if self.watch_signals {
            if let Some(signo) = signals::take() {
                info!(signo, "terminated by signal");
                return Ok(Step::Exit(signals::exit_code(signo)));
            }
        }

        self.sync_size()?;

        match self.keys.poll(Some(self.wait())) {
            Poll::Key(key) => {
                self.last_input = Instant::now();
                self.screen.dispatch(key)?;
            }
            Poll::Idle => {
                let idle = self.screen.options().idle_timeout();
                if idle.is_some_and(|limit| self.last_input.elapsed() >= limit) {
                    info!("idle timeout");
                    self.flush()?;
                    return Ok(Step::Exit(0));
                }
            }
            Poll::Closed => {
                info!("input closed");
                self.flush()?;
                return Ok(Step::Exit(0));
            }
        }

        if self.screen.exit_requested().is_none() {
            self.screen.fire_timers(Instant::now())?;
        }

        self.flush()?;
        Ok(match self.screen.exit_requested() {
            Some(code) => Step::Exit(code),
            None => Step::Continue,
        })
    }

    /// Step until exit. The terminal is restored when the runtime drops.
    pub fn run(mut self) -> Result<i32> {
        loop {
            if let Step::Exit(code) = self.step()? {
                info!(code, "exiting");
                return Ok(code);
            }
        }
    }

    fn sync_size(&mut self) -> Result<()> {
        let size = checked_size(self.terminal.backend())?;
        if self.screen.resize(size) {
            match self.screen.render() {
                Ok(_) => {}
                Err(Error::Layout(err)) => {
                    warn!(error = %err, "layout failed after resize, keeping previous frame");
                }
                Err(err) => return Err(err),
            }
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if !self.screen.has_output() {
            return Ok(());
        }
        let bytes = self.screen.take_output();
        self.terminal
            .backend_mut()
            .write(&bytes)
            .map_err(TerminalError::from)?;
        Ok(())
    }
}

/// Build a runtime and run it to completion.
pub fn run<B: Backend, S: ByteSource>(screen: Screen, backend: B, source: S) -> Result<i32> {
    Runtime::new(screen, backend, source)?.run()
}
