//! Timed key decoding over a byte source.
//!
//! [`Keys`] pulls bytes from a [`ByteSource`] and feeds them through the
//! [`InputParser`]. When a sequence is left half-finished (a lone ESC is the
//! usual case) it waits at most `escape_timeout` for the rest before
//! resolving it to a literal `escape`.

use std::collections::VecDeque;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;

use tracing::trace;

use super::parser::{InputParser, KeyEvent};

/// Result of one read from a byte source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Chunk {
    Data(Vec<u8>),
    Timeout,
    Closed,
}

/// Somewhere raw input bytes come from.
pub trait ByteSource {
    /// Wait up to `timeout` (forever for `None`) for the next chunk.
    fn recv(&mut self, timeout: Option<Duration>) -> Chunk;
}

impl ByteSource for Receiver<Vec<u8>> {
    fn recv(&mut self, timeout: Option<Duration>) -> Chunk {
        let received = match timeout {
            Some(timeout) => self.recv_timeout(timeout),
            None => Receiver::recv(self).map_err(|_| RecvTimeoutError::Disconnected),
        };
        match received {
            Ok(bytes) => Chunk::Data(bytes),
            Err(RecvTimeoutError::Timeout) => Chunk::Timeout,
            Err(RecvTimeoutError::Disconnected) => Chunk::Closed,
        }
    }
}

/// Pre-recorded input for tests and demos.
///
/// Chunks are handed out in order; `Timeout` entries simulate a quiet
/// line. Once exhausted the source reports `Closed`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    chunks: VecDeque<Chunk>,
}

impl ScriptedInput {
    pub fn new(chunks: impl IntoIterator<Item = Chunk>) -> Self {
        Self {
            chunks: chunks.into_iter().collect(),
        }
    }

    /// One data chunk per byte string.
    pub fn bytes<'a>(chunks: impl IntoIterator<Item = &'a [u8]>) -> Self {
        Self::new(chunks.into_iter().map(|b| Chunk::Data(b.to_vec())))
    }

    pub fn push(&mut self, chunk: Chunk) {
        self.chunks.push_back(chunk);
    }
}

impl ByteSource for ScriptedInput {
    fn recv(&mut self, _timeout: Option<Duration>) -> Chunk {
        self.chunks.pop_front().unwrap_or(Chunk::Closed)
    }
}

/// Outcome of [`Keys::poll`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Poll {
    Key(KeyEvent),
    /// Nothing arrived within the wait.
    Idle,
    /// The source is closed and every buffered key was delivered.
    Closed,
}

/// Lazy stream of key events from a byte source.
///
/// Once the source closes the stream stays closed.
pub struct Keys<S> {
    source: S,
    parser: InputParser,
    ready: VecDeque<KeyEvent>,
    escape_timeout: Duration,
    closed: bool,
}

impl<S: ByteSource> Keys<S> {
    pub fn new(source: S, escape_timeout: Duration) -> Self {
        Self {
            source,
            parser: InputParser::new(),
            ready: VecDeque::new(),
            escape_timeout,
            closed: false,
        }
    }

    /// Next key, waiting up to `wait` for input (forever for `None`).
    pub fn poll(&mut self, wait: Option<Duration>) -> Poll {
        loop {
            if let Some(key) = self.ready.pop_front() {
                return Poll::Key(key);
            }

            if self.closed {
                if !self.parser.has_pending() {
                    return Poll::Closed;
                }
                self.ready.extend(self.parser.flush_pending());
                continue;
            }

            let timeout = if self.parser.has_pending() {
                Some(self.escape_timeout)
            } else {
                wait
            };

            match self.source.recv(timeout) {
                Chunk::Data(bytes) => self.ready.extend(self.parser.parse(&bytes)),
                Chunk::Timeout if self.parser.has_pending() => {
                    trace!("escape timeout, flushing pending input");
                    self.ready.extend(self.parser.flush_pending());
                }
                Chunk::Timeout => return Poll::Idle,
                Chunk::Closed => self.closed = true,
            }
        }
    }
}

impl<S: ByteSource> Iterator for Keys<S> {
    type Item = KeyEvent;

    fn next(&mut self) -> Option<KeyEvent> {
        loop {
            match self.poll(None) {
                Poll::Key(key) => return Some(key),
                Poll::Idle => continue,
                Poll::Closed => return None,
            }
        }
    }
}
