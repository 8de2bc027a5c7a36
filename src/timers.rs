//! Timers - repeating and one-shot callbacks driven by the run loop.
//!
//! Timers never run on their own thread. The runtime asks for the next
//! deadline, waits for input no longer than that, and then fires whatever
//! is due through [`Screen::fire_timers`](crate::screen::Screen::fire_timers),
//! which routes them through the same queue as key events.
//!
//! ```ignore
//! // Once a second, like a game clock
//! screen.every(Duration::from_secs(1), |screen| {
//!     screen.element_mut(clock)?.set_content(&ticks().to_string());
//!     screen.render()?;
//!     Ok(())
//! });
//! ```

use std::fmt;
use std::time::{Duration, Instant};

use crate::error::Result;
use crate::screen::Screen;

/// Handler invoked when a timer fires.
pub type TimerHandler = Box<dyn FnMut(&mut Screen) -> Result<()>>;

/// Identifies a timer on one screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

struct Timer {
    id: TimerId,
    due: Instant,
    /// `None` for one-shot timers.
    interval: Option<Duration>,
    /// `None` while the handler is running.
    handler: Option<TimerHandler>,
}

/// Pending timers, ordered by registration.
#[derive(Default)]
pub struct Timers {
    entries: Vec<Timer>,
    next_id: u64,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a timer first due at `due`, repeating every `interval` if set.
    pub fn add(&mut self, due: Instant, interval: Option<Duration>, handler: TimerHandler) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.entries.push(Timer {
            id,
            due,
            interval,
            handler: Some(handler),
        });
        id
    }

    /// Drop a timer. Returns false if it already fired (one-shot) or was
    /// cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|t| t.id != id);
        self.entries.len() != before
    }

    /// Earliest deadline among timers that are not currently running.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries
            .iter()
            .filter(|t| t.handler.is_some())
            .map(|t| t.due)
            .min()
    }

    /// Timers due at `now`, earliest deadline first (ties by registration).
    pub fn due(&self, now: Instant) -> Vec<TimerId> {
        let mut due: Vec<_> = self
            .entries
            .iter()
            .filter(|t| t.handler.is_some() && t.due <= now)
            .map(|t| (t.due, t.id))
            .collect();
        due.sort();
        due.into_iter().map(|(_, id)| id).collect()
    }

    /// Take a handler out to fire it.
    ///
    /// Repeating timers are re-armed to `now + interval`; one-shot timers
    /// are removed.
    pub fn take(&mut self, id: TimerId, now: Instant) -> Option<TimerHandler> {
        let idx = self.entries.iter().position(|t| t.id == id)?;
        match self.entries[idx].interval {
            Some(interval) => {
                let timer = &mut self.entries[idx];
                timer.due = now + interval;
                timer.handler.take()
            }
            None => self.entries.remove(idx).handler,
        }
    }

    /// Put a handler back after it ran. Dropped if the timer was cancelled.
    pub fn restore(&mut self, id: TimerId, handler: TimerHandler) {
        if let Some(timer) = self.entries.iter_mut().find(|t| t.id == id) {
            if timer.handler.is_none() {
                timer.handler = Some(handler);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Timers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|t| (t.id, t.interval)))
            .finish()
    }
}
