#![forbid(unsafe_code)]

//! Trailing-edge debouncing on top of a [`TimerService`].
//!
//! A [`Debouncer`] collapses a burst of calls into one action that runs
//! `wait` after the last call of the burst, with that call's arguments.
//!
//! # Usage
//!
//! ```
//! use std::time::Duration;
//! use folio_core::debounce::Debouncer;
//! use folio_core::timer::ManualTimers;
//!
//! let mut timers = ManualTimers::new();
//! let mut scroll = Debouncer::new(Duration::from_millis(16));
//!
//! scroll.call(&mut timers, "scroll", 10.0);
//! timers.set_now(Duration::from_millis(5));
//! scroll.call(&mut timers, "scroll", 40.0);
//!
//! assert_eq!(timers.pop_due(Duration::from_millis(20)), None);
//! assert_eq!(timers.pop_due(Duration::from_millis(21)), Some("scroll"));
//! assert_eq!(scroll.fire(), Some(40.0));
//! ```
//!
//! # Invariants
//!
//! 1. At most one timer is pending per debouncer: every call cancels the
//!    previous one before scheduling its own.
//! 2. Latest wins: the fired arguments are those of the last call.
//! 3. `fire()` yields `Some` at most once per burst.

use std::time::Duration;

use crate::timer::{TimerId, TimerService};

#[derive(Debug, Clone)]
struct Pending<A> {
    timer: TimerId,
    args: A,
    calls: u32,
}

/// Collapses bursts of calls into a single trailing action.
#[derive(Debug, Clone)]
pub struct Debouncer<A> {
    wait: Duration,
    pending: Option<Pending<A>>,
}

impl<A> Debouncer<A> {
    /// Create a debouncer with the given quiescence window.
    #[must_use]
    pub fn new(wait: Duration) -> Self {
        Self {
            wait,
            pending: None,
        }
    }

    /// The quiescence window.
    #[must_use]
    pub fn wait(&self) -> Duration {
        self.wait
    }

    /// Record a call, superseding any pending one.
    ///
    /// `key` is what `timers` hands back when the window elapses; the owner
    /// must then call [`fire`](Self::fire).
    pub fn call<K, T>(&mut self, timers: &mut T, key: K, args: A) -> TimerId
    where
        T: TimerService<K>,
    {
        let calls = match self.pending.take() {
            Some(prev) => {
                timers.cancel(prev.timer);
                prev.calls.saturating_add(1)
            }
            None => 1,
        };
        let timer = timers.after(self.wait, key);
        self.pending = Some(Pending { timer, args, calls });
        timer
    }

    /// Take the arguments of the burst whose timer just fired.
    pub fn fire(&mut self) -> Option<A> {
        let pending = self.pending.take()?;
        crate::trace!(calls = pending.calls, "debounced burst fired");
        Some(pending.args)
    }

    /// Whether a burst is waiting for its window to elapse.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Number of calls collapsed into the pending burst (0 when idle).
    #[must_use]
    pub fn pending_calls(&self) -> u32 {
        self.pending.as_ref().map_or(0, |p| p.calls)
    }
}
