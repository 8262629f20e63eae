#![forbid(unsafe_code)]

//! Timer service: delayed callbacks and per-frame continuations.
//!
//! Callbacks are represented by keys of type `K`. Scheduling a timer or frame
//! stores the key; when it comes due the owner receives the key back and
//! dispatches on it. This keeps timer chains explicit and every pending step
//! cancellable through a single handle.
//!
//! [`ManualTimers`] is the deterministic implementation: the host advances
//! time explicitly and pulls due keys, so identical inputs always fire in the
//! same order.
//!
//! # Invariants
//!
//! 1. Timers fire in `(deadline, scheduling order)` order.
//! 2. A cancelled timer or frame never fires.
//! 3. Frame requests made while a frame batch runs are deferred to the next
//!    frame, so a self-rescheduling animation advances one step per frame.
//! 4. The clock never moves backwards.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

/// Handle for a pending delayed callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// Handle for a pending frame continuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(u64);

/// The time-keeping primitives the engine depends on.
pub trait TimerService<K> {
    /// Current monotonic time.
    fn now(&self) -> Duration;

    /// Schedule `key` to come due `delay` from now.
    fn after(&mut self, delay: Duration, key: K) -> TimerId;

    /// Cancel a pending timer. Returns `false` if it already fired or was
    /// cancelled.
    fn cancel(&mut self, id: TimerId) -> bool;

    /// Schedule `key` to run on the next rendered frame.
    fn request_frame(&mut self, key: K) -> FrameId;

    /// Cancel a pending frame request. Returns `false` if it already ran or
    /// was cancelled.
    fn cancel_frame(&mut self, id: FrameId) -> bool;
}

/// Deterministic, host-driven [`TimerService`].
#[derive(Debug, Clone)]
pub struct ManualTimers<K> {
    now: Duration,
    next_id: u64,
    timers: BTreeMap<(Duration, u64), K>,
    deadlines: HashMap<u64, Duration>,
    frames: Vec<(u64, K)>,
}

impl<K> Default for ManualTimers<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> ManualTimers<K> {
    /// Create an empty queue with the clock at zero.
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            timers: BTreeMap::new(),
            deadlines: HashMap::new(),
            frames: Vec::new(),
        }
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// Move the clock forward to `now`. Earlier values are ignored.
    pub fn set_now(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    /// Deadline of the earliest pending timer.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.keys().next().map(|(deadline, _)| *deadline)
    }

    /// Number of pending timers.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Number of frame requests waiting for the next frame.
    #[must_use]
    pub fn pending_frames(&self) -> usize {
        self.frames.len()
    }

    /// Pop the earliest timer due at or before `until`.
    ///
    /// The clock moves to the popped timer's deadline, so a handler that
    /// schedules a follow-up measures its delay from the moment it fired.
    /// Call repeatedly until `None`, then [`set_now`](Self::set_now)`(until)`.
    pub fn pop_due(&mut self, until: Duration) -> Option<K> {
        let (&(deadline, id), _) = self.timers.iter().next()?;
        if deadline > until {
            return None;
        }
        self.deadlines.remove(&id);
        let key = self.timers.remove(&(deadline, id))?;
        self.set_now(deadline);
        Some(key)
    }

    /// Take every frame request made before this call.
    ///
    /// Requests issued while the returned batch is processed land in the next
    /// batch.
    pub fn take_frame(&mut self) -> Vec<K> {
        std::mem::take(&mut self.frames)
            .into_iter()
            .map(|(_, key)| key)
            .collect()
    }
}

impl<K> TimerService<K> for ManualTimers<K> {
    fn now(&self) -> Duration {
        self.now
    }

    fn after(&mut self, delay: Duration, key: K) -> TimerId {
        let id = self.allocate_id();
        let deadline = self.now.saturating_add(delay);
        self.timers.insert((deadline, id), key);
        self.deadlines.insert(id, deadline);
        TimerId(id)
    }

    fn cancel(&mut self, id: TimerId) -> bool {
        match self.deadlines.remove(&id.0) {
            Some(deadline) => self.timers.remove(&(deadline, id.0)).is_some(),
            None => false,
        }
    }

    fn request_frame(&mut self, key: K) -> FrameId {
        let id = self.allocate_id();
        self.frames.push((id, key));
        FrameId(id)
    }

    fn cancel_frame(&mut self, id: FrameId) -> bool {
        let before = self.frames.len();
        self.frames.retain(|(frame, _)| *frame != id.0);
        self.frames.len() != before
    }
}
