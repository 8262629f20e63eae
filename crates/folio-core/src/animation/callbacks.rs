#![forbid(unsafe_code)]

//! Milestone events for frame animations.
//!
//! [`Callbacks`] wraps any [`FrameAnimation`] and queues [`AnimationEvent`]s
//! as it is stepped. The owner drains them after each step.
//!
//! # Invariants
//!
//! 1. `Started` fires at most once, on the first step.
//! 2. `Completed` fires at most once, on the first step after which the
//!    inner animation reports complete.
//! 3. `drain_events()` clears the queue; events are not replayed.

use super::FrameAnimation;

/// A milestone reached by a [`Callbacks`]-wrapped animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationEvent {
    /// The animation rendered its first frame.
    Started,
    /// The animation rendered its final frame.
    Completed,
}

/// An animation wrapper that records milestones.
pub struct Callbacks<A> {
    inner: A,
    on_start: bool,
    on_complete: bool,
    started_fired: bool,
    completed_fired: bool,
    events: Vec<AnimationEvent>,
}

impl<A: std::fmt::Debug> std::fmt::Debug for Callbacks<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Callbacks")
            .field("inner", &self.inner)
            .field("pending_events", &self.events.len())
            .finish()
    }
}

impl<A: FrameAnimation> Callbacks<A> {
    /// Wrap an animation. No events are tracked until enabled.
    #[must_use]
    pub fn new(inner: A) -> Self {
        Self {
            inner,
            on_start: false,
            on_complete: false,
            started_fired: false,
            completed_fired: false,
            events: Vec::new(),
        }
    }

    /// Enable the `Started` event (builder pattern).
    #[must_use]
    pub fn on_start(mut self) -> Self {
        self.on_start = true;
        self
    }

    /// Enable the `Completed` event (builder pattern).
    #[must_use]
    pub fn on_complete(mut self) -> Self {
        self.on_complete = true;
        self
    }

    /// Access the inner animation.
    #[must_use]
    pub fn inner(&self) -> &A {
        &self.inner
    }

    /// Drain all pending events.
    pub fn drain_events(&mut self) -> Vec<AnimationEvent> {
        std::mem::take(&mut self.events)
    }

    /// Number of pending events.
    #[must_use]
    pub fn pending_event_count(&self) -> usize {
        self.events.len()
    }

    fn check_events(&mut self) {
        if self.on_start && !self.started_fired {
            self.started_fired = true;
            self.events.push(AnimationEvent::Started);
        }
        if self.on_complete && !self.completed_fired && self.inner.is_complete() {
            self.completed_fired = true;
            self.events.push(AnimationEvent::Completed);
        }
    }
}

impl<A: FrameAnimation> FrameAnimation for Callbacks<A> {
    type Output = A::Output;

    fn step(&mut self) -> A::Output {
        let out = self.inner.step();
        self.check_events();
        out
    }

    fn is_complete(&self) -> bool {
        self.inner.is_complete()
    }

    fn frames(&self) -> u32 {
        self.inner.frames()
    }
}
