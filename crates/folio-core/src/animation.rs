#![forbid(unsafe_code)]

//! Frame-stepped animation primitives.
//!
//! Page animations advance one discrete step per rendered frame rather than
//! by elapsed time: the host's frame cadence decides how fast they play, and
//! a test can step them without a clock.
//!
//! - [`counter`]: numeric count-up for statistics.
//! - [`scramble`]: per-character randomized text transition.
//! - [`stagger`]: linear delay offsets for entrance cascades.
//! - [`callbacks`]: one-shot `Started` / `Completed` milestones.

pub mod callbacks;
pub mod counter;
pub mod scramble;
pub mod stagger;

pub use callbacks::{AnimationEvent, Callbacks};
pub use counter::{CounterAnimator, CounterConfig, CounterFrame, CounterTask};
pub use scramble::{Scramble, ScrambleConfig, ScrambleFrame, ScrambleTask, ScrambleTicket, TextScrambler};
pub use stagger::{css_delay, stagger_offsets};

// ---------------------------------------------------------------------------
// FrameAnimation trait
// ---------------------------------------------------------------------------

/// An animation advanced one frame at a time.
pub trait FrameAnimation {
    /// What a single frame renders.
    type Output;

    /// Advance by one frame and return what to display.
    ///
    /// Stepping a complete animation returns its final output again.
    fn step(&mut self) -> Self::Output;

    /// Whether the animation has reached its final frame.
    fn is_complete(&self) -> bool;

    /// Number of frames stepped so far.
    fn frames(&self) -> u32;
}

impl<A: FrameAnimation + ?Sized> FrameAnimation for Box<A> {
    type Output = A::Output;

    #[inline]
    fn step(&mut self) -> A::Output {
        (**self).step()
    }

    #[inline]
    fn is_complete(&self) -> bool {
        (**self).is_complete()
    }

    #[inline]
    fn frames(&self) -> u32 {
        (**self).frames()
    }
}
