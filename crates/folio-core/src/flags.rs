#![forbid(unsafe_code)]

//! Membership flags for tracked elements.

use bitflags::bitflags;

bitflags! {
    /// State sets a tracked element can belong to.
    ///
    /// Every flag is one-way: once inserted it is never removed.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct StateFlags: u8 {
        /// Section has crossed into the reveal band at least once.
        const REVEALED = 1 << 0;
        /// Observed element has entered the viewport.
        const VISIBLE  = 1 << 1;
        /// Progress indicator has started its fill animation.
        const ANIMATE  = 1 << 2;
    }
}

bitflags! {
    /// Tags an observed element carries from markup.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ObserveTags: u8 {
        /// `.stat-number`: start a counter on entry.
        const COUNTER       = 1 << 0;
        /// `.skill-progress`: add `animate` on entry.
        const PROGRESS      = 1 << 1;
        /// Receives `fade-in` when registered.
        const FADE_IN       = 1 << 2;
        /// Receives `slide-in-left` when registered.
        const SLIDE_LEFT    = 1 << 3;
        /// Receives `slide-in-right` when registered.
        const SLIDE_RIGHT   = 1 << 4;
    }
}

impl ObserveTags {
    /// Reveal-style tags only.
    pub const REVEAL_STYLES: Self = Self::FADE_IN
        .union(Self::SLIDE_LEFT)
        .union(Self::SLIDE_RIGHT);
}
