#![forbid(unsafe_code)]

//! Stagger utilities: cascading delay offsets for entrance animations.
//!
//! # Invariants
//!
//! 1. `stagger_offsets(0, ..)` returns an empty vec.
//! 2. The first offset is always `Duration::ZERO`.
//! 3. `offset[i] = i * delay`, computed in integer nanoseconds.

use std::time::Duration;

/// Delay offsets for `count` items spaced `delay` apart.
#[must_use]
pub fn stagger_offsets(count: usize, delay: Duration) -> Vec<Duration> {
    (0..count)
        .map(|i| delay.saturating_mul(u32::try_from(i).unwrap_or(u32::MAX)))
        .collect()
}

/// Format an offset as a CSS time value in seconds (`0s`, `0.3s`, `1.25s`).
#[must_use]
pub fn css_delay(offset: Duration) -> String {
    format!("{}s", offset.as_secs_f64())
}
