#![forbid(unsafe_code)]

//! Core: deterministic scroll state, viewport observation, timers, and
//! frame-stepped animations for the Folio page engine.
//!
//! Nothing in this crate touches a real DOM or clock. Geometry is read through
//! [`geometry::LayoutSource`], time flows through [`timer::TimerService`], and
//! every visible effect is returned as a [`mutation::UiMutation`] record for a
//! host adapter to apply.

pub mod animation;
pub mod debounce;
pub mod flags;
pub mod geometry;
pub mod logging;
pub mod mutation;
pub mod rng;
pub mod scroll;
pub mod timer;
pub mod viewport;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};
