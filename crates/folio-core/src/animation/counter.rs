#![forbid(unsafe_code)]

//! Count-up animation for statistic displays.
//!
//! A [`CounterTask`] walks a displayed integer from 0 to its target in
//! `ceil(duration / frame)` steps. The value at step `n` is
//! `floor(increment * n)`, computed from the step count rather than by
//! accumulation, and the last step snaps to the target.
//!
//! # Invariants
//!
//! 1. Displayed values never decrease.
//! 2. The final displayed value is exactly `target`.
//! 3. No more than `ceil(duration / frame)` steps are taken.
//!
//! # Failure Modes
//!
//! - `target <= 0`: snaps on the first step.
//! - Zero duration: snaps on the first step.
//! - Zero frame interval: clamped to 1 ms.

use std::collections::BTreeMap;
use std::time::Duration;

use super::FrameAnimation;
use super::callbacks::{AnimationEvent, Callbacks};
use crate::mutation::UiMutation;
use crate::timer::{FrameId, TimerService};

/// Count-up timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CounterConfig {
    /// Total count-up time in milliseconds.
    pub duration_ms: u64,
    /// Nominal frame interval in milliseconds.
    pub frame_ms: u64,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            duration_ms: 2000,
            frame_ms: 16,
        }
    }
}

impl CounterConfig {
    /// Builder: set the count-up duration.
    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Builder: set the frame interval.
    #[must_use]
    pub fn with_frame(mut self, frame: Duration) -> Self {
        self.frame_ms = u64::try_from(frame.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Steps needed to cover the duration, at least one.
    #[must_use]
    pub fn total_steps(&self) -> u32 {
        let frame = self.frame_ms.max(1);
        let steps = self.duration_ms.div_ceil(frame).max(1);
        u32::try_from(steps).unwrap_or(u32::MAX)
    }
}

/// Parse a `data-target` attribute the way a lenient integer parse would:
/// leading whitespace, an optional sign, then at least one digit. Anything
/// after the digits is ignored (`"1,200"` parses as 1).
#[must_use]
pub fn parse_target(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let magnitude: i64 = rest[..digits].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// One running count-up.
#[derive(Debug, Clone, PartialEq)]
pub struct CounterTask {
    target: i64,
    increment: f64,
    total_steps: u32,
    steps: u32,
    value: i64,
    done: bool,
}

impl CounterTask {
    /// Create a task counting from 0 to `target`.
    #[must_use]
    pub fn new(target: i64, config: &CounterConfig) -> Self {
        let total_steps = config.total_steps();
        let frame = config.frame_ms.max(1) as f64;
        let increment = if config.duration_ms == 0 {
            target as f64
        } else {
            target as f64 / (config.duration_ms as f64 / frame)
        };
        Self {
            target,
            increment,
            total_steps,
            steps: 0,
            value: 0,
            done: false,
        }
    }

    /// Target value.
    #[must_use]
    pub fn target(&self) -> i64 {
        self.target
    }

    /// Per-step increment.
    #[must_use]
    pub fn increment(&self) -> f64 {
        self.increment
    }

    /// Currently displayed value.
    #[must_use]
    pub fn value(&self) -> i64 {
        self.value
    }
}

impl FrameAnimation for CounterTask {
    type Output = i64;

    fn step(&mut self) -> i64 {
        if self.done {
            return self.value;
        }
        self.steps = self.steps.saturating_add(1);
        let acc = self.increment * f64::from(self.steps);
        if self.target <= 0 || self.steps >= self.total_steps || acc >= self.target as f64 {
            self.value = self.target;
            self.done = true;
        } else {
            self.value = self.value.max(acc.floor() as i64);
        }
        self.value
    }

    fn is_complete(&self) -> bool {
        self.done
    }

    fn frames(&self) -> u32 {
        self.steps
    }
}

/// What one counter step produced.
#[derive(Debug, Clone, PartialEq)]
pub struct CounterFrame {
    /// Text update for the counter element.
    pub mutation: UiMutation,
    /// Milestones reached on this step.
    pub events: Vec<AnimationEvent>,
}

#[derive(Debug)]
struct Running {
    anim: Callbacks<CounterTask>,
    frame: Option<FrameId>,
}

/// Drives every counter on the page.
///
/// Each counter steps once synchronously on start and then once per rendered
/// frame, through whatever continuation key the owner hands in.
#[derive(Debug, Default)]
pub struct CounterAnimator {
    config: CounterConfig,
    running: BTreeMap<String, Running>,
}

impl CounterAnimator {
    /// Create an animator with the given timing.
    #[must_use]
    pub fn new(config: CounterConfig) -> Self {
        Self {
            config,
            running: BTreeMap::new(),
        }
    }

    /// Timing in use.
    #[must_use]
    pub fn config(&self) -> &CounterConfig {
        &self.config
    }

    /// Number of counters still animating.
    #[must_use]
    pub fn active(&self) -> usize {
        self.running.len()
    }

    /// Whether `id` is still animating.
    #[must_use]
    pub fn is_running(&self, id: &str) -> bool {
        self.running.contains_key(id)
    }

    /// Start counting `id` up to `target`, rendering the first step now.
    ///
    /// `next` is the frame key under which the following step is requested.
    /// Restarting a running counter cancels its pending frame.
    pub fn start<K, T>(
        &mut self,
        timers: &mut T,
        id: impl Into<String>,
        target: i64,
        next: K,
    ) -> CounterFrame
    where
        T: TimerService<K>,
    {
        let id = id.into();
        if let Some(prev) = self.running.remove(&id)
            && let Some(frame) = prev.frame
        {
            timers.cancel_frame(frame);
        }
        crate::debug!(id = %id, target, "counter started");
        let anim = Callbacks::new(CounterTask::new(target, &self.config))
            .on_start()
            .on_complete();
        self.running.insert(id.clone(), Running { anim, frame: None });
        self.advance(timers, &id, next)
            .unwrap_or_else(|| CounterFrame {
                mutation: UiMutation::set_text(id, target.to_string()),
                events: Vec::new(),
            })
    }

    /// Run the frame continuation for `id`.
    ///
    /// Returns `None` when `id` is not animating (finished or never started).
    pub fn on_frame<K, T>(&mut self, timers: &mut T, id: &str, next: K) -> Option<CounterFrame>
    where
        T: TimerService<K>,
    {
        let running = self.running.get_mut(id)?;
        running.frame = None;
        self.advance(timers, id, next)
    }

    fn advance<K, T>(&mut self, timers: &mut T, id: &str, next: K) -> Option<CounterFrame>
    where
        T: TimerService<K>,
    {
        let running = self.running.get_mut(id)?;
        let value = running.anim.step();
        let events = running.anim.drain_events();
        if running.anim.is_complete() {
            crate::trace!(id, value, steps = running.anim.frames(), "counter finished");
            self.running.remove(id);
        } else {
            running.frame = Some(timers.request_frame(next));
        }
        Some(CounterFrame {
            mutation: UiMutation::set_text(id, value.to_string()),
            events,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::ManualTimers;

    fn run_to_end(task: &mut CounterTask) -> Vec<i64> {
        let mut values = Vec::new();
        while !task.is_complete() {
            values.push(task.step());
        }
        values
    }

    #[test]
    fn default_timing_matches_page() {
        let cfg = CounterConfig::default();
        assert_eq!(cfg.total_steps(), 125);
        let task = CounterTask::new(150, &cfg);
        assert!((task.increment() - 1.2).abs() < 1e-9);
    }

    #[test]
    fn counts_to_target_exactly() {
        let mut task = CounterTask::new(150, &CounterConfig::default());
        let values = run_to_end(&mut task);
        assert_eq!(values.last(), Some(&150));
        assert!(values.len() <= 125);
        assert!(values.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(values[0], 1);
    }

    #[test]
    fn non_positive_target_snaps() {
        let mut task = CounterTask::new(0, &CounterConfig::default());
        assert_eq!(task.step(), 0);
        assert!(task.is_complete());
        let mut task = CounterTask::new(-5, &CounterConfig::default());
        assert_eq!(task.step(), -5);
        assert_eq!(task.frames(), 1);
    }

    #[test]
    fn zero_duration_and_frame_are_safe() {
        let cfg = CounterConfig {
            duration_ms: 0,
            frame_ms: 0,
        };
        let mut task = CounterTask::new(99, &cfg);
        assert_eq!(task.step(), 99);
        assert!(task.is_complete());
    }

    #[test]
    fn parse_target_is_lenient() {
        assert_eq!(parse_target("150"), Some(150));
        assert_eq!(parse_target("  42+"), Some(42));
        assert_eq!(parse_target("1,200"), Some(1));
        assert_eq!(parse_target("-3"), Some(-3));
        assert_eq!(parse_target("abc"), None);
        assert_eq!(parse_target(""), None);
        assert_eq!(parse_target("-"), None);
    }

    #[test]
    fn animator_steps_once_per_frame() {
        let mut timers = ManualTimers::new();
        let mut counters = CounterAnimator::new(CounterConfig::default());

        let first = counters.start(&mut timers, "stat", 150, "stat");
        assert_eq!(first.mutation, UiMutation::set_text("stat", "1"));
        assert_eq!(first.events, vec![AnimationEvent::Started]);
        assert_eq!(timers.pending_frames(), 1);

        let mut last = first;
        let mut frames = 1;
        loop {
            let batch = timers.take_frame();
            if batch.is_empty() {
                break;
            }
            assert_eq!(batch.len(), 1);
            last = counters
                .on_frame(&mut timers, "stat", "stat")
                .expect("running");
            frames += 1;
        }
        assert_eq!(last.mutation, UiMutation::set_text("stat", "150"));
        assert_eq!(last.events, vec![AnimationEvent::Completed]);
        assert!(frames <= 125);
        assert!(!counters.is_running("stat"));
        assert!(counters.on_frame(&mut timers, "stat", "stat").is_none());
    }

    #[test]
    fn restart_cancels_pending_frame() {
        let mut timers = ManualTimers::new();
        let mut counters = CounterAnimator::default();
        counters.start(&mut timers, "stat", 500, "a");
        counters.start(&mut timers, "stat", 10, "b");
        assert_eq!(timers.take_frame(), vec!["b"]);
        assert_eq!(counters.active(), 1);
    }
}
