#![forbid(unsafe_code)]

//! Text scramble: a per-character randomized transition between two strings.
//!
//! Each position `i` of the longer string gets a [`ScrambleTask`] with a
//! random start frame and a random end frame at or after it. Before `start`
//! the old character shows, between `start` and `end` a random glyph
//! flickers, and from `end` on the new character is shown. Positions are
//! extended grapheme clusters, so combining sequences and emoji move as one.
//!
//! # Invariants
//!
//! 1. `start <= end` for every task.
//! 2. The final rendered text equals the new text exactly.
//! 3. A scramble reports completion exactly once; a superseded scramble
//!    never does.

use std::collections::BTreeMap;

use unicode_segmentation::UnicodeSegmentation;

use super::FrameAnimation;
use super::callbacks::{AnimationEvent, Callbacks};
use crate::mutation::UiMutation;
use crate::rng::{RandomSource, XorShift64};
use crate::timer::{FrameId, TimerService};

/// Glyph pool used while a position is in flux.
pub const DEFAULT_GLYPHS: &str = "!<>-_\\/[]{}—=+*^?#________";

/// Scramble timing and glyph pool.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScrambleConfig {
    /// Start frames are drawn from `[0, start_spread)`.
    pub start_spread: u32,
    /// Flicker lengths are drawn from `[0, duration_spread)`.
    pub duration_spread: u32,
    /// Chance that a flickering position picks a new glyph on a frame.
    pub reroll_probability: f64,
    /// Glyphs to flicker through.
    pub glyphs: String,
}

impl Default for ScrambleConfig {
    fn default() -> Self {
        Self {
            start_spread: 40,
            duration_spread: 40,
            reroll_probability: 0.28,
            glyphs: DEFAULT_GLYPHS.to_owned(),
        }
    }
}

impl ScrambleConfig {
    /// Builder: set both random spreads.
    #[must_use]
    pub fn with_spreads(mut self, start: u32, duration: u32) -> Self {
        self.start_spread = start;
        self.duration_spread = duration;
        self
    }

    /// Builder: set the re-roll probability (clamped to `[0, 1]`).
    #[must_use]
    pub fn with_reroll_probability(mut self, p: f64) -> Self {
        self.reroll_probability = if p.is_finite() { p.clamp(0.0, 1.0) } else { 0.0 };
        self
    }

    /// Builder: set the glyph pool.
    #[must_use]
    pub fn with_glyphs(mut self, glyphs: impl Into<String>) -> Self {
        self.glyphs = glyphs.into();
        self
    }
}

/// Transition plan for one character position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrambleTask {
    /// Character shown before `start` (empty past the old text's end).
    pub from: String,
    /// Character shown from `end` on (empty past the new text's end).
    pub to: String,
    /// First flickering frame.
    pub start: u32,
    /// First settled frame.
    pub end: u32,
    glyph: Option<usize>,
}

/// One scramble run from an old text to a new one.
#[derive(Debug, Clone)]
pub struct Scramble {
    tasks: Vec<ScrambleTask>,
    glyphs: Vec<String>,
    reroll_probability: f64,
    rng: XorShift64,
    frame: u32,
    done: bool,
}

impl Scramble {
    /// Plan a scramble from `old` to `new`.
    ///
    /// Task timings are drawn from `rng`; per-frame flicker uses a generator
    /// seeded from it, so one seed reproduces the whole run.
    pub fn new<R: RandomSource + ?Sized>(
        old: &str,
        new: &str,
        config: &ScrambleConfig,
        rng: &mut R,
    ) -> Self {
        let from: Vec<&str> = old.graphemes(true).collect();
        let to: Vec<&str> = new.graphemes(true).collect();
        let len = from.len().max(to.len());
        let tasks = (0..len)
            .map(|i| {
                let start = rng.below(config.start_spread);
                let end = start.saturating_add(rng.below(config.duration_spread));
                ScrambleTask {
                    from: from.get(i).copied().unwrap_or_default().to_owned(),
                    to: to.get(i).copied().unwrap_or_default().to_owned(),
                    start,
                    end,
                    glyph: None,
                }
            })
            .collect();
        Self {
            tasks,
            glyphs: config.glyphs.graphemes(true).map(str::to_owned).collect(),
            reroll_probability: config.reroll_probability,
            rng: XorShift64::new(rng.next_u64()),
            frame: 0,
            done: false,
        }
    }

    /// Per-position plans.
    #[must_use]
    pub fn tasks(&self) -> &[ScrambleTask] {
        &self.tasks
    }

    /// Index of the next frame to render.
    #[must_use]
    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// The text this scramble settles on.
    #[must_use]
    pub fn target_text(&self) -> String {
        self.tasks.iter().map(|t| t.to.as_str()).collect()
    }

    fn random_glyph(&mut self) -> Option<usize> {
        let len = u32::try_from(self.glyphs.len()).unwrap_or(u32::MAX);
        if len == 0 {
            return None;
        }
        Some(self.rng.below(len) as usize)
    }
}

impl FrameAnimation for Scramble {
    type Output = String;

    fn step(&mut self) -> String {
        if self.done {
            return self.target_text();
        }
        let frame = self.frame;
        let mut output = String::new();
        let mut settled = 0usize;
        for i in 0..self.tasks.len() {
            let (start, end) = (self.tasks[i].start, self.tasks[i].end);
            if frame >= end {
                settled += 1;
                output.push_str(&self.tasks[i].to);
            } else if frame >= start {
                let reroll = self.tasks[i].glyph.is_none()
                    || self.rng.next_f64() < self.reroll_probability;
                if reroll {
                    self.tasks[i].glyph = self.random_glyph();
                }
                if let Some(glyph) = self.tasks[i].glyph {
                    output.push_str(&self.glyphs[glyph]);
                }
            } else {
                output.push_str(&self.tasks[i].from);
            }
        }
        self.done = settled == self.tasks.len();
        self.frame = self.frame.saturating_add(1);
        output
    }

    fn is_complete(&self) -> bool {
        self.done
    }

    fn frames(&self) -> u32 {
        self.frame
    }
}

/// Identifies one `set_text` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ScrambleTicket(u64);

/// What one scramble frame produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrambleFrame {
    /// The run this frame belongs to.
    pub ticket: ScrambleTicket,
    /// Text update for the element.
    pub mutation: UiMutation,
    /// Milestones reached on this frame.
    pub events: Vec<AnimationEvent>,
}

#[derive(Debug)]
struct Active {
    ticket: ScrambleTicket,
    anim: Callbacks<Scramble>,
    frame: Option<FrameId>,
}

/// Runs text scrambles, at most one per element.
#[derive(Debug)]
pub struct TextScrambler<R = XorShift64> {
    config: ScrambleConfig,
    rng: R,
    next_ticket: u64,
    active: BTreeMap<String, Active>,
}

impl Default for TextScrambler<XorShift64> {
    fn default() -> Self {
        Self::new(ScrambleConfig::default(), XorShift64::default())
    }
}

impl<R: RandomSource> TextScrambler<R> {
    /// Create a scrambler drawing randomness from `rng`.
    #[must_use]
    pub fn new(config: ScrambleConfig, rng: R) -> Self {
        Self {
            config,
            rng,
            next_ticket: 0,
            active: BTreeMap::new(),
        }
    }

    /// Configuration in use.
    #[must_use]
    pub fn config(&self) -> &ScrambleConfig {
        &self.config
    }

    /// Whether `id` has a scramble in progress.
    #[must_use]
    pub fn is_running(&self, id: &str) -> bool {
        self.active.contains_key(id)
    }

    /// Ticket of the scramble in progress on `id`.
    #[must_use]
    pub fn ticket(&self, id: &str) -> Option<ScrambleTicket> {
        self.active.get(id).map(|a| a.ticket)
    }

    /// Start scrambling `id` from `old` to `new`, rendering frame 0 now.
    ///
    /// A scramble already running on `id` is cancelled first and will never
    /// report completion. `next` keys the following frame request.
    pub fn set_text<K, T>(
        &mut self,
        timers: &mut T,
        id: impl Into<String>,
        old: &str,
        new: &str,
        next: K,
    ) -> ScrambleFrame
    where
        T: TimerService<K>,
    {
        let id = id.into();
        if let Some(prev) = self.active.remove(&id) {
            if let Some(frame) = prev.frame {
                timers.cancel_frame(frame);
            }
            crate::debug!(id = %id, "scramble superseded");
        }
        let ticket = ScrambleTicket(self.next_ticket);
        self.next_ticket = self.next_ticket.wrapping_add(1);

        let scramble = Scramble::new(old, new, &self.config, &mut self.rng);
        let anim = Callbacks::new(scramble).on_start().on_complete();
        self.active.insert(
            id.clone(),
            Active {
                ticket,
                anim,
                frame: None,
            },
        );
        self.advance(timers, &id, next)
            .unwrap_or_else(|| ScrambleFrame {
                ticket,
                mutation: UiMutation::set_text(id, new),
                events: Vec::new(),
            })
    }

    /// Run the frame continuation for `id`.
    ///
    /// Returns `None` when nothing is running on `id`.
    pub fn on_frame<K, T>(&mut self, timers: &mut T, id: &str, next: K) -> Option<ScrambleFrame>
    where
        T: TimerService<K>,
    {
        self.active.get_mut(id)?.frame = None;
        self.advance(timers, id, next)
    }

    fn advance<K, T>(&mut self, timers: &mut T, id: &str, next: K) -> Option<ScrambleFrame>
    where
        T: TimerService<K>,
    {
        let active = self.active.get_mut(id)?;
        let text = active.anim.step();
        let events = active.anim.drain_events();
        let ticket = active.ticket;
        if active.anim.is_complete() {
            crate::trace!(id, frames = active.anim.frames(), "scramble finished");
            self.active.remove(id);
        } else {
            active.frame = Some(timers.request_frame(next));
        }
        Some(ScrambleFrame {
            ticket,
            mutation: UiMutation::set_text(id, text),
            events,
        })
    }
}
