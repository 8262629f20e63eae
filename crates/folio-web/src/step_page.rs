#![forbid(unsafe_code)]

//! Step-based page runner.
//!
//! [`StepPage`] drives a [`Page`] without threads or blocking. The host
//! (JavaScript) controls the loop:
//!
//! 1. Push DOM events via [`StepPage::push_event`].
//! 2. Advance time via [`StepPage::advance_time`].
//! 3. Call [`StepPage::step`] once per `requestAnimationFrame`.
//! 4. Apply the mutations from [`StepPage::take_outputs`].
//!
//! # Example
//!
//! ```
//! use core::time::Duration;
//! use folio_core::geometry::StaticLayout;
//! use folio_runtime::event::PageEvent;
//! use folio_runtime::markup::PageMarkup;
//! use folio_runtime::page::Page;
//! use folio_web::StepPage;
//!
//! let page = Page::with_defaults(PageMarkup::default(), StaticLayout::new(800.0)).unwrap();
//! let mut step = StepPage::new(page);
//!
//! step.push_event(PageEvent::DomReady);
//! step.advance_time(Duration::from_millis(16));
//! let result = step.step();
//! assert_eq!(result.events_processed, 1);
//! let outputs = step.take_outputs();
//! assert!(outputs.batch_hash.is_some());
//! ```

use core::time::Duration;
use std::collections::VecDeque;

use folio_core::geometry::LayoutSource;
use folio_runtime::event::PageEvent;
use folio_runtime::page::Page;
use folio_runtime::submit::{SimulatedSubmitter, Submitter};

use crate::{DeterministicClock, WebOutputs, mutation_batch_hash};

/// Result of a single [`StepPage::step`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepResult {
    /// Number of queued events handled during this step.
    pub events_processed: u32,
    /// Number of frame continuations run.
    pub frame_tasks: u32,
    /// Number of mutations produced.
    pub mutations: u32,
    /// Current step index (monotonically increasing).
    pub frame_idx: u64,
}

/// Host-driven, non-blocking page runner.
pub struct StepPage<L, S = SimulatedSubmitter> {
    page: Page<L, S>,
    clock: DeterministicClock,
    queue: VecDeque<PageEvent>,
    outputs: WebOutputs,
    frame_idx: u64,
}

impl<L: LayoutSource, S: Submitter> StepPage<L, S> {
    /// Wrap a freshly built page.
    ///
    /// Mutations the page produced while being built are kept and delivered
    /// with the first step.
    #[must_use]
    pub fn new(page: Page<L, S>) -> Self {
        let mut clock = DeterministicClock::new();
        clock.set(page.now());
        Self {
            page,
            clock,
            queue: VecDeque::new(),
            outputs: WebOutputs::default(),
            frame_idx: 0,
        }
    }

    /// Queue a DOM event for the next step.
    pub fn push_event(&mut self, event: PageEvent) {
        self.queue.push_back(event);
    }

    /// Number of events waiting for the next step.
    #[must_use]
    pub fn pending_events(&self) -> usize {
        self.queue.len()
    }

    /// Advance the clock by `dt`.
    pub fn advance_time(&mut self, dt: Duration) {
        self.clock.advance(dt);
    }

    /// Set the clock to `now` (never backwards).
    pub fn set_time(&mut self, now: Duration) {
        self.clock.set(now);
    }

    #[must_use]
    pub fn clock(&self) -> &DeterministicClock {
        &self.clock
    }

    #[must_use]
    pub fn page(&self) -> &Page<L, S> {
        &self.page
    }

    /// Mutable page access.
    pub fn page_mut(&mut self) -> &mut Page<L, S> {
        &mut self.page
    }

    /// Change the layout; observed elements are re-checked on the next step.
    pub fn update_layout(&mut self, update: impl FnOnce(&mut L)) {
        update(self.page.layout_mut());
        self.queue.push_back(PageEvent::LayoutChanged);
    }

    /// Current step index.
    #[must_use]
    pub fn frame_idx(&self) -> u64 {
        self.frame_idx
    }

    /// Handle queued events, run due timers, then run one frame.
    ///
    /// Events are handled at the time they were queued relative to the last
    /// step: the page clock catches up only after the queue is drained, so a
    /// step behaves like "events, then time passes, then a frame".
    pub fn step(&mut self) -> StepResult {
        let mut events_processed = 0u32;
        while let Some(event) = self.queue.pop_front() {
            self.page.handle_event(event);
            events_processed = events_processed.saturating_add(1);
        }
        self.page.advance_to(self.clock.now());
        let frame_tasks = u32::try_from(self.page.frame()).unwrap_or(u32::MAX);

        let batch = self.page.drain_mutations();
        let mutations = u32::try_from(batch.len()).unwrap_or(u32::MAX);
        self.outputs.mutations.extend(batch);
        self.outputs.notices.extend(self.page.drain_notices());
        self.outputs.batch_hash = Some(mutation_batch_hash(&self.outputs.mutations));
        self.frame_idx = self.frame_idx.saturating_add(1);

        StepResult {
            events_processed,
            frame_tasks,
            mutations,
            frame_idx: self.frame_idx,
        }
    }

    /// Take captured outputs, leaving empty defaults.
    pub fn take_outputs(&mut self) -> WebOutputs {
        std::mem::take(&mut self.outputs)
    }
}
