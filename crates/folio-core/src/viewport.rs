#![forbid(unsafe_code)]

//! One-shot viewport entry detection.
//!
//! [`ViewportObserver`] tracks a set of elements and, on each check, reports
//! the ones whose visible fraction first reached the configured threshold.
//! Elements are never unobserved after entering, so scrolling an element out
//! and back in does not restart its counter.
//!
//! # Invariants
//!
//! 1. Each element produces at most one [`ViewportEvent::Entered`].
//! 2. `CounterStart` / `ProgressAnimate` only follow an `Entered` for the same
//!    element, in the same batch.
//! 3. Elements missing from layout are skipped, not failed.

use crate::flags::{ObserveTags, StateFlags};
use crate::geometry::LayoutSource;
use crate::mutation::{UiClass, UiMutation};

/// Visibility rule for the observer.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ObserverConfig {
    /// Fraction of the element that must be inside the band, in `[0, 1]`.
    pub threshold: f64,
    /// Offset applied to the viewport's bottom edge; negative shrinks it.
    pub root_margin_bottom: f64,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            root_margin_bottom: -50.0,
        }
    }
}

impl ObserverConfig {
    /// Builder: set the visibility threshold (clamped to `[0, 1]`).
    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = if threshold.is_finite() {
            threshold.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self
    }

    /// Builder: set the bottom root margin in pixels.
    #[must_use]
    pub fn with_root_margin_bottom(mut self, margin: f64) -> Self {
        self.root_margin_bottom = margin;
        self
    }
}

/// Something that happened to an observed element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewportEvent {
    /// The element crossed the threshold for the first time.
    Entered(String),
    /// The element is a counter display and should start counting.
    CounterStart(String),
    /// The element is a progress indicator and should start filling.
    ProgressAnimate(String),
}

#[derive(Debug, Clone)]
struct Observed {
    id: String,
    tags: ObserveTags,
    flags: StateFlags,
    intersecting: bool,
}

/// Tracks elements and detects their first entry into view.
#[derive(Debug, Clone, Default)]
pub struct ViewportObserver {
    config: ObserverConfig,
    elements: Vec<Observed>,
}

impl ViewportObserver {
    /// Create an observer with the given configuration.
    #[must_use]
    pub fn new(config: ObserverConfig) -> Self {
        Self {
            config,
            elements: Vec::new(),
        }
    }

    /// Start observing `id`.
    ///
    /// Returns the reveal-style classes to apply immediately. Observing the
    /// same id twice merges the tags, as calling `observe` twice in the DOM
    /// keeps a single registration.
    pub fn observe(&mut self, id: impl Into<String>, tags: ObserveTags) -> Vec<UiMutation> {
        let id = id.into();
        let mut out = Vec::new();
        let styles = tags & ObserveTags::REVEAL_STYLES;
        for (flag, class) in [
            (ObserveTags::FADE_IN, UiClass::FadeIn),
            (ObserveTags::SLIDE_LEFT, UiClass::SlideInLeft),
            (ObserveTags::SLIDE_RIGHT, UiClass::SlideInRight),
        ] {
            if styles.contains(flag) {
                out.push(UiMutation::add_class(id.clone(), class));
            }
        }

        match self.elements.iter_mut().find(|e| e.id == id) {
            Some(existing) => existing.tags |= tags,
            None => self.elements.push(Observed {
                id,
                tags,
                flags: StateFlags::empty(),
                intersecting: false,
            }),
        }
        out
    }

    /// Number of observed elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether nothing is observed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Membership flags of an observed element.
    #[must_use]
    pub fn flags(&self, id: &str) -> Option<StateFlags> {
        self.elements.iter().find(|e| e.id == id).map(|e| e.flags)
    }

    /// Re-evaluate intersection at `scroll_y` against live layout.
    ///
    /// Returns the events for elements that entered during this check,
    /// in registration order.
    pub fn check<L: LayoutSource + ?Sized>(
        &mut self,
        scroll_y: f64,
        layout: &L,
    ) -> Vec<ViewportEvent> {
        let band_start = scroll_y;
        let band_end = scroll_y + layout.viewport_height() + self.config.root_margin_bottom;
        let threshold = self.config.threshold;
        let mut events = Vec::new();

        for element in &mut self.elements {
            let Some(region) = layout.region(&element.id) else {
                continue;
            };
            let fraction = region.visible_fraction(band_start, band_end);
            let now_intersecting = if threshold <= 0.0 {
                fraction > 0.0
            } else {
                fraction >= threshold
            };
            let transitioned = now_intersecting && !element.intersecting;
            element.intersecting = now_intersecting;

            if !transitioned || element.flags.contains(StateFlags::VISIBLE) {
                continue;
            }

            element.flags.insert(StateFlags::VISIBLE);
            crate::debug!(id = %element.id, fraction, "element entered viewport");
            events.push(ViewportEvent::Entered(element.id.clone()));
            if element.tags.contains(ObserveTags::COUNTER) {
                events.push(ViewportEvent::CounterStart(element.id.clone()));
            }
            if element.tags.contains(ObserveTags::PROGRESS) {
                element.flags.insert(StateFlags::ANIMATE);
                events.push(ViewportEvent::ProgressAnimate(element.id.clone()));
            }
        }
        events
    }
}
