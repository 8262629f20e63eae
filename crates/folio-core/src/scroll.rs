#![forbid(unsafe_code)]

//! Scroll-driven UI state: nav highlighting, section reveal, navbar state.
//!
//! [`ScrollCoordinator::tick`] recomputes everything from the current scroll
//! offset and live geometry, then returns the mutations needed to move the
//! page from its previous state to the new one. Because each tick is a full
//! recomputation rather than a delta, ticks can be applied in any cadence
//! without drift.
//!
//! # Invariants
//!
//! 1. At most one nav link is active at any time.
//! 2. A revealed section stays revealed.
//! 3. Only changes are emitted: a tick that changes nothing returns nothing.
//!
//! # Rules
//!
//! - **Nav**: `reading_line = scroll + nav_offset`. Every section (document
//!   order) whose `[top, top + height)` contains the line makes its own link
//!   the only active one, so the last match wins. No match keeps the
//!   previous state.
//! - **Reveal**: `scroll > top - viewport_height + reveal_offset` and
//!   `scroll < top + height`.
//! - **Navbar**: `scrolled` while `scroll > navbar_threshold`.

use crate::flags::StateFlags;
use crate::geometry::LayoutSource;
use crate::mutation::{UiClass, UiMutation};

/// Offsets used by the scroll rules, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScrollConfig {
    /// Distance below the viewport top used as the reading line.
    pub nav_offset: f64,
    /// How far a section must rise into the viewport before it reveals.
    pub reveal_offset: f64,
    /// Scroll offset past which the navbar is marked `scrolled`.
    pub navbar_threshold: f64,
    /// Debounce window for scroll ticks, in milliseconds.
    pub debounce_ms: u64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            nav_offset: 200.0,
            reveal_offset: 200.0,
            navbar_threshold: 100.0,
            debounce_ms: 16,
        }
    }
}

impl ScrollConfig {
    /// Builder: set the reading-line offset.
    #[must_use]
    pub fn with_nav_offset(mut self, offset: f64) -> Self {
        self.nav_offset = offset;
        self
    }

    /// Builder: set the reveal offset.
    #[must_use]
    pub fn with_reveal_offset(mut self, offset: f64) -> Self {
        self.reveal_offset = offset;
        self
    }

    /// Builder: set the debounce window.
    #[must_use]
    pub fn with_debounce_ms(mut self, ms: u64) -> Self {
        self.debounce_ms = ms;
        self
    }
}

/// Offset of the most recent tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollState {
    /// Scroll offset, clamped to be non-negative.
    pub offset: f64,
    /// Number of ticks applied so far.
    pub ticks: u64,
}

#[derive(Debug, Clone)]
struct Section {
    id: String,
    link: Option<String>,
    flags: StateFlags,
}

/// Recomputes scroll-derived UI state on each tick.
#[derive(Debug, Clone, Default)]
pub struct ScrollCoordinator {
    config: ScrollConfig,
    sections: Vec<Section>,
    active_link: Option<String>,
    navbar: Option<String>,
    navbar_scrolled: bool,
    state: ScrollState,
}

impl ScrollCoordinator {
    /// Create a coordinator with no sections.
    #[must_use]
    pub fn new(config: ScrollConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Builder: the element that receives the `scrolled` class.
    #[must_use]
    pub fn with_navbar(mut self, id: impl Into<String>) -> Self {
        self.navbar = Some(id.into());
        self
    }

    /// Append a section in document order.
    pub fn add_section(&mut self, id: impl Into<String>) {
        self.sections.push(Section {
            id: id.into(),
            link: None,
            flags: StateFlags::empty(),
        });
    }

    /// Map a section to its nav link.
    ///
    /// A section keeps the first link mapped to it, so one section can never
    /// light up two links. Returns `false` when the section is unknown or
    /// already mapped.
    pub fn link_section(&mut self, section_id: &str, link_id: impl Into<String>) -> bool {
        match self.sections.iter_mut().find(|s| s.id == section_id) {
            Some(section) if section.link.is_none() => {
                section.link = Some(link_id.into());
                true
            }
            _ => false,
        }
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &ScrollConfig {
        &self.config
    }

    /// State after the most recent tick.
    #[must_use]
    pub fn state(&self) -> ScrollState {
        self.state
    }

    /// Currently active nav link.
    #[must_use]
    pub fn active_link(&self) -> Option<&str> {
        self.active_link.as_deref()
    }

    /// Whether the navbar is currently marked `scrolled`.
    #[must_use]
    pub fn navbar_scrolled(&self) -> bool {
        self.navbar_scrolled
    }

    /// Whether `section_id` has been revealed.
    #[must_use]
    pub fn is_revealed(&self, section_id: &str) -> bool {
        self.sections
            .iter()
            .any(|s| s.id == section_id && s.flags.contains(StateFlags::REVEALED))
    }

    /// Section ids in document order.
    pub fn section_ids(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.id.as_str())
    }

    /// Apply one tick at `scroll_y`, reading geometry from `layout`.
    pub fn tick<L: LayoutSource + ?Sized>(&mut self, scroll_y: f64, layout: &L) -> Vec<UiMutation> {
        let scroll = if scroll_y.is_finite() {
            scroll_y.max(0.0)
        } else {
            0.0
        };
        self.state.offset = scroll;
        self.state.ticks = self.state.ticks.saturating_add(1);

        let mut out = Vec::new();
        self.highlight_nav(scroll, layout, &mut out);
        self.reveal_sections(scroll, layout, &mut out);
        self.update_navbar(scroll, &mut out);
        crate::trace!(scroll, mutations = out.len(), "scroll tick");
        out
    }

    fn highlight_nav<L: LayoutSource + ?Sized>(
        &mut self,
        scroll: f64,
        layout: &L,
        out: &mut Vec<UiMutation>,
    ) {
        let reading_line = scroll + self.config.nav_offset;
        let mut winner: Option<Option<&String>> = None;
        for section in &self.sections {
            let Some(region) = layout.region(&section.id) else {
                continue;
            };
            if region.contains(reading_line) {
                winner = Some(section.link.as_ref());
            }
        }
        let Some(next) = winner else {
            return;
        };
        if next == self.active_link.as_ref() {
            return;
        }
        let next = next.cloned();
        if let Some(prev) = self.active_link.take() {
            out.push(UiMutation::remove_class(prev, UiClass::Active));
        }
        if let Some(link) = &next {
            out.push(UiMutation::add_class(link.clone(), UiClass::Active));
        }
        crate::debug!(active = ?next, "nav highlight changed");
        self.active_link = next;
    }

    fn reveal_sections<L: LayoutSource + ?Sized>(
        &mut self,
        scroll: f64,
        layout: &L,
        out: &mut Vec<UiMutation>,
    ) {
        let viewport = layout.viewport_height();
        for section in &mut self.sections {
            if section.flags.contains(StateFlags::REVEALED) {
                continue;
            }
            let Some(region) = layout.region(&section.id) else {
                continue;
            };
            if scroll > region.top - viewport + self.config.reveal_offset && scroll < region.bottom()
            {
                section.flags.insert(StateFlags::REVEALED);
                out.push(UiMutation::add_class(
                    section.id.clone(),
                    UiClass::SectionRevealed,
                ));
            }
        }
    }

    fn update_navbar(&mut self, scroll: f64, out: &mut Vec<UiMutation>) {
        let scrolled = scroll > self.config.navbar_threshold;
        if scrolled == self.navbar_scrolled {
            return;
        }
        self.navbar_scrolled = scrolled;
        if let Some(navbar) = &self.navbar {
            out.push(if scrolled {
                UiMutation::add_class(navbar.clone(), UiClass::Scrolled)
            } else {
                UiMutation::remove_class(navbar.clone(), UiClass::Scrolled)
            });
        }
    }
}
