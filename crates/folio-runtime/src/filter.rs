#![forbid(unsafe_code)]

//! Portfolio filtering with staged show/hide transitions.
//!
//! A click makes the button the only active one and restyles every item in
//! two stages:
//!
//! | item    | immediately                        | after                          |
//! |---------|------------------------------------|--------------------------------|
//! | matches | `display: block`                   | `show_delay_ms`: fade/slide in |
//! | other   | `opacity: 0; translateY(20px)`     | `hide_delay_ms`: `display: none` |
//!
//! Each item has at most one pending stage. A new click cancels it, so a
//! stale hide never lands on an item a newer click is showing.

use folio_core::mutation::{StyleProperty, UiClass, UiMutation};
use folio_core::timer::{TimerId, TimerService};

use crate::config::{FilterConfig, ms};
use crate::markup::{FilterButtonSpec, PortfolioItemSpec};

/// Filter value that matches every item.
pub const FILTER_ALL: &str = "all";

/// Second-stage timers, keyed by item index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterTimer {
    /// Fade a shown item in.
    Reveal(usize),
    /// Take a hidden item out of the layout.
    Collapse(usize),
}

#[derive(Debug, Clone)]
struct Item {
    id: String,
    category: String,
    pending: Option<TimerId>,
}

/// Filter buttons and the items they control.
#[derive(Debug, Clone, Default)]
pub struct PortfolioFilter {
    config: FilterConfig,
    buttons: Vec<FilterButtonSpec>,
    items: Vec<Item>,
    active: Option<String>,
}

impl PortfolioFilter {
    #[must_use]
    pub fn new(
        config: FilterConfig,
        buttons: &[FilterButtonSpec],
        items: &[PortfolioItemSpec],
    ) -> Self {
        Self {
            config,
            buttons: buttons.to_vec(),
            items: items
                .iter()
                .map(|i| Item {
                    id: i.id.clone(),
                    category: i.category.clone(),
                    pending: None,
                })
                .collect(),
            active: buttons.iter().find(|b| b.active).map(|b| b.id.clone()),
        }
    }

    /// Id of the active button.
    #[must_use]
    pub fn active_button(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Number of items with a second stage still pending.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.items.iter().filter(|i| i.pending.is_some()).count()
    }

    /// Apply the filter behind `button`.
    pub fn click<K, T>(&mut self, timers: &mut T, button: &str) -> Vec<UiMutation>
    where
        K: From<FilterTimer>,
        T: TimerService<K>,
    {
        let Some(filter) = self
            .buttons
            .iter()
            .find(|b| b.id == button)
            .map(|b| b.filter.clone())
        else {
            tracing::warn!(button, "click on unknown filter button");
            return Vec::new();
        };
        tracing::debug!(button, filter = %filter, "portfolio filter applied");

        let mut out = Vec::new();
        if self.active.as_deref() != Some(button) {
            if let Some(prev) = self.active.take() {
                out.push(UiMutation::remove_class(prev, UiClass::Active));
            }
            out.push(UiMutation::add_class(button, UiClass::Active));
            self.active = Some(button.to_owned());
        }

        for (index, item) in self.items.iter_mut().enumerate() {
            if let Some(timer) = item.pending.take() {
                timers.cancel(timer);
            }
            if filter == FILTER_ALL || item.category == filter {
                out.push(UiMutation::set_style(
                    item.id.clone(),
                    StyleProperty::Display,
                    "block",
                ));
                item.pending = Some(timers.after(
                    ms(self.config.show_delay_ms),
                    FilterTimer::Reveal(index).into(),
                ));
            } else {
                out.push(UiMutation::set_style(item.id.clone(), StyleProperty::Opacity, "0"));
                out.push(UiMutation::set_style(
                    item.id.clone(),
                    StyleProperty::Transform,
                    "translateY(20px)",
                ));
                item.pending = Some(timers.after(
                    ms(self.config.hide_delay_ms),
                    FilterTimer::Collapse(index).into(),
                ));
            }
        }
        out
    }

    /// Run a fired second stage.
    pub fn on_timer(&mut self, timer: FilterTimer) -> Vec<UiMutation> {
        let index = match timer {
            FilterTimer::Reveal(i) | FilterTimer::Collapse(i) => i,
        };
        let Some(item) = self.items.get_mut(index) else {
            return Vec::new();
        };
        item.pending = None;
        match timer {
            FilterTimer::Reveal(_) => vec![
                UiMutation::set_style(item.id.clone(), StyleProperty::Opacity, "1"),
                UiMutation::set_style(item.id.clone(), StyleProperty::Transform, "translateY(0)"),
            ],
            FilterTimer::Collapse(_) => vec![UiMutation::set_style(
                item.id.clone(),
                StyleProperty::Display,
                "none",
            )],
        }
    }
}
