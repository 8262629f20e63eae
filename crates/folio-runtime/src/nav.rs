#![forbid(unsafe_code)]

//! Mobile navigation menu and in-page anchor scrolling.

use folio_core::mutation::{UiClass, UiMutation};

use crate::markup::{PageMarkup, anchor_target};

/// Open/closed state of the mobile menu.
#[derive(Debug, Clone, Default)]
pub struct NavMenu {
    menu: Option<String>,
    toggle: Option<String>,
    open: bool,
}

impl NavMenu {
    /// Menu and toggle ids from markup. Either may be absent.
    #[must_use]
    pub fn new(menu: Option<String>, toggle: Option<String>) -> Self {
        Self {
            menu,
            toggle,
            open: false,
        }
    }

    /// Whether the menu is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Flip the menu: `active` on both the toggle and the menu.
    pub fn toggle(&mut self) -> Vec<UiMutation> {
        self.open = !self.open;
        tracing::debug!(open = self.open, "nav menu toggled");
        self.apply()
    }

    /// Close the menu after a link was followed. No-op when already closed.
    pub fn close(&mut self) -> Vec<UiMutation> {
        if !self.open {
            return Vec::new();
        }
        self.open = false;
        self.apply()
    }

    fn apply(&self) -> Vec<UiMutation> {
        let class = UiClass::Active;
        self.toggle
            .iter()
            .chain(self.menu.iter())
            .map(|id| {
                if self.open {
                    UiMutation::add_class(id.clone(), class)
                } else {
                    UiMutation::remove_class(id.clone(), class)
                }
            })
            .collect()
    }
}

/// Smooth-scroll to the element an in-page `href` points at.
///
/// Returns `None` for external links, bare `#`, and targets the markup does
/// not know about.
#[must_use]
pub fn scroll_to_anchor(markup: &PageMarkup, href: &str) -> Option<UiMutation> {
    let target = anchor_target(href)?;
    if !markup.has_element(target) {
        tracing::debug!(href, "anchor target not found");
        return None;
    }
    Some(UiMutation::ScrollIntoView {
        target: target.to_owned(),
        smooth: true,
    })
}
