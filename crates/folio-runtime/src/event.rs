#![forbid(unsafe_code)]

//! Input events the host forwards to the page.

/// A DOM event, reduced to what the engine needs.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum PageEvent {
    /// `DOMContentLoaded`.
    DomReady,
    /// `window` `load`: all resources are in.
    Loaded,
    /// The window scrolled to `offset` (`window.scrollY`).
    Scroll { offset: f64 },
    /// Element geometry changed without a scroll (images, resize, filtering).
    LayoutChanged,
    /// The hamburger was clicked.
    NavToggle,
    /// A nav link was clicked.
    NavLinkClicked { link: String },
    /// Any other `a[href^="#"]` was clicked.
    AnchorClicked { href: String },
    /// A portfolio filter button was clicked.
    FilterClicked { button: String },
    /// A form field's value changed.
    FieldInput { name: String, value: String },
    /// A form field lost focus.
    FieldBlur { name: String },
    /// The contact form was submitted.
    Submit,
    /// A `.btn` was clicked.
    ButtonClicked { button: String },
    /// The user closed a notification.
    NotificationDismissed { id: u64 },
}

impl PageEvent {
    /// Short name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::DomReady => "dom_ready",
            Self::Loaded => "loaded",
            Self::Scroll { .. } => "scroll",
            Self::LayoutChanged => "layout_changed",
            Self::NavToggle => "nav_toggle",
            Self::NavLinkClicked { .. } => "nav_link_clicked",
            Self::AnchorClicked { .. } => "anchor_clicked",
            Self::FilterClicked { .. } => "filter_clicked",
            Self::FieldInput { .. } => "field_input",
            Self::FieldBlur { .. } => "field_blur",
            Self::Submit => "submit",
            Self::ButtonClicked { .. } => "button_clicked",
            Self::NotificationDismissed { .. } => "notification_dismissed",
        }
    }

    /// Parse a single event from JSON.
    #[cfg(feature = "serde")]
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
