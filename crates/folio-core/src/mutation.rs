#![forbid(unsafe_code)]

//! UI mutation records.
//!
//! The engine never writes to the page itself. Every visible effect is
//! described by a [`UiMutation`] and appended to an output batch, in the
//! order the host adapter must apply them.

use std::fmt;

/// CSS classes the engine toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum UiClass {
    /// `active` (nav links, filter buttons, mobile menu).
    Active,
    /// `section-revealed`.
    SectionRevealed,
    /// `visible` (observed elements).
    Visible,
    /// `animate` (progress bars).
    Animate,
    /// `scrolled` (navbar).
    Scrolled,
    /// `fade-in`.
    FadeIn,
    /// `slide-in-left`.
    SlideInLeft,
    /// `slide-in-right`.
    SlideInRight,
    /// `loading` (contact form while submitting).
    Loading,
    /// `error` (invalid form field).
    Error,
}

impl UiClass {
    /// The class name as written in markup.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::SectionRevealed => "section-revealed",
            Self::Visible => "visible",
            Self::Animate => "animate",
            Self::Scrolled => "scrolled",
            Self::FadeIn => "fade-in",
            Self::SlideInLeft => "slide-in-left",
            Self::SlideInRight => "slide-in-right",
            Self::Loading => "loading",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for UiClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inline style properties the engine writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum StyleProperty {
    Display,
    Opacity,
    Transform,
    AnimationDelay,
    Top,
    Left,
    FontSize,
    Color,
}

impl StyleProperty {
    /// CSS property name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Display => "display",
            Self::Opacity => "opacity",
            Self::Transform => "transform",
            Self::AnimationDelay => "animation-delay",
            Self::Top => "top",
            Self::Left => "left",
            Self::FontSize => "font-size",
            Self::Color => "color",
        }
    }
}

/// Severity of a notification; the host picks its colour from this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    #[default]
    Info,
}

impl NotificationKind {
    /// Class suffix, as in `notification-success`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

/// Visible lifecycle phase of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum NotificationPhase {
    /// Inserted, transparent and offset upward.
    Entering,
    /// Fully shown.
    Visible,
    /// Fading out before removal.
    Exiting,
}

/// One change the host adapter applies to the page.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "op", rename_all = "snake_case"))]
pub enum UiMutation {
    AddClass {
        target: String,
        class: UiClass,
    },
    RemoveClass {
        target: String,
        class: UiClass,
    },
    SetText {
        target: String,
        text: String,
    },
    SetStyle {
        target: String,
        property: StyleProperty,
        value: String,
    },
    ScrollIntoView {
        target: String,
        smooth: bool,
    },
    AppendRipple {
        target: String,
        ripple: u64,
    },
    RemoveRipple {
        target: String,
        ripple: u64,
    },
    RemoveElement {
        target: String,
    },
    ShowNotification {
        id: u64,
        kind: NotificationKind,
        message: String,
    },
    SetNotificationPhase {
        id: u64,
        phase: NotificationPhase,
    },
    RemoveNotification {
        id: u64,
    },
    ShowFieldError {
        field: String,
        message: String,
    },
    ClearFieldError {
        field: String,
    },
    ResetForm {
        form: String,
    },
}

impl UiMutation {
    /// Shorthand for [`UiMutation::AddClass`].
    pub fn add_class(target: impl Into<String>, class: UiClass) -> Self {
        Self::AddClass {
            target: target.into(),
            class,
        }
    }

    /// Shorthand for [`UiMutation::RemoveClass`].
    pub fn remove_class(target: impl Into<String>, class: UiClass) -> Self {
        Self::RemoveClass {
            target: target.into(),
            class,
        }
    }

    /// Shorthand for [`UiMutation::SetText`].
    pub fn set_text(target: impl Into<String>, text: impl Into<String>) -> Self {
        Self::SetText {
            target: target.into(),
            text: text.into(),
        }
    }

    /// Shorthand for [`UiMutation::SetStyle`].
    pub fn set_style(
        target: impl Into<String>,
        property: StyleProperty,
        value: impl Into<String>,
    ) -> Self {
        Self::SetStyle {
            target: target.into(),
            property,
            value: value.into(),
        }
    }

    /// Element the mutation applies to, when it has one.
    #[must_use]
    pub fn target(&self) -> Option<&str> {
        match self {
            Self::AddClass { target, .. }
            | Self::RemoveClass { target, .. }
            | Self::SetText { target, .. }
            | Self::SetStyle { target, .. }
            | Self::ScrollIntoView { target, .. }
            | Self::AppendRipple { target, .. }
            | Self::RemoveRipple { target, .. }
            | Self::RemoveElement { target } => Some(target),
            Self::ShowFieldError { field, .. } | Self::ClearFieldError { field } => Some(field),
            Self::ResetForm { form } => Some(form),
            Self::ShowNotification { .. }
            | Self::SetNotificationPhase { .. }
            | Self::RemoveNotification { .. } => None,
        }
    }
}
