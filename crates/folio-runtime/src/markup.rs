#![forbid(unsafe_code)]

//! Static description of the page the engine drives.
//!
//! The host extracts a [`PageMarkup`] from the DOM once (or ships it as
//! JSON) and the engine never looks at the document again except through
//! [`LayoutSource`](folio_core::geometry::LayoutSource) geometry queries.

use std::collections::HashSet;
use std::fmt;

use folio_core::flags::ObserveTags;

// ---------------------------------------------------------------------------
// MarkupError
// ---------------------------------------------------------------------------

/// Why a markup description was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupError {
    /// The input could not be parsed.
    Parse(String),
    /// Two structural elements share an id.
    DuplicateId(String),
    /// A form field has an empty name.
    EmptyFieldName,
    /// Two form fields share a name.
    DuplicateField(String),
}

impl fmt::Display for MarkupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "failed to parse page markup: {msg}"),
            Self::DuplicateId(id) => write!(f, "duplicate element id `{id}`"),
            Self::EmptyFieldName => f.write_str("form field with an empty name"),
            Self::DuplicateField(name) => write!(f, "duplicate form field `{name}`"),
        }
    }
}

impl std::error::Error for MarkupError {}

// ---------------------------------------------------------------------------
// Element descriptions
// ---------------------------------------------------------------------------

/// A navigation link.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NavLinkSpec {
    pub id: String,
    /// Raw `href`, e.g. `#about`.
    pub href: String,
}

/// An element watched by the viewport observer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObservedSpec {
    pub id: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub tags: ObserveTags,
    /// Raw `data-target` of a counter display.
    #[cfg_attr(feature = "serde", serde(default))]
    pub counter_target: Option<String>,
}

/// A portfolio filter button.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FilterButtonSpec {
    pub id: String,
    /// `data-filter` value; `all` matches every item.
    pub filter: String,
    /// Whether the button starts out active.
    #[cfg_attr(feature = "serde", serde(default))]
    pub active: bool,
}

/// A filterable portfolio item.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PortfolioItemSpec {
    pub id: String,
    /// `data-category` value.
    pub category: String,
}

/// Input type of a form field; decides which format rule applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FieldKind {
    #[default]
    Text,
    Email,
    Textarea,
    Select,
}

/// A contact form field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldSpec {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub kind: FieldKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub required: bool,
    /// Floating label reset after a successful submit.
    #[cfg_attr(feature = "serde", serde(default))]
    pub label: Option<String>,
}

/// The contact form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FormSpec {
    pub id: String,
    pub fields: Vec<FieldSpec>,
}

/// A `.btn` element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ButtonSpec {
    pub id: String,
    /// Submit buttons get no ripple.
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_submit: bool,
}

/// The hero title and its original text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeroTitleSpec {
    pub id: String,
    pub text: String,
}

// ---------------------------------------------------------------------------
// PageMarkup
// ---------------------------------------------------------------------------

/// Everything the engine needs to know about the document structure.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PageMarkup {
    /// Section ids in document order.
    pub sections: Vec<String>,
    pub nav_links: Vec<NavLinkSpec>,
    pub nav_menu: Option<String>,
    pub nav_toggle: Option<String>,
    pub navbar: Option<String>,
    pub observed: Vec<ObservedSpec>,
    pub filter_buttons: Vec<FilterButtonSpec>,
    pub portfolio_items: Vec<PortfolioItemSpec>,
    pub form: Option<FormSpec>,
    pub buttons: Vec<ButtonSpec>,
    pub hero_title: Option<HeroTitleSpec>,
    /// Direct children of the hero content, in order.
    pub hero_elements: Vec<String>,
    pub loading_overlay: Option<String>,
}

impl PageMarkup {
    /// Reject duplicate structural ids and malformed form fields.
    ///
    /// Observed elements and hero children may alias structural elements,
    /// so they are only checked against their own lists.
    pub fn validate(&self) -> Result<(), MarkupError> {
        let mut seen = HashSet::new();
        let structural = self
            .sections
            .iter()
            .chain(self.nav_links.iter().map(|l| &l.id))
            .chain(self.nav_menu.iter())
            .chain(self.nav_toggle.iter())
            .chain(self.navbar.iter())
            .chain(self.filter_buttons.iter().map(|b| &b.id))
            .chain(self.portfolio_items.iter().map(|i| &i.id))
            .chain(self.form.iter().map(|f| &f.id))
            .chain(self.buttons.iter().map(|b| &b.id))
            .chain(self.hero_title.iter().map(|h| &h.id))
            .chain(self.loading_overlay.iter());
        for id in structural {
            if !seen.insert(id.as_str()) {
                return Err(MarkupError::DuplicateId(id.clone()));
            }
        }

        for list in [
            self.observed.iter().map(|o| &o.id).collect::<Vec<_>>(),
            self.hero_elements.iter().collect(),
        ] {
            let mut seen = HashSet::new();
            for id in list {
                if !seen.insert(id.as_str()) {
                    return Err(MarkupError::DuplicateId(id.clone()));
                }
            }
        }

        if let Some(form) = &self.form {
            let mut names = HashSet::new();
            for field in &form.fields {
                if field.name.is_empty() {
                    return Err(MarkupError::EmptyFieldName);
                }
                if !names.insert(field.name.as_str()) {
                    return Err(MarkupError::DuplicateField(field.name.clone()));
                }
            }
        }
        Ok(())
    }

    /// Ordered `(section_id, nav_link_id)` pairs for links of the form
    /// `#section` that point at a known section.
    #[must_use]
    pub fn navigation_model(&self) -> Vec<(String, String)> {
        self.nav_links
            .iter()
            .filter_map(|link| {
                let target = anchor_target(&link.href)?;
                self.sections
                    .iter()
                    .any(|s| s == target)
                    .then(|| (target.to_owned(), link.id.clone()))
            })
            .collect()
    }

    /// Whether `id` names any element the markup describes.
    #[must_use]
    pub fn has_element(&self, id: &str) -> bool {
        let eq = |s: &String| s == id;
        self.sections.iter().any(eq)
            || self.nav_links.iter().any(|l| l.id == id)
            || self.observed.iter().any(|o| o.id == id)
            || self.portfolio_items.iter().any(|i| i.id == id)
            || self.filter_buttons.iter().any(|b| b.id == id)
            || self.buttons.iter().any(|b| b.id == id)
            || self.hero_elements.iter().any(eq)
            || self.form.as_ref().is_some_and(|f| f.id == id)
            || self.hero_title.as_ref().is_some_and(|h| h.id == id)
            || [&self.nav_menu, &self.nav_toggle, &self.navbar, &self.loading_overlay]
                .into_iter()
                .flatten()
                .any(eq)
    }

    /// Parse and validate a JSON markup description.
    #[cfg(feature = "serde")]
    pub fn from_json_str(json: &str) -> Result<Self, MarkupError> {
        let markup: Self =
            serde_json::from_str(json).map_err(|e| MarkupError::Parse(e.to_string()))?;
        markup.validate()?;
        Ok(markup)
    }
}

/// The element id an in-page `href` points at (`#about` → `about`).
#[must_use]
pub fn anchor_target(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|rest| !rest.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn markup() -> PageMarkup {
        PageMarkup {
            sections: vec!["home".into(), "about".into(), "contact".into()],
            nav_links: vec![
                NavLinkSpec {
                    id: "nav-home".into(),
                    href: "#home".into(),
                },
                NavLinkSpec {
                    id: "nav-about".into(),
                    href: "#about".into(),
                },
                NavLinkSpec {
                    id: "nav-blog".into(),
                    href: "https://example.com/blog".into(),
                },
            ],
            nav_menu: Some("nav-menu".into()),
            form: Some(FormSpec {
                id: "contact-form".into(),
                fields: vec![FieldSpec {
                    name: "email".into(),
                    kind: FieldKind::Email,
                    required: true,
                    label: None,
                }],
            }),
            ..PageMarkup::default()
        }
    }

    #[test]
    fn valid_markup_passes() {
        assert_eq!(markup().validate(), Ok(()));
    }

    #[test]
    fn duplicate_structural_id_rejected() {
        let mut m = markup();
        m.navbar = Some("home".into());
        assert_eq!(m.validate(), Err(MarkupError::DuplicateId("home".into())));
    }

    #[test]
    fn observed_may_alias_sections() {
        let mut m = markup();
        m.observed.push(ObservedSpec {
            id: "about".into(),
            tags: ObserveTags::FADE_IN,
            counter_target: None,
        });
        assert!(m.validate().is_ok());
    }

    #[test]
    fn form_field_names_checked() {
        let mut m = markup();
        if let Some(form) = m.form.as_mut() {
            form.fields.push(FieldSpec {
                name: "email".into(),
                ..FieldSpec::default()
            });
        }
        assert_eq!(m.validate(), Err(MarkupError::DuplicateField("email".into())));

        let mut m = markup();
        if let Some(form) = m.form.as_mut() {
            form.fields.push(FieldSpec::default());
        }
        assert_eq!(m.validate(), Err(MarkupError::EmptyFieldName));
    }

    #[test]
    fn navigation_model_keeps_in_page_links_only() {
        assert_eq!(
            markup().navigation_model(),
            vec![
                ("home".to_owned(), "nav-home".to_owned()),
                ("about".to_owned(), "nav-about".to_owned()),
            ]
        );
    }

    #[test]
    fn anchor_targets() {
        assert_eq!(anchor_target("#about"), Some("about"));
        assert_eq!(anchor_target("#"), None);
        assert_eq!(anchor_target("/about"), None);
    }

    #[test]
    fn element_lookup() {
        let m = markup();
        assert!(m.has_element("nav-menu"));
        assert!(m.has_element("contact-form"));
        assert!(!m.has_element("ghost"));
    }
}
