#![forbid(unsafe_code)]

//! Contact form state: field values, inline errors, and the reset sequence.
//!
//! Typing into a field clears its error, leaving a field validates it, and a
//! submit validates every field before anything is sent.

use folio_core::mutation::{StyleProperty, UiClass, UiMutation};

use crate::markup::{FieldSpec, FormSpec};
use crate::submit::FormData;
use crate::validation::{ValidationResult, validate_field};

/// Inline styles restored on floating labels after a successful submit.
pub const LABEL_RESET_STYLES: [(StyleProperty, &str); 4] = [
    (StyleProperty::Top, "1rem"),
    (StyleProperty::Left, "1rem"),
    (StyleProperty::FontSize, "1rem"),
    (StyleProperty::Color, "var(--text-muted)"),
];

#[derive(Debug, Clone)]
struct Field {
    spec: FieldSpec,
    value: String,
    has_error: bool,
}

/// The contact form.
#[derive(Debug, Clone)]
pub struct ContactForm {
    id: String,
    fields: Vec<Field>,
    submitting: bool,
}

impl ContactForm {
    /// Build form state from markup. All fields start empty.
    #[must_use]
    pub fn new(spec: &FormSpec) -> Self {
        Self {
            id: spec.id.clone(),
            fields: spec
                .fields
                .iter()
                .map(|spec| Field {
                    spec: spec.clone(),
                    value: String::new(),
                    has_error: false,
                })
                .collect(),
            submitting: false,
        }
    }

    /// Form element id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Current value of `name`.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&str> {
        self.field(name).map(|f| f.value.as_str())
    }

    /// Whether `name` currently shows an error.
    #[must_use]
    pub fn has_error(&self, name: &str) -> bool {
        self.field(name).is_some_and(|f| f.has_error)
    }

    /// Whether a submission is in flight.
    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub(crate) fn set_submitting(&mut self, submitting: bool) {
        self.submitting = submitting;
    }

    fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.spec.name == name)
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut Field> {
        self.fields.iter_mut().find(|f| f.spec.name == name)
    }

    /// Record typed input and clear any error on the field.
    pub fn input(&mut self, name: &str, value: &str) -> Vec<UiMutation> {
        let Some(field) = self.field_mut(name) else {
            tracing::warn!(field = name, "input for unknown form field");
            return Vec::new();
        };
        field.value.clear();
        field.value.push_str(value);
        let mut out = Vec::new();
        if field.has_error {
            clear_error(field, &mut out);
        }
        out
    }

    /// Validate one field, as on blur.
    pub fn blur(&mut self, name: &str) -> Vec<UiMutation> {
        let Some(field) = self.field_mut(name) else {
            tracing::warn!(field = name, "blur for unknown form field");
            return Vec::new();
        };
        let mut out = Vec::new();
        check(field, &mut out);
        out
    }

    /// Validate every field in order. Returns the mutations and whether the
    /// whole form is valid.
    pub fn validate_all(&mut self) -> (Vec<UiMutation>, bool) {
        let mut out = Vec::new();
        let mut valid = true;
        for field in &mut self.fields {
            valid &= check(field, &mut out);
        }
        (out, valid)
    }

    /// Snapshot of the current values, keyed by field name.
    #[must_use]
    pub fn form_data(&self) -> FormData {
        self.fields
            .iter()
            .map(|f| (f.spec.name.clone(), f.value.clone()))
            .collect()
    }

    /// Clear every value and error, and restore floating labels.
    pub fn reset(&mut self) -> Vec<UiMutation> {
        let mut out = vec![UiMutation::ResetForm {
            form: self.id.clone(),
        }];
        for field in &mut self.fields {
            field.value.clear();
            if field.has_error {
                clear_error(field, &mut out);
            }
        }
        for label in self.fields.iter().filter_map(|f| f.spec.label.as_deref()) {
            for (property, value) in LABEL_RESET_STYLES {
                out.push(UiMutation::set_style(label, property, value));
            }
        }
        out
    }
}

fn clear_error(field: &mut Field, out: &mut Vec<UiMutation>) {
    field.has_error = false;
    out.push(UiMutation::remove_class(field.spec.name.clone(), UiClass::Error));
    out.push(UiMutation::ClearFieldError {
        field: field.spec.name.clone(),
    });
}

fn check(field: &mut Field, out: &mut Vec<UiMutation>) -> bool {
    match validate_field(field.spec.kind, field.spec.required, &field.value) {
        ValidationResult::Valid => {
            if field.has_error {
                clear_error(field, out);
            }
            true
        }
        ValidationResult::Invalid(error) => {
            tracing::debug!(field = %field.spec.name, code = error.code, "field invalid");
            if !field.has_error {
                out.push(UiMutation::add_class(field.spec.name.clone(), UiClass::Error));
            }
            field.has_error = true;
            out.push(UiMutation::ShowFieldError {
                field: field.spec.name.clone(),
                message: error.message,
            });
            false
        }
    }
}
