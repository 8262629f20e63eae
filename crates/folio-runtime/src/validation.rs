#![forbid(unsafe_code)]

//! Contact form field validation.

use std::fmt;

use crate::markup::FieldKind;

/// Error code for required field validation.
pub const ERROR_CODE_REQUIRED: &str = "required";
/// Error code for email validation.
pub const ERROR_CODE_EMAIL: &str = "email";

/// Message shown under an empty required field.
pub const MESSAGE_REQUIRED: &str = "This field is required";
/// Message shown under a malformed email field.
pub const MESSAGE_EMAIL: &str = "Please enter a valid email address";

// ---------------------------------------------------------------------------
// ValidationError
// ---------------------------------------------------------------------------

/// A failed field rule.
///
/// `code` is stable for programmatic handling; `message` is what the page
/// shows under the field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub code: &'static str,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

// ---------------------------------------------------------------------------
// ValidationResult
// ---------------------------------------------------------------------------

/// The result of validating one value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ValidationResult {
    #[default]
    Valid,
    Invalid(ValidationError),
}

impl ValidationResult {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// The error if invalid.
    #[must_use]
    pub fn error(&self) -> Option<&ValidationError> {
        match self {
            Self::Valid => None,
            Self::Invalid(e) => Some(e),
        }
    }

    /// Combine two results, keeping the first error.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        match self {
            Self::Valid => other,
            Self::Invalid(_) => self,
        }
    }
}

// ---------------------------------------------------------------------------
// Validators
// ---------------------------------------------------------------------------

/// A rule over values of type `T`.
pub trait Validator<T: ?Sized> {
    fn validate(&self, value: &T) -> ValidationResult;
}

/// Rejects empty and whitespace-only values.
#[derive(Debug, Clone, Copy, Default)]
pub struct Required;

impl Validator<str> for Required {
    fn validate(&self, value: &str) -> ValidationResult {
        if value.trim().is_empty() {
            ValidationResult::Invalid(ValidationError::new(ERROR_CODE_REQUIRED, MESSAGE_REQUIRED))
        } else {
            ValidationResult::Valid
        }
    }
}

/// Accepts `local@domain.tld` shapes. Empty values pass; pair with
/// [`Required`] to reject them.
#[derive(Debug, Clone, Copy, Default)]
pub struct Email;

impl Validator<str> for Email {
    fn validate(&self, value: &str) -> ValidationResult {
        let value = value.trim();
        if value.is_empty() || is_valid_email(value) {
            ValidationResult::Valid
        } else {
            ValidationResult::Invalid(ValidationError::new(ERROR_CODE_EMAIL, MESSAGE_EMAIL))
        }
    }
}

/// `^[^\s@]+@[^\s@]+\.[^\s@]+$`: one `@`, no whitespace, a non-empty local
/// part, and a dot in the domain with something on both sides of it.
#[must_use]
pub fn is_valid_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// Validate a field value the way the page does on blur: trim, then the
/// required rule, then the format rule for the field's kind.
#[must_use]
pub fn validate_field(kind: FieldKind, required: bool, value: &str) -> ValidationResult {
    let mut result = ValidationResult::Valid;
    if required {
        result = result.and(Required.validate(value));
    }
    if kind == FieldKind::Email {
        result = result.and(Email.validate(value));
    }
    result
}
