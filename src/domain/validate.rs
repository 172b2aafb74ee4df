//! Field validation
//!
//! `ValidationErrors` collects every failing field before a request is
//! rejected, so a single response names all of its problems at once.
//! Fields are keyed by their wire names.

use std::collections::BTreeMap;
use std::fmt;

/// Maximum length for name-like fields (account and category names, payees)
pub const MAX_NAME_LEN: usize = 50;

/// Per-field validation failures.
///
/// Backed by a BTreeMap so serialized output is deterministically ordered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a one-field error set.
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    /// Record a failure against a field. A field may accumulate several
    /// messages.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// Fold another error set into this one.
    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, messages) in other.fields {
            self.fields.entry(field).or_default().extend(messages);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &BTreeMap<String, Vec<String>> {
        &self.fields
    }

    pub fn into_fields(self) -> BTreeMap<String, Vec<String>> {
        self.fields
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.fields {
            for message in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Validate a required user-facing string: trimmed, non-blank, at most
/// [`MAX_NAME_LEN`] characters.
pub(crate) fn required_name(
    errors: &mut ValidationErrors,
    field: &str,
    value: &str,
) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.add(field, "Must not be blank");
        return None;
    }
    bounded(errors, field, trimmed)
}

/// Validate an optional user-facing string: trimmed and length-bounded,
/// blank allowed.
pub(crate) fn optional_name(
    errors: &mut ValidationErrors,
    field: &str,
    value: &str,
) -> Option<String> {
    bounded(errors, field, value.trim())
}

fn bounded(errors: &mut ValidationErrors, field: &str, trimmed: &str) -> Option<String> {
    if trimmed.chars().count() > MAX_NAME_LEN {
        errors.add(field, format!("Must be {MAX_NAME_LEN} characters or fewer"));
        return None;
    }
    Some(trimmed.to_string())
}
