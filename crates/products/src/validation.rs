//! Entity-level validation and save outcomes.
//!
//! A failed validation is ordinary control flow: callers get a
//! [`SaveOutcome::Invalid`] value carrying the unsaved candidate and its
//! violations, never an error.

use serde::Serialize;

use crate::product::Product;

/// Maximum product name length, in characters.
pub const NAME_MAX_CHARS: usize = 255;

/// Product attributes that can carry violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductField {
    Name,
}

impl ProductField {
    pub fn as_str(self) -> &'static str {
        match self {
            ProductField::Name => "name",
        }
    }
}

/// What is wrong with a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    Blank,
    TooLong { max: usize },
}

impl ViolationKind {
    /// Message catalog key used to render this violation.
    pub fn message_key(&self) -> &'static str {
        match self {
            ViolationKind::Blank => "errors.messages.blank",
            ViolationKind::TooLong { .. } => "errors.messages.too_long",
        }
    }

    /// Interpolation arguments for [`Self::message_key`].
    pub fn message_args(&self) -> Vec<(&'static str, String)> {
        match self {
            ViolationKind::Blank => Vec::new(),
            ViolationKind::TooLong { max } => vec![("count", max.to_string())],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Violation {
    pub field: ProductField,
    pub kind: ViolationKind,
}

/// Ordered set of violations found on a candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    violations: Vec<Violation>,
}

impl ValidationErrors {
    pub fn add(&mut self, field: ProductField, kind: ViolationKind) {
        self.violations.push(Violation { field, kind });
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.violations.iter()
    }

    pub fn for_field(&self, field: ProductField) -> impl Iterator<Item = &ViolationKind> {
        self.violations
            .iter()
            .filter(move |v| v.field == field)
            .map(|v| &v.kind)
    }

    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

/// Result of a save attempt.
///
/// `C` is the candidate that failed: the bare attribute set for a new product,
/// the loaded [`Product`] (with submitted values applied) for an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome<C> {
    Saved(Product),
    Invalid { candidate: C, errors: ValidationErrors },
}

impl<C> SaveOutcome<C> {
    pub fn is_saved(&self) -> bool {
        matches!(self, SaveOutcome::Saved(_))
    }
}
