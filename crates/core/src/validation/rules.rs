//! Validation rule and result types.

use indexmap::IndexMap;
use regex::Regex;
use serde::ser::SerializeSeq;
use serde::{Deserialize, Serialize, Serializer};

/// How a numeric field must parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberKind {
    Float,
    Integer,
}

/// Shape a text value must have.
#[derive(Debug, Clone)]
pub enum Format {
    Email,
    /// `YYYY-MM-DD`, or an RFC 3339 date-time.
    IsoDate,
    Pattern(Regex),
}

/// A single pass/fail predicate.
///
/// Every rule except the three presence rules (`Required`, `RequiredIf`,
/// `RequiredGroup`) passes on an absent or blank value.
#[derive(Debug, Clone)]
pub enum Rule {
    Required,
    /// Inclusive bounds on the character count.
    LengthBetween {
        min: Option<usize>,
        max: Option<usize>,
    },
    /// Numeric and strictly greater than zero.
    Positive(NumberKind),
    Matches(Format),
    OneOf(Vec<String>),
    /// A date no later than the evaluation day.
    DateNotFuture,
    /// Required only while sibling `field` equals `equals`.
    RequiredIf { field: String, equals: String },
    /// At least one of the fields is checked.
    RequiredGroup(Vec<String>),
}

/// A rule paired with the message shown when it fails.
#[derive(Debug, Clone)]
pub struct Check {
    pub rule: Rule,
    pub message: String,
}

impl Check {
    pub fn new(rule: Rule, message: impl Into<String>) -> Self {
        Self {
            rule,
            message: message.into(),
        }
    }
}

/// Gate deciding whether a [`RuleSet`] applies to a given submission.
#[derive(Debug, Clone)]
pub enum Condition {
    Equals { field: String, value: String },
    Truthy(String),
}

/// Ordered checks bound to one field.
///
/// All checks run and every failure is reported; a set does not stop at the
/// first failing check.
#[derive(Debug, Clone)]
pub struct RuleSet {
    pub(crate) field: String,
    pub(crate) checks: Vec<Check>,
    pub(crate) optional: bool,
    pub(crate) keep_whitespace: bool,
    pub(crate) condition: Option<Condition>,
}

impl RuleSet {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            checks: Vec::new(),
            optional: false,
            keep_whitespace: false,
            condition: None,
        }
    }

    pub fn check(mut self, rule: Rule, message: impl Into<String>) -> Self {
        self.checks.push(Check::new(rule, message));
        self
    }

    /// Skip every check when the value is absent or blank.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Judge the value exactly as submitted instead of trimmed.
    ///
    /// For fields the sanitizer stores verbatim, such as passwords.
    pub fn keep_whitespace(mut self) -> Self {
        self.keep_whitespace = true;
        self
    }

    /// Only validate the field when `condition` holds.
    pub fn when(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }
}

/// One failed check on one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Field name to its errors, in evaluation order.
///
/// Sparse: a field without errors has no entry. Serializes as a flat list of
/// `{field, message}` objects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorMap(IndexMap<String, Vec<ValidationError>>);

impl ErrorMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: ValidationError) {
        self.0.entry(error.field.clone()).or_default().push(error);
    }

    pub fn extend(&mut self, errors: impl IntoIterator<Item = ValidationError>) {
        for error in errors {
            self.push(error);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of fields with at least one error.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn error_count(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&[ValidationError]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Messages recorded for a field, empty when the field is valid.
    pub fn messages(&self, field: &str) -> Vec<&str> {
        self.get(field)
            .unwrap_or_default()
            .iter()
            .map(|e| e.message.as_str())
            .collect()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.values().flatten()
    }

    pub fn into_errors(self) -> Vec<ValidationError> {
        self.0.into_values().flatten().collect()
    }
}

impl Serialize for ErrorMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.error_count()))?;
        for error in self.errors() {
            seq.serialize_element(error)?;
        }
        seq.end()
    }
}

/// Input refused by a validation profile.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{} field(s) failed validation", .errors.len())]
pub struct Rejection {
    pub errors: ErrorMap,
}
