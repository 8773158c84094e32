//! Post-validation cleanup and type coercion.

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::Serialize;

use super::coerce::{is_truthy, parse_date, parse_float, parse_integer};
use super::email::normalize_email;
use super::input::{FormInput, CHECKED};
use crate::error::CoreError;

/// Entity references produced by [`escape`]; an `&` starting one of these is
/// left alone so escaping twice changes nothing.
const ENTITIES: &[&str] = &["&amp;", "&lt;", "&gt;", "&quot;", "&#x27;", "&#x2F;"];

/// One transformation applied to a field's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Trim,
    Escape,
    NormalizeEmail,
    ToFloat,
    ToInteger,
    ToDate,
    /// Checkbox state; always emitted, `false` when absent.
    ToFlag,
}

/// A cleaned, typed field value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SanitizedValue {
    Text(String),
    Float(f64),
    Integer(i64),
    Date(NaiveDate),
    Flag(bool),
}

impl SanitizedValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            SanitizedValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Text form accepted back by the matching coercion step.
    fn to_raw(&self) -> Option<String> {
        match self {
            SanitizedValue::Text(s) => Some(s.clone()),
            SanitizedValue::Float(n) => Some(n.to_string()),
            SanitizedValue::Integer(n) => Some(n.to_string()),
            SanitizedValue::Date(d) => Some(d.format("%Y-%m-%d").to_string()),
            SanitizedValue::Flag(true) => Some(CHECKED.to_string()),
            SanitizedValue::Flag(false) => None,
        }
    }
}

/// Validated output ready for persistence, in sanitizer field order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SanitizedRecord(IndexMap<String, SanitizedValue>);

impl SanitizedRecord {
    pub fn get(&self, field: &str) -> Option<&SanitizedValue> {
        self.0.get(field)
    }

    pub fn text(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(SanitizedValue::as_text)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SanitizedValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl From<&SanitizedRecord> for FormInput {
    /// Turn a record back into raw input, e.g. to re-run a profile on it.
    fn from(record: &SanitizedRecord) -> Self {
        record
            .iter()
            .filter_map(|(field, value)| value.to_raw().map(|raw| (field, raw)))
            .collect()
    }
}

#[derive(Debug, Clone)]
struct FieldSanitizer {
    field: String,
    steps: Vec<Step>,
}

/// Per-field transformation pipelines.
#[derive(Debug, Clone, Default)]
pub struct Sanitizer {
    fields: Vec<FieldSanitizer>,
}

impl Sanitizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, field: impl Into<String>, steps: &[Step]) -> Self {
        self.fields.push(FieldSanitizer {
            field: field.into(),
            steps: steps.to_vec(),
        });
        self
    }

    /// Names of the fields this sanitizer emits, in order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.field.as_str())
    }

    /// Build the typed record.
    ///
    /// Must only run on input that passed validation. Absent or blank fields
    /// are left out of the record (flags excepted); a pipeline without
    /// [`Step::Trim`] only treats the empty string as blank. A failed coercion means a
    /// profile declares a coercion its rules do not guarantee, and is an
    /// internal error rather than a user-facing one.
    pub fn sanitize(&self, input: &FormInput) -> Result<SanitizedRecord, CoreError> {
        let mut record = IndexMap::new();
        for pipeline in &self.fields {
            let is_flag = pipeline.steps.contains(&Step::ToFlag);
            let trims = pipeline.steps.contains(&Step::Trim);
            let raw = input
                .get(&pipeline.field)
                .filter(|v| !(if trims { v.trim() } else { v }).is_empty());
            let Some(raw) = raw else {
                if is_flag {
                    record.insert(pipeline.field.clone(), SanitizedValue::Flag(false));
                }
                continue;
            };
            let value = apply_steps(&pipeline.field, raw, &pipeline.steps)?;
            record.insert(pipeline.field.clone(), value);
        }
        Ok(SanitizedRecord(record))
    }
}

fn apply_steps(field: &str, raw: &str, steps: &[Step]) -> Result<SanitizedValue, CoreError> {
    let mut text = raw.to_string();
    let mut typed = None;
    for step in steps {
        match step {
            Step::Trim => text = text.trim().to_string(),
            Step::Escape => text = escape(&text),
            Step::NormalizeEmail => text = normalize_email(&text),
            Step::ToFloat => {
                let n = parse_float(&text).ok_or_else(|| precondition(field, "number"))?;
                typed = Some(SanitizedValue::Float(n));
            }
            Step::ToInteger => {
                let n = parse_integer(&text).ok_or_else(|| precondition(field, "integer"))?;
                typed = Some(SanitizedValue::Integer(n));
            }
            Step::ToDate => {
                let d = parse_date(&text).ok_or_else(|| precondition(field, "date"))?;
                typed = Some(SanitizedValue::Date(d));
            }
            Step::ToFlag => typed = Some(SanitizedValue::Flag(is_truthy(Some(&text)))),
        }
    }
    Ok(typed.unwrap_or(SanitizedValue::Text(text)))
}

fn precondition(field: &str, kind: &str) -> CoreError {
    CoreError::Internal(format!(
        "sanitizer precondition violated: field `{field}` is not a valid {kind}"
    ))
}

/// HTML-escape `& < > " ' /`.
///
/// An `&` that already starts one of the produced entities is kept as is.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for (i, ch) in raw.char_indices() {
        match ch {
            '&' if ENTITIES.iter().any(|e| raw[i..].starts_with(e)) => out.push('&'),
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '/' => out.push_str("&#x2F;"),
            other => out.push(other),
        }
    }
    out
}
