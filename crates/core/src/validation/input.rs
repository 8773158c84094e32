//! Raw form input as submitted by a browser or API client.

use indexmap::IndexMap;
use serde_json::Value;

use super::coerce::is_truthy;

/// Value stored for a JSON `true`, matching what a checked HTML checkbox sends.
pub const CHECKED: &str = "on";

/// Field name to raw string value, in submission order.
///
/// A missing key means the field was not submitted at all (an unchecked
/// checkbox, an omitted optional field).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormInput(IndexMap<String, String>);

impl FormInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing any earlier value for the same name.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.0.insert(field.into(), value.into());
    }

    /// Raw value of a field, untrimmed.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Whether a checkbox-style field is checked.
    pub fn is_truthy(&self, field: &str) -> bool {
        is_truthy(self.get(field))
    }

    /// Whether a field's trimmed value equals `expected` exactly.
    pub fn equals(&self, field: &str, expected: &str) -> bool {
        self.get(field).is_some_and(|v| v.trim() == expected)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Keep only the fields for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.0.retain(|field, _| keep(field));
    }

    /// Build input from a JSON object body.
    ///
    /// Strings are kept verbatim and numbers use their decimal text. `true`
    /// becomes [`CHECKED`]; `false` and `null` leave the field out, the way an
    /// unchecked checkbox is simply not submitted. A form field holds one
    /// value, so arrays and objects refuse the whole body.
    pub fn from_json_object(
        body: &serde_json::Map<String, Value>,
    ) -> Result<Self, NonScalarField> {
        let mut input = Self::new();
        for (field, value) in body {
            let raw = match value {
                Value::Null | Value::Bool(false) => continue,
                Value::Bool(true) => CHECKED.to_string(),
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Array(_) | Value::Object(_) => {
                    return Err(NonScalarField(field.clone()));
                }
            };
            input.insert(field.clone(), raw);
        }
        Ok(input)
    }
}

/// A JSON body field whose value is an array or an object.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Field '{0}' must be a string, number, boolean or null")]
pub struct NonScalarField(pub String);

impl<K, V> FromIterator<(K, V)> for FormInput
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut input = Self::new();
        for (field, value) in iter {
            input.insert(field, value);
        }
        input
    }
}
