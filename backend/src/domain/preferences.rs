//! Free-form user preferences document.
//!
//! Preferences are an open mapping of string keys to arbitrary JSON values.
//! Updates always replace the whole mapping; the store never merges keys.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Raised when a JSON value cannot be used as a preferences document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("preferences must be a JSON object, found {found}")]
pub struct PreferencesShapeError {
    found: &'static str,
}

/// User preferences stored as a JSON object.
///
/// # Examples
/// ```
/// use account_store::domain::Preferences;
/// use serde_json::json;
///
/// let prefs = Preferences::new().with("theme", json!("dark"));
/// assert_eq!(prefs.get("theme"), Some(&json!("dark")));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Preferences(Map<String, Value>);

impl Preferences {
    /// Create an empty preferences document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.0.insert(key.into(), value);
        self
    }

    /// Insert or overwrite a single key, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    /// Look up a single key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no keys are set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over key/value pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Whether any key or string value, at any depth, holds a NUL character.
    ///
    /// PostgreSQL rejects `\u0000` inside JSONB, so such documents are
    /// refused before they reach storage.
    pub fn contains_nul(&self) -> bool {
        self.0
            .iter()
            .any(|(key, value)| key.contains('\0') || value_contains_nul(value))
    }

    /// Render the document as a JSON value for persistence.
    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

fn value_contains_nul(value: &Value) -> bool {
    match value {
        Value::String(text) => text.contains('\0'),
        Value::Array(items) => items.iter().any(value_contains_nul),
        Value::Object(map) => map
            .iter()
            .any(|(key, value)| key.contains('\0') || value_contains_nul(value)),
        Value::Null | Value::Bool(_) | Value::Number(_) => false,
    }
}

impl From<Map<String, Value>> for Preferences {
    fn from(value: Map<String, Value>) -> Self {
        Self(value)
    }
}

impl TryFrom<Value> for Preferences {
    type Error = PreferencesShapeError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let found = match value {
            Value::Object(map) => return Ok(Self(map)),
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
        };
        Err(PreferencesShapeError { found })
    }
}

impl From<Preferences> for Value {
    fn from(value: Preferences) -> Self {
        Value::Object(value.0)
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Preferences {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
