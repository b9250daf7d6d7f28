//! Log record structure

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Structured metadata attached to a record
pub type Meta = Map<String, Value>;

/// A single normalized log record
///
/// Records are created fresh for every `log` call. Formatters receive a record
/// by value and hand back a new one; once the formatter chain has run, the
/// record is frozen and shared by every transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
    pub message: String,
    #[serde(default)]
    pub meta: Meta,
}

impl LogRecord {
    pub fn new(level: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            event: None,
            message: message.into(),
            meta: Meta::new(),
        }
    }

    #[must_use]
    pub fn with_event(mut self, event: impl Into<String>) -> Self {
        self.event = Some(event.into());
        self
    }

    #[must_use]
    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = meta;
        self
    }

    /// Add or replace a single meta field
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }

    /// Flatten into one JSON object: `level`, `event`, `message`, then every meta field
    ///
    /// Meta keys never replace the three record fields.
    pub fn to_flat_json(&self) -> Value {
        let mut object = Map::with_capacity(self.meta.len() + 3);
        for (key, value) in &self.meta {
            object.insert(key.clone(), value.clone());
        }
        object.insert("level".to_string(), Value::String(self.level.clone()));
        if let Some(ref event) = self.event {
            object.insert("event".to_string(), Value::String(event.clone()));
        }
        object.insert("message".to_string(), Value::String(self.message.clone()));
        Value::Object(object)
    }
}

/// Merge `overrides` on top of `base`; keys in `overrides` win
pub fn merge_meta(base: &Meta, overrides: Meta) -> Meta {
    let mut merged = base.clone();
    merged.extend(overrides);
    merged
}
