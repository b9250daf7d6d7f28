//! Level definitions and level method synthesis

use super::error::{LoggerError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Metadata for one level, keyed by its method name in a [`LevelTable`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelDefinition {
    /// Level value handed to formatters and transports. Empty means "use the method name".
    #[serde(default)]
    pub name: String,
    /// Error-carrying levels take an error object and enrich the meta with it
    #[serde(default)]
    pub error: bool,
}

impl LevelDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            error: false,
        }
    }

    pub fn error_carrying(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            error: true,
        }
    }
}

/// Mapping of method name to level definition
///
/// Method names are unique by construction. The `name` of a definition is the
/// value that reaches transports and may be shared by several methods
/// (`error` and `exception` both log as `"Error"` in the standard table).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelTable {
    levels: BTreeMap<String, LevelDefinition>,
}

impl LevelTable {
    /// An empty table
    pub fn new() -> Self {
        Self {
            levels: BTreeMap::new(),
        }
    }

    /// `debug`, `info`, `warn`, `error` and the error-carrying `exception`
    pub fn standard() -> Self {
        Self::new()
            .with_level("debug", LevelDefinition::new("Debug"))
            .with_level("info", LevelDefinition::new("Info"))
            .with_level("warn", LevelDefinition::new("Warning"))
            .with_level("error", LevelDefinition::new("Error"))
            .with_level("exception", LevelDefinition::error_carrying("Error"))
    }

    #[must_use]
    pub fn with_level(mut self, method: impl Into<String>, definition: LevelDefinition) -> Self {
        self.insert(method, definition);
        self
    }

    /// Insert or replace the definition for `method`
    pub fn insert(&mut self, method: impl Into<String>, definition: LevelDefinition) {
        self.levels.insert(method.into(), definition);
    }

    pub fn get(&self, method: &str) -> Option<&LevelDefinition> {
        self.levels.get(method)
    }

    pub fn contains(&self, method: &str) -> bool {
        self.levels.contains_key(method)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &LevelDefinition)> {
        self.levels.iter().map(|(method, def)| (method.as_str(), def))
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.levels.keys().any(|method| method.trim().is_empty()) {
            return Err(LoggerError::config(
                "levels",
                "level method names must not be empty",
            ));
        }
        Ok(())
    }

    /// Build the dispatch table: one entry per method name
    pub(crate) fn synthesize(&self) -> BTreeMap<String, LevelEntry> {
        self.levels
            .iter()
            .map(|(method, def)| {
                let level = if def.name.is_empty() {
                    method.clone()
                } else {
                    def.name.clone()
                };
                let entry = LevelEntry {
                    method: method.clone(),
                    level,
                    error: def.error,
                };
                (method.clone(), entry)
            })
            .collect()
    }
}

impl Default for LevelTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl<M: Into<String>> FromIterator<(M, LevelDefinition)> for LevelTable {
    fn from_iter<I: IntoIterator<Item = (M, LevelDefinition)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (method, definition) in iter {
            table.insert(method, definition);
        }
        table
    }
}

/// A synthesized level method: the resolved level value plus its calling convention
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelEntry {
    pub(crate) method: String,
    pub(crate) level: String,
    pub(crate) error: bool,
}

impl LevelEntry {
    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn level(&self) -> &str {
        &self.level
    }

    pub fn is_error_level(&self) -> bool {
        self.error
    }
}

impl fmt::Display for LevelEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.method, self.level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table() {
        let table = LevelTable::standard();
        assert_eq!(table.len(), 5);
        assert_eq!(table.get("warn").map(|d| d.name.as_str()), Some("Warning"));
        assert!(table.get("exception").is_some_and(|d| d.error));
        assert!(!table.get("error").is_some_and(|d| d.error));
    }

    #[test]
    fn test_synthesize_defaults_name_to_method() {
        let table = LevelTable::new()
            .with_level("error", LevelDefinition::new("error"))
            .with_level("warn", LevelDefinition::new("warning"))
            .with_level("info", LevelDefinition::new(""));

        let methods = table.synthesize();
        assert_eq!(methods["info"].level(), "info");
        assert_eq!(methods["warn"].level(), "warning");
        assert!(!methods.contains_key("warning"));
    }

    #[test]
    fn test_validate_rejects_empty_method() {
        let table = LevelTable::new().with_level("", LevelDefinition::new("Blank"));
        assert!(matches!(
            table.validate(),
            Err(LoggerError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_deserialize_table() {
        let table: LevelTable = serde_json::from_str(
            r#"{ "notice": { "name": "Notice" }, "fault": { "name": "Fault", "error": true } }"#,
        )
        .unwrap();

        assert_eq!(table.len(), 2);
        assert!(table.get("fault").is_some_and(|d| d.error));
        assert!(!table.get("notice").is_some_and(|d| d.error));
    }
}
