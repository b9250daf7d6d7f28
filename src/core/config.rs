//! Immutable logger configuration
//!
//! Everything about a logger that is plain data lives here, so it can be
//! loaded from a config file. Formatters and transports are code and are
//! supplied through [`LoggerBuilder`](super::LoggerBuilder) instead.

use super::error::{LoggerError, Result};
use super::log_level::LevelTable;
use super::log_record::Meta;
use super::timestamp::{TimestampFormat, TimestampPolicy};
use serde::{Deserialize, Serialize};

/// Default meta key for the message of an error passed to an error-carrying level
pub const DEFAULT_ERROR_MESSAGE_KEY: &str = "exceptionmessage";

/// Default meta key for the stack text of an error passed to an error-carrying level
pub const DEFAULT_ERROR_STACK_KEY: &str = "exceptiondetails";

/// # Example
///
/// ```
/// use rust_transport_logger::core::{LoggerConfig, TimestampPolicy};
///
/// let config: LoggerConfig = serde_json::from_str(r#"{
///     "default_meta": { "service": "checkout" },
///     "timestamp": "ts"
/// }"#).unwrap();
///
/// assert_eq!(config.timestamp, TimestampPolicy::Key("ts".to_string()));
/// assert_eq!(config.error_message_key, "exceptionmessage");
/// assert!(config.levels.contains("exception"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub levels: LevelTable,
    pub default_meta: Meta,
    pub timestamp: TimestampPolicy,
    pub timestamp_format: TimestampFormat,
    pub error_message_key: String,
    pub error_stack_key: String,
}

impl LoggerConfig {
    pub fn new() -> Self {
        Self {
            levels: LevelTable::standard(),
            default_meta: Meta::new(),
            timestamp: TimestampPolicy::Disabled,
            timestamp_format: TimestampFormat::default(),
            error_message_key: DEFAULT_ERROR_MESSAGE_KEY.to_string(),
            error_stack_key: DEFAULT_ERROR_STACK_KEY.to_string(),
        }
    }

    /// Parse a JSON document into a config; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn validate(&self) -> Result<()> {
        self.levels.validate()?;

        if self.error_message_key.is_empty() {
            return Err(LoggerError::config(
                "error_message_key",
                "key must not be empty",
            ));
        }
        if self.error_stack_key.is_empty() {
            return Err(LoggerError::config("error_stack_key", "key must not be empty"));
        }
        if let TimestampPolicy::Key(ref key) = self.timestamp {
            if key.is_empty() {
                return Err(LoggerError::config("timestamp", "key must not be empty"));
            }
        }

        Ok(())
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self::new()
    }
}
