//! Timestamp injection
//!
//! [`TimestampPolicy`] decides whether (and under which meta key) the logger
//! stamps each record; [`TimestampFormat`] decides what the stamped value looks like.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Meta key used when timestamping is enabled without a custom key
pub const DEFAULT_TIMESTAMP_KEY: &str = "timestamp";

/// Whether records get a timestamp in their meta
///
/// Deserializes from `false`, `true` or a key string, so a config file can say
/// `"timestamp": true` or `"timestamp": "ts"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TimestampSetting", into = "TimestampSetting")]
pub enum TimestampPolicy {
    #[default]
    Disabled,
    /// Stamp under [`DEFAULT_TIMESTAMP_KEY`]
    Enabled,
    /// Stamp under a custom key
    Key(String),
}

impl TimestampPolicy {
    /// The meta key to stamp, or `None` when disabled
    pub fn key(&self) -> Option<&str> {
        match self {
            TimestampPolicy::Disabled => None,
            TimestampPolicy::Enabled => Some(DEFAULT_TIMESTAMP_KEY),
            TimestampPolicy::Key(key) => Some(key.as_str()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self, TimestampPolicy::Disabled)
    }
}

impl From<bool> for TimestampPolicy {
    fn from(enabled: bool) -> Self {
        if enabled {
            TimestampPolicy::Enabled
        } else {
            TimestampPolicy::Disabled
        }
    }
}

impl From<&str> for TimestampPolicy {
    fn from(key: &str) -> Self {
        TimestampPolicy::Key(key.to_string())
    }
}

impl From<String> for TimestampPolicy {
    fn from(key: String) -> Self {
        TimestampPolicy::Key(key)
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum TimestampSetting {
    Flag(bool),
    Key(String),
}

impl From<TimestampSetting> for TimestampPolicy {
    fn from(setting: TimestampSetting) -> Self {
        match setting {
            TimestampSetting::Flag(enabled) => enabled.into(),
            TimestampSetting::Key(key) => key.into(),
        }
    }
}

impl From<TimestampPolicy> for TimestampSetting {
    fn from(policy: TimestampPolicy) -> Self {
        match policy {
            TimestampPolicy::Disabled => TimestampSetting::Flag(false),
            TimestampPolicy::Enabled => TimestampSetting::Flag(true),
            TimestampPolicy::Key(key) => TimestampSetting::Key(key),
        }
    }
}

/// Representation of the injected timestamp value
///
/// # Examples
///
/// ```
/// use rust_transport_logger::core::TimestampFormat;
/// use chrono::Utc;
///
/// let value = TimestampFormat::UnixMillis.to_value(&Utc::now());
/// assert!(value.is_number());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// `2025-01-08T10:30:45.123Z`
    #[default]
    Iso8601,

    /// `2025-01-08T10:30:45.123456789+00:00`
    Rfc3339,

    /// Milliseconds since the Unix epoch, stored as a JSON number
    UnixMillis,

    /// Any strftime-compatible format string
    Custom(String),
}

impl TimestampFormat {
    #[must_use]
    pub fn format(&self, datetime: &DateTime<Utc>) -> String {
        match self {
            TimestampFormat::Iso8601 => datetime.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
            TimestampFormat::Rfc3339 => datetime.to_rfc3339(),
            TimestampFormat::UnixMillis => datetime.timestamp_millis().to_string(),
            TimestampFormat::Custom(format_str) => datetime.format(format_str).to_string(),
        }
    }

    /// The meta value for `datetime`: a number for `UnixMillis`, a string otherwise
    #[must_use]
    pub fn to_value(&self, datetime: &DateTime<Utc>) -> Value {
        match self {
            TimestampFormat::UnixMillis => Value::from(datetime.timestamp_millis()),
            other => Value::String(other.format(datetime)),
        }
    }
}
