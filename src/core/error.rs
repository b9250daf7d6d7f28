//! Error types for the logger system

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// No level method with this name exists in the level table
    #[error("Unknown level method '{method}'")]
    UnknownLevel { method: String },

    /// A plain level method was called with an error object, or the reverse
    #[error("Level method '{method}' {}", mismatch_hint(.error_level))]
    LevelKindMismatch { method: String, error_level: bool },

    /// A transport reported a failed delivery
    #[error("Transport '{transport}' failed: {message}")]
    TransportFailed { transport: String, message: String },

    /// A transport panicked while being invoked
    #[error("Transport '{transport}' panicked: {message}")]
    TransportPanicked { transport: String, message: String },

    /// A transport dropped its completion handle without signalling
    #[error("Transport '{transport}' dropped its completion handle")]
    CompletionDropped { transport: String },

    /// Channel receive error
    #[error("Failed to receive dispatch outcome from channel")]
    ChannelReceiveError,
}

fn mismatch_hint(error_level: &bool) -> &'static str {
    if *error_level {
        "requires an error object"
    } else {
        "does not accept an error object"
    }
}

impl LoggerError {
    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create an unknown level error
    pub fn unknown_level(method: impl Into<String>) -> Self {
        LoggerError::UnknownLevel {
            method: method.into(),
        }
    }

    /// Create a level kind mismatch error
    pub fn level_kind_mismatch(method: impl Into<String>, error_level: bool) -> Self {
        LoggerError::LevelKindMismatch {
            method: method.into(),
            error_level,
        }
    }

    /// Create a transport failure error
    pub fn transport(transport: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::TransportFailed {
            transport: transport.into(),
            message: message.into(),
        }
    }

    /// Create a transport panic error
    pub fn transport_panicked(transport: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::TransportPanicked {
            transport: transport.into(),
            message: message.into(),
        }
    }

    /// Create a dropped completion error
    pub fn completion_dropped(transport: impl Into<String>) -> Self {
        LoggerError::CompletionDropped {
            transport: transport.into(),
        }
    }

    /// Whether this error was reported by (or on behalf of) a transport
    pub fn is_transport_error(&self) -> bool {
        matches!(
            self,
            LoggerError::TransportFailed { .. }
                | LoggerError::TransportPanicked { .. }
                | LoggerError::CompletionDropped { .. }
        )
    }
}
