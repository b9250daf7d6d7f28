//! # Rust Transport Logger
//!
//! A structured logging facade that fans every record out to a set of
//! independent transports and reports one aggregate outcome per call.
//!
//! ## Features
//!
//! - **Level tables**: declare levels as data, get one level method per entry
//! - **Formatter chains**: ordered, pure record transforms
//! - **Fan-out**: every transport receives the same record; the caller learns
//!   exactly once whether all succeeded or which failure came first
//! - **Error enrichment**: error-carrying levels fold the error message and
//!   source chain into the record meta

pub mod core;
pub mod macros;
pub mod transports;

#[doc(hidden)]
pub use serde_json as __serde_json;

pub mod prelude {
    #[cfg(feature = "console")]
    pub use crate::transports::ConsoleTransport;
    #[cfg(feature = "file")]
    pub use crate::transports::JsonFileTransport;
    pub use crate::core::{
        DispatchMetrics, DispatchOutcome, Done, ErrorInfo, LevelDefinition, LevelMethod,
        LevelTable, LogRecord, Logger, LoggerBuilder, LoggerConfig, LoggerError, LoggerRef, Meta,
        Result, TimestampFormat, TimestampPolicy, Transport, TransportContext,
    };
}

#[cfg(feature = "console")]
pub use transports::ConsoleTransport;
#[cfg(feature = "file")]
pub use transports::JsonFileTransport;
pub use crate::core::{
    DispatchMetrics, DispatchOutcome, Done, ErrorInfo, LevelDefinition, LevelMethod, LevelTable,
    LogRecord, Logger, LoggerBuilder, LoggerConfig, LoggerError, LoggerRef, Meta, Result,
    TimestampFormat, TimestampPolicy, Transport, TransportContext,
};
