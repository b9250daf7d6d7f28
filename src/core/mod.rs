//! Core logger types and traits

pub mod async_transport;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod error_info;
pub mod formatter;
pub mod log_level;
pub mod log_record;
pub mod logger;
pub mod metrics;
pub mod timestamp;
pub mod transport;

pub use async_transport::AsyncTransport;
#[cfg(feature = "async-transports")]
pub use async_transport::AsyncTransportAdapter;
pub use config::{LoggerConfig, DEFAULT_ERROR_MESSAGE_KEY, DEFAULT_ERROR_STACK_KEY};
pub use dispatcher::{DispatchOutcome, Dispatcher, Done, Resolver};
pub use error::{LoggerError, Result};
pub use error_info::ErrorInfo;
pub use formatter::{Formatter, FormatterChain};
pub use log_level::{LevelDefinition, LevelEntry, LevelTable};
pub use log_record::{merge_meta, LogRecord, Meta};
pub use logger::{LevelMethod, Logger, LoggerBuilder, LoggerRef};
pub use metrics::DispatchMetrics;
pub use timestamp::{TimestampFormat, TimestampPolicy, DEFAULT_TIMESTAMP_KEY};
pub use transport::{Transport, TransportContext, TransportFactory};
