//! Transport trait for log output destinations

use super::dispatcher::Done;
use super::error::Result;
use super::log_record::LogRecord;
use super::logger::LoggerRef;
use std::sync::Arc;

/// An output sink for log records
///
/// `log` is handed the finalized record and a one-shot [`Done`] handle. The
/// transport must eventually consume the handle, from any thread, with
/// `Ok(())` or the delivery error. Returning from `log` before completing is
/// fine; the dispatcher only waits on the handle.
///
/// # Example
///
/// ```
/// use rust_transport_logger::core::{Done, LogRecord, Transport};
/// use std::sync::Arc;
///
/// struct StderrTransport;
///
/// impl Transport for StderrTransport {
///     fn log(&self, record: Arc<LogRecord>, done: Done) {
///         eprintln!("[{}] {}", record.level, record.message);
///         done.succeed();
///     }
///
///     fn name(&self) -> &str {
///         "stderr"
///     }
/// }
/// ```
pub trait Transport: Send + Sync {
    fn log(&self, record: Arc<LogRecord>, done: Done);

    fn name(&self) -> &str;

    /// Flush buffered output, if the transport buffers at all
    fn flush(&self) -> Result<()> {
        Ok(())
    }
}

/// What a transport factory receives while the owning logger is being built
#[derive(Debug, Clone)]
pub struct TransportContext {
    /// Weak reference to the logger that will own the transport
    ///
    /// It cannot be upgraded until construction has finished.
    pub logger: LoggerRef,
}

/// Builds one transport instance for one logger
pub type TransportFactory =
    Box<dyn FnOnce(&TransportContext) -> Result<Box<dyn Transport>> + Send + 'static>;
