//! Async transport trait for non-blocking log output

use super::error::Result;
use super::log_record::LogRecord;
use async_trait::async_trait;

#[cfg(feature = "async-transports")]
use super::{dispatcher::Done, transport::Transport};
#[cfg(feature = "async-transports")]
use std::sync::Arc;

/// Trait for asynchronous transports
///
/// Plug one into a logger with [`AsyncTransportAdapter`], which runs each
/// delivery as its own task on a tokio runtime.
///
/// # Example
///
/// ```no_run
/// use rust_transport_logger::core::{AsyncTransport, LogRecord, Result};
/// use async_trait::async_trait;
///
/// struct MyAsyncTransport;
///
/// #[async_trait]
/// impl AsyncTransport for MyAsyncTransport {
///     async fn log(&self, record: &LogRecord) -> Result<()> {
///         // Async delivery logic
///         Ok(())
///     }
///
///     fn name(&self) -> &str {
///         "my_async_transport"
///     }
/// }
/// ```
#[async_trait]
pub trait AsyncTransport: Send + Sync {
    /// Deliver one record
    async fn log(&self, record: &LogRecord) -> Result<()>;

    /// Get the transport name
    fn name(&self) -> &str;
}

/// Runs an [`AsyncTransport`] as a [`Transport`]
///
/// Every record is delivered by a task spawned on `handle`, and the task
/// completes the dispatch handle with the delivery result. Several adapted
/// transports therefore deliver the same record in parallel.
#[cfg(feature = "async-transports")]
pub struct AsyncTransportAdapter<T> {
    inner: Arc<T>,
    handle: tokio::runtime::Handle,
}

#[cfg(feature = "async-transports")]
impl<T: AsyncTransport + 'static> AsyncTransportAdapter<T> {
    pub fn new(inner: T, handle: tokio::runtime::Handle) -> Self {
        Self {
            inner: Arc::new(inner),
            handle,
        }
    }

    /// Adapt using the runtime of the current context
    ///
    /// # Panics
    ///
    /// Panics when called outside of a tokio runtime.
    pub fn current(inner: T) -> Self {
        Self::new(inner, tokio::runtime::Handle::current())
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }
}

#[cfg(feature = "async-transports")]
impl<T: AsyncTransport + 'static> Transport for AsyncTransportAdapter<T> {
    fn log(&self, record: Arc<LogRecord>, done: Done) {
        let inner = Arc::clone(&self.inner);
        self.handle.spawn(async move {
            let result = inner.log(&record).await;
            done.complete(result);
        });
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
