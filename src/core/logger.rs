//! Main logger implementation

use super::{
    config::LoggerConfig,
    dispatcher::{DispatchOutcome, Dispatcher, Resolver},
    error::{LoggerError, Result},
    error_info::ErrorInfo,
    formatter::{Formatter, FormatterChain},
    log_level::{LevelEntry, LevelTable},
    log_record::{merge_meta, LogRecord, Meta},
    metrics::DispatchMetrics,
    timestamp::{TimestampFormat, TimestampPolicy},
    transport::{Transport, TransportContext, TransportFactory},
};
use chrono::Utc;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Weak};

struct LoggerCore {
    config: LoggerConfig,
    formatters: FormatterChain,
    transports: Vec<Box<dyn Transport>>,
    methods: BTreeMap<String, LevelEntry>,
    dispatcher: Dispatcher,
}

/// The single write path to every transport
///
/// `Logger` is a cheap handle: clones share the same configuration and
/// transports, and it can be sent across threads. Everything behind it is
/// fixed once [`LoggerBuilder::build`] returns.
#[derive(Clone)]
pub struct Logger {
    core: Arc<LoggerCore>,
}

/// Non-owning reference from a transport back to its logger
///
/// Transports hold this instead of a [`Logger`] so the logger and its
/// transports do not keep each other alive.
#[derive(Clone, Default)]
pub struct LoggerRef {
    core: Weak<LoggerCore>,
}

impl LoggerRef {
    /// The logger, if it is fully built and still alive
    pub fn upgrade(&self) -> Option<Logger> {
        self.core.upgrade().map(|core| Logger { core })
    }
}

impl fmt::Debug for LoggerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerRef")
            .field("alive", &(self.core.strong_count() > 0))
            .finish()
    }
}

impl Logger {
    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use rust_transport_logger::prelude::*;
    ///
    /// let logger = Logger::builder()
    ///     .timestamp(true)
    ///     .default_field("service", "billing")
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(logger.transport_count(), 0);
    /// ```
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// Log a record and ignore the outcome
    pub fn log(&self, level: &str, event: Option<&str>, message: impl Into<String>, meta: Meta) {
        self.write(level, event, message.into(), meta, None);
    }

    /// Log a record and receive the aggregate outcome once every transport is done
    ///
    /// The callback may run on the calling thread before this returns, or later
    /// on whichever thread the last transport completes on.
    pub fn log_with_callback<F>(
        &self,
        level: &str,
        event: Option<&str>,
        message: impl Into<String>,
        meta: Meta,
        callback: F,
    ) where
        F: FnOnce(DispatchOutcome) + Send + 'static,
    {
        self.write(level, event, message.into(), meta, Some(Box::new(callback)));
    }

    /// Log a record and block until every transport has completed
    ///
    /// Must not be called from a thread a transport needs in order to complete.
    pub fn log_blocking(
        &self,
        level: &str,
        event: Option<&str>,
        message: impl Into<String>,
        meta: Meta,
    ) -> DispatchOutcome {
        let (sender, receiver) = crossbeam_channel::bounded(1);
        self.write(
            level,
            event,
            message.into(),
            meta,
            Some(Box::new(move |outcome| {
                let _ = sender.send(outcome);
            })),
        );
        receiver
            .recv()
            .map_err(|_| LoggerError::ChannelReceiveError)?
    }

    /// Log a record and await the aggregate outcome
    #[cfg(feature = "async-transports")]
    pub async fn log_async(
        &self,
        level: &str,
        event: Option<&str>,
        message: impl Into<String>,
        meta: Meta,
    ) -> DispatchOutcome {
        let (sender, receiver) = tokio::sync::oneshot::channel();
        self.write(
            level,
            event,
            message.into(),
            meta,
            Some(Box::new(move |outcome| {
                let _ = sender.send(outcome);
            })),
        );
        receiver
            .await
            .map_err(|_| LoggerError::ChannelReceiveError)?
    }

    fn write(
        &self,
        level: &str,
        event: Option<&str>,
        message: String,
        meta: Meta,
        resolver: Option<Resolver>,
    ) {
        let record = self.prepare(level, event, message, meta);
        self.core
            .dispatcher
            .dispatch(&self.core.transports, record, resolver);
    }

    /// Merge default meta, stamp, and run the formatter chain
    fn prepare(&self, level: &str, event: Option<&str>, message: String, meta: Meta) -> LogRecord {
        let config = &self.core.config;
        let mut meta = merge_meta(&config.default_meta, meta);

        if let Some(key) = config.timestamp.key() {
            meta.insert(key.to_string(), config.timestamp_format.to_value(&Utc::now()));
        }

        let record = LogRecord {
            level: level.to_string(),
            event: event.map(str::to_string),
            message,
            meta,
        };
        self.core.formatters.apply(record)
    }

    /// Look up a generated level method by name
    pub fn level(&self, method: &str) -> Result<LevelMethod<'_>> {
        self.core
            .methods
            .get(method)
            .map(|entry| LevelMethod {
                logger: self,
                entry,
            })
            .ok_or_else(|| LoggerError::unknown_level(method))
    }

    /// Every generated level method, ordered by method name
    pub fn levels(&self) -> impl Iterator<Item = LevelMethod<'_>> {
        self.core.methods.values().map(move |entry| LevelMethod {
            logger: self,
            entry,
        })
    }

    #[inline]
    pub fn debug(&self, event: Option<&str>, message: impl Into<String>, meta: Meta) -> Result<()> {
        self.level("debug")?.log(event, message, meta)
    }

    #[inline]
    pub fn info(&self, event: Option<&str>, message: impl Into<String>, meta: Meta) -> Result<()> {
        self.level("info")?.log(event, message, meta)
    }

    #[inline]
    pub fn warn(&self, event: Option<&str>, message: impl Into<String>, meta: Meta) -> Result<()> {
        self.level("warn")?.log(event, message, meta)
    }

    #[inline]
    pub fn error(&self, event: Option<&str>, message: impl Into<String>, meta: Meta) -> Result<()> {
        self.level("error")?.log(event, message, meta)
    }

    #[inline]
    pub fn exception(
        &self,
        event: Option<&str>,
        error: impl Into<ErrorInfo>,
        message: impl Into<String>,
        meta: Meta,
    ) -> Result<()> {
        self.level("exception")?.exception(event, error, message, meta)
    }

    pub fn config(&self) -> &LoggerConfig {
        &self.core.config
    }

    pub fn transport_count(&self) -> usize {
        self.core.transports.len()
    }

    pub fn transport_names(&self) -> Vec<&str> {
        self.core.transports.iter().map(|t| t.name()).collect()
    }

    /// Get the dispatch metrics
    ///
    /// # Example
    ///
    /// ```
    /// use rust_transport_logger::prelude::*;
    ///
    /// let logger = Logger::builder().build().unwrap();
    /// logger.info(None, "no transports, resolves immediately", Meta::new()).unwrap();
    ///
    /// let metrics = logger.metrics();
    /// assert_eq!(metrics.dispatches(), 1);
    /// assert_eq!(metrics.resolved_ok(), 1);
    /// ```
    pub fn metrics(&self) -> &DispatchMetrics {
        self.core.dispatcher.metrics()
    }

    /// Flush every transport, stopping at the first error
    pub fn flush(&self) -> Result<()> {
        for transport in &self.core.transports {
            transport.flush()?;
        }
        Ok(())
    }

    pub fn downgrade(&self) -> LoggerRef {
        LoggerRef {
            core: Arc::downgrade(&self.core),
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("config", &self.core.config)
            .field("formatters", &self.core.formatters)
            .field("transports", &self.transport_names())
            .finish()
    }
}

/// A level method bound to its logger
///
/// Plain levels are called with [`log`](Self::log) and friends; error-carrying
/// levels with [`exception`](Self::exception) and friends. Using the wrong
/// form fails with [`LoggerError::LevelKindMismatch`] without logging.
#[derive(Clone, Copy)]
pub struct LevelMethod<'a> {
    logger: &'a Logger,
    entry: &'a LevelEntry,
}

impl<'a> LevelMethod<'a> {
    pub fn method(&self) -> &'a str {
        self.entry.method()
    }

    /// The level value this method logs with
    pub fn level(&self) -> &'a str {
        self.entry.level()
    }

    pub fn is_error_level(&self) -> bool {
        self.entry.is_error_level()
    }

    pub fn log(&self, event: Option<&str>, message: impl Into<String>, meta: Meta) -> Result<()> {
        self.expect_plain()?;
        self.logger
            .write(self.level(), event, message.into(), meta, None);
        Ok(())
    }

    pub fn log_with_callback<F>(
        &self,
        event: Option<&str>,
        message: impl Into<String>,
        meta: Meta,
        callback: F,
    ) -> Result<()>
    where
        F: FnOnce(DispatchOutcome) + Send + 'static,
    {
        self.expect_plain()?;
        self.logger
            .log_with_callback(self.level(), event, message, meta, callback);
        Ok(())
    }

    pub fn log_blocking(
        &self,
        event: Option<&str>,
        message: impl Into<String>,
        meta: Meta,
    ) -> DispatchOutcome {
        self.expect_plain()?;
        self.logger.log_blocking(self.level(), event, message, meta)
    }

    pub fn exception(
        &self,
        event: Option<&str>,
        error: impl Into<ErrorInfo>,
        message: impl Into<String>,
        meta: Meta,
    ) -> Result<()> {
        let meta = self.enrich(error.into(), meta)?;
        self.logger
            .write(self.level(), event, message.into(), meta, None);
        Ok(())
    }

    pub fn exception_with_callback<F>(
        &self,
        event: Option<&str>,
        error: impl Into<ErrorInfo>,
        message: impl Into<String>,
        meta: Meta,
        callback: F,
    ) -> Result<()>
    where
        F: FnOnce(DispatchOutcome) + Send + 'static,
    {
        let meta = self.enrich(error.into(), meta)?;
        self.logger
            .log_with_callback(self.level(), event, message, meta, callback);
        Ok(())
    }

    pub fn exception_blocking(
        &self,
        event: Option<&str>,
        error: impl Into<ErrorInfo>,
        message: impl Into<String>,
        meta: Meta,
    ) -> DispatchOutcome {
        let meta = self.enrich(error.into(), meta)?;
        self.logger.log_blocking(self.level(), event, message, meta)
    }

    fn expect_plain(&self) -> Result<()> {
        if self.entry.is_error_level() {
            return Err(LoggerError::level_kind_mismatch(self.method(), true));
        }
        Ok(())
    }

    /// Add the error message and stack under the configured keys; they override call meta
    fn enrich(&self, error: ErrorInfo, mut meta: Meta) -> Result<Meta> {
        if !self.entry.is_error_level() {
            return Err(LoggerError::level_kind_mismatch(self.method(), false));
        }
        let config = self.logger.config();
        meta.insert(config.error_message_key.clone(), Value::String(error.message));
        meta.insert(config.error_stack_key.clone(), Value::String(error.stack));
        Ok(meta)
    }
}

impl fmt::Debug for LevelMethod<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LevelMethod")
            .field("method", &self.method())
            .field("level", &self.level())
            .field("error", &self.is_error_level())
            .finish()
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use rust_transport_logger::prelude::*;
///
/// let logger = Logger::builder()
///     .timestamp("ts")
///     .formatter(|mut record: LogRecord| {
///         record.message = format!("[{}] {}", record.level, record.message);
///         record
///     })
///     .build()
///     .unwrap();
/// assert!(logger.level("exception").unwrap().is_error_level());
/// ```
pub struct LoggerBuilder {
    config: LoggerConfig,
    formatters: FormatterChain,
    factories: Vec<TransportFactory>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self::from_config(LoggerConfig::default())
    }

    /// Start from an existing configuration
    pub fn from_config(config: LoggerConfig) -> Self {
        Self {
            config,
            formatters: FormatterChain::new(),
            factories: Vec::new(),
        }
    }

    /// Replace the level table
    #[must_use = "builder methods return a new value"]
    pub fn levels(mut self, levels: LevelTable) -> Self {
        self.config.levels = levels;
        self
    }

    /// Add a transport instance that does not need its logger
    #[must_use = "builder methods return a new value"]
    pub fn transport<T: Transport + 'static>(self, transport: T) -> Self {
        self.transport_factory(move |_ctx: &TransportContext| Ok(transport))
    }

    /// Add a transport built with a reference back to the logger
    #[must_use = "builder methods return a new value"]
    pub fn transport_factory<T, F>(mut self, factory: F) -> Self
    where
        T: Transport + 'static,
        F: FnOnce(&TransportContext) -> Result<T> + Send + 'static,
    {
        self.factories.push(Box::new(move |ctx: &TransportContext| {
            factory(ctx).map(|transport| Box::new(transport) as Box<dyn Transport>)
        }));
        self
    }

    /// Add an already boxed factory, e.g. from [`create_transport`](crate::transports::create_transport)
    #[must_use = "builder methods return a new value"]
    pub fn boxed_transport_factory(mut self, factory: TransportFactory) -> Self {
        self.factories.push(factory);
        self
    }

    /// Append a formatter; formatters run in the order they are added
    #[must_use = "builder methods return a new value"]
    pub fn formatter<F>(mut self, formatter: F) -> Self
    where
        F: Fn(LogRecord) -> LogRecord + Send + Sync + 'static,
    {
        self.formatters.push(formatter);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn shared_formatter(mut self, formatter: Formatter) -> Self {
        self.formatters.push_shared(formatter);
        self
    }

    /// Replace the default meta
    #[must_use = "builder methods return a new value"]
    pub fn default_meta(mut self, meta: Meta) -> Self {
        self.config.default_meta = meta;
        self
    }

    /// Add one default meta field
    #[must_use = "builder methods return a new value"]
    pub fn default_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.config.default_meta.insert(key.into(), value.into());
        self
    }

    /// `false`, `true`, or a custom meta key
    #[must_use = "builder methods return a new value"]
    pub fn timestamp(mut self, policy: impl Into<TimestampPolicy>) -> Self {
        self.config.timestamp = policy.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.config.timestamp_format = format;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn error_message_key(mut self, key: impl Into<String>) -> Self {
        self.config.error_message_key = key.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn error_stack_key(mut self, key: impl Into<String>) -> Self {
        self.config.error_stack_key = key.into();
        self
    }

    /// Build the Logger
    ///
    /// Validates the configuration, builds every transport (each factory gets
    /// a reference to the logger under construction), then synthesizes the
    /// level methods. The first factory error aborts construction.
    pub fn build(self) -> Result<Logger> {
        self.config.validate()?;

        let LoggerBuilder {
            config,
            formatters,
            factories,
        } = self;

        let mut failure = None;
        let core = Arc::new_cyclic(|weak: &Weak<LoggerCore>| {
            let ctx = TransportContext {
                logger: LoggerRef { core: weak.clone() },
            };

            let mut transports = Vec::with_capacity(factories.len());
            for factory in factories {
                match factory(&ctx) {
                    Ok(transport) => transports.push(transport),
                    Err(e) => {
                        failure = Some(e);
                        break;
                    }
                }
            }

            let methods = config.levels.synthesize();

            LoggerCore {
                config,
                formatters,
                transports,
                methods,
                dispatcher: Dispatcher::new(Arc::new(DispatchMetrics::new())),
            }
        });

        match failure {
            Some(e) => Err(e),
            None => Ok(Logger { core }),
        }
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
