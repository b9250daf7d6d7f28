//! Transports assembled from plain functions

use crate::core::{
    Done, LogRecord, LoggerError, Result, Transport, TransportContext, TransportFactory,
};
use std::fmt;
use std::sync::Arc;

/// Delivery function of a generated transport
pub type LogFn = Arc<dyn Fn(&LogRecord, Done) + Send + Sync>;

/// Runs once when the transport is built for a logger
pub type InitializeFn = Box<dyn FnOnce(&TransportContext) -> Result<()> + Send>;

/// Description of a transport made from functions instead of a type
///
/// # Example
///
/// ```
/// use rust_transport_logger::prelude::*;
/// use rust_transport_logger::transports::{create_transport, TransportSpec};
///
/// let factory = create_transport(
///     TransportSpec::new()
///         .name("Discard")
///         .log(|_record, done| done.succeed()),
/// )
/// .unwrap();
///
/// let logger = Logger::builder().boxed_transport_factory(factory).build().unwrap();
/// assert_eq!(logger.transport_names(), vec!["Discard"]);
/// ```
#[derive(Default)]
pub struct TransportSpec {
    name: Option<String>,
    initialize: Option<InitializeFn>,
    log: Option<LogFn>,
}

impl TransportSpec {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn initialize<F>(mut self, initialize: F) -> Self
    where
        F: FnOnce(&TransportContext) -> Result<()> + Send + 'static,
    {
        self.initialize = Some(Box::new(initialize));
        self
    }

    #[must_use]
    pub fn log<F>(mut self, log: F) -> Self
    where
        F: Fn(&LogRecord, Done) + Send + Sync + 'static,
    {
        self.log = Some(Arc::new(log));
        self
    }
}

impl fmt::Debug for TransportSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportSpec")
            .field("name", &self.name)
            .field("initialize", &self.initialize.is_some())
            .field("log", &self.log.is_some())
            .finish()
    }
}

/// Name used when a spec does not set one
pub const GENERATED_TRANSPORT_NAME: &str = "GeneratedTransport";

/// Turn a spec into a factory for [`LoggerBuilder::boxed_transport_factory`](crate::core::LoggerBuilder::boxed_transport_factory)
///
/// Fails immediately when the spec has no `log` function.
pub fn create_transport(spec: TransportSpec) -> Result<TransportFactory> {
    let TransportSpec {
        name,
        initialize,
        log,
    } = spec;

    let log = log.ok_or_else(|| {
        LoggerError::config("TransportSpec", "Must provide a `log` function")
    })?;
    let name = name.unwrap_or_else(|| GENERATED_TRANSPORT_NAME.to_string());

    Ok(Box::new(move |ctx: &TransportContext| -> Result<Box<dyn Transport>> {
        if let Some(initialize) = initialize {
            initialize(ctx)?;
        }
        Ok(Box::new(GeneratedTransport { name, log }) as Box<dyn Transport>)
    }))
}

struct GeneratedTransport {
    name: String,
    log: LogFn,
}

impl Transport for GeneratedTransport {
    fn log(&self, record: Arc<LogRecord>, done: Done) {
        (self.log)(&record, done);
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Logger, Meta};
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_requires_log_function() {
        let result = create_transport(TransportSpec::new().name("Nothing"));
        match result {
            Err(LoggerError::InvalidConfiguration { message, .. }) => {
                assert!(message.contains("Must provide a `log` function"))
            }
            _ => panic!("expected a configuration error"),
        }

        assert!(create_transport(TransportSpec::new().log(|_r, done| done.succeed())).is_ok());
    }

    #[test]
    fn test_default_and_custom_names() {
        let logger = Logger::builder()
            .boxed_transport_factory(
                create_transport(TransportSpec::new().log(|_r, done| done.succeed())).unwrap(),
            )
            .boxed_transport_factory(
                create_transport(
                    TransportSpec::new()
                        .name("TestTransportNameHere")
                        .log(|_r, done| done.succeed()),
                )
                .unwrap(),
            )
            .build()
            .unwrap();

        assert_eq!(
            logger.transport_names(),
            vec![GENERATED_TRANSPORT_NAME, "TestTransportNameHere"]
        );
    }

    #[test]
    fn test_initialize_runs_once_per_build() {
        let inits = Arc::new(AtomicUsize::new(0));
        let inits_clone = Arc::clone(&inits);
        let records = Arc::new(Mutex::new(Vec::new()));
        let records_clone = Arc::clone(&records);

        let factory = create_transport(
            TransportSpec::new()
                .initialize(move |_ctx| {
                    inits_clone.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                })
                .log(move |record, done| {
                    records_clone.lock().push(record.message.clone());
                    done.succeed();
                }),
        )
        .unwrap();

        let logger = Logger::builder()
            .boxed_transport_factory(factory)
            .build()
            .unwrap();
        logger.info(None, "first", Meta::new()).unwrap();
        logger.info(None, "second", Meta::new()).unwrap();

        assert_eq!(inits.load(Ordering::SeqCst), 1);
        assert_eq!(*records.lock(), vec!["first", "second"]);
    }

    #[test]
    fn test_initialize_failure_aborts_build() {
        let factory = create_transport(
            TransportSpec::new()
                .initialize(|_ctx| Err(LoggerError::config("GeneratedTransport", "no endpoint")))
                .log(|_r, done| done.succeed()),
        )
        .unwrap();

        assert!(Logger::builder()
            .boxed_transport_factory(factory)
            .build()
            .is_err());
    }
}
