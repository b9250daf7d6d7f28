//! Logging macros for ergonomic log message formatting.
//!
//! The level macros format their message like `format!` and call the
//! matching shortcut on the logger, so they return the same `Result`.
//! An event name can be given up front with `event = ...`.
//!
//! # Examples
//!
//! ```
//! use rust_transport_logger::prelude::*;
//! use rust_transport_logger::{info, meta};
//!
//! let logger = Logger::builder().build().unwrap();
//!
//! // Basic logging
//! info!(logger, "Server started").unwrap();
//!
//! // With an event name and format arguments
//! let port = 8080;
//! info!(logger, event = "Listening", "Server listening on port {}", port).unwrap();
//!
//! // Structured meta
//! let fields = meta! { "port" => port, "tls" => true };
//! logger.info(Some("Listening"), "with meta", fields).unwrap();
//! ```

/// Build a [`Meta`](crate::core::Meta) map from `key => value` pairs.
///
/// Values may be anything `serde_json::json!` accepts.
///
/// # Examples
///
/// ```
/// use rust_transport_logger::meta;
///
/// let meta = meta! { "user_id" => 42, "action" => "login" };
/// assert_eq!(meta.len(), 2);
/// assert_eq!(meta["action"], "login");
///
/// let empty = meta! {};
/// assert!(empty.is_empty());
/// ```
#[macro_export]
macro_rules! meta {
    () => {
        $crate::core::Meta::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut meta = $crate::core::Meta::new();
        $(
            meta.insert(
                ::std::string::String::from($key),
                $crate::__serde_json::json!($value),
            );
        )+
        meta
    }};
}

/// Log a message at an arbitrary level value, ignoring the outcome.
///
/// # Examples
///
/// ```
/// # use rust_transport_logger::prelude::*;
/// # let logger = Logger::builder().build().unwrap();
/// use rust_transport_logger::log;
/// log!(logger, "Notice", "Simple message");
/// log!(logger, "Notice", event = "HttpError", "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, event = $event:expr, $($arg:tt)+) => {
        $logger.log($level, Some($event), format!($($arg)+), $crate::core::Meta::new())
    };
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, None, format!($($arg)+), $crate::core::Meta::new())
    };
}

/// Log through the `debug` level method.
///
/// # Examples
///
/// ```
/// # use rust_transport_logger::prelude::*;
/// # let logger = Logger::builder().build().unwrap();
/// use rust_transport_logger::debug;
/// debug!(logger, "Variable value: {}", 42).unwrap();
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, event = $event:expr, $($arg:tt)+) => {
        $logger.debug(Some($event), format!($($arg)+), $crate::core::Meta::new())
    };
    ($logger:expr, $($arg:tt)+) => {
        $logger.debug(None, format!($($arg)+), $crate::core::Meta::new())
    };
}

/// Log through the `info` level method.
///
/// # Examples
///
/// ```
/// # use rust_transport_logger::prelude::*;
/// # let logger = Logger::builder().build().unwrap();
/// use rust_transport_logger::info;
/// info!(logger, event = "Startup", "Application started").unwrap();
/// info!(logger, "Processing {} items", 100).unwrap();
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, event = $event:expr, $($arg:tt)+) => {
        $logger.info(Some($event), format!($($arg)+), $crate::core::Meta::new())
    };
    ($logger:expr, $($arg:tt)+) => {
        $logger.info(None, format!($($arg)+), $crate::core::Meta::new())
    };
}

/// Log through the `warn` level method.
///
/// # Examples
///
/// ```
/// # use rust_transport_logger::prelude::*;
/// # let logger = Logger::builder().build().unwrap();
/// use rust_transport_logger::warn;
/// warn!(logger, "Memory usage at {}%", 85).unwrap();
/// ```
#[macro_export]
macro_rules! warn {
    ($logger:expr, event = $event:expr, $($arg:tt)+) => {
        $logger.warn(Some($event), format!($($arg)+), $crate::core::Meta::new())
    };
    ($logger:expr, $($arg:tt)+) => {
        $logger.warn(None, format!($($arg)+), $crate::core::Meta::new())
    };
}

/// Log through the `error` level method.
///
/// # Examples
///
/// ```
/// # use rust_transport_logger::prelude::*;
/// # let logger = Logger::builder().build().unwrap();
/// use rust_transport_logger::error;
/// error!(logger, event = "DbError", "Connection failed: {}", "timeout").unwrap();
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, event = $event:expr, $($arg:tt)+) => {
        $logger.error(Some($event), format!($($arg)+), $crate::core::Meta::new())
    };
    ($logger:expr, $($arg:tt)+) => {
        $logger.error(None, format!($($arg)+), $crate::core::Meta::new())
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{Done, LogRecord, Logger, Transport};
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<LogRecord>>>);

    impl Transport for Capture {
        fn log(&self, record: Arc<LogRecord>, done: Done) {
            self.0.lock().push((*record).clone());
            done.succeed();
        }

        fn name(&self) -> &str {
            "capture"
        }
    }

    #[test]
    fn test_level_macros() {
        let capture = Capture::default();
        let logger = Logger::builder().transport(capture.clone()).build().unwrap();

        debug!(logger, "debug {}", 1).unwrap();
        info!(logger, event = "Startup", "info {}", 2).unwrap();
        warn!(logger, "warn").unwrap();
        error!(logger, event = "Failure", "error {}", "x").unwrap();
        log!(logger, "Audit", "raw {}", 5);

        let records = capture.0.lock();
        let levels: Vec<&str> = records.iter().map(|r| r.level.as_str()).collect();
        assert_eq!(levels, vec!["Debug", "Info", "Warning", "Error", "Audit"]);
        assert_eq!(records[1].event.as_deref(), Some("Startup"));
        assert_eq!(records[1].message, "info 2");
        assert_eq!(records[4].message, "raw 5");
    }

    #[test]
    fn test_meta_macro() {
        let meta = meta! { "count" => 3, "tags" => ["a", "b"], "ok" => true };
        assert_eq!(meta["count"], serde_json::json!(3));
        assert_eq!(meta["tags"], serde_json::json!(["a", "b"]));
        assert_eq!(meta["ok"], serde_json::json!(true));
    }
}
