//! Property-based tests for rust_transport_logger using proptest

use parking_lot::Mutex;
use proptest::prelude::*;
use rust_transport_logger::core::merge_meta;
use rust_transport_logger::prelude::*;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Clone)]
struct Scripted {
    fail: bool,
    index: usize,
    records: Arc<Mutex<Vec<LogRecord>>>,
}

impl Transport for Scripted {
    fn log(&self, record: Arc<LogRecord>, done: Done) {
        self.records.lock().push((*record).clone());
        if self.fail {
            done.fail(LoggerError::transport(format!("t{}", self.index), "scripted"));
        } else {
            done.succeed();
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

fn meta_strategy() -> impl Strategy<Value = BTreeMap<String, i64>> {
    prop::collection::btree_map("[a-e]{1,2}", any::<i64>(), 0..8)
}

fn to_meta(map: &BTreeMap<String, i64>) -> Meta {
    map.iter().map(|(k, v)| (k.clone(), json!(v))).collect()
}

// ============================================================================
// Meta merging
// ============================================================================

proptest! {
    /// Call meta wins over default meta; keys from both survive
    #[test]
    fn test_merge_meta_precedence(defaults in meta_strategy(), call in meta_strategy()) {
        let merged = merge_meta(&to_meta(&defaults), to_meta(&call));

        for (key, value) in &call {
            prop_assert_eq!(&merged[key], &json!(value));
        }
        for (key, value) in &defaults {
            if !call.contains_key(key) {
                prop_assert_eq!(&merged[key], &json!(value));
            }
        }
        let expected_len = defaults.keys().chain(call.keys()).collect::<std::collections::BTreeSet<_>>().len();
        prop_assert_eq!(merged.len(), expected_len);
    }

    /// Default meta reaches the transport unchanged when the call adds nothing
    #[test]
    fn test_default_meta_reaches_transport(defaults in meta_strategy()) {
        let records = Arc::new(Mutex::new(Vec::new()));
        let logger = Logger::builder()
            .transport(Scripted { fail: false, index: 0, records: Arc::clone(&records) })
            .default_meta(to_meta(&defaults))
            .build()
            .unwrap();

        logger.info(None, "defaults", Meta::new()).unwrap();

        prop_assert_eq!(&records.lock()[0].meta, &to_meta(&defaults));
    }
}

// ============================================================================
// Formatter chain
// ============================================================================

proptest! {
    /// Formatters apply left to right, each seeing the previous output
    #[test]
    fn test_formatters_compose_in_order(suffixes in prop::collection::vec("[a-z]{1,3}", 0..6)) {
        let records = Arc::new(Mutex::new(Vec::new()));
        let mut builder = Logger::builder()
            .transport(Scripted { fail: false, index: 0, records: Arc::clone(&records) });
        for suffix in suffixes.clone() {
            builder = builder.formatter(move |mut record: LogRecord| {
                record.message.push_str(&suffix);
                record
            });
        }
        let logger = builder.build().unwrap();

        logger.info(None, "base", Meta::new()).unwrap();

        let expected = format!("base{}", suffixes.concat());
        prop_assert_eq!(&records.lock()[0].message, &expected);
    }
}

// ============================================================================
// Fan-out aggregation
// ============================================================================

proptest! {
    /// Every transport sees the identical record, the callback fires once, and
    /// the outcome is the first failure in invocation order
    #[test]
    fn test_fan_out_outcome(failures in prop::collection::vec(any::<bool>(), 0..10)) {
        let records = Arc::new(Mutex::new(Vec::new()));
        let mut builder = Logger::builder();
        for (index, fail) in failures.iter().enumerate() {
            builder = builder.transport(Scripted {
                fail: *fail,
                index,
                records: Arc::clone(&records),
            });
        }
        let logger = builder.build().unwrap();

        let calls = Arc::new(AtomicUsize::new(0));
        let outcome = Arc::new(Mutex::new(None));
        let (calls_clone, outcome_clone) = (Arc::clone(&calls), Arc::clone(&outcome));
        logger.log_with_callback("Info", Some("Prop"), "fan out", Meta::new(), move |result| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
            *outcome_clone.lock() = Some(result);
        });

        prop_assert_eq!(calls.load(Ordering::SeqCst), 1);

        let records = records.lock();
        prop_assert_eq!(records.len(), failures.len());
        for record in records.iter() {
            prop_assert_eq!(record, &records[0]);
        }

        let outcome = outcome.lock().take().unwrap();
        match failures.iter().position(|fail| *fail) {
            None => prop_assert!(outcome.is_ok()),
            Some(first) => match outcome {
                Err(LoggerError::TransportFailed { transport, .. }) => {
                    prop_assert_eq!(transport, format!("t{}", first));
                }
                other => prop_assert!(false, "unexpected outcome {:?}", other),
            },
        }

        let failed = failures.iter().filter(|fail| **fail).count() as u64;
        prop_assert_eq!(logger.metrics().transport_failures(), failed);
        prop_assert_eq!(logger.metrics().suppressed_errors(), failed.saturating_sub(1));
    }
}

// ============================================================================
// Level tables and configuration
// ============================================================================

proptest! {
    /// Every declared method exists and logs with its declared level value
    #[test]
    fn test_level_table_synthesis(
        table in prop::collection::btree_map("[a-z]{1,8}", ("[A-Z][a-z]{0,6}", any::<bool>()), 1..6)
    ) {
        let levels: LevelTable = table
            .iter()
            .map(|(method, (name, error))| {
                let definition = if *error {
                    LevelDefinition::error_carrying(name.clone())
                } else {
                    LevelDefinition::new(name.clone())
                };
                (method.clone(), definition)
            })
            .collect();
        let logger = Logger::builder().levels(levels).build().unwrap();

        prop_assert_eq!(logger.levels().count(), table.len());
        for (method, (name, error)) in &table {
            let level = logger.level(method).unwrap();
            prop_assert_eq!(level.level(), name.as_str());
            prop_assert_eq!(level.is_error_level(), *error);
        }
    }

    /// Timestamp settings survive a JSON round trip through the config
    #[test]
    fn test_timestamp_policy_from_json(setting in prop_oneof![
        Just(json!(false)),
        Just(json!(true)),
        "[a-zA-Z_]{1,12}".prop_map(Value::String),
    ]) {
        let config = LoggerConfig::from_json(&json!({ "timestamp": setting }).to_string()).unwrap();

        let expected = match &setting {
            Value::Bool(false) => None,
            Value::Bool(true) => Some("timestamp".to_string()),
            Value::String(key) => Some(key.clone()),
            _ => unreachable!(),
        };
        prop_assert_eq!(config.timestamp.key().map(str::to_string), expected);
    }

    /// Error info carries the message and mentions it in the stack
    #[test]
    fn test_error_info_from_any_message(message in "[ -~]{0,40}") {
        let error = std::io::Error::other(message.clone());
        let info = ErrorInfo::from(&error);

        prop_assert_eq!(&info.message, &message);
        prop_assert!(info.stack.contains(&message));
    }
}
