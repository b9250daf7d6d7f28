//! Formatter chain
//!
//! A formatter is a pure `LogRecord -> LogRecord` function. The chain applies
//! formatters in the order they were added, each one receiving the output of
//! the previous. A formatter that panics is a bug in the caller's code and the
//! panic propagates out of the `log` call that triggered it.

use super::log_record::LogRecord;
use std::fmt;
use std::sync::Arc;

/// A shareable record transform
pub type Formatter = Arc<dyn Fn(LogRecord) -> LogRecord + Send + Sync>;

#[derive(Clone, Default)]
pub struct FormatterChain {
    formatters: Vec<Formatter>,
}

impl FormatterChain {
    pub fn new() -> Self {
        Self {
            formatters: Vec::new(),
        }
    }

    pub fn push<F>(&mut self, formatter: F)
    where
        F: Fn(LogRecord) -> LogRecord + Send + Sync + 'static,
    {
        self.formatters.push(Arc::new(formatter));
    }

    pub fn push_shared(&mut self, formatter: Formatter) {
        self.formatters.push(formatter);
    }

    /// Reduce `record` through every formatter, left to right
    pub fn apply(&self, record: LogRecord) -> LogRecord {
        self.formatters
            .iter()
            .fold(record, |record, formatter| formatter(record))
    }

    pub fn len(&self) -> usize {
        self.formatters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formatters.is_empty()
    }
}

impl fmt::Debug for FormatterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatterChain")
            .field("len", &self.formatters.len())
            .finish()
    }
}

impl<F> FromIterator<F> for FormatterChain
where
    F: Fn(LogRecord) -> LogRecord + Send + Sync + 'static,
{
    fn from_iter<I: IntoIterator<Item = F>>(iter: I) -> Self {
        let mut chain = Self::new();
        for formatter in iter {
            chain.push(formatter);
        }
        chain
    }
}
