//! Console transport implementation

use crate::core::{Done, LogRecord, LoggerError, Result, Transport};
use colored::{Color, Colorize};
use parking_lot::Mutex;
use std::io::Write;
use std::sync::Arc;

/// Decides whether a record is printed; skipped records still count as delivered
pub type RecordFilter = Arc<dyn Fn(&LogRecord) -> bool + Send + Sync>;

/// Renders a record as one output line
pub type LineFormat = Arc<dyn Fn(&LogRecord) -> String + Send + Sync>;

enum Output {
    Std,
    Writer(Mutex<Box<dyn Write + Send>>),
}

/// Prints records as `[Level] Event message {meta}`
///
/// Levels whose name is `error` (any case) go to stderr, the rest to stdout,
/// unless a custom writer is installed.
///
/// # Example
///
/// ```
/// use rust_transport_logger::transports::ConsoleTransport;
///
/// let console = ConsoleTransport::new()
///     .with_name("AppConsole")
///     .with_filter(|record| record.level != "Debug");
/// ```
pub struct ConsoleTransport {
    name: String,
    use_colors: bool,
    filter: Option<RecordFilter>,
    format: Option<LineFormat>,
    output: Output,
}

impl ConsoleTransport {
    pub fn new() -> Self {
        Self {
            name: "ConsoleTransport".to_string(),
            use_colors: true,
            filter: None,
            format: None,
            output: Output::Std,
        }
    }

    pub fn with_colors(use_colors: bool) -> Self {
        Self {
            use_colors,
            ..Self::new()
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&LogRecord) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Arc::new(filter));
        self
    }

    /// Replace the default line layout
    #[must_use]
    pub fn with_format<F>(mut self, format: F) -> Self
    where
        F: Fn(&LogRecord) -> String + Send + Sync + 'static,
    {
        self.format = Some(Arc::new(format));
        self
    }

    /// Write every line to `writer` instead of stdout/stderr; colours are turned off
    #[must_use]
    pub fn with_writer<W: Write + Send + 'static>(mut self, writer: W) -> Self {
        self.output = Output::Writer(Mutex::new(Box::new(writer)));
        self.use_colors = false;
        self
    }

    fn render(&self, record: &LogRecord) -> String {
        if let Some(ref format) = self.format {
            return format(record);
        }

        let level = format!("[{}]", record.level);
        let level = if self.use_colors {
            match level_color(&record.level) {
                Some(color) => level.color(color).to_string(),
                None => level,
            }
        } else {
            level
        };

        let mut line = level;
        if let Some(ref event) = record.event {
            line.push(' ');
            line.push_str(event);
        }
        line.push(' ');
        line.push_str(&record.message);
        if !record.meta.is_empty() {
            line.push(' ');
            line.push_str(&serde_json::Value::Object(record.meta.clone()).to_string());
        }
        line
    }

    fn emit(&self, record: &LogRecord) -> Result<()> {
        let line = self.render(record);
        match self.output {
            Output::Writer(ref writer) => {
                let mut writer = writer.lock();
                writeln!(writer, "{}", line)?;
            }
            Output::Std if record.level.eq_ignore_ascii_case("error") => {
                writeln!(std::io::stderr().lock(), "{}", line)?;
            }
            Output::Std => {
                writeln!(std::io::stdout().lock(), "{}", line)?;
            }
        }
        Ok(())
    }
}

fn level_color(level: &str) -> Option<Color> {
    match level.to_ascii_lowercase().as_str() {
        "debug" => Some(Color::Blue),
        "info" | "information" => Some(Color::Green),
        "warn" | "warning" => Some(Color::Yellow),
        "error" => Some(Color::Red),
        _ => None,
    }
}

impl Default for ConsoleTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for ConsoleTransport {
    fn log(&self, record: Arc<LogRecord>, done: Done) {
        if let Some(ref filter) = self.filter {
            if !filter(&record) {
                done.succeed();
                return;
            }
        }

        let result = self
            .emit(&record)
            .map_err(|e| LoggerError::transport(self.name.as_str(), e.to_string()));
        done.complete(result);
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn flush(&self) -> Result<()> {
        match self.output {
            Output::Writer(ref writer) => writer.lock().flush()?,
            Output::Std => {
                std::io::stdout().flush()?;
                std::io::stderr().flush()?;
            }
        }
        Ok(())
    }
}
