//! JSON lines file transport

use crate::core::{Done, LogRecord, LoggerError, Result, Transport};
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Appends each record to a file as one flattened JSON object per line
///
/// Named `json:<path>` unless renamed with [`with_name`](Self::with_name).
///
/// The object holds `level`, `event` (when present), `message` and every meta
/// field at the top level, ready for log shippers that read JSONL.
pub struct JsonFileTransport {
    name: String,
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
    flush_each: bool,
}

impl JsonFileTransport {
    /// Open (or create) `path` for appending
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        Ok(Self {
            name: format!("json:{}", path.display()),
            writer: Mutex::new(BufWriter::new(file)),
            path,
            flush_each: true,
        })
    }

    /// Replace the default `json:<path>` name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Flush after every record (default) or only on [`Transport::flush`]
    #[must_use]
    pub fn with_flush_each(mut self, flush_each: bool) -> Self {
        self.flush_each = flush_each;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_record(&self, record: &LogRecord) -> Result<()> {
        let line = serde_json::to_string(&record.to_flat_json())?;

        let mut writer = self.writer.lock();
        writeln!(writer, "{}", line)?;
        if self.flush_each {
            writer.flush()?;
        }
        Ok(())
    }
}

impl Transport for JsonFileTransport {
    fn log(&self, record: Arc<LogRecord>, done: Done) {
        let result = self
            .write_record(&record)
            .map_err(|e| LoggerError::transport(self.name.as_str(), e.to_string()));
        done.complete(result);
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn flush(&self) -> Result<()> {
        self.writer.lock().flush()?;
        Ok(())
    }
}

impl Drop for JsonFileTransport {
    fn drop(&mut self) {
        // Ensure all buffered data is flushed to disk
        let _ = self.writer.get_mut().flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Logger, Meta};
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_json_transport_writes_flat_object() -> Result<()> {
        let dir = tempdir()?;
        let log_path = dir.path().join("test.jsonl");

        let logger = Logger::builder()
            .transport(JsonFileTransport::new(&log_path)?)
            .default_field("service", "auth")
            .build()?;

        let mut meta = Meta::new();
        meta.insert("user_id".to_string(), json!(123));
        logger.log_blocking("Info", Some("Login"), "User logged in", meta)?;

        let content = fs::read_to_string(&log_path)?;
        let parsed: serde_json::Value = serde_json::from_str(content.trim())?;
        assert_eq!(parsed["level"], json!("Info"));
        assert_eq!(parsed["event"], json!("Login"));
        assert_eq!(parsed["message"], json!("User logged in"));
        assert_eq!(parsed["user_id"], json!(123));
        assert_eq!(parsed["service"], json!("auth"));

        Ok(())
    }

    #[test]
    fn test_json_transport_multiple_records() -> Result<()> {
        let dir = tempdir()?;
        let log_path = dir.path().join("test_multiple.jsonl");

        let logger = Logger::builder()
            .transport(JsonFileTransport::new(&log_path)?.with_flush_each(false))
            .build()?;

        for i in 0..5 {
            logger.debug(None, format!("Iteration {}", i), Meta::new())?;
        }
        logger.flush()?;

        let content = fs::read_to_string(&log_path)?;
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 5);

        for line in lines {
            let parsed: serde_json::Value = serde_json::from_str(line)?;
            assert!(parsed["message"].is_string());
            assert_eq!(parsed["level"], json!("Debug"));
            assert!(parsed.get("event").is_none());
        }

        Ok(())
    }

    #[test]
    fn test_json_transport_name() -> Result<()> {
        let dir = tempdir()?;
        let log_path = dir.path().join("named.jsonl");

        let default_named = JsonFileTransport::new(&log_path)?;
        assert_eq!(
            default_named.name(),
            format!("json:{}", log_path.display())
        );

        let logger = Logger::builder()
            .transport(JsonFileTransport::new(&log_path)?.with_name("audit"))
            .build()?;
        assert_eq!(logger.transport_names(), vec!["audit"]);

        Ok(())
    }
}
