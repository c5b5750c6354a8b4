//! Append-only JSONL audit log for request and backend payloads.
//!
//! Lines are handed to a background writer thread, so handlers never block on
//! file I/O and never share a lock.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub component: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl LogEntry {
    pub fn new(level: LogLevel, component: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            component: component.into(),
            message: message.into(),
            request_id: None,
        }
    }
}

/// Cheap to clone; the file is flushed once the last clone is dropped.
#[derive(Clone)]
pub struct SharedLogger {
    writer: NonBlocking,
    _guard: Arc<WorkerGuard>,
}

impl SharedLogger {
    pub fn new(file_path: impl AsRef<Path>) -> std::io::Result<Self> {
        let file_path = file_path.as_ref();

        if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(file_path)?;
        let (writer, guard) = tracing_appender::non_blocking(file);

        Ok(Self {
            writer,
            _guard: Arc::new(guard),
        })
    }

    pub fn log(&self, entry: LogEntry) {
        let mut line = match serde_json::to_string(&entry) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("Failed to serialize audit entry: {e}");
                return;
            }
        };
        line.push('\n');

        // One write per line keeps lines whole on the writer thread.
        if let Err(e) = self.writer.clone().write_all(line.as_bytes()) {
            tracing::warn!("Failed to queue audit entry: {e}");
        }
    }

    pub fn info(&self, component: impl Into<String>, message: impl Into<String>) {
        self.log(LogEntry::new(LogLevel::Info, component, message));
    }

    pub fn error(&self, component: impl Into<String>, message: impl Into<String>) {
        self.log(LogEntry::new(LogLevel::Error, component, message));
    }

    /// Record a payload verbatim, tagged with the request it belongs to.
    pub fn payload(
        &self,
        level: LogLevel,
        component: impl Into<String>,
        request_id: &str,
        body: impl Into<String>,
    ) {
        let mut entry = LogEntry::new(level, component, body);
        entry.request_id = Some(request_id.to_string());
        self.log(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn read_entries(path: &Path) -> Vec<LogEntry> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_payload_is_kept_verbatim() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("audit.log");

        let raw = "{\"output\":[{\"type\":\"message\",\"content\":[{\"text\":\"<b>hi</b>\\nbye\"}]}]}";
        let logger = SharedLogger::new(&path).unwrap();
        logger.payload(LogLevel::Info, "backend", "req-1", raw);
        drop(logger);

        let entries = read_entries(&path);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].message, raw);
        assert_eq!(entries[0].component, "backend");
        assert_eq!(entries[0].request_id.as_deref(), Some("req-1"));
    }

    #[test]
    fn test_appends_across_reopen_in_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("audit.log");

        let logger = SharedLogger::new(&path).unwrap();
        let clone = logger.clone();
        logger.info("startup", "first");
        clone.error("server", "second");
        drop(logger);
        drop(clone);

        let logger = SharedLogger::new(&path).unwrap();
        logger.info("startup", "third");
        drop(logger);

        let entries = read_entries(&path);
        let messages: Vec<&str> = entries.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second", "third"]);
        assert_eq!(entries[1].level, LogLevel::Error);
        assert!(entries[0].request_id.is_none());
    }
}
