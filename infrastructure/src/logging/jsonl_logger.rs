//! JSONL file writer for flow events.
//!
//! Each [`ConversationEvent`] becomes a single JSON line carrying the event
//! payload plus `type` and `timestamp`, appended through a buffered writer.

use clarity_application::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use serde_json::{Map, Value};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// Flow logger that appends one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes after every record and
/// on `Drop`.
pub struct JsonlFlowLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlFlowLogger {
    /// Open `path` for appending, creating it and its parent directories.
    ///
    /// Returns `None` (after a warning) if the file cannot be opened; the
    /// transcript is optional.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!("Could not create flow log directory {}: {}", parent.display(), e);
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not open flow log {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn record(event: ConversationEvent) -> Value {
    let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

    let mut map = match event.payload {
        Value::Object(map) => map,
        other => {
            let mut map = Map::new();
            map.insert("data".to_string(), other);
            map
        }
    };
    map.insert("type".to_string(), Value::String(event.event_type.to_string()));
    map.insert("timestamp".to_string(), Value::String(timestamp));
    Value::Object(map)
}

impl ConversationLogger for JsonlFlowLogger {
    fn log(&self, event: ConversationEvent) {
        let Ok(line) = serde_json::to_string(&record(event)) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            let _ = writer.flush();
        }
    }
}

impl Drop for JsonlFlowLogger {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn read_lines(path: &Path) -> Vec<Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_writes_one_record_per_event() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("flows.jsonl");
        let logger = JsonlFlowLogger::new(&path).unwrap();

        logger.log(ConversationEvent::new(
            "flow_invoked",
            json!({"capability": "summarize", "prompt_preview": "You are a legal…"}),
        ));
        logger.log(ConversationEvent::new(
            "flow_failed",
            json!({"capability": "summarize", "kind": "model_unavailable", "retryable": true}),
        ));
        drop(logger);

        let records = read_lines(&path);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["type"], "flow_invoked");
        assert_eq!(records[0]["capability"], "summarize");
        assert_eq!(records[1]["kind"], "model_unavailable");
        for record in &records {
            let ts = record["timestamp"].as_str().unwrap();
            assert!(chrono::DateTime::parse_from_rfc3339(ts).is_ok());
        }
    }

    #[test]
    fn test_non_object_payload_is_wrapped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flows.jsonl");
        let logger = JsonlFlowLogger::new(&path).unwrap();

        logger.log(ConversationEvent::new("note", json!("just a string")));
        drop(logger);

        let records = read_lines(&path);
        assert_eq!(records[0]["type"], "note");
        assert_eq!(records[0]["data"], "just a string");
    }

    #[test]
    fn test_reopening_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flows.jsonl");

        for _ in 0..2 {
            let logger = JsonlFlowLogger::new(&path).unwrap();
            logger.log(ConversationEvent::new("flow_succeeded", json!({})));
        }

        assert_eq!(read_lines(&path).len(), 2);
    }
}
