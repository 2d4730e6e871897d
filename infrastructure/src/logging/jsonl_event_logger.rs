//! JSONL file writer for orchestration events.
//!
//! Each [`ForumEvent`] is serialized as a single JSON line with its `type`
//! field and a `timestamp`, appended to the file via a buffered writer.

use palaver_application::{EventSink, ForumEvent};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// JSONL event logger that writes one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes on `Drop`.
pub struct JsonlEventLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
    include_chunks: bool,
}

impl JsonlEventLogger {
    /// Create a logger appending to the given path.
    ///
    /// Creates the file (and parent directories) if they don't exist.
    /// Returns `None` if the file cannot be opened.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create event log directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not open event log file {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
            include_chunks: false,
        })
    }

    /// Also log every streamed text chunk. Off by default.
    pub fn with_chunks(mut self, include: bool) -> Self {
        self.include_chunks = include;
        self
    }

    /// Get the path to the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EventSink for JsonlEventLogger {
    fn emit(&self, event: ForumEvent) {
        if !self.include_chunks && matches!(&event, ForumEvent::Chunk(chunk) if !chunk.done) {
            return;
        }

        let Ok(serde_json::Value::Object(mut record)) = serde_json::to_value(&event) else {
            return;
        };
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
        record.insert("timestamp".to_string(), serde_json::Value::String(timestamp));

        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            // append-only; flush so a crash keeps every finished line
            let _ = writer.flush();
        }
    }
}

impl Drop for JsonlEventLogger {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use palaver_domain::{ChunkEvent, InferenceError, ModelId, ModelResult};

    fn read_lines(path: &Path) -> Vec<serde_json::Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_writes_one_line_per_event() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.jsonl");
        let logger = JsonlEventLogger::new(&path).unwrap();

        logger.emit(ForumEvent::QueryStarted {
            models: vec![ModelId::new("llama3")],
            concurrency: 1,
            stream: true,
        });
        logger.emit(ForumEvent::ModelFinished(ModelResult::failure(
            ModelId::new("llama3"),
            InferenceError::ModelNotFound,
            0.5,
        )));
        drop(logger);

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["type"], "query_started");
        assert_eq!(lines[0]["concurrency"], 1);
        assert!(lines[0]["timestamp"].is_string());
        assert_eq!(lines[1]["type"], "model_finished");
        assert_eq!(lines[1]["model"], "llama3");
        assert_eq!(lines[1]["error"]["kind"], "model_not_found");
    }

    #[test]
    fn test_text_chunks_are_skipped_by_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("events.jsonl");
        let logger = JsonlEventLogger::new(&path).unwrap();
        let model = ModelId::new("m");

        logger.emit(ForumEvent::Chunk(ChunkEvent::delta(model.clone(), "hi")));
        logger.emit(ForumEvent::Chunk(ChunkEvent::done(model)));
        drop(logger);

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["done"], true);
    }

    #[test]
    fn test_appends_across_loggers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.jsonl");
        for _ in 0..2 {
            let logger = JsonlEventLogger::new(&path).unwrap();
            logger.emit(ForumEvent::QueryCompleted {
                succeeded: 1,
                failed: 0,
            });
        }
        assert_eq!(read_lines(&path).len(), 2);
    }
}
