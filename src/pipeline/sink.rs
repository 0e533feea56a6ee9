//! Append-only JSON Lines sink for completed contribution scores

use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Writes one JSON record per line, flushing after every record so an
/// interrupted run leaves only complete lines behind.
pub struct JsonlSink {
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
}

impl JsonlSink {
    /// Create (or truncate) the stream file
    pub fn create(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)
            .with_context(|| format!("Failed to create stream file {}", path.display()))?;
        Ok(Self {
            path: path.to_path_buf(),
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write<T: Serialize>(&self, record: &T) -> Result<()> {
        let json = serde_json::to_string(record)?;
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| anyhow!("stream writer lock poisoned"))?;
        writeln!(writer, "{}", json)
            .and_then(|_| writer.flush())
            .with_context(|| format!("Failed to write to {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_each_record_is_one_flushed_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.jsonl");
        let sink = JsonlSink::create(&path).unwrap();

        sink.write(&json!({"contribution_id": "R1"})).unwrap();
        // Visible before the sink is dropped
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 1);

        sink.write(&json!({"contribution_id": "R2"})).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let ids: Vec<String> = text
            .lines()
            .map(|l| serde_json::from_str::<Value>(l).unwrap()["contribution_id"].to_string())
            .collect();
        assert_eq!(ids, vec!["\"R1\"", "\"R2\""]);
    }

    #[test]
    fn test_create_fails_for_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(JsonlSink::create(&dir.path().join("nope").join("s.jsonl")).is_err());
    }
}
