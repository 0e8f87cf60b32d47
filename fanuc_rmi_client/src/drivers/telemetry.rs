use std::path::{Path, PathBuf};

use serde_json::Value;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::trace;

use crate::errors::{FrcError, Result};
use crate::framer::Message;

/// Append-only JSON Lines log of raw controller readings.
///
/// Each record is the reply exactly as decoded, key order included, so fields
/// the client does not model survive for offline inspection. Records are
/// synced to disk before [`TelemetryLog::append`] returns.
#[derive(Debug, Clone)]
pub struct TelemetryLog {
    path: PathBuf,
}

impl TelemetryLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn append(&self, record: &Message) -> Result<()> {
        let mut line = serde_json::to_vec(&Value::Object(record.clone()))
            .map_err(|e| FrcError::TelemetryLog(e.to_string()))?;
        line.push(b'\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| FrcError::TelemetryLog(format!("{}: {}", self.path.display(), e)))?;
        file.write_all(&line)
            .await
            .map_err(|e| FrcError::TelemetryLog(e.to_string()))?;
        file.flush()
            .await
            .map_err(|e| FrcError::TelemetryLog(e.to_string()))?;
        file.sync_data()
            .await
            .map_err(|e| FrcError::TelemetryLog(e.to_string()))?;

        trace!(path = %self.path.display(), bytes = line.len(), "telemetry appended");
        Ok(())
    }
}
