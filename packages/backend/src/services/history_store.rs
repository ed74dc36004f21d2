//! Persistent history store collaborator.
//!
//! The whole record sequence lives in one JSON file. It is read once at
//! startup; afterwards every mutating transition enqueues a full snapshot
//! on an unbounded channel and a detached writer task flushes it to disk.
//! Writes are fire-and-forget, at-most-once: a snapshot may be lost if the
//! process dies right after a mutation, which is an accepted trade-off.

use std::path::{Path, PathBuf};

use tokio::sync::mpsc;

use tango_engine::HistoryRecord;

pub const HISTORY_FILE: &str = "history.json";

/// Startup load result. "Missing" and "unreadable" are kept apart from a
/// successfully loaded empty sequence.
#[derive(Debug)]
pub enum HistoryLoad {
    Loaded(Vec<HistoryRecord>),
    Missing,
    Unreadable(String),
}

impl HistoryLoad {
    /// Records to start the session with. An unreadable file degrades to
    /// an empty history after the caller has logged the warning.
    pub fn into_records(self) -> Vec<HistoryRecord> {
        match self {
            HistoryLoad::Loaded(records) => records,
            HistoryLoad::Missing | HistoryLoad::Unreadable(_) => Vec::new(),
        }
    }
}

pub async fn load_history(dir: &Path) -> HistoryLoad {
    let path = dir.join(HISTORY_FILE);
    let raw = match tokio::fs::read_to_string(&path).await {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return HistoryLoad::Missing,
        Err(err) => return HistoryLoad::Unreadable(err.to_string()),
    };
    match serde_json::from_str(&raw) {
        Ok(records) => HistoryLoad::Loaded(records),
        Err(err) => HistoryLoad::Unreadable(err.to_string()),
    }
}

/// Handle feeding the detached writer task.
#[derive(Clone)]
pub struct HistoryWriter {
    tx: mpsc::UnboundedSender<Vec<HistoryRecord>>,
}

impl HistoryWriter {
    /// Spawn the writer task. Must be called inside a Tokio runtime.
    pub fn spawn(dir: &Path) -> Self {
        let path = dir.join(HISTORY_FILE);
        let parent = dir.to_path_buf();
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(write_loop(parent, path, rx));
        Self { tx }
    }

    /// Enqueue a full snapshot. Never blocks; a closed channel only means
    /// the process is shutting down.
    pub fn persist(&self, records: Vec<HistoryRecord>) {
        if self.tx.send(records).is_err() {
            tracing::warn!("history writer task gone, snapshot dropped");
        }
    }
}

async fn write_loop(
    dir: PathBuf,
    path: PathBuf,
    mut rx: mpsc::UnboundedReceiver<Vec<HistoryRecord>>,
) {
    while let Some(mut snapshot) = rx.recv().await {
        // queued intermediate snapshots are superseded by the newest one
        while let Ok(newer) = rx.try_recv() {
            snapshot = newer;
        }

        let json = match serde_json::to_vec(&snapshot) {
            Ok(json) => json,
            Err(err) => {
                tracing::warn!(error = %err, "history snapshot not serializable");
                continue;
            }
        };

        if let Err(err) = tokio::fs::create_dir_all(&dir).await {
            tracing::warn!(error = %err, dir = %dir.display(), "history directory not writable");
            continue;
        }
        if let Err(err) = tokio::fs::write(&path, json).await {
            tracing::warn!(error = %err, path = %path.display(), "history write failed");
        }
    }
}
