//! JSON-lines event log.
//!
//! Records are handed to a background task over an unbounded channel and
//! appended to the log file one JSON object per line. A disabled log drops
//! records without allocating.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LogRecord {
    SessionStart {
        seed: u32,
        player: String,
    },
    Action {
        action: &'static str,
    },
    LineClear {
        lines: usize,
        score_delta: u32,
        level: u32,
        total_lines: u32,
    },
    LevelUp {
        level: u32,
        drop_interval_ms: u32,
    },
    GameOver {
        reason: &'static str,
        score: u32,
        level: u32,
        lines: u32,
    },
    ScoreSaved {
        name: String,
        score: u32,
    },
    SaveFailed {
        error: String,
    },
    Restart,
    Shutdown,
}

#[derive(Debug, Serialize)]
struct LogLine {
    ts: u64,
    #[serde(flatten)]
    record: LogRecord,
}

/// Handle to the log writer task.
#[derive(Debug, Default)]
pub struct EventLog {
    writer: Option<(mpsc::UnboundedSender<LogLine>, JoinHandle<()>)>,
}

impl EventLog {
    /// Log that drops every record.
    pub fn disabled() -> Self {
        Self { writer: None }
    }

    /// Start the writer task appending to `path`. Must be called inside a
    /// tokio runtime.
    ///
    /// If the file cannot be opened the task exits and records are dropped.
    pub fn spawn(path: PathBuf) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<LogLine>();
        let task = tokio::spawn(async move {
            use tokio::fs::OpenOptions;
            use tokio::io::AsyncWriteExt;

            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    let _ = tokio::fs::create_dir_all(parent).await;
                }
            }
            let mut file = match OpenOptions::new().create(true).append(true).open(&path).await {
                Ok(f) => f,
                Err(_) => return,
            };

            let mut buf: Vec<u8> = Vec::with_capacity(512);
            while let Some(line) = rx.recv().await {
                buf.clear();
                if serde_json::to_writer(&mut buf, &line).is_err() {
                    continue;
                }
                buf.push(b'\n');
                if file.write_all(&buf).await.is_err() {
                    break;
                }
            }

            let _ = file.flush().await;
        });
        Self {
            writer: Some((tx, task)),
        }
    }

    /// Log to `path` when given, otherwise a disabled log.
    pub fn from_path(path: Option<PathBuf>) -> Self {
        path.map(Self::spawn).unwrap_or_default()
    }

    pub fn is_enabled(&self) -> bool {
        self.writer.is_some()
    }

    pub fn record(&self, record: LogRecord) {
        if let Some((tx, _)) = &self.writer {
            let _ = tx.send(LogLine {
                ts: current_timestamp_ms(),
                record,
            });
        }
    }

    /// Flush pending records and wait for the writer to finish.
    pub async fn close(self) {
        if let Some((tx, task)) = self.writer {
            drop(tx);
            let _ = task.await;
        }
    }
}

fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
