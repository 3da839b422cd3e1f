//! Highscore persistence.
//!
//! Stores keep at most [`HIGHSCORE_LIMIT`] records, sorted by score
//! descending. A new score that ties an existing one ranks below it.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::types::HIGHSCORE_LIMIT;

/// Name stored when the player did not give one.
pub const ANONYMOUS: &str = "(anonymous)";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighscoreRecord {
    pub name: String,
    pub score: u32,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("highscore file I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("highscore file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("highscore store unavailable: {0}")]
    Unavailable(String),
}

/// Persistent top-N table.
pub trait HighscoreStore: Send {
    /// Record a finished game and drop everything outside the top list.
    fn insert(&mut self, name: &str, score: u32) -> Result<(), StoreError>;

    /// Best `n` records, highest first (never more than the retained list).
    fn top_n(&self, n: usize) -> Result<Vec<HighscoreRecord>, StoreError>;
}

/// Trimmed player name; blank names become [`ANONYMOUS`].
pub fn normalize_name(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        ANONYMOUS.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Insert keeping the list sorted and capped. Returns the rank (0-based) the
/// record landed at, or `None` if it did not make the list.
fn insert_ranked(records: &mut Vec<HighscoreRecord>, record: HighscoreRecord) -> Option<usize> {
    let pos = records
        .iter()
        .position(|r| record.score > r.score)
        .unwrap_or(records.len());
    if pos >= HIGHSCORE_LIMIT {
        return None;
    }
    records.insert(pos, record);
    records.truncate(HIGHSCORE_LIMIT);
    Some(pos)
}

/// In-memory store (tests, or when persistence is disabled).
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Vec<HighscoreRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HighscoreStore for MemoryStore {
    fn insert(&mut self, name: &str, score: u32) -> Result<(), StoreError> {
        insert_ranked(
            &mut self.records,
            HighscoreRecord {
                name: normalize_name(name),
                score,
            },
        );
        Ok(())
    }

    fn top_n(&self, n: usize) -> Result<Vec<HighscoreRecord>, StoreError> {
        Ok(self.records.iter().take(n).cloned().collect())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct HighscoreFile {
    #[serde(default)]
    records: Vec<HighscoreRecord>,
}

/// JSON file store. Every call reads the file; inserts rewrite it.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<data dir>/blocktris/highscores.json`, or the working directory when
    /// the platform has no data directory.
    pub fn default_path() -> PathBuf {
        let mut path = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("blocktris");
        path.push("highscores.json");
        path
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing file means no scores yet.
    fn load(&self) -> Result<Vec<HighscoreRecord>, StoreError> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let file: HighscoreFile = serde_json::from_str(&data)?;

        let mut records = Vec::with_capacity(file.records.len());
        for record in file.records {
            insert_ranked(&mut records, record);
        }
        Ok(records)
    }

    fn save(&self, records: Vec<HighscoreRecord>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let data = serde_json::to_string_pretty(&HighscoreFile { records })?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}

impl HighscoreStore for JsonFileStore {
    fn insert(&mut self, name: &str, score: u32) -> Result<(), StoreError> {
        let mut records = self.load()?;
        insert_ranked(
            &mut records,
            HighscoreRecord {
                name: normalize_name(name),
                score,
            },
        );
        self.save(records)
    }

    fn top_n(&self, n: usize) -> Result<Vec<HighscoreRecord>, StoreError> {
        let mut records = self.load()?;
        records.truncate(n);
        Ok(records)
    }
}
