use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Errors from a high score backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("high score I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("high score file {path} is malformed: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Persistence collaborator. Read once at startup, written once at game over
/// or shutdown.
pub trait HighScoreStore {
    fn get_high_score(&self) -> Result<u32, StorageError>;
    fn set_high_score(&mut self, score: u32) -> Result<(), StorageError>;
}

/// Read the stored high score, treating any failure as zero.
pub fn load_high_score_or_zero(store: &dyn HighScoreStore) -> u32 {
    match store.get_high_score() {
        Ok(score) => score,
        Err(e) => {
            tracing::warn!(error = %e, "Could not read high score, starting from 0");
            0
        },
    }
}

/// Write the high score, logging failures instead of propagating them.
pub fn save_high_score_logged(store: &mut dyn HighScoreStore, score: u32) {
    match store.set_high_score(score) {
        Ok(()) => tracing::info!(score, "High score saved"),
        Err(e) => tracing::warn!(error = %e, score, "Could not save high score"),
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct HighScoreRecord {
    high_score: u32,
}

/// JSON file backend: `{ "high_score": N }`. A missing file reads as zero.
#[derive(Debug, Clone)]
pub struct FileHighScoreStore {
    path: PathBuf,
}

impl FileHighScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path from `PLUTO_HIGH_SCORE_PATH`, or `data/highscore.json`.
    pub fn from_env() -> Self {
        let path = std::env::var("PLUTO_HIGH_SCORE_PATH")
            .unwrap_or_else(|_| "data/highscore.json".to_string());
        Self::new(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HighScoreStore for FileHighScoreStore {
    fn get_high_score(&self) -> Result<u32, StorageError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(source) => {
                return Err(StorageError::Io {
                    path: self.path.clone(),
                    source,
                });
            },
        };
        let record: HighScoreRecord =
            serde_json::from_str(&content).map_err(|source| StorageError::Parse {
                path: self.path.clone(),
                source,
            })?;
        Ok(record.high_score)
    }

    fn set_high_score(&mut self, score: u32) -> Result<(), StorageError> {
        let io_err = |source| StorageError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let body = serde_json::to_string_pretty(&HighScoreRecord { high_score: score })
            .map_err(|source| StorageError::Parse {
                path: self.path.clone(),
                source,
            })?;
        std::fs::write(&self.path, body).map_err(io_err)
    }
}

/// In-memory backend for tests and headless runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryHighScoreStore {
    pub high_score: u32,
    pub writes: usize,
}

impl HighScoreStore for MemoryHighScoreStore {
    fn get_high_score(&self) -> Result<u32, StorageError> {
        Ok(self.high_score)
    }

    fn set_high_score(&mut self, score: u32) -> Result<(), StorageError> {
        self.high_score = score;
        self.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_reads_as_zero() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileHighScoreStore::new(dir.path().join("nope.json"));
        assert_eq!(store.get_high_score().unwrap(), 0);
    }

    #[test]
    fn file_store_roundtrip_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileHighScoreStore::new(dir.path().join("nested/score.json"));
        store.set_high_score(42).unwrap();
        assert_eq!(store.get_high_score().unwrap(), 42);
    }

    #[test]
    fn malformed_file_is_parse_error_and_falls_back_to_zero() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("score.json");
        std::fs::write(&path, "not json").unwrap();
        let store = FileHighScoreStore::new(&path);

        assert!(matches!(
            store.get_high_score(),
            Err(StorageError::Parse { .. })
        ));
        assert_eq!(load_high_score_or_zero(&store), 0);
    }

    #[test]
    fn failed_write_does_not_panic() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be written as a file.
        let mut store = FileHighScoreStore::new(dir.path());
        save_high_score_logged(&mut store, 7);
    }

    #[test]
    fn memory_store_counts_writes() {
        let mut store = MemoryHighScoreStore::default();
        save_high_score_logged(&mut store, 9);
        assert_eq!(store.high_score, 9);
        assert_eq!(store.writes, 1);
    }
}
