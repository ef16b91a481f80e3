//! Append-only JSON Lines store of scored runs.
//!
//! One [`StoredScore`] per line. Summary and receipt consumers read the store
//! back by taking the most recent line.

use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ScoreRecord, StoreError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredScore {
    pub recorded_at: DateTime<Utc>,
    pub record: ScoreRecord,
}

pub struct ScoreStore {
    path: PathBuf,
}

impl ScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a record, stamped with the current time.
    pub fn append(&self, record: ScoreRecord) -> Result<StoredScore, StoreError> {
        self.append_at(record, Utc::now())
    }

    pub fn append_at(
        &self,
        record: ScoreRecord,
        recorded_at: DateTime<Utc>,
    ) -> Result<StoredScore, StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| self.io(source))?;
        }

        let stored = StoredScore {
            recorded_at,
            record,
        };
        let line = serde_json::to_string(&stored).map_err(|source| StoreError::Serialize {
            path: self.path.clone(),
            source,
        })?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| self.io(source))?;
        writeln!(file, "{}", line).map_err(|source| self.io(source))?;

        tracing::debug!(path = %self.path.display(), id = stored.record.id, "score appended");
        Ok(stored)
    }

    /// The last `limit` readable records, oldest first.
    ///
    /// A missing store reads as empty. Lines that fail to parse are skipped.
    pub fn read_recent(&self, limit: usize) -> Result<Vec<StoredScore>, StoreError> {
        let file = match std::fs::File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(self.io(source)),
        };

        let reader = BufReader::new(file);
        let mut records = Vec::new();
        for (n, line) in reader.lines().enumerate() {
            let line = line.map_err(|source| self.io(source))?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<StoredScore>(&line) {
                Ok(stored) => records.push(stored),
                Err(e) => {
                    tracing::warn!(path = %self.path.display(), line = n + 1, error = %e, "skipping unreadable score line")
                }
            }
        }

        if records.len() > limit {
            records.drain(0..records.len() - limit);
        }
        Ok(records)
    }

    pub fn latest(&self) -> Result<Option<StoredScore>, StoreError> {
        Ok(self.read_recent(1)?.pop())
    }

    /// Identifier for the next run: one past the highest id on record.
    pub fn next_id(&self) -> Result<u64, StoreError> {
        let highest = self
            .read_recent(usize::MAX)?
            .iter()
            .map(|s| s.record.id)
            .max();
        Ok(highest.map_or(1, |id| id + 1))
    }

    fn io(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}
