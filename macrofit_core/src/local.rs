//! On-device fallback store.
//!
//! Two durable artifacts live under the data directory:
//! - `nutrition_history.json`: the capped, newest-first list of recent
//!   nutrition calculations (at most [`HISTORY_CAP`] records)
//! - `progress.jsonl`: append-only JSON Lines of progress entries,
//!   uncapped (the server is authoritative when present)
//!
//! Writes are atomic (temp file + rename) and guarded with advisory file
//! locks so a second process cannot interleave partial writes.

use crate::{Error, HistoryRecord, ProgressEntry, Result};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use uuid::Uuid;

/// Maximum nutrition history records retained on-device, newest first
pub const HISTORY_CAP: usize = 5;

/// File-backed local store rooted at a data directory
pub struct LocalStore {
    data_dir: PathBuf,
}

impl LocalStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn history_path(&self) -> PathBuf {
        self.data_dir.join("nutrition_history.json")
    }

    fn progress_path(&self) -> PathBuf {
        self.data_dir.join("progress.jsonl")
    }

    // ------------------------------------------------------------------
    // Nutrition history
    // ------------------------------------------------------------------

    /// Load the local nutrition history, newest first
    ///
    /// A missing or unreadable file yields an empty list with a warning,
    /// never a hard error; the store must not block the calculator.
    pub fn load_history(&self) -> Result<Vec<HistoryRecord>> {
        let path = self.history_path();
        if !path.exists() {
            tracing::debug!("No local history at {:?}", path);
            return Ok(Vec::new());
        }

        let file = File::open(&path)?;
        file.lock_shared()?;
        let mut contents = String::new();
        let read_result = BufReader::new(&file).read_to_string(&mut contents);
        file.unlock()?;
        read_result?;

        match serde_json::from_str::<Vec<HistoryRecord>>(&contents) {
            Ok(records) => Ok(records),
            Err(e) => {
                tracing::warn!("Corrupt history file {:?}: {}. Starting empty.", path, e);
                Ok(Vec::new())
            }
        }
    }

    /// Replace the local history wholesale, enforcing the retention cap
    pub fn save_history(&self, records: &[HistoryRecord]) -> Result<()> {
        let capped = &records[..records.len().min(HISTORY_CAP)];
        atomic_write(&self.history_path(), serde_json::to_string(capped)?.as_bytes())?;
        tracing::debug!("Saved {} history records locally", capped.len());
        Ok(())
    }

    /// Prepend a record, assigning a local id, and return the capped list
    pub fn push_history(&self, mut record: HistoryRecord) -> Result<Vec<HistoryRecord>> {
        if record.id.is_none() {
            record.id = Some(Uuid::new_v4().to_string());
        }
        let mut records = self.load_history()?;
        records.insert(0, record);
        records.truncate(HISTORY_CAP);
        self.save_history(&records)?;
        Ok(records)
    }

    /// Remove one record by id and return the remaining list
    pub fn delete_history(&self, id: &str) -> Result<Vec<HistoryRecord>> {
        let mut records = self.load_history()?;
        let before = records.len();
        records.retain(|r| r.id.as_deref() != Some(id));
        if records.len() == before {
            tracing::warn!("No local history record with id {}", id);
        }
        self.save_history(&records)?;
        Ok(records)
    }

    /// Drop the entire local history
    pub fn clear_history(&self) -> Result<()> {
        let path = self.history_path();
        if path.exists() {
            std::fs::remove_file(&path)?;
            tracing::debug!("Cleared local history at {:?}", path);
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Progress entries
    // ------------------------------------------------------------------

    /// Append one progress entry to the local log
    pub fn append_progress(&self, entry: &ProgressEntry) -> Result<()> {
        std::fs::create_dir_all(&self.data_dir)?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.progress_path())?;
        file.lock_exclusive()?;

        let mut writer = std::io::BufWriter::new(&file);
        let line = serde_json::to_string(entry)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        drop(writer);

        file.unlock()?;
        tracing::debug!("Appended progress entry for {} locally", entry.date);
        Ok(())
    }

    /// Load all locally logged progress entries, oldest first
    ///
    /// Malformed lines are skipped with a warning; one bad line must not
    /// hide the rest of the log.
    pub fn load_progress(&self) -> Result<Vec<ProgressEntry>> {
        let path = self.progress_path();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&path)?;
        file.lock_shared()?;

        let reader = BufReader::new(&file);
        let mut entries = Vec::new();
        for (line_num, line_result) in reader.lines().enumerate() {
            let line = line_result?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<ProgressEntry>(&line) {
                Ok(entry) => entries.push(entry),
                Err(e) => {
                    tracing::warn!("Skipping progress line {}: {}", line_num + 1, e);
                }
            }
        }

        file.unlock()?;
        Ok(entries)
    }
}

/// Atomically write bytes to a path via a locked temp file and rename
pub(crate) fn atomic_write(path: &Path, contents: &[u8]) -> Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| Error::Other(format!("{:?} has no parent directory", path)))?;
    std::fs::create_dir_all(parent)?;

    let temp = NamedTempFile::new_in(parent)?;
    temp.as_file().lock_exclusive()?;
    {
        let mut writer = std::io::BufWriter::new(temp.as_file());
        writer.write_all(contents)?;
        writer.flush()?;
    }
    temp.as_file().sync_all()?;
    temp.as_file().unlock()?;
    temp.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}
