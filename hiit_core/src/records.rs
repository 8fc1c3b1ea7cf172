//! Session record log.
//!
//! Completed sessions are appended to a JSONL (JSON Lines) file. Access is
//! serialized through a sidecar `<log>.lock` file rather than the log
//! itself, since removing a user replaces the log by renaming a new file
//! over it. The log is only rewritten when a user is removed, and deleted
//! by an explicit data reset.

use crate::types::SessionRecord;
use crate::{Error, Result};
use fs2::FileExt;
use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use uuid::Uuid;

/// Record sink trait for persisting completed sessions
pub trait RecordSink {
    fn append(&mut self, record: &SessionRecord) -> Result<()>;
}

/// Lock guarding a record log, released on drop
pub(crate) struct LogLock {
    file: File,
}

impl LogLock {
    fn open(log_path: &Path) -> Result<File> {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(lock_path(log_path))?;
        Ok(file)
    }

    pub(crate) fn exclusive(log_path: &Path) -> Result<Self> {
        let file = Self::open(log_path)?;
        file.lock_exclusive()?;
        Ok(Self { file })
    }

    pub(crate) fn shared(log_path: &Path) -> Result<Self> {
        let file = Self::open(log_path)?;
        file.lock_shared()?;
        Ok(Self { file })
    }
}

impl Drop for LogLock {
    fn drop(&mut self) {
        if let Err(e) = self.file.unlock() {
            tracing::warn!("Failed to release record log lock: {}", e);
        }
    }
}

/// Path of the lock file guarding `log_path`
fn lock_path(log_path: &Path) -> PathBuf {
    let mut name = log_path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("records"));
    name.push(".lock");
    log_path.with_file_name(name)
}

/// JSONL-based record sink with file locking
pub struct JsonlRecordSink {
    path: PathBuf,
}

impl JsonlRecordSink {
    /// Create a new JSONL sink for the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RecordSink for JsonlRecordSink {
    fn append(&mut self, record: &SessionRecord) -> Result<()> {
        let _lock = LogLock::exclusive(&self.path)?;

        // Opened under the lock so a concurrent rewrite cannot swap the file
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut writer = std::io::BufWriter::new(&file);
        let line = serde_json::to_string(record)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        tracing::debug!("Appended session record {} to {:?}", record.id, self.path);
        Ok(())
    }
}

/// Read all records from a log file
///
/// Unparsable lines (for example a torn final line) are logged and skipped.
pub fn read_records(path: &Path) -> Result<Vec<SessionRecord>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let _lock = LogLock::shared(path)?;
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let reader = BufReader::new(&file);
    let mut records = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<SessionRecord>(&line) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!("Failed to parse session record at line {}: {}", line_num + 1, e);
            }
        }
    }

    tracing::debug!("Read {} session records", records.len());
    Ok(records)
}

/// Records a user took part in
pub fn records_for_user(records: &[SessionRecord], user_id: Uuid) -> Vec<SessionRecord> {
    records
        .iter()
        .filter(|r| r.user_ids.contains(&user_id))
        .cloned()
        .collect()
}

/// Delete the whole log
///
/// Returns whether there was anything to delete.
pub fn reset(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(false);
    }
    let _lock = LogLock::exclusive(path)?;
    match std::fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e.into()),
    }
    tracing::info!("Deleted session records at {:?}", path);
    Ok(true)
}

/// Drop a user from every record, atomically rewriting the log
///
/// Records left without any user are removed. Returns the number of
/// records removed.
pub fn remove_user(path: &Path, user_id: Uuid) -> Result<usize> {
    if !path.exists() {
        return Ok(0);
    }

    let parent = path
        .parent()
        .ok_or_else(|| Error::Other(format!("Record path {:?} has no parent", path)))?;

    let _lock = LogLock::exclusive(path)?;
    let original = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e.into()),
    };

    let records = {
        let reader = BufReader::new(&original);
        let mut records = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<SessionRecord>(&line) {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!("Dropping unparsable session record: {}", e),
            }
        }
        records
    };

    let mut removed = 0;
    let mut temp = NamedTempFile::new_in(parent)?;
    for mut record in records {
        record.user_ids.retain(|id| *id != user_id);
        if record.user_ids.is_empty() {
            removed += 1;
            continue;
        }
        let line = serde_json::to_string(&record)?;
        temp.write_all(line.as_bytes())?;
        temp.write_all(b"\n")?;
    }

    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| Error::Io(e.error))?;

    tracing::info!("Removed user {} from session records ({} dropped)", user_id, removed);
    Ok(removed)
}
