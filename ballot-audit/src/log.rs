//! The durable append-only log writer.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Local;

use crate::error::{AuditError, AuditResult};
use crate::event::AuditEvent;

/// Handle to the shared audit log file.
///
/// Appends are serialized by an internal lock so records are never
/// interleaved, and every append is synced to disk before `record` returns:
/// callers may treat a returned `Ok` as "this event survives a crash".
#[derive(Debug)]
pub struct AuditLog {
    file: Mutex<File>,
    path: PathBuf,
}

impl AuditLog {
    /// Opens the log at `path`, creating it if absent.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::OpenFailed`] if the file cannot be opened in
    /// append mode.
    pub fn open(path: impl Into<PathBuf>) -> AuditResult<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| AuditError::OpenFailed {
                path: path.clone(),
                source,
            })?;
        Ok(Self {
            file: Mutex::new(file),
            path,
        })
    }

    /// Appends one timestamped record and syncs it to disk.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::WriteFailed`] if the write or the sync fails;
    /// the event must then be considered not durable.
    pub fn record(&self, event: &AuditEvent) -> AuditResult<()> {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        let line = format!("{timestamp} {event}\n");

        let mut file = self.file.lock().expect("audit log lock poisoned");
        file.write_all(line.as_bytes())
            .map_err(AuditError::WriteFailed)?;
        file.sync_data().map_err(AuditError::WriteFailed)?;
        Ok(())
    }

    /// The log file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}
