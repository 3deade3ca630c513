use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use mime::Mime;
use serde::Serialize;
use tempfile::NamedTempFile;
use thiserror::Error;

/// Transport-level outcome of a single uploaded field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadStatus {
    /// File arrived completely and is staged on disk.
    Ok,
    /// Staged size exceeded the configured limit.
    TooLarge,
    /// The body stream died before the field was fully received.
    Partial,
    /// The field was submitted without a file (empty client filename).
    NoFile,
    /// The staging file could not be created.
    NoStagingDir,
    /// Writing to the staging file failed.
    WriteFailed,
}

#[derive(Error, Debug)]
pub enum MoveError {
    #[error("no staged upload to move (already moved or upload failed)")]
    NothingStaged,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A single uploaded file, staged in a temp file until moved.
///
/// The staging file is taken out of the handle by [`persist_to`], so a
/// handle can be moved at most once. Dropping an unmoved handle deletes its
/// staging file.
///
/// [`persist_to`]: UploadedFile::persist_to
#[derive(Debug)]
pub struct UploadedFile {
    client_name: String,
    content_type: Option<Mime>,
    size: u64,
    status: UploadStatus,
    staging: Mutex<Option<NamedTempFile>>,
}

impl UploadedFile {
    /// A fully received upload backed by a staging file.
    pub fn received(
        client_name: impl Into<String>,
        content_type: Option<Mime>,
        staging: NamedTempFile,
        size: u64,
    ) -> Self {
        Self {
            client_name: client_name.into(),
            content_type,
            size,
            status: UploadStatus::Ok,
            staging: Mutex::new(Some(staging)),
        }
    }

    /// An upload that failed in transport; carries no staged bytes.
    pub fn failed(
        client_name: impl Into<String>,
        content_type: Option<Mime>,
        status: UploadStatus,
    ) -> Self {
        Self {
            client_name: client_name.into(),
            content_type,
            size: 0,
            status,
            staging: Mutex::new(None),
        }
    }

    pub fn status(&self) -> UploadStatus {
        self.status
    }

    /// The filename the client declared for this upload. Untrusted input.
    pub fn client_name(&self) -> &str {
        &self.client_name
    }

    /// The media type the client declared. Never sniffed from content.
    pub fn content_type(&self) -> Option<&Mime> {
        self.content_type.as_ref()
    }

    /// Bytes staged on disk.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Path of the staging file, as long as the upload has not been moved.
    pub fn staging_path(&self) -> Option<PathBuf> {
        self.lock_staging().as_ref().map(|t| t.path().to_path_buf())
    }

    /// Move the staged bytes to `dest`.
    ///
    /// Consuming: at most one call can succeed; later calls (and calls on a
    /// failed upload that never staged anything) fail with
    /// [`MoveError::NothingStaged`]. An existing file at `dest` is replaced.
    pub fn persist_to(&self, dest: impl AsRef<Path>) -> Result<(), MoveError> {
        let dest = dest.as_ref();
        let staged = self
            .lock_staging()
            .take()
            .ok_or(MoveError::NothingStaged)?;

        match staged.persist(dest) {
            Ok(_) => Ok(()),
            Err(err) => {
                // rename cannot cross filesystems; copy out of staging instead
                tracing::debug!(
                    "Persist via rename failed ({}), copying to {} instead",
                    err.error,
                    dest.display()
                );
                std::fs::copy(err.file.path(), dest)?;
                Ok(())
            }
        }
    }

    fn lock_staging(&self) -> MutexGuard<'_, Option<NamedTempFile>> {
        self.staging.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
