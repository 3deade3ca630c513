use std::collections::HashMap;
use std::path::{Path, PathBuf};

use axum::extract::Multipart;
use rand::RngCore;

use crate::config::UploadConfig;
use crate::error::UploadError;
use crate::multipart;
use crate::uploaded_file::{UploadStatus, UploadedFile};
use crate::utils::validation::{client_extension, extension_allowed};

/// Uploaded files of a single request, keyed by form field name.
///
/// Built once from the request and read-only afterwards; the only side
/// effect is [`move_to`], which relocates a staged file out of the manager.
///
/// [`move_to`]: UploadManager::move_to
pub struct UploadManager {
    files: HashMap<String, UploadedFile>,
}

impl UploadManager {
    /// Wrap an already-collected upload set.
    pub fn new(files: HashMap<String, UploadedFile>) -> Self {
        Self { files }
    }

    /// Collect the file fields of a multipart request.
    pub async fn from_multipart(
        multipart: Multipart,
        config: &UploadConfig,
    ) -> Result<Self, UploadError> {
        Ok(Self::new(multipart::collect(multipart, config).await?))
    }

    /// Look up the uploaded file behind a form field name.
    pub fn get(&self, name: &str) -> Option<&UploadedFile> {
        self.files.get(name)
    }

    /// True when the field exists and its upload completed without a
    /// transport error.
    pub fn has_upload(&self, name: &str) -> bool {
        self.get(name)
            .is_some_and(|file| file.status() == UploadStatus::Ok)
    }

    /// True when [`has_upload`] holds and the lowercased extension of the
    /// client filename is in `extensions`.
    ///
    /// [`has_upload`]: UploadManager::has_upload
    pub fn has_allowed_extension(&self, name: &str, extensions: &[&str]) -> bool {
        match self.get(name) {
            Some(file) if file.status() == UploadStatus::Ok => {
                extension_allowed(&client_extension(file.client_name()), extensions)
            }
            _ => false,
        }
    }

    /// Move the staged upload behind `name` into `directory`.
    ///
    /// With no `new_file_name` the file lands under a random hex basename
    /// carrying the client extension. Otherwise `new_file_name` is used
    /// as-is when its trailing dot-part already names the client extension,
    /// and gets the extension appended when it does not. Returns the final
    /// filename.
    pub fn move_to(
        &self,
        name: &str,
        directory: impl AsRef<Path>,
        new_file_name: Option<&str>,
    ) -> Result<String, UploadError> {
        let file = self
            .get(name)
            .ok_or_else(|| UploadError::InvalidField(name.to_string()))?;

        let directory = normalize_directory(directory.as_ref())?;
        let ext = client_extension(file.client_name());

        let final_name = match new_file_name {
            Some(requested) if !requested.is_empty() => reconcile_extension(requested, &ext),
            _ => random_filename(&ext),
        };

        let dest = directory.join(&final_name);
        tracing::debug!("Moving upload '{}' to {}", name, dest.display());
        file.persist_to(&dest)?;

        Ok(final_name)
    }

    /// Delete `filename` under `directory` if present. Advisory: returns
    /// whether a file was deleted, never errors.
    pub fn remove_file(directory: impl AsRef<Path>, filename: &str) -> bool {
        let filename = filename.trim();
        if filename.is_empty() {
            return false;
        }

        let path = directory.as_ref().join(filename);
        if !path.is_file() {
            return false;
        }

        match std::fs::remove_file(&path) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!("Failed to remove {}: {}", path.display(), err);
                false
            }
        }
    }
}

fn normalize_directory(directory: &Path) -> Result<PathBuf, UploadError> {
    let directory = match directory.to_str() {
        Some(s) => PathBuf::from(s.trim_end_matches(std::path::is_separator)),
        None => directory.to_path_buf(),
    };
    if !directory.is_dir() {
        return Err(UploadError::DirectoryNotFound(directory));
    }
    Ok(directory)
}

/// Random 16-hex-char basename plus the client extension. The extension is
/// capped at 8 characters, a fixed choice kept from long-standing callers.
fn random_filename(ext: &str) -> String {
    let mut raw = [0u8; 8];
    rand::thread_rng().fill_bytes(&mut raw);
    let ext: String = ext.chars().take(8).collect();
    format!("{}.{}", hex::encode(raw), ext)
}

/// Keep `requested` untouched when its trailing dot-part already names the
/// client extension; otherwise append `.` + extension. A name without any
/// dot-part falls through to the same append.
fn reconcile_extension(requested: &str, ext: &str) -> String {
    match requested.split('.').next_back() {
        Some(last) if last.trim().to_lowercase() == ext => requested.to_string(),
        _ => format!("{}.{}", requested, ext),
    }
}
