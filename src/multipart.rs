use std::collections::HashMap;

use axum::extract::Multipart;
use axum::extract::multipart::Field;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;

use crate::config::UploadConfig;
use crate::error::UploadError;
use crate::uploaded_file::{UploadStatus, UploadedFile};

/// Collect the file fields of a multipart request into a field → handle map.
///
/// Text fields are skipped; only fields carrying a client filename become
/// uploads. Transport failures are recorded as handle statuses, not errors —
/// only a malformed multipart structure fails the collection itself.
pub async fn collect(
    mut multipart: Multipart,
    config: &UploadConfig,
) -> Result<HashMap<String, UploadedFile>, UploadError> {
    let mut files = HashMap::new();

    while let Some(mut field) = multipart.next_field().await? {
        let Some(client_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let field_name = field.name().unwrap_or_default().to_string();
        let content_type = field.content_type().and_then(|ct| ct.parse().ok());

        if client_name.is_empty() {
            files.insert(
                field_name,
                UploadedFile::failed(client_name, content_type, UploadStatus::NoFile),
            );
            continue;
        }

        let (status, staged, size) = stage_field(&mut field, config).await;
        tracing::debug!(
            "Staged field '{}' ('{}', {} bytes, {:?})",
            field_name,
            client_name,
            size,
            status
        );

        let file = match staged {
            Some(temp) => UploadedFile::received(client_name, content_type, temp, size),
            None => UploadedFile::failed(client_name, content_type, status),
        };
        files.insert(field_name, file);

        // a dead body stream cannot yield further fields
        if status == UploadStatus::Partial {
            break;
        }
    }

    Ok(files)
}

/// Stream one field into a fresh staging file. Failures are reported as a
/// status; the partial staging file is dropped (and thus deleted) with it.
async fn stage_field(
    field: &mut Field<'_>,
    config: &UploadConfig,
) -> (UploadStatus, Option<NamedTempFile>, u64) {
    let staging_dir = config
        .staging_dir
        .clone()
        .unwrap_or_else(std::env::temp_dir);

    let temp = match tempfile::Builder::new()
        .prefix("upload_")
        .tempfile_in(&staging_dir)
    {
        Ok(temp) => temp,
        Err(err) => {
            tracing::warn!(
                "Failed to create staging file in {}: {}",
                staging_dir.display(),
                err
            );
            return (UploadStatus::NoStagingDir, None, 0);
        }
    };

    let writer = match temp.as_file().try_clone() {
        Ok(file) => file,
        Err(err) => {
            tracing::warn!("Failed to reopen staging file: {}", err);
            return (UploadStatus::WriteFailed, None, 0);
        }
    };
    let mut writer = tokio::fs::File::from_std(writer);

    let mut size: u64 = 0;
    loop {
        match field.chunk().await {
            Ok(Some(chunk)) => {
                size += chunk.len() as u64;
                if size > config.max_file_size as u64 {
                    tracing::warn!(
                        "Upload exceeds staging limit of {} bytes, discarding",
                        config.max_file_size
                    );
                    return (UploadStatus::TooLarge, None, size);
                }
                if let Err(err) = writer.write_all(&chunk).await {
                    tracing::warn!("Failed to write staging file: {}", err);
                    return (UploadStatus::WriteFailed, None, size);
                }
            }
            Ok(None) => break,
            Err(err) => {
                tracing::warn!("Upload stream ended early: {}", err);
                return (UploadStatus::Partial, None, size);
            }
        }
    }

    if let Err(err) = writer.flush().await {
        tracing::warn!("Failed to flush staging file: {}", err);
        return (UploadStatus::WriteFailed, None, size);
    }

    (UploadStatus::Ok, Some(temp), size)
}
