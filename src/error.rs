use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::path::PathBuf;
use thiserror::Error;

use crate::uploaded_file::MoveError;

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Unknown upload field: {0}")]
    InvalidField(String),

    #[error("Destination directory does not exist: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("Invalid multipart body: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),

    #[error("Move failed: {0}")]
    Move(#[from] MoveError),
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            UploadError::InvalidField(field) => (
                StatusCode::BAD_REQUEST,
                format!("Unknown upload field: {}", field),
            ),
            UploadError::DirectoryNotFound(dir) => {
                tracing::error!("Upload destination missing: {}", dir.display());
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            UploadError::Multipart(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            UploadError::Move(e) => {
                tracing::error!("Failed to move staged upload: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
