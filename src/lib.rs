pub mod config;
pub mod error;
pub mod manager;
pub mod multipart;
pub mod uploaded_file;
pub mod utils;

pub use config::UploadConfig;
pub use error::UploadError;
pub use manager::UploadManager;
pub use uploaded_file::{MoveError, UploadStatus, UploadedFile};
pub use utils::validation::{
    ALLOWED_EXTENSIONS, ALLOWED_IMAGE_EXTENSIONS, RESIZABLE_IMAGE_EXTENSIONS,
};
