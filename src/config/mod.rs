use std::env;
use std::path::PathBuf;

/// Staging configuration for incoming uploads
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Directory where uploads are staged before being moved.
    /// `None` stages in the system temp directory.
    pub staging_dir: Option<PathBuf>,

    /// Maximum staged size per file in bytes (default: 256 MB)
    pub max_file_size: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            staging_dir: None,
            max_file_size: 256 * 1024 * 1024, // 256 MB
        }
    }
}

impl UploadConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            staging_dir: env::var("UPLOAD_STAGING_DIR").ok().map(PathBuf::from),

            max_file_size: env::var("MAX_FILE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.max_file_size),
        }
    }
}
