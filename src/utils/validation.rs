use std::path::Path;

/// General allow-list: documents, images, archives
pub const ALLOWED_EXTENSIONS: &[&str] = &[
    "txt", "pdf", "xls", "xlsx", "doc", "docx", "bmp", "jpg", "jpeg", "png", "rar", "zip",
];

/// Image uploads
pub const ALLOWED_IMAGE_EXTENSIONS: &[&str] = &["bmp", "jpg", "jpeg", "png", "webp"];

/// Images the resize pipeline accepts
pub const RESIZABLE_IMAGE_EXTENSIONS: &[&str] = &["bmp", "jpg", "jpeg", "png"];

/// Lowercased extension of a client-supplied filename, `""` when it has none.
pub fn client_extension(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// Membership test against an allow-list. Entries are compared verbatim, so
/// lists are expected to hold lowercase extensions like the predefined ones.
pub fn extension_allowed(ext: &str, extensions: &[&str]) -> bool {
    extensions.iter().any(|allowed| *allowed == ext)
}
