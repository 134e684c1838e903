//! Turning files on disk into attachments.
//!
//! The extension allow-list plays the part of a file picker's type filter.  It keeps obviously
//! unsupported files out of the chat, but it is advisory: [`ConversationState`] accepts any
//! attachment, and the bytes and MIME type are forwarded to the service unchanged.
//!
//! [`ConversationState`]: crate::chat::ConversationState

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::types::Attachment;

/// File extensions offered for upload: images, audio, video, then documents.
pub const ALLOWED_EXTENSIONS: [&str; 23] = [
    "png", "jpg", "jpeg", "gif", "webp", //
    "mp3", "wav", "aiff", "aac", "ogg", "flac", //
    "mp4", "mov", "avi", "webm", //
    "txt", "pdf", "docx", "md", "py", "json", "html", "css",
];

/// Returns true if the path's extension is on the allow-list (case-insensitive).
pub fn is_allowed(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
}

/// The MIME type declared for a file, guessed from its extension.
pub fn mime_type_for(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

/// Reads a file from disk into an attachment.
///
/// # Errors
///
/// Returns [`Error::Validation`] if the extension is not on the allow-list and [`Error::Io`] if
/// the file cannot be read.
pub fn read_upload(path: &Path) -> Result<Attachment> {
    if !is_allowed(path) {
        return Err(Error::validation(
            format!(
                "unsupported file type; allowed extensions: {}",
                ALLOWED_EXTENSIONS.join(", ")
            ),
            Some(path.display().to_string()),
        ));
    }
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let bytes = fs::read(path)
        .map_err(|err| Error::io(format!("failed to read {}", path.display()), err))?;
    Ok(Attachment::new(name, mime_type_for(path), bytes))
}

/// The confirmation shown after a file is staged.
pub fn upload_notice(name: &str) -> String {
    format!("File '{name}' is ready. It will be sent with your next message.")
}
