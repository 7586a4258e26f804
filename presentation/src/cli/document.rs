//! Reading documents from disk

use clarity_domain::DocumentSession;
use std::io;
use std::path::Path;

/// Read a plain UTF-8 text document. The file name (without directories)
/// becomes the session's display name.
pub fn read_document_file(path: &Path) -> io::Result<DocumentSession> {
    let text = std::fs::read_to_string(path)?;
    if text.trim().is_empty() {
        return Err(io::Error::new(io::ErrorKind::InvalidData, "document is empty"));
    }

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(DocumentSession::new(text, file_name))
}
