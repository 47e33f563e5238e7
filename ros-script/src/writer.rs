use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::document::CommandDocument;

/// Errors that can occur while writing a [`CommandDocument`] to disk.
#[derive(Debug, Error)]
pub enum WriteError {
    /// Failed to write output file.
    #[error("failed to write script file: {0}")]
    Io(#[from] std::io::Error),
}

/// Serialize a [`CommandDocument`] into RouterOS script text.
///
/// Each section key is written on its own line, followed by its command
/// lines, in emission order.
pub fn write(doc: &CommandDocument) -> String {
    let mut out = String::with_capacity(doc.line_count() * 64);
    for (key, lines) in doc.sections() {
        out.push_str(key);
        out.push('\n');
        for line in lines {
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}

/// Serialize a [`CommandDocument`] and write it to `path`.
pub fn write_file(doc: &CommandDocument, path: &Path) -> Result<(), WriteError> {
    fs::write(path, write(doc))?;
    Ok(())
}
