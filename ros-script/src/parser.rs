use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::document::CommandDocument;

/// Errors that can occur while parsing RouterOS script text.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A command line appeared before any `/section` header.
    #[error("line {line}: command outside of any section: {text}")]
    OrphanLine { line: usize, text: String },
    /// The script ended inside a `\` continuation.
    #[error("line {line}: unterminated line continuation")]
    DanglingContinuation { line: usize },
    /// Failed to read input file.
    #[error("failed to read script file: {0}")]
    Io(#[from] std::io::Error),
}

/// Parse RouterOS script text into a [`CommandDocument`].
///
/// Lines starting with `/` open a section; a header seen again re-opens the
/// existing section and appends to it. Blank lines and `#` comments are
/// skipped, and a trailing `\` joins the next physical line.
pub fn parse(script: &str) -> Result<CommandDocument, ParseError> {
    let mut doc = CommandDocument::new();
    let mut current: Option<String> = None;
    let mut pending: Option<(usize, String)> = None;

    for (idx, raw) in script.lines().enumerate() {
        let line_no = idx + 1;
        let (start_line, mut text) = match pending.take() {
            Some((start, mut acc)) => {
                acc.push_str(raw.trim_start());
                (start, acc)
            }
            None => (line_no, raw.trim().to_string()),
        };
        // a comment ends at its own line, trailing `\` included
        if text.starts_with('#') {
            continue;
        }

        if let Some(stripped) = text.strip_suffix('\\') {
            let stripped = stripped.trim_end().to_string();
            pending = Some((start_line, format!("{stripped} ")));
            continue;
        }
        text = text.trim_end().to_string();

        if text.is_empty() {
            continue;
        }
        if text.starts_with('/') {
            doc.declare(text.as_str());
            current = Some(text);
            continue;
        }
        let Some(section) = current.as_deref() else {
            return Err(ParseError::OrphanLine {
                line: start_line,
                text,
            });
        };
        doc.push(section, text);
    }

    if let Some((line, _)) = pending {
        return Err(ParseError::DanglingContinuation { line });
    }
    Ok(doc)
}

/// Parse a RouterOS script file into a [`CommandDocument`].
pub fn parse_file(path: &Path) -> Result<CommandDocument, ParseError> {
    let raw = fs::read_to_string(path)?;
    parse(&raw)
}

#[cfg(test)]
mod tests {
    use super::{parse, ParseError};

    #[test]
    fn joins_continuation_lines() {
        let doc = parse("/ip route\nadd dst-address=0.0.0.0/0 \\\n    gateway=1.1.1.1\n")
            .expect("parse");
        assert_eq!(
            doc.section("/ip route"),
            Some(&["add dst-address=0.0.0.0/0 gateway=1.1.1.1".to_string()][..])
        );
    }

    #[test]
    fn rejects_command_before_header() {
        let err = parse("add name=x\n/ip route\n").expect_err("should fail");
        match err {
            ParseError::OrphanLine { line, .. } => assert_eq!(line, 1),
            other => panic!("unexpected error variant: {other}"),
        }
    }

    #[test]
    fn reopened_section_appends() {
        let doc = parse("/ip route\nadd a\n/ip dns\nset b\n/ip route\nadd c\n").expect("parse");
        assert_eq!(doc.section_count(), 2);
        assert_eq!(doc.section("/ip route").map(<[String]>::len), Some(2));
    }

    #[test]
    fn comment_ending_in_backslash_does_not_continue() {
        let doc = parse("# note \\\n/ip route\nadd dst-address=0.0.0.0/0\n").expect("parse");
        assert_eq!(doc.keys().collect::<Vec<_>>(), vec!["/ip route"]);
        assert_eq!(
            doc.section("/ip route"),
            Some(&["add dst-address=0.0.0.0/0".to_string()][..])
        );
    }
}
