//! Textual compaction of `add` runs into option-list syntax.
//!
//! RouterOS accepts comma-separated values for a handful of options
//! (`dst-port=22,8291`, `dns-servers=1.1.1.1,9.9.9.9`). When consecutive
//! `add` lines differ only in the value of such an option, placed last on the
//! line, they can be written as one line without changing what the router
//! ends up with.

use crate::document::CommandDocument;

/// Options whose values RouterOS accepts as comma-separated lists.
pub const LIST_OPTIONS: &[&str] = &[
    "dst-port",
    "src-port",
    "port",
    "dns-servers",
    "allowed-address",
    "servers",
    "eap-methods",
];

/// Shorten every section with the default [`LIST_OPTIONS`].
pub fn shorten(doc: &CommandDocument) -> CommandDocument {
    shorten_with(doc, LIST_OPTIONS)
}

/// Shorten every section, folding only options named in `list_options`.
///
/// Line order is preserved. Lines that are literally identical, or whose
/// value is already present in the accumulated list, are left as-is.
pub fn shorten_with(doc: &CommandDocument, list_options: &[&str]) -> CommandDocument {
    let mut out = doc.clone();
    for (_, lines) in out.sections_mut() {
        *lines = shorten_lines(lines, list_options);
    }
    out
}

fn shorten_lines(lines: &[String], list_options: &[&str]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    for line in lines {
        if let Some(prev) = out.last_mut() {
            if let Some(folded) = fold_pair(prev, line, list_options) {
                *prev = folded;
                continue;
            }
        }
        out.push(line.clone());
    }
    out
}

fn fold_pair(prev: &str, next: &str, list_options: &[&str]) -> Option<String> {
    let (prev_prefix, prev_key, prev_value) = split_last_option(prev)?;
    let (next_prefix, next_key, next_value) = split_last_option(next)?;
    if prev_prefix != next_prefix || prev_key != next_key {
        return None;
    }
    if !list_options.contains(&prev_key) {
        return None;
    }
    if prev_value.split(',').any(|v| v == next_value) {
        return None;
    }
    Some(format!("{prev_prefix}{prev_key}={prev_value},{next_value}"))
}

/// Split an `add` line into (text before the last option, key, value).
fn split_last_option(line: &str) -> Option<(&str, &str, &str)> {
    if !line.starts_with("add ") {
        return None;
    }
    let (start, end) = token_spans(line).pop()?;
    // `add` alone has no options to fold.
    if start == 0 {
        return None;
    }
    let token = &line[start..end];
    let (key, value) = token.split_once('=')?;
    if key.is_empty() || value.is_empty() || value.contains('"') {
        return None;
    }
    Some((&line[..start], key, value))
}

/// Byte spans of whitespace-separated tokens, treating double-quoted runs
/// (with backslash escapes) as part of a single token.
pub fn token_spans(line: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start: Option<usize> = None;
    let mut in_quotes = false;
    let mut escaped = false;

    for (idx, ch) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_quotes => escaped = true,
            '"' => {
                in_quotes = !in_quotes;
                start.get_or_insert(idx);
            }
            c if c.is_whitespace() && !in_quotes => {
                if let Some(s) = start.take() {
                    spans.push((s, idx));
                }
            }
            _ => {
                start.get_or_insert(idx);
            }
        }
    }
    if let Some(s) = start {
        spans.push((s, line.len()));
    }
    spans
}
