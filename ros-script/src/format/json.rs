use crate::diff::result::SectionDiff;

/// Format diff entries as JSON.
pub fn format_json(entries: &[SectionDiff]) -> String {
    serde_json::to_string_pretty(entries).unwrap_or_else(|_| "[]".to_string())
}
