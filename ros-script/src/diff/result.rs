use serde::Serialize;

/// A single diff outcome for one script section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum SectionDiff {
    /// Section exists in both with the same lines in the same order.
    Identical { section: String },
    /// Section exists in both but its lines differ.
    Modified {
        section: String,
        removed: Vec<String>,
        added: Vec<String>,
    },
    /// Section only in the left input.
    OnlyLeft { section: String, lines: Vec<String> },
    /// Section only in the right input.
    OnlyRight { section: String, lines: Vec<String> },
}

impl SectionDiff {
    pub fn section(&self) -> &str {
        match self {
            SectionDiff::Identical { section }
            | SectionDiff::Modified { section, .. }
            | SectionDiff::OnlyLeft { section, .. }
            | SectionDiff::OnlyRight { section, .. } => section,
        }
    }
}
