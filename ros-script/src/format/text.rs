use crate::diff::result::SectionDiff;

/// Format diff entries as plain text.
pub fn format_text(entries: &[SectionDiff]) -> String {
    let mut lines = Vec::with_capacity(entries.len() + 1);
    for entry in entries {
        match entry {
            SectionDiff::Identical { section } => lines.push(format!("= {section}")),
            SectionDiff::Modified {
                section,
                removed,
                added,
            } => {
                if removed.is_empty() && added.is_empty() {
                    lines.push(format!("~ {section} (reordered)"));
                    continue;
                }
                lines.push(format!("~ {section}"));
                lines.extend(removed.iter().map(|l| format!("  - {l}")));
                lines.extend(added.iter().map(|l| format!("  + {l}")));
            }
            SectionDiff::OnlyLeft { section, lines: l } => {
                lines.push(format!("- {section} ({} lines)", l.len()));
            }
            SectionDiff::OnlyRight { section, lines: l } => {
                lines.push(format!("+ {section} ({} lines)", l.len()));
            }
        }
    }
    lines.join("\n")
}

/// Format a simple summary of diff counts.
pub fn format_summary(entries: &[SectionDiff]) -> String {
    let mut identical = 0;
    let mut modified = 0;
    let mut only_left = 0;
    let mut only_right = 0;

    for entry in entries {
        match entry {
            SectionDiff::Identical { .. } => identical += 1,
            SectionDiff::Modified { .. } => modified += 1,
            SectionDiff::OnlyLeft { .. } => only_left += 1,
            SectionDiff::OnlyRight { .. } => only_right += 1,
        }
    }

    format!("identical={identical} modified={modified} only_left={only_left} only_right={only_right}")
}
