use std::collections::HashMap;

use crate::diff::result::SectionDiff;
use crate::CommandDocument;

/// Configures section diff behavior.
#[derive(Debug, Clone, Default)]
pub struct DiffOptions {
    /// Include [`SectionDiff::Identical`] rows.
    pub include_identical: bool,
    /// Section keys to leave out of the comparison.
    pub ignore_sections: Vec<String>,
}

/// Diff two documents with default options.
pub fn diff(left: &CommandDocument, right: &CommandDocument) -> Vec<SectionDiff> {
    diff_with_options(left, right, &DiffOptions::default())
}

/// Diff two documents with custom options.
///
/// Rows follow the left document's section order, then sections only the
/// right document has, in its order.
pub fn diff_with_options(
    left: &CommandDocument,
    right: &CommandDocument,
    opts: &DiffOptions,
) -> Vec<SectionDiff> {
    let mut out = Vec::new();

    for (section, left_lines) in left.sections() {
        if should_ignore(section, opts) {
            continue;
        }
        match right.section(section) {
            None => out.push(SectionDiff::OnlyLeft {
                section: section.to_string(),
                lines: left_lines.to_vec(),
            }),
            Some(right_lines) if right_lines == left_lines => {
                if opts.include_identical {
                    out.push(SectionDiff::Identical {
                        section: section.to_string(),
                    });
                }
            }
            Some(right_lines) => out.push(SectionDiff::Modified {
                section: section.to_string(),
                removed: multiset_difference(left_lines, right_lines),
                added: multiset_difference(right_lines, left_lines),
            }),
        }
    }

    for (section, right_lines) in right.sections() {
        if should_ignore(section, opts) || left.section(section).is_some() {
            continue;
        }
        out.push(SectionDiff::OnlyRight {
            section: section.to_string(),
            lines: right_lines.to_vec(),
        });
    }

    out
}

fn should_ignore(section: &str, opts: &DiffOptions) -> bool {
    opts.ignore_sections.iter().any(|s| s == section)
}

/// Lines of `from` not matched by an equal line in `against`, counting
/// repeats, in `from` order.
fn multiset_difference(from: &[String], against: &[String]) -> Vec<String> {
    let mut budget: HashMap<&str, usize> = HashMap::new();
    for line in against {
        *budget.entry(line.as_str()).or_default() += 1;
    }
    from.iter()
        .filter(|line| match budget.get_mut(line.as_str()) {
            Some(n) if *n > 0 => {
                *n -= 1;
                false
            }
            _ => true,
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::multiset_difference;

    #[test]
    fn difference_counts_repeats() {
        let from = vec!["a".to_string(), "a".to_string(), "b".to_string()];
        let against = vec!["a".to_string()];
        assert_eq!(multiset_difference(&from, &against), vec!["a", "b"]);
    }
}
