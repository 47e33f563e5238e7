use std::fmt::{self, Display, Formatter};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A section-keyed RouterOS command collection.
///
/// Keys are command-tree paths such as `/ip firewall mangle`; each key owns
/// the ordered command lines that belong under it. Both the key order and
/// the line order inside a section are emission order, which matters for
/// firewall and routing precedence once the script is applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandDocument {
    sections: IndexMap<String, Vec<String>>,
}

impl CommandDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one line to `section`, creating the section on first use.
    pub fn push(&mut self, section: impl Into<String>, line: impl Into<String>) {
        self.sections
            .entry(section.into())
            .or_default()
            .push(line.into());
    }

    /// Append every line from `lines` to `section`.
    ///
    /// A section is only created when at least one line is appended.
    pub fn extend<I, S>(&mut self, section: impl Into<String>, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut lines = lines.into_iter().map(Into::into).peekable();
        if lines.peek().is_none() {
            return;
        }
        self.sections.entry(section.into()).or_default().extend(lines);
    }

    /// Register `section` with no lines if it is not present yet.
    ///
    /// The writer renders such a section as a bare header.
    pub fn declare(&mut self, section: impl Into<String>) {
        self.sections.entry(section.into()).or_default();
    }

    /// Remove sections that hold no lines, keeping the order of the rest.
    pub fn remove_empty_sections(&mut self) {
        self.sections.retain(|_, lines| !lines.is_empty());
    }

    /// Return the lines of `section`, if present.
    pub fn section(&self, section: &str) -> Option<&[String]> {
        self.sections.get(section).map(Vec::as_slice)
    }

    /// Iterate sections in emission order.
    pub fn sections(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.sections
            .iter()
            .map(|(key, lines)| (key.as_str(), lines.as_slice()))
    }

    /// Iterate section keys in emission order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Total number of command lines across all sections.
    pub fn line_count(&self) -> usize {
        self.sections.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Return true when `section` holds a line exactly equal to `line`.
    pub fn contains_line(&self, section: &str, line: &str) -> bool {
        self.section(section)
            .map(|lines| lines.iter().any(|l| l == line))
            .unwrap_or(false)
    }

    /// Merge `other` into `self` in place.
    ///
    /// Lines from `other` are appended after the existing lines of the same
    /// section; sections new to `self` are appended in `other`'s order.
    /// Literal duplicates are kept.
    pub fn absorb(&mut self, other: CommandDocument) {
        for (key, lines) in other.sections {
            self.sections.entry(key).or_default().extend(lines);
        }
    }

    pub(crate) fn sections_mut(&mut self) -> impl Iterator<Item = (&str, &mut Vec<String>)> {
        self.sections
            .iter_mut()
            .map(|(key, lines)| (key.as_str(), lines))
    }
}

impl Display for CommandDocument {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (key, lines) in &self.sections {
            writeln!(f, "{key}")?;
            for line in lines {
                writeln!(f, "{line}")?;
            }
        }
        Ok(())
    }
}

/// Merge two documents into a new one: `a`'s lines, then `b`'s lines, per section.
pub fn merge(a: &CommandDocument, b: &CommandDocument) -> CommandDocument {
    let mut out = a.clone();
    out.absorb(b.clone());
    out
}

/// Fold [`merge`] left to right over `docs`.
///
/// Argument order is emission order.
pub fn merge_many<I>(docs: I) -> CommandDocument
where
    I: IntoIterator<Item = CommandDocument>,
{
    docs.into_iter()
        .fold(CommandDocument::new(), |mut acc, doc| {
            acc.absorb(doc);
            acc
        })
}

#[cfg(test)]
mod tests {
    use super::{merge, merge_many, CommandDocument};

    fn doc(pairs: &[(&str, &str)]) -> CommandDocument {
        let mut out = CommandDocument::new();
        for (section, line) in pairs {
            out.push(*section, *line);
        }
        out
    }

    #[test]
    fn merge_concatenates_per_section_in_argument_order() {
        let a = doc(&[("/ip route", "add a"), ("/ip dns", "set x")]);
        let b = doc(&[("/ip route", "add b"), ("/routing table", "add t")]);

        let merged = merge(&a, &b);
        assert_eq!(
            merged.keys().collect::<Vec<_>>(),
            vec!["/ip route", "/ip dns", "/routing table"]
        );
        assert_eq!(
            merged.section("/ip route"),
            Some(&["add a".to_string(), "add b".to_string()][..])
        );
    }

    #[test]
    fn merge_keeps_literal_duplicates() {
        let a = doc(&[("/ip route", "add same")]);
        let merged = merge(&a, &a);
        assert_eq!(merged.section("/ip route").map(<[String]>::len), Some(2));
    }

    #[test]
    fn merge_many_of_nothing_is_empty() {
        assert!(merge_many(Vec::new()).is_empty());
    }

    #[test]
    fn declared_sections_fix_order_until_pruned() {
        let mut d = CommandDocument::new();
        d.declare("/routing table");
        d.declare("/ip route");
        d.declare("/ip dns");
        d.push("/ip route", "add r");
        d.push("/routing table", "add t");
        d.remove_empty_sections();
        assert_eq!(d.keys().collect::<Vec<_>>(), vec!["/routing table", "/ip route"]);
    }

    #[test]
    fn extend_with_no_lines_does_not_create_section() {
        let mut d = CommandDocument::new();
        d.extend("/ip route", Vec::<String>::new());
        assert!(d.is_empty());
    }
}
