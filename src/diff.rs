// src/diff.rs

use difference::{Changeset, Difference};
use std::fmt;

/// One line that differs between the expected and the actual text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffLine {
    /// Present in the expected text only.
    Removed(String),
    /// Present in the actual text only.
    Added(String),
}

impl fmt::Display for DiffLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiffLine::Removed(line) => write!(f, "- {}", line),
            DiffLine::Added(line) => write!(f, "+ {}", line),
        }
    }
}

/// Line-based difference between two texts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextDiff {
    changes: Vec<DiffLine>,
}

impl TextDiff {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn changes(&self) -> &[DiffLine] {
        &self.changes
    }
}

impl fmt::Display for TextDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for change in &self.changes {
            writeln!(f, "{}", change)?;
        }
        Ok(())
    }
}

/// Diff `expected` against `actual` line by line.
pub fn diff_text(expected: &str, actual: &str) -> TextDiff {
    if expected == actual {
        return TextDiff::default();
    }

    // an empty text has no lines, not one empty line
    if expected.is_empty() || actual.is_empty() {
        let changes = if expected.is_empty() {
            actual.split('\n').map(|l| DiffLine::Added(l.to_string())).collect()
        } else {
            expected.split('\n').map(|l| DiffLine::Removed(l.to_string())).collect()
        };
        return TextDiff { changes };
    }

    let changeset = Changeset::new(expected, actual, "\n");
    let mut changes = Vec::new();
    for diff in changeset.diffs {
        match diff {
            Difference::Same(_) => {}
            Difference::Rem(block) => {
                changes.extend(block.split('\n').map(|l| DiffLine::Removed(l.to_string())))
            }
            Difference::Add(block) => {
                changes.extend(block.split('\n').map(|l| DiffLine::Added(l.to_string())))
            }
        }
    }
    TextDiff { changes }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_texts_have_no_changes() {
        let diff = diff_text("a\nb", "a\nb");
        assert!(diff.is_empty());
        assert_eq!(diff.to_string(), "");
    }

    #[test]
    fn changed_line_is_reported_both_ways() {
        let diff = diff_text("a\nb\nc", "a\nB\nc");
        assert_eq!(
            diff.changes(),
            &[
                DiffLine::Removed("b".to_string()),
                DiffLine::Added("B".to_string())
            ]
        );
        assert_eq!(diff.to_string(), "- b\n+ B\n");
    }

    #[test]
    fn extra_line_is_an_addition() {
        let diff = diff_text("a", "a\nz");
        assert!(!diff.is_empty());
        assert!(diff.changes().contains(&DiffLine::Added("z".to_string())));
        assert!(!diff
            .changes()
            .iter()
            .any(|c| matches!(c, DiffLine::Removed(_))));
    }

    #[test]
    fn empty_side_reports_only_the_other_lines() {
        assert_eq!(diff_text("", "x").changes(), &[DiffLine::Added("x".to_string())]);
        assert_eq!(
            diff_text("a\nb", "").changes(),
            &[
                DiffLine::Removed("a".to_string()),
                DiffLine::Removed("b".to_string())
            ]
        );
    }

    #[test]
    fn trailing_whitespace_counts() {
        assert!(!diff_text("x ", "x").is_empty());
    }
}
