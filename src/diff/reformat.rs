//! Detection of added lines that only re-wrap or re-indent removed content.
//!
//! A cosmetic edit shows up in a line-oriented diff as a removed line and an
//! added line with the same meaningful content. Those added lines must not be
//! reported as new secrets: the content was already there before the change.

use super::line::{RawLine, classify, split_lines};
use std::collections::HashSet;

const NO_NEWLINE_MARKER: &str = "\\ No newline at end of file";

/// Normalize line content for comparison.
///
/// Strips the "no newline" diff annotation and surrounding whitespace. Only
/// used for comparing lines; content shown to the user stays verbatim.
pub fn normalize_content(content: &str) -> String {
    content.replace(NO_NEWLINE_MARKER, "").trim().to_string()
}

/// Normalized content of every removed line in a diff.
///
/// Blank lines are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemovedLineSet {
    lines: HashSet<String>,
}

impl RemovedLineSet {
    /// Collect removed content from raw diff lines
    pub fn from_lines<'a, I>(lines: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let lines = lines
            .into_iter()
            .filter_map(|line| match classify(line) {
                RawLine::Removed(content) => Some(normalize_content(content)),
                _ => None,
            })
            .filter(|normalized| !normalized.is_empty())
            .collect();

        Self { lines }
    }

    /// Collect removed content from a whole diff text
    pub fn from_diff(text: &str) -> Self {
        Self::from_lines(split_lines(text))
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Whether `content` reappears, after normalization, among the removed lines.
    ///
    /// Content that normalizes to nothing never matches, so blank-line churn
    /// does not hide anything.
    pub fn is_reformatted(&self, content: &str) -> bool {
        let normalized = normalize_content(content);
        !normalized.is_empty() && self.lines.contains(&normalized)
    }
}

/// Build the [`RemovedLineSet`] for a sequence of raw diff lines
pub fn extract_removed_content<'a, I>(lines: I) -> RemovedLineSet
where
    I: IntoIterator<Item = &'a str>,
{
    RemovedLineSet::from_lines(lines)
}

/// Whether an added line's content is only a reformatted removed line
pub fn is_reformatted(content: &str, removed: &RemovedLineSet) -> bool {
    removed.is_reformatted(content)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_content() -> impl Strategy<Value = String> {
        prop::collection::vec(prop::char::range(' ', '~'), 0..20)
            .prop_map(|chars| chars.into_iter().collect())
    }

    proptest! {
        /// No removed-line set ever holds an empty entry
        #[test]
        fn removed_set_has_no_empty_entries(contents in prop::collection::vec(arb_content(), 0..20)) {
            let lines: Vec<String> = contents.iter().map(|c| format!("-{c}")).collect();
            let removed = extract_removed_content(lines.iter().map(String::as_str));

            prop_assert!(removed.lines.iter().all(|line| !line.is_empty()));
        }

        /// Whitespace around removed content does not change reformat detection
        #[test]
        fn reindented_content_is_reformatted(
            content in "[a-zA-Z0-9_=]{1,20}",
            indent in "[ \t]{0,8}",
        ) {
            let removed = extract_removed_content([format!("-{content}").as_str()]);

            let reindented = format!("{indent}{content}");
            prop_assert!(removed.is_reformatted(&reindented));
        }
    }
}
