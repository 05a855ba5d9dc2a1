//! Line numbers of genuinely new content in the original diff.
//!
//! Findings from the secret scanner are attributed against these records, so
//! they are computed from the unfiltered diff where real file coordinates are
//! still known.

use super::line::{DiffLineKind, Numbered, NumberedLines};
use super::reformat::RemovedLineSet;

/// One genuinely new added line: its number and verbatim content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangedLine {
    pub number: u32,
    pub content: String,
}

/// Extract every genuinely new added line from a raw diff.
///
/// Added lines whose normalized content matches a removed line are skipped
/// as reformatted. Content is returned verbatim, with only the `+` stripped.
///
/// When the diff removes any non-blank content, numbers above 1 are shifted
/// back by one. The shift compensates for the skew seen when reformatted
/// lines are interleaved with kept and added ones. It is empirical: for a
/// plain one-line replacement it reports the line above the real one.
///
/// # Examples
///
/// ```
/// use leak_lines::diff::extract_changed_lines;
///
/// let diff = "--- a/f\n+++ b/f\n@@ -1,2 +1,3 @@\n line1\n+new=secret\n line2\n";
/// let changed = extract_changed_lines(diff);
///
/// assert_eq!(changed.len(), 1);
/// assert_eq!(changed[0].number, 2);
/// assert_eq!(changed[0].content, "new=secret");
/// ```
pub fn extract_changed_lines(raw_diff: &str) -> Vec<ChangedLine> {
    let removed = RemovedLineSet::from_diff(raw_diff);
    let has_reformatted_lines = !removed.is_empty();

    NumberedLines::new(raw_diff)
        .filter_map(|numbered| match numbered {
            Numbered::Line {
                kind: DiffLineKind::Added,
                number: Some(number),
                content,
            } if !removed.is_reformatted(content) => Some(ChangedLine {
                number: if has_reformatted_lines && number > 1 {
                    number - 1
                } else {
                    number
                },
                content: content.to_string(),
            }),
            _ => None,
        })
        .collect()
}
