use super::hunk::Hunk;
use super::line::{DiffLine, Numbered, NumberedLines};

/// A parsed diff for a single file.
///
/// Built once per scanned file and only read afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    pub file_name: String,
    pub hunks: Vec<Hunk>,
}

impl FileDiff {
    /// Parse unified diff text for one file.
    ///
    /// This is a lenient parser: it never fails. Text before the first hunk
    /// header is ignored, and a hunk header whose `+` range cannot be read
    /// still opens a hunk, continuing from the current line counter.
    ///
    /// # Examples
    ///
    /// ```
    /// use leak_lines::diff::FileDiff;
    ///
    /// let diff = "--- a/app.env\n+++ b/app.env\n@@ -1,2 +1,3 @@\n line1\n+token=abc\n line2\n";
    /// let parsed = FileDiff::parse(diff, "app.env");
    ///
    /// let added: Vec<_> = parsed.added_lines().collect();
    /// assert_eq!(added.len(), 1);
    /// assert_eq!(added[0].number, Some(2));
    /// assert_eq!(added[0].content, "token=abc");
    /// ```
    #[must_use]
    pub fn parse(text: &str, file_name: &str) -> Self {
        let mut hunks = Vec::new();
        let mut current: Option<Hunk> = None;

        for numbered in NumberedLines::new(text) {
            match numbered {
                Numbered::HunkStart(start) => {
                    if let Some(hunk) = current.replace(Hunk::new(start)) {
                        hunks.push(hunk);
                    }
                }
                Numbered::Line {
                    kind,
                    number,
                    content,
                } => {
                    if let Some(hunk) = current.as_mut() {
                        hunk.lines.push(DiffLine {
                            kind,
                            number,
                            content: content.to_string(),
                        });
                    }
                }
            }
        }

        hunks.extend(current);

        FileDiff {
            file_name: file_name.to_string(),
            hunks,
        }
    }

    /// All added lines across hunks, in diff order
    pub fn added_lines(&self) -> impl Iterator<Item = &DiffLine> {
        self.hunks.iter().flat_map(Hunk::added)
    }
}
