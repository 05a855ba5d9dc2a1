use super::line::{RawLine, classify, split_lines};
use super::reformat::RemovedLineSet;
use std::fmt;

/// A synthetic single-hunk diff holding only genuinely new added lines.
///
/// This is what the secret scanner sees. The hunk claims `+1,N` so the
/// scanner gets a valid diff; real line numbers come from
/// [`extract_changed_lines`](super::extract_changed_lines), never from this
/// header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredDiff<'a> {
    pub file_name: &'a str,
    /// Added lines, verbatim and without the `+` marker
    pub lines: Vec<&'a str>,
}

impl<'a> FilteredDiff<'a> {
    /// Keep the added lines of `raw_diff` that are not reformatted removed lines
    #[must_use]
    pub fn build(raw_diff: &'a str, file_name: &'a str) -> Self {
        let removed = RemovedLineSet::from_diff(raw_diff);

        let lines = split_lines(raw_diff)
            .filter_map(|line| match classify(line) {
                RawLine::Added(content) if !removed.is_reformatted(content) => Some(content),
                _ => None,
            })
            .collect();

        Self { file_name, lines }
    }
}

impl fmt::Display for FilteredDiff<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "diff --git a/{} b/{}", self.file_name, self.file_name)?;
        writeln!(f, "index 0000000..1111111 100644")?;
        writeln!(f, "--- a/{}", self.file_name)?;
        writeln!(f, "+++ b/{}", self.file_name)?;

        if self.lines.is_empty() {
            return Ok(());
        }

        writeln!(f, "@@ -0,0 +1,{} @@", self.lines.len())?;
        for line in &self.lines {
            writeln!(f, "+{}", line)?;
        }

        Ok(())
    }
}

/// Render the filtered diff for `raw_diff` as text for the secret scanner
pub fn build_filtered_diff(raw_diff: &str, file_name: &str) -> String {
    FilteredDiff::build(raw_diff, file_name).to_string()
}
