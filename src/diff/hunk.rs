use super::line::{DiffLine, DiffLineKind};

/// A single hunk from a unified diff
///
/// `start_line` comes from the `+` range of the hunk header. Context and added
/// lines are numbered consecutively from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
    pub start_line: u32,
    pub lines: Vec<DiffLine>,
}

impl Hunk {
    pub fn new(start_line: u32) -> Self {
        Self {
            start_line,
            lines: Vec::new(),
        }
    }

    /// Lines of the given kind, in diff order
    pub fn lines_of(&self, kind: DiffLineKind) -> impl Iterator<Item = &DiffLine> {
        self.lines.iter().filter(move |line| line.kind == kind)
    }

    /// Added lines, in diff order
    pub fn added(&self) -> impl Iterator<Item = &DiffLine> {
        self.lines_of(DiffLineKind::Added)
    }
}
