//! Unified-diff analysis for one staged file.
//!
//! Two views are built from the same raw diff text:
//!
//! - [`FilteredDiff`] keeps only genuinely new added lines and is what the
//!   secret scanner inspects.
//! - [`extract_changed_lines`] records the same lines with their real line
//!   numbers, which findings are later attributed against.
//!
//! Added lines that merely re-indent or re-wrap a removed line are excluded
//! from both (see [`RemovedLineSet`]).

pub mod changes;
pub mod file;
pub mod filter;
pub mod hunk;
pub mod line;
pub mod reformat;

pub use changes::{ChangedLine, extract_changed_lines};
pub use file::FileDiff;
pub use filter::{FilteredDiff, build_filtered_diff};
pub use hunk::Hunk;
pub use line::{
    DiffLine, DiffLineKind, Numbered, NumberedLines, RawLine, classify, parse_hunk_start, split_lines,
};
pub use reformat::{RemovedLineSet, extract_removed_content, is_reformatted, normalize_content};
