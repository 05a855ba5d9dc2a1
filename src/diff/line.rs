//! Classification of single unified-diff lines.
//!
//! Every component that reads diff text goes through [`classify`], so the
//! rules for telling diff syntax apart from file content live in one place.
//! [`NumberedLines`] layers the new-file line counter on top of it.

use nom::{
    IResult, Parser,
    bytes::complete::{tag, take_till1},
    character::complete::{digit1, space1},
    combinator::{map_res, opt},
};

/// Role of a line inside a hunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffLineKind {
    Context,
    Added,
    Removed,
    /// File-level diff syntax (`diff`, `index`, `---`, `+++`) met inside a hunk
    Header,
}

/// One line inside a hunk.
///
/// `number` is the position in the new file. It is only set for
/// [`DiffLineKind::Context`] and [`DiffLineKind::Added`] lines: removed
/// content does not exist in the new file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    pub kind: DiffLineKind,
    pub number: Option<u32>,
    pub content: String,
}

/// Syntactic role of a raw diff line, with its leading marker stripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawLine<'a> {
    /// `@@ -a,b +c,d @@` with the parsed new-file start, if readable
    HunkHeader(Option<u32>),
    /// `diff --git`, `index`, `---` and `+++` lines
    FileHeader,
    Added(&'a str),
    Removed(&'a str),
    Context(&'a str),
    Blank,
}

const FILE_HEADER_PREFIXES: [&str; 4] = ["+++", "---", "diff", "index"];

/// Classify one line of unified-diff text.
///
/// # Examples
///
/// ```
/// use leak_lines::diff::{RawLine, classify};
///
/// assert_eq!(classify("@@ -1,2 +10,5 @@"), RawLine::HunkHeader(Some(10)));
/// assert_eq!(classify("+token=abc"), RawLine::Added("token=abc"));
/// assert_eq!(classify("+++ b/config.env"), RawLine::FileHeader);
/// assert_eq!(classify(" unchanged"), RawLine::Context("unchanged"));
/// ```
pub fn classify(line: &str) -> RawLine<'_> {
    if line.starts_with("@@") {
        return RawLine::HunkHeader(parse_hunk_start(line));
    }
    if FILE_HEADER_PREFIXES
        .iter()
        .any(|prefix| line.starts_with(prefix))
    {
        return RawLine::FileHeader;
    }
    if let Some(content) = line.strip_prefix('+') {
        return RawLine::Added(content);
    }
    if let Some(content) = line.strip_prefix('-') {
        return RawLine::Removed(content);
    }
    if line.is_empty() {
        return RawLine::Blank;
    }
    RawLine::Context(line.strip_prefix(' ').unwrap_or(line))
}

/// Split diff text on `\n` only.
///
/// Unlike [`str::lines`], a `\r` before the newline is kept, so content
/// from CRLF files stays byte-exact. A trailing newline does not produce an
/// extra empty line.
pub fn split_lines(text: &str) -> std::str::Split<'_, char> {
    text.strip_suffix('\n').unwrap_or(text).split('\n')
}

/// Parse the new-file start line from a hunk header.
///
/// Accepts `@@ -old[,len] +new[,len] @@ ...`; the length is optional and so
/// is the `+` sign. Returns `None` for anything unreadable.
pub fn parse_hunk_start(header: &str) -> Option<u32> {
    new_range_start(header).ok().map(|(_, start)| start)
}

fn new_range_start(input: &str) -> IResult<&str, u32> {
    let (input, _) = (
        tag("@@"),
        space1,
        take_till1(|c: char| c.is_whitespace()),
        space1,
        opt(tag("+")),
    )
        .parse(input)?;
    map_res(digit1, |digits: &str| digits.parse::<u32>()).parse(input)
}

/// A line yielded by [`NumberedLines`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Numbered<'a> {
    /// A hunk header; the counter has been reset to this value
    HunkStart(u32),
    Line {
        kind: DiffLineKind,
        number: Option<u32>,
        content: &'a str,
    },
}

/// Walks diff text keeping the new-file line counter.
///
/// Hunk headers reset the counter, context and added lines take the current
/// value and advance it, removed and file header lines take no number.
/// Annotations such as `\ No newline at end of file` read as context and
/// advance the counter too. Lines before the first hunk header are skipped.
/// A header whose range cannot be read keeps the current counter, or starts
/// at 1 if no hunk was seen yet.
#[derive(Debug, Clone)]
pub struct NumberedLines<'a> {
    lines: std::str::Split<'a, char>,
    counter: Option<u32>,
}

impl<'a> NumberedLines<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: split_lines(text),
            counter: None,
        }
    }

    fn take_number(&mut self, current: u32) -> Option<u32> {
        self.counter = Some(current.saturating_add(1));
        Some(current)
    }
}

impl<'a> Iterator for NumberedLines<'a> {
    type Item = Numbered<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = self.lines.next()?;
            let raw = classify(line);

            if let RawLine::HunkHeader(start) = raw {
                let start = start.or(self.counter).unwrap_or(1);
                self.counter = Some(start);
                return Some(Numbered::HunkStart(start));
            }

            let Some(current) = self.counter else {
                continue;
            };

            let (kind, number, content) = match raw {
                RawLine::Added(content) => (DiffLineKind::Added, self.take_number(current), content),
                RawLine::Context(content) => {
                    (DiffLineKind::Context, self.take_number(current), content)
                }
                RawLine::Removed(content) => (DiffLineKind::Removed, None, content),
                RawLine::FileHeader => (DiffLineKind::Header, None, line),
                RawLine::Blank | RawLine::HunkHeader(_) => continue,
            };

            return Some(Numbered::Line {
                kind,
                number,
                content,
            });
        }
    }
}
