//! Terminal rendering of scan progress and results.

use leak_lines::FileReport;

/// Single-character status glyphs.
pub mod indicators {
    pub const ERROR: &str = "✖";
    pub const SUCCESS: &str = "✓";
    pub const WARNING: &str = "⚠";
    pub const INFO: &str = "ℹ";
    pub const BULLET: &str = "•";
}

/// Colour palette for terminal output.
pub mod colors {
    use console::Style;

    /// Cyan bold - section headers.
    pub const fn header() -> Style {
        Style::new().cyan().bold()
    }

    /// Green bold - clean results.
    pub const fn success() -> Style {
        Style::new().green().bold()
    }

    /// Yellow - rule ids and unattributed findings.
    pub const fn warning() -> Style {
        Style::new().yellow()
    }

    /// Red bold - secrets found and failures.
    pub const fn error() -> Style {
        Style::new().red().bold()
    }

    /// Magenta italic - file names.
    pub const fn file() -> Style {
        Style::new().magenta().italic()
    }
}

/// Process exit codes.
pub mod exit {
    /// Secrets were found in the staged changes.
    pub const FINDINGS: u8 = 1;
    /// The scan could not be completed.
    pub const ERROR: u8 = 2;
}

const INDENT: &str = "  ";

/// The list of staged files about to be scanned
pub fn file_list(files: &[String]) -> String {
    if files.is_empty() {
        return "No staged files found".to_string();
    }

    let mut out = String::from("Files:");
    for file in files {
        out.push_str(&format!("\n{INDENT}- {}", colors::file().apply_to(file)));
    }
    out
}

pub fn verifying(file: &str) -> String {
    format!(
        "{} {}",
        colors::header().apply_to(format!("{} Verifying file:", indicators::INFO)),
        colors::file().apply_to(file)
    )
}

/// The result block for one file
pub fn file_result(report: &FileReport) -> String {
    let file = colors::file().apply_to(&report.file);

    if !report.has_secrets() {
        return format!(
            "{} {file}",
            colors::success().apply_to(format!("{} No secrets found in file:", indicators::SUCCESS))
        );
    }

    let mut out = format!(
        "{} {file}",
        colors::error().apply_to(format!("{} Secrets found in file:", indicators::ERROR))
    );

    for located in &report.located {
        let leak = &located.leak;
        out.push_str(&format!(
            "\n{INDENT}{} Rule: {}",
            indicators::BULLET,
            colors::warning().apply_to(&leak.rule_id)
        ));
        out.push_str(&format!("\n{INDENT}  Secret: {}", leak.secret));
        out.push_str(&format!("\n{INDENT}  Line: {}", located.line));
        out.push_str(&format!("\n{INDENT}  Match: {}", leak.match_text));
        out.push_str(&format!("\n{INDENT}  Description: {}", leak.description));
    }

    if !report.unlocated.is_empty() {
        out.push_str(&format!(
            "\n{INDENT}{}",
            colors::warning().apply_to(format!(
                "{} {} finding(s) could not be attributed to a line",
                indicators::WARNING,
                report.unlocated.len()
            ))
        ));
    }

    out
}

pub fn summary(has_secrets: bool) -> String {
    if has_secrets {
        colors::error()
            .apply_to(format!(
                "{} Secrets found in staged files. Please review and fix them before committing.",
                indicators::ERROR
            ))
            .to_string()
    } else {
        colors::success()
            .apply_to(format!(
                "{} No secrets found in staged files. You can proceed with the commit.",
                indicators::SUCCESS
            ))
            .to_string()
    }
}

pub fn error(message: &str) -> String {
    format!(
        "{} {}",
        colors::error().apply_to(indicators::ERROR),
        colors::error().apply_to(message)
    )
}
