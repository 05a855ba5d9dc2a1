use error_set::error_set;
use std::process::Command;
use tracing::{debug, trace, warn};

pub mod diff;
pub mod gitleaks;
pub mod locate;

pub use diff::{ChangedLine, FileDiff, FilteredDiff, build_filtered_diff, extract_changed_lines};
pub use gitleaks::{Gitleaks, Leak, ReportPattern, ScannerError};
pub use locate::locate;

error_set! {
    /// Top-level error for leak-lines operations
    LeakScanError := {
        ScannerError(ScannerError),
    } || GitCommandError || ConfigError

    /// Errors from git command execution
    GitCommandError := {
        #[display("Failed to run git diff: {message}")]
        DiffFailed { message: String },
        #[display("git diff failed: {stderr}")]
        DiffExitError { stderr: String },
        #[display("Invalid UTF-8 in git diff output: {message}")]
        InvalidUtf8 { message: String },
    }

    /// Invalid scanner configuration
    ConfigError := {
        #[display("Report file pattern cannot be empty")]
        EmptyReportPattern,
    }
}

/// Configuration for a [`LeakScanner`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanConfig {
    pub gitleaks: Gitleaks,
    pub report_pattern: ReportPattern,
}

/// A finding attributed to a line of the staged file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedLeak {
    pub line: u32,
    pub leak: Leak,
}

/// Scan result for one staged file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileReport {
    pub file: String,
    pub located: Vec<LocatedLeak>,
    /// Findings whose text could not be traced back to a changed line
    pub unlocated: Vec<Leak>,
}

impl FileReport {
    /// Attribute scanner findings to the changed lines of `raw_diff`
    ///
    /// # Examples
    /// ```
    /// # use leak_lines::{FileReport, Leak};
    /// let diff = "@@ -0,0 +1,2 @@\n+name=demo\n+token=ghp_123\n";
    /// let leak = Leak { match_text: "token=ghp_123".to_string(), ..Leak::default() };
    ///
    /// let report = FileReport::attribute("app.env", diff, vec![leak]);
    /// assert_eq!(report.located[0].line, 2);
    /// ```
    pub fn attribute(file: &str, raw_diff: &str, leaks: Vec<Leak>) -> Self {
        let changed = diff::extract_changed_lines(raw_diff);
        let mut report = FileReport {
            file: file.to_string(),
            ..FileReport::default()
        };

        for leak in leaks {
            match locate::locate(&changed, leak.needle()) {
                Some(line) => {
                    trace!(file, line, rule = %leak.rule_id, "located finding");
                    report.located.push(LocatedLeak { line, leak });
                }
                None => {
                    warn!(file, rule = %leak.rule_id, "finding could not be attributed to a line");
                    report.unlocated.push(leak);
                }
            }
        }

        report
    }

    /// Whether the scanner reported anything for this file, located or not
    pub fn has_secrets(&self) -> bool {
        !self.located.is_empty() || !self.unlocated.is_empty()
    }
}

/// Scan results for every staged file, in scan order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub files: Vec<FileReport>,
}

impl ScanReport {
    pub fn has_secrets(&self) -> bool {
        self.files.iter().any(FileReport::has_secrets)
    }
}

/// Main interface for scanning staged changes
pub struct LeakScanner<'a> {
    repo_path: &'a str,
    config: ScanConfig,
}

impl<'a> LeakScanner<'a> {
    /// Create a new LeakScanner for the given repository path
    pub fn new(repo_path: &'a str, config: ScanConfig) -> Self {
        Self { repo_path, config }
    }

    /// Scan every staged file, stopping at the first error
    ///
    /// # Examples
    /// ```no_run
    /// # use leak_lines::{LeakScanner, ScanConfig};
    /// let scanner = LeakScanner::new(".", ScanConfig::default());
    /// let report = scanner.scan().unwrap();
    /// if report.has_secrets() {
    ///     std::process::exit(1);
    /// }
    /// ```
    pub fn scan(&self) -> Result<ScanReport, LeakScanError> {
        let files = self
            .staged_files()?
            .iter()
            .map(|file| self.scan_file(file))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ScanReport { files })
    }

    /// Scan the staged changes of one file.
    ///
    /// Only genuinely new lines are handed to the scanner. Its report file
    /// is removed before this returns, on success and on error.
    pub fn scan_file(&self, file: &str) -> Result<FileReport, LeakScanError> {
        let raw_diff = self.staged_diff(file)?;
        let filtered = diff::FilteredDiff::build(&raw_diff, file);
        debug!(file, new_lines = filtered.lines.len(), "filtered staged diff");

        let report_file = self.config.report_pattern.create()?;
        self.config
            .gitleaks
            .scan(&filtered.to_string(), report_file.path())?;
        let leaks = gitleaks::read_report(report_file.path())?;
        debug!(file, findings = leaks.len(), "scanner finished");

        Ok(FileReport::attribute(file, &raw_diff, leaks))
    }

    /// List paths of files staged for commit
    pub fn staged_files(&self) -> Result<Vec<String>, GitCommandError> {
        let output = self.git(&["diff", "--staged", "--name-only", "-z", "--no-color"])?;

        Ok(output
            .split('\0')
            .filter(|file| !file.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Get the staged diff of one file with zero context lines
    pub fn staged_diff(&self, file: &str) -> Result<String, GitCommandError> {
        self.git(&[
            "diff",
            "--staged",
            "--no-ext-diff",
            "--no-color",
            "--no-prefix",
            "-U0",
            "--",
            file,
        ])
    }

    /// Run a git command in the repository and return its stdout
    fn git(&self, args: &[&str]) -> Result<String, GitCommandError> {
        let output = Command::new("git")
            .arg("-C")
            .arg(self.repo_path)
            .args(args)
            .output()
            .map_err(|e| GitCommandError::DiffFailed {
                message: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GitCommandError::DiffExitError {
                stderr: stderr.into_owned(),
            });
        }

        String::from_utf8(output.stdout).map_err(|e| GitCommandError::InvalidUtf8 {
            message: e.to_string(),
        })
    }
}
