//! Running gitleaks over a filtered diff and reading back its findings.
//!
//! The scanner writes a JSON report to a temporary file that lives only as
//! long as one file scan (see [`ReportPattern::create`]).

use crate::ConfigError;
use error_set::error_set;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::process::{Command, Stdio};
use std::str::FromStr;
use std::thread;
use tempfile::NamedTempFile;
use tracing::debug;

error_set! {
    /// Errors from running the secret scanner and reading its report
    ScannerError := {
        #[display("Failed to create report file: {message}")]
        ReportCreateFailed { message: String },
        #[display("Failed to spawn {program}: {message}")]
        SpawnFailed { program: String, message: String },
        #[display("Failed to get stdin handle for {program}")]
        StdinFailed { program: String },
        #[display("Failed to write diff to {program}: {message}")]
        WriteFailed { program: String, message: String },
        #[display("Failed to wait for {program}: {message}")]
        WaitFailed { program: String, message: String },
        #[display("{program} failed ({status}): {stderr}")]
        ExitError { program: String, status: String, stderr: String },
        #[display("Failed to read report {path}: {message}")]
        ReportReadFailed { path: String, message: String },
        #[display("Failed to parse report {path}: {message}")]
        ReportParseFailed { path: String, message: String },
    }
}

/// One finding from the gitleaks JSON report.
///
/// Every field is optional so reports from other gitleaks versions still
/// deserialize. Only [`Leak::match_text`] (or [`Leak::secret`] when the match
/// is empty) is used to locate the finding; the rest is passed through.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Leak {
    #[serde(rename = "RuleID")]
    pub rule_id: String,
    pub description: String,
    pub start_line: u32,
    pub end_line: u32,
    pub start_column: u32,
    pub end_column: u32,
    #[serde(rename = "Match")]
    pub match_text: String,
    pub secret: String,
    pub file: String,
    pub commit: String,
    pub author: String,
    pub email: String,
    pub date: String,
    pub message: String,
    pub tags: Vec<String>,
    pub fingerprint: String,
}

impl Leak {
    /// Text to search for in the changed lines
    pub fn needle(&self) -> &str {
        if self.match_text.is_empty() {
            &self.secret
        } else {
            &self.match_text
        }
    }
}

/// Parse the text of a gitleaks JSON report.
///
/// An empty report means no findings.
pub fn parse_report(text: &str) -> Result<Vec<Leak>, serde_json::Error> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(text)
}

/// Read and parse the report gitleaks wrote to `path`
pub fn read_report(path: &Path) -> Result<Vec<Leak>, ScannerError> {
    let text = fs::read_to_string(path).map_err(|e| ScannerError::ReportReadFailed {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    parse_report(&text).map_err(|e| ScannerError::ReportParseFailed {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// The gitleaks executable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gitleaks {
    program: String,
}

impl Default for Gitleaks {
    fn default() -> Self {
        Self::new("gitleaks")
    }
}

impl Gitleaks {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Scan `diff` from stdin, writing the JSON report to `report`.
    ///
    /// gitleaks exits with 1 when it finds leaks; that is not a failure.
    /// A failing exit status is reported ahead of any error writing stdin.
    pub fn scan(&self, diff: &str, report: &Path) -> Result<(), ScannerError> {
        use std::io::Write;

        debug!(program = %self.program, report = %report.display(), "running secret scanner");

        let mut child = Command::new(&self.program)
            .arg("stdin")
            .arg("-f=json")
            .arg(format!("-r={}", report.display()))
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ScannerError::SpawnFailed {
                program: self.program.clone(),
                message: e.to_string(),
            })?;

        let mut stdin = child.stdin.take().ok_or_else(|| ScannerError::StdinFailed {
            program: self.program.clone(),
        })?;

        // stderr is drained by wait_with_output while the writer feeds stdin
        let (written, output) = thread::scope(|s| {
            let writer = s.spawn(move || stdin.write_all(diff.as_bytes()));
            let output = child.wait_with_output();
            (writer.join(), output)
        });

        let output = output.map_err(|e| ScannerError::WaitFailed {
            program: self.program.clone(),
            message: e.to_string(),
        })?;

        if !matches!(output.status.code(), Some(0 | 1)) {
            return Err(ScannerError::ExitError {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        match written {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(ScannerError::WriteFailed {
                program: self.program.clone(),
                message: e.to_string(),
            }),
            Err(_) => Err(ScannerError::WriteFailed {
                program: self.program.clone(),
                message: "stdin writer panicked".to_string(),
            }),
        }
    }
}

/// Naming pattern for report files, such as `gitleaks-*.json`.
///
/// The text before the first `*` becomes the file name prefix and the rest
/// the suffix; the random part goes where the `*` was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPattern {
    prefix: String,
    suffix: String,
}

impl Default for ReportPattern {
    fn default() -> Self {
        Self {
            prefix: "gitleaks-".to_string(),
            suffix: ".json".to_string(),
        }
    }
}

impl FromStr for ReportPattern {
    type Err = ConfigError;

    fn from_str(pattern: &str) -> Result<Self, Self::Err> {
        if pattern.trim().is_empty() {
            return Err(ConfigError::EmptyReportPattern);
        }

        let (prefix, suffix) = match pattern.split_once('*') {
            Some((prefix, rest)) => (prefix.to_string(), rest.replace('*', "")),
            None => (pattern.to_string(), String::new()),
        };

        Ok(Self { prefix, suffix })
    }
}

impl ReportPattern {
    /// Create an empty report file in the system temp directory.
    ///
    /// The file is removed when the returned handle is dropped.
    pub fn create(&self) -> Result<NamedTempFile, ScannerError> {
        tempfile::Builder::new()
            .prefix(&self.prefix)
            .suffix(&self.suffix)
            .tempfile()
            .map_err(|e| ScannerError::ReportCreateFailed {
                message: e.to_string(),
            })
    }
}
