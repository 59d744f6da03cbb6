//! Host Python interpreter queries.
//!
//! The default Python version of a run is the major.minor of whatever
//! interpreter is installed on the host. The lookup sits behind
//! [`VersionProvider`] so the resolver can be exercised with a fixed value.

use crate::error::{RunnerError, RunnerResult};
use regex::Regex;
use std::process::Command;
use std::sync::LazyLock;

static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\.(\d+)").expect("Invalid regex pattern"));

/// Source of the fallback Python version.
pub trait VersionProvider {
    /// Returns the host interpreter version as `major.minor`.
    fn python_version(&self) -> RunnerResult<String>;
}

/// Asks a real interpreter for its version via `--version`.
pub struct InterpreterVersion {
    program: String,
}

impl InterpreterVersion {
    pub fn new(program: impl Into<String>) -> Self {
        InterpreterVersion {
            program: program.into(),
        }
    }
}

impl VersionProvider for InterpreterVersion {
    fn python_version(&self) -> RunnerResult<String> {
        tracing::debug!(program = %self.program, "querying interpreter version");

        let output = Command::new(&self.program)
            .arg("--version")
            .output()
            .map_err(|source| RunnerError::InterpreterUnavailable {
                program: self.program.clone(),
                source,
            })?;

        // Python 2 and some builds report on stderr
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        let reported = if stdout.trim().is_empty() {
            stderr.trim().to_string()
        } else {
            stdout.trim().to_string()
        };

        match major_minor(&reported) {
            Some(version) => {
                tracing::debug!(%reported, %version, "interpreter version detected");
                Ok(version)
            }
            None => Err(RunnerError::UnrecognizedInterpreterVersion {
                program: self.program.clone(),
                output: reported,
            }),
        }
    }
}

/// Extracts `major.minor` from a version report.
///
/// # Examples
/// ```text
/// "Python 3.11.4"   -> Some("3.11")
/// "3.13.0rc2"       -> Some("3.13")
/// "Python"          -> None
/// ```
pub fn major_minor(reported: &str) -> Option<String> {
    let captures = VERSION_RE.captures(reported)?;

    Some(format!("{}.{}", &captures[1], &captures[2]))
}
