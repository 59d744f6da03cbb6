//! Error types for the unit test runner

use std::io;
use thiserror::Error;

/// Exit status used when a program could not be found, as a shell would.
pub const EXIT_NOT_FOUND: i32 = 127;
/// Exit status used when a program exists but could not be executed.
pub const EXIT_NOT_EXECUTABLE: i32 = 126;
/// Base added to a signal number, as a shell reports a killed child.
const SIGNAL_EXIT_BASE: i32 = 128;

#[derive(Error, Debug)]
pub enum RunnerError {
    /// Invalid option, stray argument or missing option value
    #[error(transparent)]
    Usage(#[from] clap::Error),

    #[error("Failed to run the Python interpreter '{program}': {source}")]
    InterpreterUnavailable {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("Could not read a major.minor version from '{program} --version' output: '{output}'")]
    UnrecognizedInterpreterVersion { program: String, output: String },

    #[error("Failed to start the {step} step ('{program}'): {source}")]
    Spawn {
        step: String,
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("The {step} step failed with {}", describe_status(.code, .signal))]
    StepFailed {
        step: String,
        code: Option<i32>,
        signal: Option<i32>,
    },
}

fn describe_status(code: &Option<i32>, signal: &Option<i32>) -> String {
    match (code, signal) {
        (Some(code), _) => format!("exit code {}", code),
        (None, Some(signal)) => format!("signal {}", signal),
        (None, None) => String::from("a termination signal"),
    }
}

impl RunnerError {
    /// Process exit status reported for this error.
    ///
    /// A failed step forwards the child's own exit code untouched; a child
    /// killed by a signal is reported as `128 + signal`.
    pub fn exit_code(&self) -> i32 {
        match self {
            RunnerError::Usage(err) => err.exit_code(),
            RunnerError::InterpreterUnavailable { .. } => 1,
            RunnerError::UnrecognizedInterpreterVersion { .. } => 1,
            RunnerError::Spawn { source, .. } => match source.kind() {
                io::ErrorKind::PermissionDenied => EXIT_NOT_EXECUTABLE,
                _ => EXIT_NOT_FOUND,
            },
            RunnerError::StepFailed { code, signal, .. } => code
                .or_else(|| signal.map(|sig| SIGNAL_EXIT_BASE + sig))
                .unwrap_or(1),
        }
    }
}

pub type RunnerResult<T> = Result<T, RunnerError>;
