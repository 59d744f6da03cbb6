//! Console output for the unit test runner.
//!
//! This module handles all user-facing reporting:
//! - Resolved Python/Ansible versions
//! - Pipeline step banners
//! - Final run status

use crate::error::RunnerError;
use crate::models::options::ResolvedOptions;
use crate::pipeline::Step;

/// Prints the versions the run will use.
///
/// # Arguments
/// * `options` - The resolved version pair
pub fn print_resolved_options(options: &ResolvedOptions) {
    println!("🐍 Python version: {}", options.python_version);
    println!("📦 Ansible version: {}", options.ansible_version);
}

/// Prints the banner shown before a pipeline step starts.
///
/// # Arguments
/// * `position` - 1-based index of the step
/// * `total` - Number of steps in the pipeline
/// * `step` - The step about to run
pub fn print_step_started(position: usize, total: usize, step: &Step) {
    println!("\n----------------------------------------");
    println!("▶️  [{}/{}] {}: {}", position, total, step.name, step);
}

/// Prints the final status line of a run.
pub fn print_run_succeeded(options: &ResolvedOptions) {
    println!("\n✅ Unit tests passed for '{}'", options.env_selector());
}

/// Reports a fatal error on stderr.
///
/// Usage errors are rendered by clap itself so that help and invalid
/// option messages keep clap's formatting.
pub fn print_error(err: &RunnerError) {
    match err {
        RunnerError::Usage(usage) => {
            // clap routes help to stdout and errors to stderr
            let _ = usage.print();
        }
        other => eprintln!("\n❗ {}", other),
    }
}
