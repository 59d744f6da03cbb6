//! Command-line interface module.
//!
//! This module handles CLI argument parsing for the unit test runner.
//! Only `-h`, `-p <version>` and `-a <version>` are accepted, with no long forms.

use clap::error::ErrorKind;
use clap::{ArgAction, CommandFactory, Parser};
use std::ffi::OsString;

/// Run an Ansible collection's unit tests through tox-ansible
#[derive(Parser, Debug)]
#[command(
    author,
    about,
    long_about = None,
    disable_help_flag = true,
    args_override_self = true
)]
pub struct Args {
    /// Print this help message and exit
    #[arg(short = 'h', action = ArgAction::Help)]
    #[allow(dead_code)]
    help: Option<bool>,

    /// Python version to test against.
    /// Defaults to the major.minor of the host interpreter.
    #[arg(short = 'p', value_name = "PYTHON_VERSION", allow_hyphen_values = true)]
    pub python_version: Option<String>,

    /// Ansible version to test against (e.g. stable-2.16)
    #[arg(short = 'a', value_name = "ANSIBLE_VERSION", allow_hyphen_values = true)]
    pub ansible_version: Option<String>,
}

/// Parses arguments in a single left-to-right pass.
///
/// The first item is the program name, as with [`std::env::args_os`].
/// Help is returned as an error of kind
/// [`ErrorKind::DisplayHelp`] with exit code 0; every other error is a
/// usage error with a non-zero exit code. A repeated `-p`/`-a` keeps its
/// last value.
///
/// A bare `--` is not an end-of-options marker here: unless it is the
/// value of `-p`/`-a` it is rejected like any other unknown argument.
///
/// # Arguments
/// * `args` - Program name followed by the raw arguments
pub fn parse_args<I, T>(args: I) -> Result<Args, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    reject_terminator(&args)?;
    Args::try_parse_from(args)
}

/// Scans the arguments the way clap will and fails on a free-standing `--`.
///
/// Stops at the first `-h` so help keeps winning over anything after it.
fn reject_terminator(args: &[OsString]) -> Result<(), clap::Error> {
    let mut value_pending = false;

    for arg in args.iter().skip(1) {
        if value_pending {
            value_pending = false;
            continue;
        }

        match arg.to_str() {
            Some("-p") | Some("-a") => value_pending = true,
            Some("-h") => break,
            Some("--") => {
                return Err(Args::command().error(
                    ErrorKind::UnknownArgument,
                    "unexpected argument '--' found",
                ));
            }
            _ => {}
        }
    }

    Ok(())
}
