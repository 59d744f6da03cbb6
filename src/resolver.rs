//! Turns parsed flags into a [`ResolvedOptions`].

use crate::config::RunnerConfig;
use crate::error::RunnerResult;
use crate::models::options::ResolvedOptions;
use crate::python::VersionProvider;
use crate::ui::cli::Args;

/// Fills in every version the flags left out.
///
/// The provider is only consulted when `-p` was not given, so an explicit
/// Python version never requires a working interpreter on the host.
///
/// # Arguments
/// * `args` - Parsed command-line flags
/// * `config` - Runner configuration holding the Ansible default
/// * `provider` - Source of the host interpreter version
pub fn resolve_options(
    args: &Args,
    config: &RunnerConfig,
    provider: &dyn VersionProvider,
) -> RunnerResult<ResolvedOptions> {
    let python_version = match &args.python_version {
        Some(version) => version.clone(),
        None => provider.python_version()?,
    };

    let ansible_version = args
        .ansible_version
        .clone()
        .unwrap_or_else(|| config.default_ansible_version.clone());

    let options = ResolvedOptions::new(python_version, ansible_version);
    tracing::debug!(%options, selector = %options.env_selector(), "options resolved");

    Ok(options)
}
