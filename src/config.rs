//! Runner configuration.
//!
//! Program names and fixed paths used by the pipeline. Every value has a
//! built-in default; the ones that depend on the host setup can be
//! overridden through `UNIT_RUNNER_*` environment variables.

use std::env;

/// Interpreter queried for the default Python version
const DEFAULT_INTERPRETER: &str = "python3";
const DEFAULT_PIP: &str = "pip";
/// Package providing the ansible-aware tox plugin
const DEPENDENCY: &str = "tox-ansible";
const DEFAULT_TOX: &str = "tox";
const DEFAULT_TOX_CONFIG: &str = "tox-ansible.ini";
/// Ansible version used when `-a` is not given
pub const DEFAULT_ANSIBLE_VERSION: &str = "devel";

pub const ENV_INTERPRETER: &str = "UNIT_RUNNER_PYTHON";
pub const ENV_PIP: &str = "UNIT_RUNNER_PIP";
pub const ENV_TOX: &str = "UNIT_RUNNER_TOX";
pub const ENV_TOX_CONFIG: &str = "UNIT_RUNNER_TOX_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    pub interpreter: String,
    pub pip: String,
    pub dependency: String,
    pub tox: String,
    pub tox_config: String,
    pub default_ansible_version: String,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        RunnerConfig {
            interpreter: DEFAULT_INTERPRETER.to_string(),
            pip: DEFAULT_PIP.to_string(),
            dependency: DEPENDENCY.to_string(),
            tox: DEFAULT_TOX.to_string(),
            tox_config: DEFAULT_TOX_CONFIG.to_string(),
            default_ansible_version: DEFAULT_ANSIBLE_VERSION.to_string(),
        }
    }
}

impl RunnerConfig {
    /// Builds the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str, fallback: String| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or(fallback)
        };

        let defaults = RunnerConfig::default();
        RunnerConfig {
            interpreter: read(ENV_INTERPRETER, defaults.interpreter),
            pip: read(ENV_PIP, defaults.pip),
            dependency: defaults.dependency,
            tox: read(ENV_TOX, defaults.tox),
            tox_config: read(ENV_TOX_CONFIG, defaults.tox_config),
            default_ansible_version: defaults.default_ansible_version,
        }
    }
}
