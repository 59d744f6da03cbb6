use std::fmt;

/// Final Python/Ansible version pair for one test run.
///
/// Both fields are always populated: flags win, defaults fill the rest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOptions {
    pub python_version: String,
    pub ansible_version: String,
}

impl ResolvedOptions {
    pub fn new(python_version: impl Into<String>, ansible_version: impl Into<String>) -> Self {
        ResolvedOptions {
            python_version: python_version.into(),
            ansible_version: ansible_version.into(),
        }
    }

    /// Tox environment targeted by the run, e.g. `unit-py3.12-devel`.
    pub fn env_selector(&self) -> String {
        format!("unit-py{}-{}", self.python_version, self.ansible_version)
    }
}

impl fmt::Display for ResolvedOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "python {}, ansible {}",
            self.python_version, self.ansible_version
        )
    }
}
