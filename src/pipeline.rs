//! Sequential subprocess pipeline.
//!
//! A run is an ordered list of [`Step`]s executed one after another. The
//! first step that cannot be started or exits unsuccessfully stops the
//! pipeline; later steps are never spawned.

use crate::config::RunnerConfig;
use crate::error::{RunnerError, RunnerResult};
use crate::models::options::ResolvedOptions;
use crate::ui::output::print_step_started;
use smol::process::{Command, Stdio};
use std::{fmt, io};

/// One external command of the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub name: &'static str,
    pub program: String,
    pub args: Vec<String>,
}

impl Step {
    pub fn new(name: &'static str, program: impl Into<String>, args: &[&str]) -> Self {
        Step {
            name,
            program: program.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Exit information of a finished step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepStatus {
    /// `None` when the process was terminated by a signal
    pub code: Option<i32>,
    /// Terminating signal, only known on unix
    pub signal: Option<i32>,
}

impl StepStatus {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Executes a single step and waits for it to finish.
#[allow(async_fn_in_trait)]
pub trait StepRunner {
    async fn run(&self, step: &Step) -> io::Result<StepStatus>;
}

/// Runs steps as real child processes sharing this process' stdio.
pub struct SubprocessRunner;

impl StepRunner for SubprocessRunner {
    async fn run(&self, step: &Step) -> io::Result<StepStatus> {
        let status = Command::new(&step.program)
            .args(&step.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await?;

        #[cfg(unix)]
        let signal = {
            use std::os::unix::process::ExitStatusExt;
            status.signal()
        };
        #[cfg(not(unix))]
        let signal = None;

        Ok(StepStatus {
            code: status.code(),
            signal,
        })
    }
}

/// Ordered, fail-fast list of steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    steps: Vec<Step>,
}

impl Pipeline {
    pub fn new(steps: Vec<Step>) -> Self {
        Pipeline { steps }
    }

    /// Builds the standard run: install the tox plugin, then run the unit
    /// test environment selected by `options`.
    ///
    /// # Arguments
    /// * `options` - Resolved versions that select the tox environment
    /// * `config` - Program names and the tox configuration file
    pub fn unit_tests(options: &ResolvedOptions, config: &RunnerConfig) -> Self {
        let selector = options.env_selector();
        Pipeline::new(vec![
            Step::new("install", &config.pip, &["install", config.dependency.as_str()]),
            Step::new(
                "test",
                &config.tox,
                &[
                    "--ansible",
                    "-e",
                    selector.as_str(),
                    "--conf",
                    config.tox_config.as_str(),
                ],
            ),
        ])
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Runs every step in order, stopping at the first failure.
    ///
    /// # Errors
    /// * [`RunnerError::Spawn`] - a step's program could not be started
    /// * [`RunnerError::StepFailed`] - a step exited unsuccessfully
    pub async fn run<R: StepRunner>(&self, runner: &R) -> RunnerResult<()> {
        let total = self.steps.len();

        for (index, step) in self.steps.iter().enumerate() {
            print_step_started(index + 1, total, step);
            tracing::debug!(step = step.name, command = %step, "starting step");

            let status = runner
                .run(step)
                .await
                .map_err(|source| RunnerError::Spawn {
                    step: step.name.to_string(),
                    program: step.program.clone(),
                    source,
                })?;

            if !status.success() {
                tracing::warn!(
                    step = step.name,
                    code = ?status.code,
                    signal = ?status.signal,
                    "step failed"
                );
                return Err(RunnerError::StepFailed {
                    step: step.name.to_string(),
                    code: status.code,
                    signal: status.signal,
                });
            }

            tracing::info!(step = step.name, "step finished");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Records every step it is asked to run and answers with a canned
    /// outcome per step name. Unknown steps succeed.
    #[derive(Default)]
    struct RecordingRunner {
        outcomes: HashMap<&'static str, StepStatus>,
        missing: Vec<&'static str>,
        ran: RefCell<Vec<String>>,
    }

    impl StepStatus {
        fn exited(code: i32) -> Self {
            StepStatus {
                code: Some(code),
                signal: None,
            }
        }

        fn killed(signal: i32) -> Self {
            StepStatus {
                code: None,
                signal: Some(signal),
            }
        }
    }

    impl RecordingRunner {
        fn failing(step: &'static str, status: StepStatus) -> Self {
            RecordingRunner {
                outcomes: HashMap::from([(step, status)]),
                ..Default::default()
            }
        }

        fn ran(&self) -> Vec<String> {
            self.ran.borrow().clone()
        }
    }

    impl StepRunner for RecordingRunner {
        async fn run(&self, step: &Step) -> io::Result<StepStatus> {
            self.ran.borrow_mut().push(step.to_string());

            if self.missing.contains(&step.name) {
                return Err(io::Error::new(io::ErrorKind::NotFound, "no such program"));
            }

            let status = self
                .outcomes
                .get(step.name)
                .copied()
                .unwrap_or(StepStatus::exited(0));
            Ok(status)
        }
    }

    fn unit_pipeline(python: &str, ansible: &str) -> Pipeline {
        Pipeline::unit_tests(
            &ResolvedOptions::new(python, ansible),
            &RunnerConfig::default(),
        )
    }

    #[test]
    fn test_unit_pipeline_steps() {
        let pipeline = unit_pipeline("3.10", "stable-2.16");
        let commands: Vec<String> = pipeline.steps().iter().map(|s| s.to_string()).collect();

        assert_eq!(
            commands,
            vec![
                "pip install tox-ansible",
                "tox --ansible -e unit-py3.10-stable-2.16 --conf tox-ansible.ini",
            ]
        );
        assert_eq!(pipeline.steps()[0].name, "install");
        assert_eq!(pipeline.steps()[1].name, "test");
    }

    #[test]
    fn test_unit_pipeline_uses_configured_programs() {
        let config = RunnerConfig {
            pip: "pip3".to_string(),
            tox: "/usr/local/bin/tox".to_string(),
            tox_config: "ci/tox-ansible.ini".to_string(),
            ..RunnerConfig::default()
        };
        let pipeline = Pipeline::unit_tests(&ResolvedOptions::new("3.12", "devel"), &config);

        assert_eq!(pipeline.steps()[0].program, "pip3");
        assert_eq!(pipeline.steps()[1].program, "/usr/local/bin/tox");
        assert!(pipeline.steps()[1]
            .args
            .contains(&"ci/tox-ansible.ini".to_string()));
    }

    #[test]
    fn test_all_steps_run_in_order() {
        let runner = RecordingRunner::default();
        let pipeline = unit_pipeline("3.12", "devel");

        smol::block_on(pipeline.run(&runner)).unwrap();

        assert_eq!(
            runner.ran(),
            vec![
                "pip install tox-ansible",
                "tox --ansible -e unit-py3.12-devel --conf tox-ansible.ini",
            ]
        );
    }

    #[test]
    fn test_failed_install_skips_tests() {
        let runner = RecordingRunner::failing("install", StepStatus::exited(1));
        let pipeline = unit_pipeline("3.12", "devel");

        let err = smol::block_on(pipeline.run(&runner)).unwrap_err();

        assert!(matches!(
            err,
            RunnerError::StepFailed { ref step, code: Some(1), .. } if step == "install"
        ));
        assert_eq!(runner.ran(), vec!["pip install tox-ansible"]);
    }

    #[test]
    fn test_failed_tests_forward_exit_code() {
        let runner = RecordingRunner::failing("test", StepStatus::exited(5));
        let pipeline = unit_pipeline("3.11", "stable-2.17");

        let err = smol::block_on(pipeline.run(&runner)).unwrap_err();

        assert_eq!(err.exit_code(), 5);
        assert_eq!(runner.ran().len(), 2);
    }

    #[test]
    fn test_signal_termination_is_a_failure() {
        let runner = RecordingRunner::failing("test", StepStatus::killed(15));

        let err = smol::block_on(unit_pipeline("3.12", "devel").run(&runner)).unwrap_err();

        assert!(matches!(
            err,
            RunnerError::StepFailed {
                code: None,
                signal: Some(15),
                ..
            }
        ));
        assert_eq!(err.exit_code(), 143);
    }

    #[test]
    fn test_unstartable_program_stops_pipeline() {
        let runner = RecordingRunner {
            missing: vec!["install"],
            ..Default::default()
        };

        let err = smol::block_on(unit_pipeline("3.12", "devel").run(&runner)).unwrap_err();

        assert!(matches!(err, RunnerError::Spawn { ref program, .. } if program == "pip"));
        assert_eq!(runner.ran().len(), 1);
    }

    #[test]
    fn test_empty_pipeline_succeeds() {
        let runner = RecordingRunner::default();

        smol::block_on(Pipeline::new(Vec::new()).run(&runner)).unwrap();

        assert!(runner.ran().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_subprocess_runner_reports_exit_codes() {
        let ok = smol::block_on(SubprocessRunner.run(&Step::new("ok", "true", &[]))).unwrap();
        let failed =
            smol::block_on(SubprocessRunner.run(&Step::new("failed", "false", &[]))).unwrap();

        assert!(ok.success());
        assert_eq!(failed, StepStatus::exited(1));
    }

    #[cfg(unix)]
    #[test]
    fn test_subprocess_runner_reports_terminating_signal() {
        let step = Step::new("killed", "sh", &["-c", "kill -TERM $$"]);

        let status = smol::block_on(SubprocessRunner.run(&step)).unwrap();

        assert_eq!(status, StepStatus::killed(15));
        assert!(!status.success());
    }

    #[test]
    fn test_subprocess_runner_missing_program() {
        let step = Step::new("missing", "definitely-not-a-real-program-0xdead", &[]);

        assert!(smol::block_on(SubprocessRunner.run(&step)).is_err());
    }
}
