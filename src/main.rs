mod config;
mod error;
mod models;
mod pipeline;
mod python;
mod resolver;
mod ui;

use config::RunnerConfig;
use error::{RunnerError, RunnerResult};
use pipeline::{Pipeline, SubprocessRunner};
use python::InterpreterVersion;
use resolver::resolve_options;
use std::{env, process};
use tracing_subscriber::EnvFilter;
use ui::cli::parse_args;
use ui::output::{print_error, print_resolved_options, print_run_succeeded};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("ansible_unit_runner=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run() {
        print_error(&err);
        process::exit(err.exit_code());
    }
}

fn run() -> RunnerResult<()> {
    let args = parse_args(env::args_os()).map_err(RunnerError::Usage)?;
    let config = RunnerConfig::from_env();
    tracing::debug!(?config, "configuration loaded");

    let options = resolve_options(&args, &config, &InterpreterVersion::new(&config.interpreter))?;
    print_resolved_options(&options);

    let pipeline = Pipeline::unit_tests(&options, &config);
    tracing::debug!(steps = pipeline.steps().len(), "pipeline planned");
    smol::block_on(pipeline.run(&SubprocessRunner))?;

    print_run_succeeded(&options);
    Ok(())
}
