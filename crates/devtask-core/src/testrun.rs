//! Test runs with coverage aggregation.
//!
//! `gotestsum` wraps `go test`; each package line it prints ends with a
//! `coverage: NN.N% of statements` figure. The figures are averaged into a
//! [`CoverageReport`].

use std::path::PathBuf;

use tracing::{info, warn};

use crate::compose::StartOptions;
use crate::config::Config;
use crate::coverage::CoverageReport;
use crate::error::Result;
use crate::runner::{CommandExecutor, ExternalCommand};
use crate::selector::TestSelector;
use crate::session::Session;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestOptions {
    pub selector: TestSelector,
    /// Pass `-v` so test stdout is shown.
    pub verbose: bool,
    /// Write a coverage profile for the HTML viewer.
    pub collect_profile: bool,
    /// Answer yes to the devtools install prompt.
    pub yes: bool,
    /// Value for `--parallel`; the flag is omitted when unknown.
    pub parallelism: Option<usize>,
}

impl TestOptions {
    pub fn new(selector: TestSelector) -> Self {
        Self {
            selector,
            verbose: false,
            collect_profile: false,
            yes: false,
            parallelism: None,
        }
    }
}

pub fn available_parallelism() -> Option<usize> {
    std::thread::available_parallelism().ok().map(|n| n.get())
}

pub fn test_command(config: &Config, opts: &TestOptions) -> String {
    let mut parts = vec![
        config.tester_bin().display().to_string(),
        "--format=testname".to_string(),
        "--no-color=False".to_string(),
        "--".to_string(),
    ];
    if opts.verbose {
        parts.push("-v".to_string());
    }
    if let Some(n) = opts.parallelism {
        parts.push(format!("--parallel={n}"));
    }
    parts.extend(["-race", "-count=1", "-cover"].map(String::from));
    if opts.collect_profile {
        parts.push(format!("-coverprofile={}", config.coverage_profile));
    }
    parts.push(opts.selector.go_test_args());
    parts.join(" ")
}

/// Ensure devtools, bring up infrastructure in the background, run the
/// selected tests and aggregate their coverage.
///
/// Devtools are checked and installed through `session.executor`; compose and
/// the test run use `env_executor`, which carries the test environment.
/// A failing test run is fatal. The caller prints the report and, when a
/// profile was collected, calls [`view_profile`].
pub fn run_tests_and_report(
    session: &Session<'_>,
    env_executor: &dyn CommandExecutor,
    opts: &TestOptions,
) -> Result<CoverageReport> {
    session.ensure_devtools(opts.yes)?;
    session
        .compose
        .start(env_executor, session.config, StartOptions::background())?;

    info!(selector = %opts.selector, "running tests");
    let result = env_executor.run(&test_command(session.config, opts))?;
    Ok(CoverageReport::from_output(&result.stdout))
}

/// Open the HTML coverage view, then delete the profile whether or not the
/// viewer launched.
pub fn view_profile(session: &Session<'_>) -> Result<()> {
    let profile = &session.config.coverage_profile;
    let viewer = session
        .executor
        .execute(&ExternalCommand::new(format!("go tool cover -html={profile}")).tolerant())?;
    if viewer.failed() {
        warn!(code = ?viewer.exit_code, "coverage viewer failed");
    }
    remove_profile(session.root.join(profile))
}

fn remove_profile(path: PathBuf) -> Result<()> {
    match std::fs::remove_file(&path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
