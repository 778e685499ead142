//! External command execution.
//!
//! Every task in devtask is a sequence of shell command lines. This module
//! owns the single seam through which they run: [`CommandExecutor`]. The real
//! implementation ([`ShellExecutor`]) hands the line to `sh -c`, streams the
//! output to the console unless it is hidden, and captures both streams.
//!
//! # Failure policy
//! - strict (default): a nonzero exit becomes [`DevtaskError::CommandFailed`].
//! - tolerant: a nonzero exit, or a failure to spawn at all, is returned as an
//!   unsuccessful [`CommandResult`] for the caller to inspect.

use std::io::{BufRead, BufReader, ErrorKind, Read, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};

use tracing::debug;

use crate::error::{DevtaskError, Result};

/// One command line to run, plus how to treat its failure and output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalCommand {
    pub line: String,
    pub tolerate_failure: bool,
    pub hide_output: bool,
}

impl ExternalCommand {
    /// Strict, visible command.
    pub fn new(line: impl Into<String>) -> Self {
        Self {
            line: line.into(),
            tolerate_failure: false,
            hide_output: false,
        }
    }

    /// Tolerant and hidden; used for version queries and other lookups.
    pub fn probe(line: impl Into<String>) -> Self {
        Self::new(line).tolerant().hidden()
    }

    pub fn tolerant(mut self) -> Self {
        self.tolerate_failure = true;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hide_output = true;
        self
    }
}

/// Outcome of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandResult {
    pub success: bool,
    /// `None` when the process was killed by a signal or never spawned.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandResult {
    pub fn failed(&self) -> bool {
        !self.success
    }
}

pub trait CommandExecutor {
    /// Run `line` to completion and capture its output, whatever the exit
    /// status. Only a failure to start the process is an error here.
    fn capture(&self, line: &str, hide_output: bool) -> Result<CommandResult>;

    /// Run `command`, applying its failure policy.
    fn execute(&self, command: &ExternalCommand) -> Result<CommandResult> {
        debug!(command = %command.line, tolerant = command.tolerate_failure, "running");
        let result = match self.capture(&command.line, command.hide_output) {
            Ok(result) => result,
            Err(DevtaskError::Spawn { reason, .. }) if command.tolerate_failure => {
                CommandResult {
                    success: false,
                    exit_code: None,
                    stdout: String::new(),
                    stderr: reason,
                }
            }
            Err(e) => return Err(e),
        };

        if result.failed() && !command.tolerate_failure {
            return Err(DevtaskError::CommandFailed {
                command: command.line.clone(),
                code: result.exit_code,
            });
        }
        Ok(result)
    }

    /// Shorthand for a strict, visible command.
    fn run(&self, line: &str) -> Result<CommandResult> {
        self.execute(&ExternalCommand::new(line))
    }
}

/// Runs command lines through `sh -c`, inheriting the process environment
/// plus any extra variables supplied with [`ShellExecutor::with_envs`].
#[derive(Debug, Clone, Default)]
pub struct ShellExecutor {
    cwd: Option<PathBuf>,
    envs: Vec<(String, String)>,
    stdout_to_stderr: bool,
}

impl ShellExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_dir(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// Extra variables for every command this executor runs. Later pairs win.
    pub fn with_envs<I>(mut self, envs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.envs.extend(envs);
        self
    }

    /// Echo child stdout on our stderr, leaving stdout to the caller's own
    /// report (e.g. JSON).
    pub fn stdout_to_stderr(mut self) -> Self {
        self.stdout_to_stderr = true;
        self
    }

    fn sinks(&self, hide_output: bool) -> (Sink, Sink) {
        match (hide_output, self.stdout_to_stderr) {
            (true, _) => (Sink::Hidden, Sink::Hidden),
            (false, true) => (Sink::Stderr, Sink::Stderr),
            (false, false) => (Sink::Stdout, Sink::Stderr),
        }
    }
}

impl CommandExecutor for ShellExecutor {
    fn capture(&self, line: &str, hide_output: bool) -> Result<CommandResult> {
        let mut cmd = Command::new("sh");
        cmd.arg("-c")
            .arg(line)
            .envs(self.envs.iter().map(|(k, v)| (k, v)))
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(cwd) = &self.cwd {
            cmd.current_dir(cwd);
        }

        let mut child = cmd.spawn().map_err(|e| DevtaskError::Spawn {
            command: line.to_string(),
            reason: e.to_string(),
        })?;

        // Both pipes are drained on their own threads so a chatty stderr
        // cannot block the child while we are still reading stdout.
        let (out_sink, err_sink) = self.sinks(hide_output);
        let stdout_handle = child.stdout.take();
        let stderr_handle = child.stderr.take();
        let stdout_thread = std::thread::spawn(move || pump(stdout_handle, out_sink));
        let stderr_thread = std::thread::spawn(move || pump(stderr_handle, err_sink));

        let status = child.wait()?;
        let stdout = stdout_thread.join().unwrap_or_default();
        let stderr = stderr_thread.join().unwrap_or_default();

        Ok(CommandResult {
            success: status.success(),
            exit_code: status.code(),
            stdout,
            stderr,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sink {
    Hidden,
    Stdout,
    Stderr,
}

/// Drain `reader` to EOF, echoing each line to `sink` and collecting it.
/// Invalid UTF-8 is replaced with U+FFFD.
fn pump<R: Read>(reader: Option<R>, sink: Sink) -> String {
    let mut buf = String::new();
    let Some(reader) = reader else {
        return buf;
    };
    let mut reader = BufReader::new(reader);
    let mut raw = Vec::new();
    loop {
        raw.clear();
        match reader.read_until(b'\n', &mut raw) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(_) => break,
        }
        let decoded = String::from_utf8_lossy(&raw);
        let line: &str = &decoded;
        let line = line.strip_suffix('\n').unwrap_or(line);
        let line = line.strip_suffix('\r').unwrap_or(line);
        // keep draining even if the console is gone
        match sink {
            Sink::Hidden => {}
            Sink::Stdout => {
                let _ = writeln!(std::io::stdout().lock(), "{line}");
            }
            Sink::Stderr => {
                let _ = writeln!(std::io::stderr().lock(), "{line}");
            }
        }
        buf.push_str(line);
        buf.push('\n');
    }
    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedExecutor;

    #[test]
    fn true_succeeds() {
        let result = ShellExecutor::new().run("true").unwrap();
        assert!(result.success);
        assert_eq!(result.exit_code, Some(0));
    }

    #[test]
    fn strict_failure_is_an_error() {
        let err = ShellExecutor::new().run("exit 3").unwrap_err();
        match err {
            DevtaskError::CommandFailed { command, code } => {
                assert_eq!(command, "exit 3");
                assert_eq!(code, Some(3));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn tolerant_failure_returns_result() {
        let result = ShellExecutor::new()
            .execute(&ExternalCommand::new("false").tolerant())
            .unwrap();
        assert!(result.failed());
        assert_eq!(result.exit_code, Some(1));
    }

    #[test]
    fn captures_stdout_and_stderr_when_hidden() {
        let result = ShellExecutor::new()
            .execute(&ExternalCommand::probe("echo out; echo err >&2"))
            .unwrap();
        assert!(result.success);
        assert_eq!(result.stdout, "out\n");
        assert_eq!(result.stderr, "err\n");
    }

    #[test]
    fn invalid_utf8_does_not_cut_off_output() {
        let result = ShellExecutor::new()
            .execute(&ExternalCommand::probe(
                "printf 'ok pkgA \\377\\n'; sleep 0.2; \
                 echo 'ok pkgB coverage: 80.0% of statements'",
            ))
            .unwrap();
        assert!(result.success);
        assert_eq!(result.exit_code, Some(0));
        assert!(result.stdout.starts_with("ok pkgA \u{FFFD}\n"));
        assert!(result.stdout.contains("coverage: 80.0% of statements"));
    }

    #[test]
    fn large_output_is_drained_completely() {
        let result = ShellExecutor::new()
            .execute(&ExternalCommand::probe("seq 1 200000; seq 1 50000 >&2"))
            .unwrap();
        assert!(result.success);
        assert_eq!(result.stdout.lines().count(), 200000);
        assert_eq!(result.stdout.lines().last(), Some("200000"));
        assert_eq!(result.stderr.lines().count(), 50000);
    }

    #[test]
    fn last_line_without_newline_is_kept() {
        let result = ShellExecutor::new()
            .execute(&ExternalCommand::probe("printf 'abc\\r\\ndef'"))
            .unwrap();
        assert_eq!(result.stdout, "abc\ndef\n");
    }

    #[test]
    fn sinks_follow_hidden_and_redirect() {
        let plain = ShellExecutor::new();
        assert_eq!(plain.sinks(false), (Sink::Stdout, Sink::Stderr));
        assert_eq!(plain.sinks(true), (Sink::Hidden, Sink::Hidden));
        let redirected = ShellExecutor::new().stdout_to_stderr();
        assert_eq!(redirected.sinks(false), (Sink::Stderr, Sink::Stderr));
        assert_eq!(redirected.sinks(true), (Sink::Hidden, Sink::Hidden));
    }

    #[test]
    fn redirected_executor_still_captures_stdout() {
        let result = ShellExecutor::new()
            .stdout_to_stderr()
            .execute(&ExternalCommand::probe("echo report"))
            .unwrap();
        assert_eq!(result.stdout, "report\n");
    }

    #[test]
    fn missing_binary_is_unsatisfied_not_fatal_in_probe_mode() {
        let result = ShellExecutor::new()
            .execute(&ExternalCommand::probe(
                "/nonexistent/devtask-test-binary --version",
            ))
            .unwrap();
        assert!(result.failed());
        assert_eq!(result.exit_code, Some(127));
    }

    #[test]
    fn extra_envs_reach_the_child() {
        let result = ShellExecutor::new()
            .with_envs([("DEVTASK_TEST_VALUE".to_string(), "hello".to_string())])
            .execute(&ExternalCommand::probe("printf %s \"$DEVTASK_TEST_VALUE\""))
            .unwrap();
        assert_eq!(result.stdout, "hello\n");
    }

    #[test]
    fn runs_in_configured_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("marker.txt"), "x").unwrap();
        let result = ShellExecutor::new()
            .in_dir(dir.path())
            .execute(&ExternalCommand::probe("ls"))
            .unwrap();
        assert!(result.stdout.contains("marker.txt"));
    }

    #[test]
    fn spawn_error_is_tolerated_in_tolerant_mode() {
        let exec = ScriptedExecutor::new().spawn_error("ghost");
        let result = exec.execute(&ExternalCommand::probe("ghost")).unwrap();
        assert!(result.failed());
        assert_eq!(result.exit_code, None);
        assert!(!result.stderr.is_empty());
    }

    #[test]
    fn spawn_error_propagates_in_strict_mode() {
        let exec = ScriptedExecutor::new().spawn_error("ghost");
        let err = exec.run("ghost").unwrap_err();
        assert!(matches!(err, DevtaskError::Spawn { .. }));
    }
}
