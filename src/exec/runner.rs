// src/exec/runner.rs

//! Single-shot process runner.
//!
//! Spawns one child, feeds it stdin, collects stdout/stderr and reaps it.
//! All three pipes are pumped concurrently, so neither side can block the
//! other once a stream outgrows the OS pipe buffer.

use std::io;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, Command};
use tracing::{debug, warn};

use crate::command::{CommandSpec, Program};

/// Outcome of one process run.
///
/// `exit_status` is `None` when the process was never reaped (see
/// `spawn_error`) or when it was terminated by a signal and has no code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_status: Option<i32>,
    pub spawn_error: Option<String>,
}

impl ExecutionResult {
    pub fn spawn_failure(reason: impl Into<String>) -> Self {
        Self {
            stdout: String::new(),
            stderr: String::new(),
            exit_status: None,
            spawn_error: Some(reason.into()),
        }
    }

    pub fn is_spawn_failure(&self) -> bool {
        self.spawn_error.is_some()
    }

    /// Text for the payload's `errors` field: the spawn error if there is
    /// one, otherwise stderr.
    pub fn errors(&self) -> &str {
        self.spawn_error.as_deref().unwrap_or(&self.stderr)
    }
}

/// Runs commands to completion, optionally bounded by a timeout.
///
/// The runner holds no per-run state; one instance can be shared by any
/// number of concurrent runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner {
    timeout: Option<Duration>,
}

impl ProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// A runner that kills the child once `timeout` elapses.
    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    /// Run `spec` and wait for the child to exit.
    ///
    /// Never fails: anything that goes wrong before the child is reaped is
    /// reported through [`ExecutionResult::spawn_error`].
    pub async fn run(&self, spec: &CommandSpec) -> ExecutionResult {
        debug!(
            command = %spec.program,
            path = ?spec.working_dir,
            has_stdin = spec.stdin.is_some(),
            "spawning command"
        );

        match self.run_inner(spec).await {
            Ok(result) => {
                debug!(
                    command = %spec.program,
                    exit_status = ?result.exit_status,
                    stdout_len = result.stdout.len(),
                    stderr_len = result.stderr.len(),
                    "command exited"
                );
                result
            }
            Err(err) => {
                let reason = format!("{err:#}");
                warn!(
                    command = %spec.program,
                    path = ?spec.working_dir,
                    error = %reason,
                    "command could not be run"
                );
                ExecutionResult::spawn_failure(reason)
            }
        }
    }

    async fn run_inner(&self, spec: &CommandSpec) -> Result<ExecutionResult> {
        let mut cmd = build_command(&spec.program)?;

        cmd.current_dir(&spec.working_dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd.spawn().with_context(|| {
            format!(
                "spawning '{}' in {}",
                spec.program,
                spec.working_dir.display()
            )
        })?;

        let input = spec.stdin.as_deref();

        let Some(limit) = self.timeout else {
            return communicate(&mut child, input).await;
        };

        let bounded = tokio::time::timeout(limit, communicate(&mut child, input)).await;
        match bounded {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    command = %spec.program,
                    timeout = ?limit,
                    "command timed out; killing process"
                );
                if let Err(e) = child.kill().await {
                    warn!(
                        command = %spec.program,
                        error = %e,
                        "failed to kill timed out process"
                    );
                }
                Err(anyhow!("command timed out after {limit:?}"))
            }
        }
    }
}

/// Convenience wrapper: run once with no timeout.
pub async fn run(
    working_dir: impl AsRef<Path>,
    program: impl Into<Program>,
    stdin: Option<String>,
) -> ExecutionResult {
    let spec = CommandSpec {
        program: program.into(),
        working_dir: working_dir.as_ref().to_path_buf(),
        stdin,
    };
    ProcessRunner::new().run(&spec).await
}

fn build_command(program: &Program) -> Result<Command> {
    match program {
        Program::ShellLine(line) => {
            // Build a shell command appropriate for the platform.
            let cmd = if cfg!(windows) {
                let mut c = Command::new("cmd");
                c.arg("/C").arg(line);
                c
            } else {
                let mut c = Command::new("sh");
                c.arg("-c").arg(line);
                c
            };
            Ok(cmd)
        }
        Program::ArgVector(argv) => {
            let (exe, args) = argv
                .split_first()
                .ok_or_else(|| anyhow!("empty argument vector; nothing to execute"))?;
            let mut c = Command::new(exe);
            c.args(args);
            Ok(c)
        }
    }
}

/// Pump stdin, stdout and stderr concurrently, then reap the child.
async fn communicate(child: &mut Child, input: Option<&str>) -> Result<ExecutionResult> {
    let stdin = child.stdin.take();
    let stdout = child.stdout.take().context("child stdout was not captured")?;
    let stderr = child.stderr.take().context("child stderr was not captured")?;

    let write_input = async move {
        let Some(mut pipe) = stdin else {
            return Ok(());
        };
        if let Some(text) = input {
            if let Err(e) = pipe.write_all(text.as_bytes()).await {
                if e.kind() != io::ErrorKind::BrokenPipe {
                    return Err(anyhow::Error::new(e).context("writing stdin to child"));
                }
                debug!("child closed its stdin before reading all input");
            }
        }
        // Dropping the pipe signals end-of-input.
        drop(pipe);
        Ok::<(), anyhow::Error>(())
    };

    let (written, out, err) = tokio::join!(write_input, read_stream(stdout), read_stream(stderr));

    written?;
    let out = out.context("reading child stdout")?;
    let err = err.context("reading child stderr")?;

    let status = child.wait().await.context("waiting for child to exit")?;

    Ok(ExecutionResult {
        stdout: out.trim().to_string(),
        stderr: err.trim().to_string(),
        exit_status: status.code(),
        spawn_error: None,
    })
}

async fn read_stream<R: AsyncRead + Unpin>(mut stream: R) -> io::Result<String> {
    let mut buf = Vec::new();
    stream.read_to_end(&mut buf).await?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_argv_cannot_be_built() {
        let err = build_command(&Program::ArgVector(vec![])).unwrap_err();
        assert!(err.to_string().contains("empty argument vector"));
    }

    #[test]
    fn errors_prefers_spawn_error_over_stderr() {
        let failed = ExecutionResult {
            stderr: "ignored".into(),
            ..ExecutionResult::spawn_failure("no such file")
        };
        assert_eq!(failed.errors(), "no such file");

        let ran = ExecutionResult {
            stderr: "warning: x".into(),
            exit_status: Some(0),
            ..Default::default()
        };
        assert_eq!(ran.errors(), "warning: x");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn shell_line_runs_through_shell() {
        let spec = CommandSpec::new("echo a && echo b 1>&2", "/");
        let result = ProcessRunner::new().run(&spec).await;
        assert_eq!(result.stdout, "a");
        assert_eq!(result.stderr, "b");
        assert_eq!(result.exit_status, Some(0));
    }
}
