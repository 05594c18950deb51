//! Process executor: the only I/O boundary of the engine.
//!
//! Spawns the configured program with an explicit argv (no shell), captures
//! stdout and stderr separately and waits for exit. A semaphore caps the
//! number of children alive at once; an optional timeout kills a child that
//! runs too long.

use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use tokio::process::Command;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use super::build::CommandInvocation;
use super::catalog::{OperationSpec, Program};
use crate::config::Config;

#[cfg(windows)]
const LOCATOR: &str = "where";
#[cfg(not(windows))]
const LOCATOR: &str = "which";

/// Result of one run, before any output policy is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    Success { stdout: String },
    Failure(Failure),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub cause: FailureCause,
    /// Whatever the child wrote to stderr, verbatim. Empty when it never ran.
    pub stderr: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureCause {
    /// The program could not be started at all.
    Spawn { program: String, reason: String },
    /// Non-zero exit; `code` is `None` when killed by a signal.
    Exit { code: Option<i32> },
    TimedOut { after: Duration },
}

impl FailureCause {
    pub fn describe(&self) -> String {
        match self {
            FailureCause::Spawn { program, reason } => format!("failed to start '{program}': {reason}"),
            FailureCause::Exit { code: Some(c) } => format!("exit status {c}"),
            FailureCause::Exit { code: None } => "terminated by signal".to_string(),
            FailureCause::TimedOut { after } => format!("timed out after {}s", after.as_secs()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Executor {
    executable: String,
    permits: Arc<Semaphore>,
    timeout: Option<Duration>,
}

impl Executor {
    pub fn new(config: &Config) -> Self {
        Self {
            executable: config.executable_path.clone(),
            permits: Arc::new(Semaphore::new(config.max_concurrency)),
            timeout: config.timeout,
        }
    }

    /// Concrete program and argv for an invocation.
    pub fn resolve(&self, inv: &CommandInvocation) -> (String, Vec<String>) {
        match inv.program {
            Program::Sui => (self.executable.clone(), inv.args.clone()),
            Program::Locator => {
                let mut argv = Vec::with_capacity(inv.args.len() + 1);
                argv.push(self.executable.clone());
                argv.extend(inv.args.iter().cloned());
                (LOCATOR.to_string(), argv)
            }
        }
    }

    /// Command-line template for an operation, naming the configured program.
    pub fn synopsis(&self, op: &OperationSpec) -> String {
        op.synopsis(&self.executable, LOCATOR)
    }

    /// Shell-quoted rendering of the resolved command, for logs and dry runs.
    pub fn command_line(&self, inv: &CommandInvocation) -> String {
        let (program, argv) = self.resolve(inv);
        let mut words = Vec::with_capacity(argv.len() + 1);
        words.push(program);
        words.extend(argv);
        shell_words::join(words)
    }

    pub async fn run(&self, inv: &CommandInvocation) -> ExecutionOutcome {
        let (program, argv) = self.resolve(inv);

        let Ok(_permit) = self.permits.acquire().await else {
            return spawn_failure(&program, "executor is shut down".to_string());
        };

        debug!(command = %self.command_line(inv), "spawning");

        let mut cmd = Command::new(&program);
        cmd.args(&argv)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = match cmd.spawn() {
            Ok(c) => c,
            Err(e) => return spawn_failure(&program, e.to_string()),
        };

        let waited = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, child.wait_with_output()).await {
                Ok(r) => r,
                Err(_) => {
                    warn!(program = %program, secs = limit.as_secs(), "child timed out, killed");
                    return ExecutionOutcome::Failure(Failure {
                        cause: FailureCause::TimedOut { after: limit },
                        stderr: String::new(),
                    });
                }
            },
            None => child.wait_with_output().await,
        };

        let output = match waited {
            Ok(o) => o,
            Err(e) => return spawn_failure(&program, e.to_string()),
        };

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if output.status.success() {
            debug!(bytes = stdout.len(), "child exited successfully");
            ExecutionOutcome::Success { stdout }
        } else {
            debug!(status = ?output.status.code(), "child exited with failure");
            ExecutionOutcome::Failure(Failure {
                cause: FailureCause::Exit {
                    code: output.status.code(),
                },
                stderr,
            })
        }
    }
}

fn spawn_failure(program: &str, reason: String) -> ExecutionOutcome {
    warn!(program = %program, reason = %reason, "spawn failed");
    ExecutionOutcome::Failure(Failure {
        cause: FailureCause::Spawn {
            program: program.to_string(),
            reason,
        },
        stderr: String::new(),
    })
}
