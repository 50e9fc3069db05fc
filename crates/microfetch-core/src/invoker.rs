//! Process invocation: runs the engine once, bounded by a timeout.
//!
//! Every failure mode (missing binary, spawn error, timeout) is folded into
//! an [`InvocationOutcome`] with a non-zero status. Nothing here returns an
//! error to the caller.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::task::JoinHandle;

use crate::engine::EngineBinary;

/// Status reported for timeouts and invoker-level failures.
pub const FAILURE_STATUS: i32 = 1;

/// Status reported when the process was terminated by a signal.
pub const SIGNALLED_STATUS: i32 = -1;

/// Captured result of one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationOutcome {
    pub stdout: String,
    pub stderr: String,
    pub status: i32,
}

impl InvocationOutcome {
    /// An outcome that never reached (or never finished) the process.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            stdout: String::new(),
            stderr: message.into(),
            status: FAILURE_STATUS,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == 0
    }
}

/// Diagnostic for an invocation that outlived its budget.
pub fn timeout_message(timeout: Duration) -> String {
    format!("Timeout after {:?}s", timeout.as_secs_f64())
}

/// Runs engine commands. Production code uses [`ProcessInvoker`]; tests
/// substitute scripted runners.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run the engine with `args`, giving up after `timeout`.
    async fn invoke(&self, args: Vec<String>, timeout: Duration) -> InvocationOutcome;

    /// The binary this runner drives.
    fn binary(&self) -> &EngineBinary;
}

/// A single, fully specified engine invocation.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
    pub timeout: Duration,
}

impl Invocation {
    /// Spawn the process, drain both pipes, and wait for exit or timeout.
    ///
    /// On timeout the child is killed and the pipe readers are dropped
    /// before returning.
    pub async fn execute(self) -> InvocationOutcome {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .current_dir(&self.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(e) => {
                tracing::warn!("Failed to launch {}: {e}", self.program.display());
                return InvocationOutcome::failure(e.to_string());
            }
        };

        let mut stdout_task = drain(child.stdout.take());
        let mut stderr_task = drain(child.stderr.take());

        // One deadline covers exit and both drains: a helper the engine left
        // behind can hold the pipes open after the engine itself has exited.
        let finished = tokio::time::timeout(self.timeout, async {
            let status = child.wait().await;
            let stdout = collect(&mut stdout_task).await;
            let stderr = collect(&mut stderr_task).await;
            (status, stdout, stderr)
        })
        .await;

        match finished {
            Ok((Ok(status), stdout, stderr)) => InvocationOutcome {
                stdout: String::from_utf8_lossy(&stdout).into_owned(),
                stderr: String::from_utf8_lossy(&stderr).into_owned(),
                status: status.code().unwrap_or(SIGNALLED_STATUS),
            },
            Ok((Err(e), _, _)) => InvocationOutcome::failure(e.to_string()),
            Err(_) => {
                if let Err(e) = child.kill().await {
                    tracing::debug!("Engine process already gone at timeout: {e}");
                }
                stdout_task.abort();
                stderr_task.abort();
                tracing::warn!(
                    args = ?self.args,
                    "Engine invocation timed out after {:?}",
                    self.timeout
                );
                InvocationOutcome::failure(timeout_message(self.timeout))
            }
        }
    }
}

fn drain<R>(pipe: Option<R>) -> JoinHandle<Vec<u8>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            if let Err(e) = pipe.read_to_end(&mut buf).await {
                tracing::debug!("Engine pipe read failed: {e}");
            }
        }
        buf
    })
}

async fn collect(task: &mut JoinHandle<Vec<u8>>) -> Vec<u8> {
    task.await.unwrap_or_else(|e| {
        tracing::debug!("Engine pipe reader aborted: {e}");
        Vec::new()
    })
}

/// Production runner: launches the real engine in a fixed working directory.
#[derive(Debug, Clone)]
pub struct ProcessInvoker {
    binary: EngineBinary,
    working_dir: PathBuf,
}

impl ProcessInvoker {
    pub fn new(binary: EngineBinary, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            binary,
            working_dir: working_dir.into(),
        }
    }

    pub fn working_dir(&self) -> &std::path::Path {
        &self.working_dir
    }
}

#[async_trait]
impl CommandRunner for ProcessInvoker {
    async fn invoke(&self, args: Vec<String>, timeout: Duration) -> InvocationOutcome {
        if !self.binary.is_available() {
            return InvocationOutcome::failure(self.binary.missing_message());
        }

        tracing::debug!(?args, "Invoking engine");

        Invocation {
            program: self.binary.path().to_path_buf(),
            args,
            working_dir: self.working_dir.clone(),
            timeout,
        }
        .execute()
        .await
    }

    fn binary(&self) -> &EngineBinary {
        &self.binary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_binary_short_circuits() {
        let invoker = ProcessInvoker::new(
            EngineBinary::with_availability("/nonexistent/microfetch", false),
            ".",
        );
        let outcome = invoker
            .invoke(vec!["fetch".to_string()], Duration::from_secs(1))
            .await;
        assert_eq!(outcome.status, FAILURE_STATUS);
        assert!(outcome.stdout.is_empty());
        assert_eq!(
            outcome.stderr,
            "microfetch binary not found at /nonexistent/microfetch"
        );
    }

    #[tokio::test]
    async fn test_launch_failure_is_captured() {
        // Claimed available, but the path does not exist: spawn fails.
        let invoker = ProcessInvoker::new(
            EngineBinary::with_availability("/nonexistent/microfetch", true),
            ".",
        );
        let outcome = invoker.invoke(vec![], Duration::from_secs(1)).await;
        assert_eq!(outcome.status, FAILURE_STATUS);
        assert!(!outcome.stderr.is_empty());
    }

    #[test]
    fn test_timeout_message_keeps_fraction() {
        assert_eq!(timeout_message(Duration::from_secs(30)), "Timeout after 30.0s");
        assert_eq!(
            timeout_message(Duration::from_millis(200)),
            "Timeout after 0.2s"
        );
    }

    #[cfg(unix)]
    mod unix {
        use super::*;
        use std::io::Write;
        use std::os::unix::fs::PermissionsExt;

        fn script(dir: &tempfile::TempDir, body: &str) -> PathBuf {
            let path = dir.path().join("microfetch");
            let mut file = std::fs::File::create(&path).unwrap();
            writeln!(file, "#!/bin/sh\n{body}").unwrap();
            drop(file);
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            path
        }

        fn invoker(path: PathBuf, dir: &tempfile::TempDir) -> ProcessInvoker {
            ProcessInvoker::new(EngineBinary::probe(path), dir.path())
        }

        #[tokio::test]
        async fn test_captures_both_streams_and_status() {
            let dir = tempfile::tempdir().unwrap();
            let path = script(&dir, "echo \"out:$1:$2\"\necho oops >&2\nexit 3");
            let outcome = invoker(path, &dir)
                .invoke(
                    vec!["fetch".to_string(), "https://a.test".to_string()],
                    Duration::from_secs(5),
                )
                .await;
            assert_eq!(outcome.stdout, "out:fetch:https://a.test\n");
            assert_eq!(outcome.stderr, "oops\n");
            assert_eq!(outcome.status, 3);
            assert!(!outcome.is_success());
        }

        #[tokio::test]
        async fn test_runs_in_working_directory() {
            let dir = tempfile::tempdir().unwrap();
            let path = script(&dir, "pwd");
            let outcome = invoker(path, &dir)
                .invoke(vec![], Duration::from_secs(5))
                .await;
            assert!(outcome.is_success());
            let reported = std::fs::canonicalize(outcome.stdout.trim()).unwrap();
            assert_eq!(reported, std::fs::canonicalize(dir.path()).unwrap());
        }

        #[tokio::test]
        async fn test_timeout_kills_process() {
            let dir = tempfile::tempdir().unwrap();
            let marker = dir.path().join("finished");
            let path = script(
                &dir,
                &format!("sleep 2\ntouch {}", marker.display()),
            );
            let started = std::time::Instant::now();
            let outcome = invoker(path, &dir)
                .invoke(vec![], Duration::from_millis(200))
                .await;
            assert_eq!(outcome.status, FAILURE_STATUS);
            assert_eq!(outcome.stderr, "Timeout after 0.2s");
            assert!(outcome.stdout.is_empty());
            assert!(started.elapsed() < Duration::from_secs(2));

            // The script never reaches its last line once killed.
            tokio::time::sleep(Duration::from_millis(2500)).await;
            assert!(!marker.exists());
        }

        #[tokio::test]
        async fn test_timeout_covers_pipes_held_after_exit() {
            let dir = tempfile::tempdir().unwrap();
            // The engine exits at once but its background child keeps stdout open.
            let path = script(&dir, "sleep 3 &\necho header");
            let started = std::time::Instant::now();
            let outcome = invoker(path, &dir)
                .invoke(vec![], Duration::from_millis(500))
                .await;
            assert!(started.elapsed() < Duration::from_secs(2));
            assert_eq!(outcome.status, FAILURE_STATUS);
            assert_eq!(outcome.stderr, "Timeout after 0.5s");
        }

        #[tokio::test]
        async fn test_large_output_fully_drained() {
            let dir = tempfile::tempdir().unwrap();
            let path = script(&dir, "i=0\nwhile [ $i -lt 20000 ]; do echo 0123456789; i=$((i+1)); done");
            let outcome = invoker(path, &dir)
                .invoke(vec![], Duration::from_secs(10))
                .await;
            assert!(outcome.is_success());
            assert_eq!(outcome.stdout.len(), 20000 * 11);
        }
    }
}
