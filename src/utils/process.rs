use anyhow::{Context, Result};
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
    pub timed_out: bool,
}

fn shell(command_line: &str) -> Command {
    #[cfg(windows)]
    {
        let mut cmd = Command::new("cmd");
        cmd.arg("/C").arg(command_line);
        cmd
    }
    #[cfg(not(windows))]
    {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command_line);
        cmd
    }
}

/// Run a shell command line in `cwd`, capturing both streams.
///
/// The child is killed when `timeout` expires; that is reported as a failed
/// run with `timed_out` set, not as an error. Errors are reserved for a
/// command that could not be started at all.
pub async fn run_shell(command_line: &str, cwd: &Path, timeout: Duration) -> Result<CommandOutput> {
    let child = shell(command_line)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .with_context(|| format!("failed to start `{}`", command_line))?;

    match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(output) => {
            let output = output.with_context(|| format!("failed to wait for `{}`", command_line))?;
            Ok(CommandOutput {
                success: output.status.success(),
                stdout: String::from_utf8_lossy(&output.stdout).to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
                timed_out: false,
            })
        }
        Err(_) => {
            tracing::warn!(command = command_line, ?timeout, "command timed out");
            Ok(CommandOutput {
                success: false,
                stdout: String::new(),
                stderr: format!("timed out after {}s", timeout.as_secs()),
                timed_out: true,
            })
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_captures_streams_and_status() {
        let tmp = TempDir::new().unwrap();
        let out = run_shell("echo out; echo err >&2", tmp.path(), Duration::from_secs(10))
            .await
            .unwrap();
        assert!(out.success);
        assert_eq!(out.stdout.trim(), "out");
        assert_eq!(out.stderr.trim(), "err");
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_failure() {
        let tmp = TempDir::new().unwrap();
        let out = run_shell("exit 3", tmp.path(), Duration::from_secs(10))
            .await
            .unwrap();
        assert!(!out.success);
        assert!(!out.timed_out);
    }

    #[tokio::test]
    async fn test_runs_in_given_directory() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("marker.txt"), "here").unwrap();
        let out = run_shell("cat marker.txt", tmp.path(), Duration::from_secs(10))
            .await
            .unwrap();
        assert_eq!(out.stdout, "here");
    }

    #[tokio::test]
    async fn test_timeout_counts_as_failure() {
        let tmp = TempDir::new().unwrap();
        let out = run_shell("sleep 5", tmp.path(), Duration::from_millis(100))
            .await
            .unwrap();
        assert!(!out.success);
        assert!(out.timed_out);
    }
}
