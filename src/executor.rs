//! Shell command execution with bounded output capture.
//!
//! Commands run through `sh -c`, exactly as supplied by the caller. Only
//! stdout is captured; stderr stays attached to the server's own stderr
//! unless the command redirects it. Captured output is truncated at
//! [`MAX_OUTPUT`] bytes.

use std::process::Stdio;
use tokio::io::AsyncReadExt;
use tokio::process::Command;

/// Maximum number of captured output bytes per command.
pub const MAX_OUTPUT: usize = 2048;

/// Outcome of a completed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Process exit code; -1 when the process was terminated by a signal.
    pub status: i32,
    /// Captured stdout, at most [`MAX_OUTPUT`] bytes.
    pub output: Vec<u8>,
}

/// Command execution errors. A command that runs and exits non-zero is
/// not an error; these cover failures to invoke or observe the shell.
#[derive(Debug)]
pub enum ExecError {
    /// The shell itself could not be spawned.
    Spawn(std::io::Error),
    /// Reading the output pipe failed.
    Capture(std::io::Error),
    /// Waiting for the child failed.
    Wait(std::io::Error),
}

impl std::fmt::Display for ExecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecError::Spawn(e) => write!(f, "Failed to spawn shell: {}", e),
            ExecError::Capture(e) => write!(f, "Failed to read command output: {}", e),
            ExecError::Wait(e) => write!(f, "Failed to wait for command: {}", e),
        }
    }
}

impl std::error::Error for ExecError {}

/// Run `command` through the host shell and capture its stdout.
///
/// Output past [`MAX_OUTPUT`] bytes is drained and discarded so the child
/// can finish writing and report its real exit status.
pub async fn run(command: &str) -> Result<CommandOutput, ExecError> {
    let mut child = Command::new("sh")
        .arg("-c")
        .arg(command)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .spawn()
        .map_err(ExecError::Spawn)?;

    let mut output = Vec::with_capacity(1024);
    if let Some(stdout) = child.stdout.take() {
        let mut limited = stdout.take(MAX_OUTPUT as u64);
        limited
            .read_to_end(&mut output)
            .await
            .map_err(ExecError::Capture)?;

        let mut rest = limited.into_inner();
        let mut sink = tokio::io::sink();
        tokio::io::copy(&mut rest, &mut sink)
            .await
            .map_err(ExecError::Capture)?;
    }

    let status = child.wait().await.map_err(ExecError::Wait)?;
    Ok(CommandOutput {
        status: status.code().unwrap_or(-1),
        output,
    })
}
