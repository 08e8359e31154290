//! Subprocess execution
//!
//! Runs a command-line client as a child process under a timeout and
//! normalizes whatever happens into a [`TestOutcome`].

use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

use super::{TestOutcome, TransportError};

/// Runs one child process per call
#[derive(Clone, Debug)]
pub struct CommandInvoker {
    timeout: Duration,
}

impl CommandInvoker {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run `program` with `args`; never returns an error, only failed outcomes
    pub async fn run(&self, program: &str, args: &[String]) -> TestOutcome {
        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = match tokio::time::timeout(self.timeout, command.output()).await {
            Err(_) => {
                debug!("{} timed out after {:?}", program, self.timeout);
                return TestOutcome::failure(TransportError::Timeout, "");
            }
            Ok(Err(e)) => {
                return TestOutcome::failure(TransportError::Unexpected(e.to_string()), "");
            }
            Ok(Ok(output)) => output,
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        normalize(output.status.success(), output.status.code(), &stdout, &stderr)
    }
}

/// Map a finished process onto the outcome taxonomy
pub fn normalize(success: bool, code: Option<i32>, stdout: &str, stderr: &str) -> TestOutcome {
    if !success {
        let stderr = match stderr.trim() {
            "" => match code {
                Some(code) => format!("exit status {code}"),
                None => "terminated by signal".to_string(),
            },
            text => text.to_string(),
        };
        return TestOutcome::failure(TransportError::NonZeroExit { code, stderr }, stdout);
    }

    if stdout.trim().is_empty() {
        return TestOutcome::failure(TransportError::EmptyResponse, stdout);
    }

    match serde_json::from_str(stdout) {
        Ok(payload) => TestOutcome::success(payload, stdout),
        Err(e) => TestOutcome::failure(TransportError::Parse(e.to_string()), stdout),
    }
}
