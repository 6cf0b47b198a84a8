//! External renderer invocation
//!
//! [`Runner`] is the process boundary: it receives a complete argument list
//! and reports the combined output or the failure. Argument building lives in
//! [`crate::options`].

use async_trait::async_trait;
use std::fmt;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tracing::debug;

#[derive(Debug)]
pub enum RenderError {
    /// The renderer could not be started (missing binary, permissions)
    Spawn(std::io::Error),
    /// The renderer did not finish within the configured limit and was killed
    Timeout(Duration),
    /// The renderer exited unsuccessfully
    Failed { code: Option<i32>, output: String },
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::Spawn(err) => write!(f, "failed to start renderer: {}", err),
            RenderError::Timeout(limit) => {
                write!(f, "renderer timed out after {}s", limit.as_secs_f64())
            }
            RenderError::Failed {
                code: Some(code),
                output,
            } => write!(f, "exit status {}: {}", code, output),
            RenderError::Failed { code: None, output } => {
                write!(f, "terminated by signal: {}", output)
            }
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::Spawn(err) => Some(err),
            _ => None,
        }
    }
}

#[async_trait]
pub trait Runner: Send + Sync {
    /// Run the renderer to completion, returning its combined stdout and
    /// stderr on a zero exit status.
    async fn run(&self, args: &[String]) -> Result<Vec<u8>, RenderError>;

    /// Version string reported by the renderer
    async fn version(&self) -> Result<String, RenderError> {
        let output = self.run(&["--version".to_string()]).await?;
        Ok(String::from_utf8_lossy(&output).into_owned())
    }
}

/// Runs the `wkhtmltopdf` binary as a subprocess
#[derive(Debug, Clone)]
pub struct WkhtmltopdfRunner {
    program: PathBuf,
    timeout: Option<Duration>,
}

impl WkhtmltopdfRunner {
    pub fn new(program: impl Into<PathBuf>, timeout: Option<Duration>) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }
}

#[async_trait]
impl Runner for WkhtmltopdfRunner {
    async fn run(&self, args: &[String]) -> Result<Vec<u8>, RenderError> {
        let started_at = Instant::now();
        let mut command = Command::new(&self.program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        // Dropping the pending future on timeout kills the child
        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, command.output())
                .await
                .map_err(|_| RenderError::Timeout(limit))?,
            None => command.output().await,
        }
        .map_err(RenderError::Spawn)?;

        let mut combined = output.stdout;
        combined.extend_from_slice(&output.stderr);

        debug!(
            program = ?self.program,
            status = ?output.status.code(),
            elapsed_ms = started_at.elapsed().as_millis() as u64,
            "Renderer finished"
        );

        if output.status.success() {
            Ok(combined)
        } else {
            Err(RenderError::Failed {
                code: output.status.code(),
                output: String::from_utf8_lossy(&combined).into_owned(),
            })
        }
    }
}
