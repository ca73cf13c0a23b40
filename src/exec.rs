//! Launching the interactive exec session.
//!
//! The session itself is delegated to the AWS CLI (`aws ecs execute-command`),
//! which drives the session-manager-plugin. The child inherits this process's
//! stdin, stdout and stderr so it behaves like a local shell.

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::LaunchError;

/// Everything needed to open a session into one container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecSession {
    /// Cluster name
    pub cluster: String,
    /// Full task ARN
    pub task_arn: String,
    /// Container name within the task
    pub container: String,
    /// Command to run inside the container
    pub command: String,
}

impl ExecSession {
    /// Arguments for `aws` that open this session interactively.
    pub fn cli_args(&self, region: Option<&str>) -> Vec<String> {
        let mut args = vec!["ecs".to_string(), "execute-command".to_string()];
        if let Some(region) = region {
            args.extend(["--region".to_string(), region.to_string()]);
        }
        args.extend([
            "--cluster".to_string(),
            self.cluster.clone(),
            "--task".to_string(),
            self.task_arn.clone(),
            "--container".to_string(),
            self.container.clone(),
            "--interactive".to_string(),
            "--command".to_string(),
            self.command.clone(),
        ]);
        args
    }
}

/// Starts an exec session and blocks until it ends.
#[async_trait]
pub trait Launcher: Send + Sync {
    async fn launch(&self, session: &ExecSession) -> Result<(), LaunchError>;
}

/// Runs the session through the `aws` command-line tool.
pub struct AwsCliLauncher {
    program: String,
    region: Option<String>,
}

impl AwsCliLauncher {
    pub fn new(region: Option<String>) -> Self {
        Self {
            program: "aws".to_string(),
            region,
        }
    }

    #[cfg(test)]
    fn with_program(program: &str) -> Self {
        Self {
            program: program.to_string(),
            region: None,
        }
    }
}

#[async_trait]
impl Launcher for AwsCliLauncher {
    async fn launch(&self, session: &ExecSession) -> Result<(), LaunchError> {
        let args = session.cli_args(self.region.as_deref());
        tracing::info!(program = %self.program, ?args, "starting exec session");

        // `status` leaves stdin, stdout and stderr inherited.
        let status = Command::new(&self.program)
            .args(&args)
            .status()
            .await
            .map_err(|source| LaunchError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !status.success() {
            return Err(LaunchError::Exit { status });
        }
        tracing::info!("exec session ended");
        Ok(())
    }
}
