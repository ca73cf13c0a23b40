//! Application state and the top-level pick-then-exec driver.
//!
//! This module defines the ECS values shown in the menus and [`App`], which
//! walks cluster → task → container → launch exactly once.

use anyhow::{Context, Result};
use std::io::{BufRead, Write};

use crate::aws::EcsApi;
use crate::console::Prompt;
use crate::exec::{ExecSession, Launcher};
use crate::picker;

/// An ECS cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    /// Cluster name
    pub name: String,
    /// Full cluster ARN
    pub arn: String,
}

/// A task running in a cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Full task ARN
    pub arn: String,
    /// Last reported status (e.g., RUNNING)
    pub last_status: String,
    /// Whether ECS Exec was enabled when the task started
    pub exec_enabled: bool,
    /// Containers in task definition order
    pub containers: Vec<Container>,
}

/// A container within a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    /// Container name
    pub name: String,
}

/// Progress through a single run. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Start,
    ClusterSelected,
    TaskSelected,
    ContainerSelected,
    Launched,
    Terminated,
    Failed,
}

/// Drives one run of the pickers and the launcher.
pub struct App<'a, A: ?Sized, L: ?Sized, R, W> {
    /// Current stage
    pub state: AppState,
    api: &'a A,
    launcher: &'a L,
    prompt: Prompt<R, W>,
    command: String,
}

impl<'a, A, L, R, W> App<'a, A, L, R, W>
where
    A: EcsApi + ?Sized,
    L: Launcher + ?Sized,
    R: BufRead,
    W: Write,
{
    pub fn new(api: &'a A, launcher: &'a L, prompt: Prompt<R, W>, command: String) -> Self {
        Self {
            state: AppState::Start,
            api,
            launcher,
            prompt,
            command,
        }
    }

    /// Runs every stage in order. Any error leaves the app in
    /// [`AppState::Failed`]; there is no retry.
    pub async fn run(&mut self) -> Result<()> {
        match self.run_stages().await {
            Ok(()) => {
                self.advance(AppState::Terminated);
                Ok(())
            }
            Err(err) => {
                self.advance(AppState::Failed);
                Err(err)
            }
        }
    }

    async fn run_stages(&mut self) -> Result<()> {
        let cluster = picker::select_cluster(self.api, &mut self.prompt)
            .await
            .context("error selecting cluster")?;
        self.prompt.blank()?;
        self.advance(AppState::ClusterSelected);

        let task = picker::select_task(self.api, &mut self.prompt, &cluster)
            .await
            .context("error selecting task")?;
        self.prompt.blank()?;
        self.advance(AppState::TaskSelected);

        let container = picker::select_container(&mut self.prompt, &task)
            .context("error selecting container")?;
        self.prompt.blank()?;
        self.advance(AppState::ContainerSelected);

        let session = ExecSession {
            cluster: cluster.name,
            task_arn: task.arn,
            container: container.name,
            command: self.command.clone(),
        };
        self.advance(AppState::Launched);
        self.launcher
            .launch(&session)
            .await
            .context("error while running aws command")?;
        Ok(())
    }

    fn advance(&mut self, next: AppState) {
        tracing::debug!(from = ?self.state, to = ?next, "state transition");
        self.state = next;
    }

    #[cfg(test)]
    pub fn into_prompt(self) -> Prompt<R, W> {
        self.prompt
    }
}
