//! Error types for the picker and launcher stages.
//!
//! Pickers and the launcher return these typed errors; the driver in
//! [`crate::app`] attaches stage context with `anyhow` and decides to exit.

use std::fmt;
use std::io;
use std::num::ParseIntError;
use std::process::ExitStatus;

use thiserror::Error;

/// The remote API call that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiStage {
    ListClusters,
    DescribeClusters,
    ListTasks,
    DescribeTasks,
}

impl fmt::Display for ApiStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stage = match self {
            ApiStage::ListClusters => "list clusters",
            ApiStage::DescribeClusters => "describe clusters",
            ApiStage::ListTasks => "list tasks",
            ApiStage::DescribeTasks => "describe tasks",
        };
        f.write_str(stage)
    }
}

/// Errors produced while presenting a menu and reading a selection.
#[derive(Debug, Error)]
pub enum PickError {
    #[error("failed to {stage}")]
    Api {
        stage: ApiStage,
        #[source]
        source: aws_sdk_ecs::Error,
    },
    #[error("failed to get user input")]
    Input(#[source] io::Error),
    #[error("failed to write menu")]
    Output(#[source] io::Error),
    #[error("selection was not a number: {input:?}")]
    NotANumber {
        input: String,
        #[source]
        source: ParseIntError,
    },
    #[error("selection out of range: {selection} (expected 0..{len})")]
    OutOfRange { selection: i64, len: usize },
    #[error("no {0} found")]
    Empty(&'static str),
}

impl PickError {
    pub fn api(stage: ApiStage) -> impl FnOnce(aws_sdk_ecs::Error) -> Self {
        move |source| PickError::Api { stage, source }
    }
}

/// Errors from running the external exec session.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("failed to start `{program}`")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("session exited with {status}")]
    Exit { status: ExitStatus },
}
