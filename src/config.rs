//! Command-line configuration for ecs-exec.
//!
//! There is no configuration file: the two flags below are the whole surface.
//! Credentials and profiles are resolved by the AWS SDK's default chain.

use clap::Parser;

/// Interactively pick an ECS cluster, task and container, then open an
/// `aws ecs execute-command` session into it.
#[derive(Debug, Clone, Parser)]
#[command(name = "ecs-exec", version, about)]
pub struct Config {
    /// The command to run inside the container
    #[arg(short, long, default_value_t = default_command())]
    pub command: String,

    /// The AWS region
    #[arg(short, long, default_value_t = default_region())]
    pub region: String,
}

fn default_command() -> String {
    "sh".to_string()
}

fn default_region() -> String {
    "ap-southeast-2".to_string()
}
