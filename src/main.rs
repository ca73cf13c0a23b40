//! ecs-exec - pick an ECS container from numbered menus and exec into it
//!
//! Lists clusters, then tasks, then containers, each as a plain numbered menu
//! on stdout, and finally hands the terminal to `aws ecs execute-command`.

mod app;
mod aws;
mod config;
mod console;
mod error;
mod exec;
mod picker;

use std::process::ExitCode;

use app::App;
use aws::EcsClient;
use clap::Parser;
use config::Config;
use console::Prompt;
use exec::AwsCliLauncher;
use tracing_subscriber::EnvFilter;

/// Application entry point.
///
/// Everything runs on a single thread: the API calls are awaited one after
/// another and console reads block. Any failure is printed to stderr and the
/// process exits with status 1.
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let config = Config::parse();

    // Logs go to stderr so they never interleave with the menus on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(region = %config.region, command = %config.command, "starting");

    let client = EcsClient::new(Some(config.region.clone())).await;
    let launcher = AwsCliLauncher::new(Some(config.region.clone()));
    let mut app = App::new(&client, &launcher, Prompt::stdio(), config.command);

    match app.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(state = ?app.state, "run failed");
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
