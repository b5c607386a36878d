mod cli;
mod core;
mod diagnostics;
mod fixers;
mod gate;
mod rules;
mod utils;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let succeeded = match &cli.command {
        Commands::Fix(args) => cli::commands::fix::execute(args).await?,
        Commands::FixCatch(args) => cli::commands::fix::execute_catch(args).await?,
        Commands::Scan(args) => {
            cli::commands::scan::execute(args).await?;
            true
        }
        Commands::Init(args) => {
            cli::commands::init::execute(args).await?;
            true
        }
    };

    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
