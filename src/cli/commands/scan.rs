use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use crate::cli::output::OutputFormatter;
use crate::cli::progress::StepProgress;
use crate::core::project::Project;
use crate::diagnostics::{analyze, LintCommand};

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Path to the project to scan (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Output format
    #[arg(long, default_value = "table", value_parser = ["table", "json"])]
    pub format: String,
}

/// Run the analyzer once and list the findings the fix rules would consume.
pub async fn execute(args: &ScanArgs) -> Result<()> {
    let project = Project::new(&args.path)?;
    let config = &project.config;
    let analyzer = LintCommand::new(&config.commands.lint, &project.path, config.timeout());

    let mut progress = StepProgress::new();
    if args.format != "json" {
        progress.start("Running analyzer...");
    }
    let pass = analyze(&analyzer).await;
    progress.finish();

    OutputFormatter::new(&args.format).display(&pass)
}
