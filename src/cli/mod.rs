pub mod commands;
pub mod output;
pub mod progress;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "lintmend",
    version,
    about = "Apply lint fixes in batches, checking build and tests after each one"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run every configured rule, gated by build and tests
    Fix(commands::fix::FixArgs),
    /// Drop unused catch bindings only
    FixCatch(commands::fix::FixArgs),
    /// List the findings the analyzer currently reports
    Scan(commands::scan::ScanArgs),
    /// Write a .lintmend.yml for the project
    Init(commands::init::InitArgs),
}
