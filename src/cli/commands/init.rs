use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::{Path, PathBuf};

use crate::core::config::CONFIG_FILE;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path to the project (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Overwrite an existing .lintmend.yml
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Npm,
    Pnpm,
    Yarn,
    Bun,
}

impl PackageManager {
    pub fn detect(path: &Path) -> Self {
        if path.join("pnpm-lock.yaml").exists() {
            PackageManager::Pnpm
        } else if path.join("yarn.lock").exists() {
            PackageManager::Yarn
        } else if path.join("bun.lockb").exists() || path.join("bun.lock").exists() {
            PackageManager::Bun
        } else {
            PackageManager::Npm
        }
    }

    fn binary(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Pnpm => "pnpm",
            PackageManager::Yarn => "yarn",
            PackageManager::Bun => "bun",
        }
    }

    /// npm needs `--` before arguments meant for the script itself.
    fn script_args(&self, script: &str, args: &str) -> String {
        match self {
            PackageManager::Npm => format!("npm run {} -- {}", script, args),
            _ => format!("{} run {} {}", self.binary(), script, args),
        }
    }
}

impl std::fmt::Display for PackageManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.binary())
    }
}

pub async fn execute(args: &InitArgs) -> Result<()> {
    let path = args
        .path
        .canonicalize()
        .with_context(|| format!("cannot open project at {}", args.path.display()))?;
    let config_path = path.join(CONFIG_FILE);

    if config_path.exists() && !args.force {
        println!(
            "  {} {} already exists. Use {} to overwrite.",
            "SKIP".yellow(),
            CONFIG_FILE,
            "--force".bold()
        );
        return Ok(());
    }

    let manager = PackageManager::detect(&path);
    std::fs::write(&config_path, generate_config(manager))
        .with_context(|| format!("cannot write {}", config_path.display()))?;
    println!(
        "  {} {} created for {}",
        "DONE".green(),
        CONFIG_FILE,
        manager.to_string().cyan()
    );
    println!(
        "  Edit {} to change commands, exclusions, and rule order.",
        config_path.display()
    );

    Ok(())
}

fn generate_config(manager: PackageManager) -> String {
    let pm = manager.binary();
    let test = manager.script_args("test:run", "--run --reporter=basic");

    format!(
        r#"# lintmend configuration

commands:
  lint: "{pm} run lint"
  build: "{pm} run build"
  test: "{test}"

# Seconds before an analyzer, build, or test run counts as failed
timeout_secs: 600

extensions:
  - ts
  - tsx

# Paths containing any of these are never rewritten
exclude:
  - node_modules
  - dist
  - .vibe
  - scripts

# Batches run in this order, each followed by a build/test check
order:
  - narrow-types
  - unused-parameter
  - unused-variable
  - unused-catch-binding
"#
    )
}
