use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use crate::cli::output;
use crate::cli::progress::StepProgress;
use crate::core::pipeline::Orchestrator;
use crate::core::project::Project;
use crate::diagnostics::LintCommand;
use crate::fixers::BatchRunner;
use crate::gate::{CommandGate, IntegrityGate};
use crate::rules::{default_registry, RuleId};

#[derive(Args, Debug)]
pub struct FixArgs {
    /// Path to the project to fix (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

/// Run every configured rule, in the configured order.
pub async fn execute(args: &FixArgs) -> Result<bool> {
    let project = Project::new(&args.path)?;
    let order = project.config.order.clone();
    run_pipeline(&project, &order, "lintmend: aggressive auto-fix").await
}

/// Run only the catch-binding rule.
pub async fn execute_catch(args: &FixArgs) -> Result<bool> {
    let project = Project::new(&args.path)?;
    run_pipeline(
        &project,
        &[RuleId::UnusedCatchBinding],
        "lintmend: unused catch bindings",
    )
    .await
}

async fn run_pipeline(project: &Project, order: &[RuleId], title: &str) -> Result<bool> {
    let config = &project.config;
    let registry = default_registry(config.remove_patterns.as_slice());
    let rules = registry.ordered(order);

    let analyzer = LintCommand::new(&config.commands.lint, &project.path, config.timeout());
    let mut gate = CommandGate::new(
        &config.commands.build,
        &config.commands.test,
        &project.path,
        config.timeout(),
    );
    let runner = runner_for(project);

    output::print_header(title, &project.path);

    let mut progress = StepProgress::new();
    let summary = Orchestrator::new(&analyzer, &mut gate, &runner, rules)
        .run_with_progress(|event| output::print_event(event, &mut progress))
        .await;
    progress.finish();
    tracing::debug!(state = ?gate.state(), "integrity gate settled");

    output::print_summary(&summary);
    Ok(summary.succeeded())
}

fn runner_for(project: &Project) -> BatchRunner {
    BatchRunner::new(
        project.path.as_path(),
        project.config.extensions.clone(),
        project.config.exclude.clone(),
    )
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::core::config::CONFIG_FILE;
    use std::fs;
    use tempfile::TempDir;

    fn write_project(tmp: &TempDir, build: &str) {
        fs::create_dir_all(tmp.path().join("src")).unwrap();
        fs::write(
            tmp.path().join("src/a.ts"),
            "const x: any = foo();\ntry {\n} catch (error) {\n}\n",
        )
        .unwrap();
        fs::write(
            tmp.path().join("lint.txt"),
            "  ! Catch parameter 'error' is caught but never used.\n   ,-[src/a.ts:3:3]\n",
        )
        .unwrap();
        let config = format!(
            "commands:\n  lint: cat lint.txt >&2\n  build: \"{}\"\n  test: \"true\"\ntimeout_secs: 30\n",
            build
        );
        fs::write(tmp.path().join(CONFIG_FILE), config).unwrap();
    }

    #[tokio::test]
    async fn test_fix_applies_all_rules() {
        let tmp = TempDir::new().unwrap();
        write_project(&tmp, "true");
        let args = FixArgs {
            path: tmp.path().to_path_buf(),
        };

        assert!(execute(&args).await.unwrap());
        assert_eq!(
            fs::read_to_string(tmp.path().join("src/a.ts")).unwrap(),
            "const x: unknown = foo();\ntry {\n} catch {\n}\n"
        );
    }

    #[tokio::test]
    async fn test_fix_catch_only_touches_catch_bindings() {
        let tmp = TempDir::new().unwrap();
        write_project(&tmp, "true");
        let args = FixArgs {
            path: tmp.path().to_path_buf(),
        };

        assert!(execute_catch(&args).await.unwrap());
        assert_eq!(
            fs::read_to_string(tmp.path().join("src/a.ts")).unwrap(),
            "const x: any = foo();\ntry {\n} catch {\n}\n"
        );
    }

    #[tokio::test]
    async fn test_fix_reports_failure_when_build_breaks() {
        let tmp = TempDir::new().unwrap();
        // passes on the original tree, fails once `unknown` appears
        write_project(&tmp, "! grep -q unknown src/a.ts");
        let args = FixArgs {
            path: tmp.path().to_path_buf(),
        };

        assert!(!execute(&args).await.unwrap());
        // the catch batch comes later and never ran
        let content = fs::read_to_string(tmp.path().join("src/a.ts")).unwrap();
        assert!(content.contains("catch (error)"));
    }
}
