use anyhow::Result;
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;

use super::finding::{Finding, IssueCount};
use super::parser::{count_issues, parse_findings};
use crate::utils::process::run_shell;

/// Source of raw diagnostic text.
#[async_trait]
pub trait Analyzer: Send + Sync {
    fn name(&self) -> &str;
    /// Run one pass and return the diagnostic stream.
    async fn run(&self) -> Result<String>;
}

/// The external lint command. Its stderr carries the diagnostics; a non-zero
/// exit is normal whenever it reports errors, so the status is ignored.
pub struct LintCommand {
    command: String,
    cwd: PathBuf,
    timeout: Duration,
}

impl LintCommand {
    pub fn new(command: impl Into<String>, cwd: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            command: command.into(),
            cwd: cwd.into(),
            timeout,
        }
    }
}

#[async_trait]
impl Analyzer for LintCommand {
    fn name(&self) -> &str {
        &self.command
    }

    async fn run(&self) -> Result<String> {
        let output = run_shell(&self.command, &self.cwd, self.timeout).await?;
        if output.timed_out {
            anyhow::bail!("`{}` timed out", self.command);
        }
        let mut text = output.stderr;
        if !output.stdout.is_empty() {
            if !text.is_empty() && !text.ends_with('\n') {
                text.push('\n');
            }
            text.push_str(&output.stdout);
        }
        Ok(text)
    }
}

#[derive(Debug, Clone, Default)]
pub struct AnalyzerPass {
    pub findings: Vec<Finding>,
    pub count: IssueCount,
}

/// Run the analyzer once and parse its output.
///
/// A failed run is logged and yields an empty pass: with no diagnostics there
/// is nothing to fix, which is the safe reading.
pub async fn analyze(analyzer: &dyn Analyzer) -> AnalyzerPass {
    match analyzer.run().await {
        Ok(text) => AnalyzerPass {
            findings: parse_findings(&text),
            count: count_issues(&text),
        },
        Err(e) => {
            tracing::warn!(analyzer = analyzer.name(), error = %e, "analyzer run failed");
            AnalyzerPass::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::finding::FindingKind;

    struct FixedOutput(&'static str);

    #[async_trait]
    impl Analyzer for FixedOutput {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn run(&self) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct Broken;

    #[async_trait]
    impl Analyzer for Broken {
        fn name(&self) -> &str {
            "broken"
        }

        async fn run(&self) -> Result<String> {
            anyhow::bail!("lint binary missing")
        }
    }

    #[tokio::test]
    async fn test_analyze_parses_findings_and_counts() {
        let analyzer = FixedOutput(
            "  ! Parameter 'x' is declared but never used.\n   ,-[src/a.ts:1:12]\nFound 1 warning and 0 errors.\n",
        );
        let pass = analyze(&analyzer).await;
        assert_eq!(pass.findings.len(), 1);
        assert_eq!(pass.findings[0].kind, FindingKind::UnusedParameter);
        assert_eq!(pass.count.warnings, 1);
    }

    #[tokio::test]
    async fn test_failed_run_is_empty_pass() {
        let pass = analyze(&Broken).await;
        assert!(pass.findings.is_empty());
        assert_eq!(pass.count.total(), 0);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_lint_command_reads_stderr() {
        let tmp = tempfile::TempDir::new().unwrap();
        let cmd = LintCommand::new(
            "printf \"  ! Variable 'v' is declared but never used.\\n   ,-[src/v.ts:4:7]\\n\" >&2; exit 1",
            tmp.path(),
            Duration::from_secs(10),
        );
        let pass = analyze(&cmd).await;
        assert_eq!(pass.findings.len(), 1);
        assert_eq!(pass.findings[0].kind, FindingKind::UnusedVariable);
        assert_eq!(pass.findings[0].line, 4);
    }
}
