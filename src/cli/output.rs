use anyhow::Result;
use colored::*;
use std::path::Path;

use crate::cli::progress::StepProgress;
use crate::core::pipeline::{PipelineEvent, PipelineOutcome, PipelineSummary};
use crate::diagnostics::AnalyzerPass;
use crate::gate::IntegrityResult;

/// Lines of failing build/test output echoed to the terminal.
const FAILURE_TAIL_LINES: usize = 20;

pub fn print_header(title: &str, project: &Path) {
    println!();
    println!("{}", title.bold());
    println!("{}", "─".repeat(64));
    println!("  Project: {}", project.to_string_lossy().cyan());
    println!();
}

pub fn print_event(event: &PipelineEvent, progress: &mut StepProgress) {
    match event {
        PipelineEvent::GateStarted(checkpoint) => {
            progress.start(format!("Checking build and tests ({})...", checkpoint));
        }
        PipelineEvent::GateFinished(checkpoint, result) => {
            progress.finish();
            if result.passed {
                println!("  {} integrity check ({})", "PASS".green(), checkpoint);
            } else {
                let stage = result
                    .failed_stage
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "gate".to_string());
                println!("  {} {} failed ({})", "FAIL".red(), stage, checkpoint);
                print_failure_tail(result);
            }
        }
        PipelineEvent::AnalyzerStarted => progress.start("Running analyzer..."),
        PipelineEvent::AnalyzerFinished(count) => {
            progress.finish();
            println!("  {} {}", "LINT".cyan(), count);
        }
        PipelineEvent::BatchStarted { rule, description } => {
            println!();
            println!("{} {}", format!("[{}]", rule).bold(), description);
        }
        PipelineEvent::FindingsCollected { count, .. } => {
            println!("  {} finding(s) located", count);
        }
        PipelineEvent::BatchFinished { report, .. } => {
            let changed = format!("{} file(s) changed", report.files_changed);
            let changed = if report.is_empty() {
                changed.dimmed()
            } else {
                changed.green()
            };
            println!(
                "  {} ({} fix(es), {} miss(es), {} skipped)",
                changed, report.fixes_applied, report.misses, report.skipped
            );
        }
    }
}

fn print_failure_tail(result: &IntegrityResult) {
    let Some(output) = result.failure_output() else {
        return;
    };
    if output.timed_out {
        println!("    {}", "timed out".yellow());
    }
    let combined = format!("{}\n{}", output.stdout, output.stderr);
    let lines: Vec<&str> = combined.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(FAILURE_TAIL_LINES);
    for line in &lines[start..] {
        println!("    {}", line.dimmed());
    }
}

pub fn print_summary(summary: &PipelineSummary) {
    println!();
    println!("{}", "─".repeat(64));
    match &summary.outcome {
        PipelineOutcome::Completed => {
            println!("  {}", "Auto-fix complete".green().bold());
        }
        PipelineOutcome::BaselineFailed(_) => {
            println!(
                "  {}",
                "Baseline build/tests fail; nothing was changed.".red().bold()
            );
        }
        PipelineOutcome::Regressed { rule, result } => {
            let stage = result
                .failed_stage
                .map(|s| s.to_string())
                .unwrap_or_else(|| "gate".to_string());
            println!(
                "  {} {} failed after the {} batch; its changes are still on disk.",
                "HALTED".red().bold(),
                stage,
                rule.to_string().bold()
            );
        }
    }

    println!(
        "  Applied {} rule(s), {} file(s) changed in {:.1}s",
        summary.rules_applied(),
        summary.files_changed(),
        summary.duration.as_secs_f64()
    );
    if let Some(before) = summary.issues_before {
        println!("  Before:    {}", before);
    }
    if let Some(after) = summary.issues_after {
        println!("  Remaining: {}", after);
        if let Some(before) = summary.issues_before {
            let fixed = before.total().saturating_sub(after.total());
            if fixed > 0 {
                println!("  {} {} issue(s) resolved", "✓".green(), fixed);
            }
        }
    }
    if summary.succeeded() && summary.rules_applied() > 0 {
        println!();
        println!(
            "  {}",
            "Commit these changes and run again for more fixes.".dimmed()
        );
    }
    println!();
}

pub struct OutputFormatter {
    format: String,
}

impl OutputFormatter {
    pub fn new(format: &str) -> Self {
        Self {
            format: format.to_string(),
        }
    }

    pub fn display(&self, pass: &AnalyzerPass) -> Result<()> {
        match self.format.as_str() {
            "json" => self.display_json(pass),
            _ => {
                self.display_table(pass);
                Ok(())
            }
        }
    }

    fn display_json(&self, pass: &AnalyzerPass) -> Result<()> {
        let output = serde_json::json!({
            "findings": pass.findings,
            "issues": pass.count,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }

    fn display_table(&self, pass: &AnalyzerPass) {
        println!();
        if pass.findings.is_empty() {
            println!("  {}", "No fixable findings.".green());
        } else {
            println!(
                "  {:<22} {:<40} {}",
                "Kind".bold(),
                "Location".bold(),
                "Identifier".bold()
            );
            println!("  {}", "─".repeat(72));
            for finding in &pass.findings {
                println!(
                    "  {:<22} {:<40} {}",
                    finding.kind.to_string().yellow(),
                    finding.location(),
                    finding.captured.as_deref().unwrap_or("-")
                );
            }
        }
        println!();
        println!(
            "  {} fixable finding(s); analyzer reported {}",
            pass.findings.len(),
            pass.count
        );
        println!();
    }
}
