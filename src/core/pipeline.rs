//! Sequences rewrite batches behind the integrity gate.
//!
//! The baseline must be green before anything is touched. Each rule then runs
//! as one batch; a batch that changed files is followed by a gate check, and a
//! failing check stops the run with the offending rule. Applied changes are
//! left in place for the operator to inspect or revert.

use serde::Serialize;
use std::time::{Duration, Instant};

use crate::diagnostics::{analyze, Analyzer, AnalyzerPass, IssueCount};
use crate::fixers::{BatchReport, BatchRunner};
use crate::gate::{IntegrityGate, IntegrityResult};
use crate::rules::{RewriteRule, RuleId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Checkpoint {
    Baseline,
    After(RuleId),
}

impl std::fmt::Display for Checkpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Checkpoint::Baseline => write!(f, "baseline"),
            Checkpoint::After(rule) => write!(f, "after {}", rule),
        }
    }
}

#[derive(Debug, Clone)]
pub enum PipelineEvent {
    GateStarted(Checkpoint),
    GateFinished(Checkpoint, IntegrityResult),
    AnalyzerStarted,
    AnalyzerFinished(IssueCount),
    BatchStarted { rule: RuleId, description: &'static str },
    FindingsCollected { rule: RuleId, count: usize },
    BatchFinished { rule: RuleId, report: BatchReport },
}

#[derive(Debug, Clone)]
pub enum PipelineOutcome {
    Completed,
    BaselineFailed(IntegrityResult),
    Regressed { rule: RuleId, result: IntegrityResult },
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchRecord {
    pub rule: RuleId,
    pub findings: usize,
    pub report: BatchReport,
}

#[derive(Debug, Clone)]
pub struct PipelineSummary {
    pub outcome: PipelineOutcome,
    pub batches: Vec<BatchRecord>,
    pub issues_before: Option<IssueCount>,
    pub issues_after: Option<IssueCount>,
    pub duration: Duration,
}

impl PipelineSummary {
    pub fn succeeded(&self) -> bool {
        matches!(self.outcome, PipelineOutcome::Completed)
    }

    /// Number of rules whose batch changed at least one file.
    pub fn rules_applied(&self) -> usize {
        self.batches.iter().filter(|b| !b.report.is_empty()).count()
    }

    pub fn files_changed(&self) -> usize {
        self.batches.iter().map(|b| b.report.files_changed).sum()
    }
}

pub struct Orchestrator<'a> {
    analyzer: &'a dyn Analyzer,
    gate: &'a mut dyn IntegrityGate,
    runner: &'a BatchRunner,
    rules: Vec<&'a RewriteRule>,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        analyzer: &'a dyn Analyzer,
        gate: &'a mut dyn IntegrityGate,
        runner: &'a BatchRunner,
        rules: Vec<&'a RewriteRule>,
    ) -> Self {
        Self {
            analyzer,
            gate,
            runner,
            rules,
        }
    }

    #[cfg(test)]
    pub async fn run(&mut self) -> PipelineSummary {
        self.run_with_progress(|_| {}).await
    }

    pub async fn run_with_progress<F>(&mut self, mut on_event: F) -> PipelineSummary
    where
        F: FnMut(&PipelineEvent),
    {
        let start = Instant::now();
        let mut summary = PipelineSummary {
            outcome: PipelineOutcome::Completed,
            batches: Vec::new(),
            issues_before: None,
            issues_after: None,
            duration: Duration::ZERO,
        };

        let baseline = self.check_gate(Checkpoint::Baseline, &mut on_event).await;
        if !baseline.passed {
            summary.outcome = PipelineOutcome::BaselineFailed(baseline);
            summary.duration = start.elapsed();
            return summary;
        }

        let before = self.analyze(&mut on_event).await;
        summary.issues_before = Some(before.count);
        // Findings stay valid until some batch changes a file.
        let mut current_pass = Some(before);

        for rule in self.rules.clone() {
            on_event(&PipelineEvent::BatchStarted {
                rule: rule.id(),
                description: rule.describe(),
            });

            let findings = if rule.needs_findings() {
                let pass = match current_pass.take() {
                    Some(pass) => pass,
                    None => self.analyze(&mut on_event).await,
                };
                let findings = pass.findings.clone();
                current_pass = Some(pass);
                on_event(&PipelineEvent::FindingsCollected {
                    rule: rule.id(),
                    count: findings.len(),
                });
                findings
            } else {
                Vec::new()
            };

            let report = self.runner.run(rule, &findings);
            on_event(&PipelineEvent::BatchFinished {
                rule: rule.id(),
                report,
            });
            summary.batches.push(BatchRecord {
                rule: rule.id(),
                findings: findings.len(),
                report,
            });

            if report.is_empty() {
                continue;
            }
            current_pass = None;

            let result = self.check_gate(Checkpoint::After(rule.id()), &mut on_event).await;
            if !result.passed {
                summary.outcome = PipelineOutcome::Regressed {
                    rule: rule.id(),
                    result,
                };
                summary.duration = start.elapsed();
                return summary;
            }
        }

        let after = self.analyze(&mut on_event).await;
        summary.issues_after = Some(after.count);
        summary.duration = start.elapsed();
        summary
    }

    async fn check_gate<F>(&mut self, checkpoint: Checkpoint, on_event: &mut F) -> IntegrityResult
    where
        F: FnMut(&PipelineEvent),
    {
        on_event(&PipelineEvent::GateStarted(checkpoint));
        let result = self.gate.check().await;
        on_event(&PipelineEvent::GateFinished(checkpoint, result.clone()));
        result
    }

    async fn analyze<F>(&self, on_event: &mut F) -> AnalyzerPass
    where
        F: FnMut(&PipelineEvent),
    {
        on_event(&PipelineEvent::AnalyzerStarted);
        let pass = analyze(self.analyzer).await;
        on_event(&PipelineEvent::AnalyzerFinished(pass.count));
        pass
    }
}
