use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::patcher::{rewrite_line_at, FilePatcher, PatchOutcome};
use crate::diagnostics::Finding;
use crate::rules::{ContentRule, LineRule, RewriteRule};
use crate::utils::fs::find_source_files;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub files_changed: usize,
    pub fixes_applied: usize,
    /// Findings whose pattern was not at the reported line.
    pub misses: usize,
    /// Excluded files and I/O failures.
    pub skipped: usize,
}

impl BatchReport {
    /// A batch that changed no file needs no integrity check.
    pub fn is_empty(&self) -> bool {
        self.files_changed == 0
    }
}

/// Applies one rule across the project.
pub struct BatchRunner {
    patcher: FilePatcher,
    extensions: Vec<String>,
    exclude: Vec<String>,
}

impl BatchRunner {
    pub fn new(root: impl Into<PathBuf>, extensions: Vec<String>, exclude: Vec<String>) -> Self {
        Self {
            patcher: FilePatcher::new(root, exclude.clone()),
            extensions,
            exclude,
        }
    }

    pub fn run(&self, rule: &RewriteRule, findings: &[Finding]) -> BatchReport {
        match rule {
            RewriteRule::LineAnchored(rule) => self.run_line_rule(rule.as_ref(), findings),
            RewriteRule::ContentWide(rule) => self.run_content_rule(rule.as_ref()),
        }
    }

    /// Apply `rule` once per matching finding, re-reading the file each time.
    pub fn run_line_rule(&self, rule: &dyn LineRule, findings: &[Finding]) -> BatchReport {
        let mut by_file: BTreeMap<&Path, Vec<&Finding>> = BTreeMap::new();
        for finding in findings.iter().filter(|f| f.kind == rule.kind()) {
            by_file.entry(finding.file.as_path()).or_default().push(finding);
        }

        let mut report = BatchReport::default();
        for (file, file_findings) in by_file {
            let mut changed = false;
            for finding in file_findings {
                let outcome = self.patcher.patch(file, |content| {
                    rewrite_line_at(content, finding.line, |line| rule.rewrite_line(line, finding))
                });
                match outcome {
                    PatchOutcome::Changed => {
                        changed = true;
                        report.fixes_applied += 1;
                    }
                    PatchOutcome::Unchanged => {}
                    PatchOutcome::NoMatch => {
                        tracing::debug!(rule = %rule.id(), location = %finding.location(), "pattern not found at reported line");
                        report.misses += 1;
                    }
                    PatchOutcome::Skipped => report.skipped += 1,
                }
            }
            if changed {
                report.files_changed += 1;
            }
        }
        report
    }

    /// Apply `rule` to every candidate source file.
    pub fn run_content_rule(&self, rule: &dyn ContentRule) -> BatchReport {
        let mut report = BatchReport::default();
        for file in find_source_files(self.patcher.root(), &self.extensions, &self.exclude) {
            match self.patcher.patch(&file, |content| Some(rule.rewrite_content(content))) {
                PatchOutcome::Changed => {
                    report.files_changed += 1;
                    report.fixes_applied += 1;
                }
                PatchOutcome::Skipped => report.skipped += 1,
                PatchOutcome::Unchanged | PatchOutcome::NoMatch => {}
            }
        }
        report
    }
}
