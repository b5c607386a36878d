//! Extracts located findings from analyzer output.
//!
//! The analyzer prints a human-readable message line followed, a few lines
//! later, by a location marker such as `,-[src/app.ts:12:5]`. A message whose
//! marker cannot be found within the lookahead window is dropped: a finding
//! without a confirmed location is never guessed at.

use regex::Regex;
use std::path::PathBuf;
use std::sync::OnceLock;

use super::finding::{Finding, FindingKind, IssueCount};

/// Maximum number of lines after a message that may hold its location marker.
pub const LOOKAHEAD: usize = 5;

struct MessagePattern {
    kind: FindingKind,
    regex: &'static str,
}

const MESSAGE_PATTERNS: &[MessagePattern] = &[
    MessagePattern {
        kind: FindingKind::UnusedCatchBinding,
        regex: r"Catch parameter '([^']+)' is caught but never used",
    },
    MessagePattern {
        kind: FindingKind::UnusedParameter,
        regex: r"\bParameter '([^']+)' is declared but never used",
    },
    MessagePattern {
        kind: FindingKind::UnusedVariable,
        regex: r"\bVariable '([^']+)' is declared but never used",
    },
];

/// Marker prefixes that open a bracketed `path:line:col` location.
const MARKER_PREFIXES: &[&str] = &[",-[", "╭─["];

const LOCATION_PATTERN: &str = r"(?:,-|╭─)\[(.+):(\d+):(\d+)\]";
const FOOTER_PATTERN: &str = r"Found (\d+) warnings? and (\d+) errors?";

pub struct DiagnosticParser {
    messages: Vec<(FindingKind, Regex)>,
    location: Regex,
}

impl DiagnosticParser {
    pub fn new() -> Self {
        let messages = MESSAGE_PATTERNS
            .iter()
            .filter_map(|p| Regex::new(p.regex).ok().map(|r| (p.kind, r)))
            .collect();
        Self {
            messages,
            location: Regex::new(LOCATION_PATTERN).expect("location pattern compiles"),
        }
    }

    /// Parse the full analyzer stream into findings, in output order.
    pub fn parse(&self, output: &str) -> Vec<Finding> {
        let lines: Vec<&str> = output.lines().collect();
        let mut findings = Vec::new();

        for (i, line) in lines.iter().enumerate() {
            let Some((kind, captured)) = self.match_message(line) else {
                continue;
            };

            let window_end = (i + 1 + LOOKAHEAD).min(lines.len());
            for candidate in &lines[i + 1..window_end] {
                // The next diagnostic, of any rule, started before we saw a location.
                if diagnostic_header(candidate).is_some() || self.match_message(candidate).is_some() {
                    break;
                }
                if !MARKER_PREFIXES.iter().any(|m| candidate.contains(m)) {
                    continue;
                }
                if let Some((file, line_no, column)) = self.match_location(candidate) {
                    findings.push(Finding {
                        kind,
                        file,
                        line: line_no,
                        column,
                        captured: captured.clone(),
                    });
                } else {
                    tracing::debug!(marker = %candidate.trim(), "unparseable location marker");
                }
                break;
            }
        }

        findings
    }

    fn match_message(&self, line: &str) -> Option<(FindingKind, Option<String>)> {
        self.messages.iter().find_map(|(kind, regex)| {
            regex
                .captures(line)
                .map(|caps| (*kind, caps.get(1).map(|m| m.as_str().to_string())))
        })
    }

    fn match_location(&self, line: &str) -> Option<(PathBuf, usize, usize)> {
        let caps = self.location.captures(line)?;
        let file = caps.get(1)?.as_str().trim();
        let line_no: usize = caps.get(2)?.as_str().parse().ok()?;
        let column: usize = caps.get(3)?.as_str().parse().ok()?;
        if file.is_empty() || line_no == 0 {
            return None;
        }
        Some((PathBuf::from(file), line_no, column))
    }
}

impl Default for DiagnosticParser {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Header {
    Warning,
    Error,
}

/// Severity of a line that opens a diagnostic (`! `/`⚠` or `x `/`×`).
fn diagnostic_header(line: &str) -> Option<Header> {
    let trimmed = line.trim_start();
    if trimmed.starts_with("! ") || trimmed.starts_with('⚠') {
        Some(Header::Warning)
    } else if trimmed.starts_with("x ") || trimmed.starts_with('×') {
        Some(Header::Error)
    } else {
        None
    }
}

fn shared_parser() -> &'static DiagnosticParser {
    static PARSER: OnceLock<DiagnosticParser> = OnceLock::new();
    PARSER.get_or_init(DiagnosticParser::new)
}

pub fn parse_findings(output: &str) -> Vec<Finding> {
    shared_parser().parse(output)
}

/// Count warnings and errors in one analyzer pass.
///
/// Prefers the analyzer's own `Found N warnings and M errors.` footer and
/// falls back to counting diagnostic header lines.
pub fn count_issues(output: &str) -> IssueCount {
    static FOOTER: OnceLock<Regex> = OnceLock::new();
    let footer = FOOTER.get_or_init(|| Regex::new(FOOTER_PATTERN).expect("footer pattern compiles"));

    if let Some(caps) = output.lines().rev().find_map(|l| footer.captures(l)) {
        let warnings = caps[1].parse().unwrap_or(0);
        let errors = caps[2].parse().unwrap_or(0);
        return IssueCount { warnings, errors };
    }

    let mut count = IssueCount::default();
    for line in output.lines() {
        match diagnostic_header(line) {
            Some(Header::Warning) => count.warnings += 1,
            Some(Header::Error) => count.errors += 1,
            None => {}
        }
    }
    count
}
