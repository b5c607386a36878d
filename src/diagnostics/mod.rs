pub mod analyzer;
pub mod finding;
pub mod parser;

pub use analyzer::{analyze, Analyzer, AnalyzerPass, LintCommand};
pub use finding::{Finding, FindingKind, IssueCount};
