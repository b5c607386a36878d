use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FindingKind {
    UnusedParameter,
    UnusedVariable,
    UnusedCatchBinding,
}

impl std::fmt::Display for FindingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FindingKind::UnusedParameter => write!(f, "unused-parameter"),
            FindingKind::UnusedVariable => write!(f, "unused-variable"),
            FindingKind::UnusedCatchBinding => write!(f, "unused-catch-binding"),
        }
    }
}

/// One analyzer diagnostic anchored to a source location.
///
/// `line` is where the analyzer put its marker, which is not always the first
/// line of the offending construct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub kind: FindingKind,
    /// Path as printed by the analyzer, relative to the project root.
    pub file: PathBuf,
    /// 1-based.
    pub line: usize,
    /// 1-based.
    pub column: usize,
    pub captured: Option<String>,
}

impl Finding {
    pub fn location(&self) -> String {
        format!("{}:{}:{}", self.file.display(), self.line, self.column)
    }
}

/// Warning and error totals from one analyzer pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueCount {
    pub warnings: usize,
    pub errors: usize,
}

impl IssueCount {
    pub fn total(&self) -> usize {
        self.warnings + self.errors
    }
}

impl std::fmt::Display for IssueCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} warnings, {} errors", self.warnings, self.errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_display_matches_serde_name() {
        for kind in [
            FindingKind::UnusedParameter,
            FindingKind::UnusedVariable,
            FindingKind::UnusedCatchBinding,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind));
        }
    }

    #[test]
    fn test_finding_location() {
        let finding = Finding {
            kind: FindingKind::UnusedParameter,
            file: PathBuf::from("src/app.ts"),
            line: 12,
            column: 5,
            captured: Some("req".to_string()),
        };
        assert_eq!(finding.location(), "src/app.ts:12:5");
    }

    #[test]
    fn test_issue_count_total() {
        let count = IssueCount {
            warnings: 3,
            errors: 2,
        };
        assert_eq!(count.total(), 5);
        assert_eq!(count.to_string(), "3 warnings, 2 errors");
    }
}
