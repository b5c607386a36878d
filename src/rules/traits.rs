use serde::{Deserialize, Serialize};

use crate::diagnostics::{Finding, FindingKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleId {
    NarrowTypes,
    UnusedParameter,
    UnusedVariable,
    UnusedCatchBinding,
}

impl std::fmt::Display for RuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleId::NarrowTypes => write!(f, "narrow-types"),
            RuleId::UnusedParameter => write!(f, "unused-parameter"),
            RuleId::UnusedVariable => write!(f, "unused-variable"),
            RuleId::UnusedCatchBinding => write!(f, "unused-catch-binding"),
        }
    }
}

/// A rewrite applied to the single line a finding points at.
///
/// Implementations must never introduce or remove a line break, so the line
/// numbers of later findings in the same file stay valid.
pub trait LineRule: Send + Sync {
    fn id(&self) -> RuleId;

    fn describe(&self) -> &'static str;

    /// Finding kind this rule consumes
    fn kind(&self) -> FindingKind;

    /// Rewrite `line` for `finding`.
    ///
    /// Returns `None` when the expected pattern is absent (stale or mismatched
    /// finding) and `Some(line)` unchanged when the line is already fixed.
    fn rewrite_line(&self, line: &str, finding: &Finding) -> Option<String>;
}

/// A rewrite applied to whole file content, independent of findings.
pub trait ContentRule: Send + Sync {
    fn id(&self) -> RuleId;

    fn describe(&self) -> &'static str;

    /// Apply every pattern. Running it on its own output changes nothing.
    fn rewrite_content(&self, content: &str) -> String;
}

pub enum RewriteRule {
    LineAnchored(Box<dyn LineRule>),
    ContentWide(Box<dyn ContentRule>),
}

impl RewriteRule {
    pub fn id(&self) -> RuleId {
        match self {
            RewriteRule::LineAnchored(rule) => rule.id(),
            RewriteRule::ContentWide(rule) => rule.id(),
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            RewriteRule::LineAnchored(rule) => rule.describe(),
            RewriteRule::ContentWide(rule) => rule.describe(),
        }
    }

    pub fn needs_findings(&self) -> bool {
        matches!(self, RewriteRule::LineAnchored(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_id_display_matches_config_name() {
        for id in [
            RuleId::NarrowTypes,
            RuleId::UnusedParameter,
            RuleId::UnusedVariable,
            RuleId::UnusedCatchBinding,
        ] {
            let parsed: RuleId = serde_yaml::from_str(&id.to_string()).unwrap();
            assert_eq!(parsed, id);
        }
    }
}
