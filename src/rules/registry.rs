use super::narrow_types::NarrowTypesRule;
use super::traits::{RewriteRule, RuleId};
use super::unused_catch::UnusedCatchRule;
use super::unused_parameter::UnusedParameterRule;
use super::unused_variable::UnusedVariableRule;

/// Order the aggressive pipeline runs rules in unless configured otherwise.
pub const DEFAULT_ORDER: &[RuleId] = &[
    RuleId::NarrowTypes,
    RuleId::UnusedParameter,
    RuleId::UnusedVariable,
    RuleId::UnusedCatchBinding,
];

pub struct RuleRegistry {
    rules: Vec<RewriteRule>,
}

impl RuleRegistry {
    pub fn new(rules: Vec<RewriteRule>) -> Self {
        Self { rules }
    }

    pub fn find_rule(&self, id: RuleId) -> Option<&RewriteRule> {
        self.rules.iter().find(|r| r.id() == id)
    }

    /// Rules in `order`, skipping ids with no registered rule and repeats.
    pub fn ordered(&self, order: &[RuleId]) -> Vec<&RewriteRule> {
        let mut seen = Vec::new();
        let mut rules = Vec::new();
        for id in order {
            if seen.contains(id) {
                continue;
            }
            seen.push(*id);
            match self.find_rule(*id) {
                Some(rule) => rules.push(rule),
                None => tracing::warn!(rule = %id, "no rule registered"),
            }
        }
        rules
    }
}

pub fn default_registry<S: AsRef<str>>(remove_patterns: &[S]) -> RuleRegistry {
    let rules = vec![
        RewriteRule::ContentWide(Box::new(NarrowTypesRule::new())),
        RewriteRule::LineAnchored(Box::new(UnusedParameterRule)),
        RewriteRule::ContentWide(Box::new(UnusedVariableRule::new(remove_patterns))),
        RewriteRule::LineAnchored(Box::new(UnusedCatchRule)),
    ];
    RuleRegistry::new(rules)
}
