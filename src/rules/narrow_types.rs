use regex::Regex;

use super::traits::{ContentRule, RuleId};

/// `(pattern, replacement)` pairs applied in order. No replacement contains
/// `any`, so a second pass finds nothing to do.
///
/// The `=` tail must not be the start of `=>` or `==`: an arrow function's
/// return annotation is a signature, not a declaration.
const NARROWINGS: &[(&str, &str)] = &[
    (r"(:\s*)any(\s*(?:;|=(?:[^>=]|$)))", "${1}unknown${2}"),
    (r"\bPromise<any>", "Promise<unknown>"),
    (r"\bany\[\]", "unknown[]"),
    (r"\bRecord<string,\s*any>", "Record<string, unknown>"),
];

/// Replaces simple `any` annotations with `unknown`.
pub struct NarrowTypesRule {
    patterns: Vec<(Regex, &'static str)>,
}

impl NarrowTypesRule {
    pub fn new() -> Self {
        let patterns = NARROWINGS
            .iter()
            .filter_map(|(pattern, replacement)| Regex::new(pattern).ok().map(|r| (r, *replacement)))
            .collect();
        Self { patterns }
    }
}

impl Default for NarrowTypesRule {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentRule for NarrowTypesRule {
    fn id(&self) -> RuleId {
        RuleId::NarrowTypes
    }

    fn describe(&self) -> &'static str {
        "Narrow 'any' annotations to 'unknown'"
    }

    fn rewrite_content(&self, content: &str) -> String {
        let mut result = content.to_string();
        for (regex, replacement) in &self.patterns {
            result = regex.replace_all(&result, *replacement).into_owned();
        }
        result
    }
}
