use regex::Regex;

use super::traits::{ContentRule, RuleId};

/// Dead assignments removed when the config does not list its own.
pub const DEFAULT_REMOVE_PATTERNS: &[&str] = &[
    r"(?m)^[ \t]*const start = await client\.callTool.*\r?\n",
    r"(?m)^[ \t]*const conversationState =[ \t]*\r?\n\s*await this\.conversationManager.*\r?\n",
];

/// Deletes whole unused declarations matching known literal shapes.
///
/// Each pattern must consume complete lines including the trailing newline so
/// that no dangling indentation is left behind.
pub struct UnusedVariableRule {
    patterns: Vec<Regex>,
}

impl UnusedVariableRule {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Self {
        let patterns = patterns
            .iter()
            .filter_map(|p| match Regex::new(p.as_ref()) {
                Ok(regex) => Some(regex),
                Err(e) => {
                    tracing::warn!(pattern = p.as_ref(), error = %e, "ignoring invalid removal pattern");
                    None
                }
            })
            .collect();
        Self { patterns }
    }
}

impl Default for UnusedVariableRule {
    fn default() -> Self {
        Self::new(DEFAULT_REMOVE_PATTERNS)
    }
}

impl ContentRule for UnusedVariableRule {
    fn id(&self) -> RuleId {
        RuleId::UnusedVariable
    }

    fn describe(&self) -> &'static str {
        "Remove known unused variable declarations"
    }

    fn rewrite_content(&self, content: &str) -> String {
        let mut result = content.to_string();
        for regex in &self.patterns {
            result = regex.replace_all(&result, "").into_owned();
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removes_default_shapes() {
        let input = "\
async function run(client) {
    const start = await client.callTool('start', {});
    const conversationState =
      await this.conversationManager.load(id);
    return done();
}
";
        let expected = "\
async function run(client) {
    return done();
}
";
        assert_eq!(UnusedVariableRule::default().rewrite_content(input), expected);
    }

    #[test]
    fn test_custom_patterns_and_idempotence() {
        let rule = UnusedVariableRule::new(&[r"(?m)^\s*const _ignored = .*;\r?\n"]);
        let input = "a();\nconst _ignored = compute();\nb();\n";
        let once = rule.rewrite_content(input);
        assert_eq!(once, "a();\nb();\n");
        assert_eq!(rule.rewrite_content(&once), once);
    }

    #[test]
    fn test_invalid_pattern_is_skipped() {
        let rule = UnusedVariableRule::new(&["(unclosed", r"(?m)^x\n"]);
        assert_eq!(rule.rewrite_content("x\ny\n"), "y\n");
    }

    #[test]
    fn test_no_match_leaves_content() {
        let input = "const start = Date.now();\n";
        assert_eq!(UnusedVariableRule::default().rewrite_content(input), input);
    }
}
