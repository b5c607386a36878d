use regex::Regex;

use super::traits::{LineRule, RuleId};
use crate::diagnostics::{Finding, FindingKind};

/// Characters that may not directly precede an identifier we rename.
const BOUNDARY: &str = r"(^|[^\w$])";

/// Prefixes an unused parameter with `_` so the analyzer ignores it.
pub struct UnusedParameterRule;

/// One place on the line where the parameter could be.
struct Site {
    /// Byte offset of the identifier, compared against the reported column.
    name_start: usize,
    priority: usize,
    start: usize,
    end: usize,
    /// `None` when this occurrence already carries the `_` prefix.
    replacement: Option<String>,
}

impl UnusedParameterRule {
    /// Ordered `(pattern, replacement tail)` candidates. A parameter can be
    /// fully parenthesized, typed, last, or followed by another parameter.
    fn candidates(name: &str) -> Vec<(Regex, String)> {
        let escaped = regex::escape(name);
        [
            (format!(r"{}\((?P<name>{})\)", BOUNDARY, escaped), format!("(_{})", name)),
            (format!(r"{}(?P<name>{}):", BOUNDARY, escaped), format!("_{}:", name)),
            (format!(r"{}(?P<name>{})\)", BOUNDARY, escaped), format!("_{})", name)),
            (format!(r"{}(?P<name>{}),", BOUNDARY, escaped), format!("_{},", name)),
        ]
        .into_iter()
        .filter_map(|(pattern, tail)| Regex::new(&pattern).ok().map(|r| (r, tail)))
        .collect()
    }

    fn sites(line: &str, name: &str) -> Vec<Site> {
        let mut sites = Vec::new();

        let prefixed = format!(r"{}(?P<name>_{})[:),]", BOUNDARY, regex::escape(name));
        if let Ok(regex) = Regex::new(&prefixed) {
            for caps in regex.captures_iter(line) {
                let (Some(whole), Some(ident)) = (caps.get(0), caps.name("name")) else {
                    continue;
                };
                sites.push(Site {
                    name_start: ident.start(),
                    priority: 0,
                    start: whole.start(),
                    end: whole.end(),
                    replacement: None,
                });
            }
        }

        for (priority, (regex, tail)) in Self::candidates(name).into_iter().enumerate() {
            for caps in regex.captures_iter(line) {
                let (Some(whole), Some(boundary), Some(ident)) =
                    (caps.get(0), caps.get(1), caps.name("name"))
                else {
                    continue;
                };
                sites.push(Site {
                    name_start: ident.start(),
                    priority: priority + 1,
                    start: whole.start(),
                    end: whole.end(),
                    replacement: Some(format!("{}{}", boundary.as_str(), tail)),
                });
            }
        }

        sites
    }
}

/// Byte offset of the 1-based character `column`, clamped to the line.
fn column_offset(line: &str, column: usize) -> usize {
    line.char_indices()
        .nth(column.saturating_sub(1))
        .map(|(offset, _)| offset)
        .unwrap_or(line.len())
}

impl LineRule for UnusedParameterRule {
    fn id(&self) -> RuleId {
        RuleId::UnusedParameter
    }

    fn describe(&self) -> &'static str {
        "Prefix unused parameters with '_'"
    }

    fn kind(&self) -> FindingKind {
        FindingKind::UnusedParameter
    }

    /// Rewrites the occurrence closest to the reported column. A same-named
    /// object key or argument elsewhere on the line is left alone.
    fn rewrite_line(&self, line: &str, finding: &Finding) -> Option<String> {
        let name = finding.captured.as_deref()?;
        if name.starts_with('_') {
            return Some(line.to_string());
        }

        let target = column_offset(line, finding.column);
        let site = Self::sites(line, name)
            .into_iter()
            .min_by_key(|s| (s.name_start.abs_diff(target), s.priority))?;

        match site.replacement {
            Some(replacement) => Some(format!(
                "{}{}{}",
                &line[..site.start],
                replacement,
                &line[site.end..]
            )),
            None => Some(line.to_string()),
        }
    }
}
