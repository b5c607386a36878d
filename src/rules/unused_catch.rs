use regex::{NoExpand, Regex};

use super::traits::{LineRule, RuleId};
use crate::diagnostics::{Finding, FindingKind};

/// Optional `: unknown` / `: any` annotation on a catch binding.
const ANNOTATION: &str = r"(?:\s*:\s*(?:unknown|any))?";

/// Drops an unused catch binding: `} catch (error) {` becomes `} catch {`.
pub struct UnusedCatchRule;

impl LineRule for UnusedCatchRule {
    fn id(&self) -> RuleId {
        RuleId::UnusedCatchBinding
    }

    fn describe(&self) -> &'static str {
        "Remove unused catch bindings"
    }

    fn kind(&self) -> FindingKind {
        FindingKind::UnusedCatchBinding
    }

    fn rewrite_line(&self, line: &str, finding: &Finding) -> Option<String> {
        let name = regex::escape(finding.captured.as_deref()?);

        let substitutions = [
            (
                format!(r"\}}\s*catch\s*\(\s*{}{}\s*\)\s*\{{", name, ANNOTATION),
                "} catch {",
            ),
            (
                format!(r"\bcatch\s*\(\s*{}{}\s*\)\s*\{{", name, ANNOTATION),
                "catch {",
            ),
        ];

        for (pattern, replacement) in &substitutions {
            let Ok(regex) = Regex::new(pattern) else {
                continue;
            };
            if regex.is_match(line) {
                return Some(regex.replacen(line, 1, NoExpand(replacement)).into_owned());
            }
        }

        let bare_catch = Regex::new(r"\bcatch\s*\{").ok()?;
        bare_catch.is_match(line).then(|| line.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn rewrite(line: &str, name: &str) -> Option<String> {
        let finding = Finding {
            kind: FindingKind::UnusedCatchBinding,
            file: PathBuf::from("src/a.ts"),
            line: 1,
            column: 1,
            captured: Some(name.to_string()),
        };
        UnusedCatchRule.rewrite_line(line, &finding)
    }

    #[test]
    fn test_removes_binding_after_closing_brace() {
        assert_eq!(rewrite("  } catch (error) {", "error").as_deref(), Some("  } catch {"));
    }

    #[test]
    fn test_normalizes_spacing() {
        assert_eq!(
            rewrite("    }catch ( error ){", "error").as_deref(),
            Some("    } catch {")
        );
    }

    #[test]
    fn test_catch_on_its_own_line() {
        assert_eq!(
            rewrite("  catch (e) {", "e").as_deref(),
            Some("  catch {")
        );
    }

    #[test]
    fn test_annotated_binding() {
        assert_eq!(
            rewrite("} catch (err: unknown) {", "err").as_deref(),
            Some("} catch {")
        );
    }

    #[test]
    fn test_idempotent() {
        let once = rewrite("} catch (error) {", "error").unwrap();
        assert_eq!(rewrite(&once, "error").as_deref(), Some("} catch {"));
    }

    #[test]
    fn test_other_binding_name_is_no_match() {
        assert_eq!(rewrite("} catch (cause) {", "error"), None);
        assert_eq!(rewrite("const error = 1;", "error"), None);
    }

    #[test]
    fn test_leaves_rest_of_line_intact() {
        assert_eq!(
            rewrite("try { run(); } catch (error) { /* ignore */ }", "error").as_deref(),
            Some("try { run(); } catch { /* ignore */ }")
        );
    }
}
