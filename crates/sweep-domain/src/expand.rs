//! Build-variable substitution for configured text.
//!
//! Supported forms: `$NAME` (`[A-Za-z0-9_]+`), `${NAME}` (`[A-Za-z0-9_.]+`)
//! and `$$` for a literal dollar sign. References to unknown variables are
//! left in place untouched.

use std::collections::HashMap;

fn is_bare_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn is_braced_name_char(c: char) -> bool {
    is_bare_name_char(c) || c == '.'
}

/// Substitute variable references in `text` from `env`.
#[must_use]
pub fn expand(text: &str, env: &HashMap<String, String>) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        if let Some(tail) = after.strip_prefix('$') {
            out.push('$');
            rest = tail;
            continue;
        }

        if let Some(inner) = after.strip_prefix('{') {
            if let Some(end) = inner.find('}') {
                let name = &inner[..end];
                if !name.is_empty() && name.chars().all(is_braced_name_char) {
                    match env.get(name) {
                        Some(value) => out.push_str(value),
                        None => {
                            out.push_str("${");
                            out.push_str(name);
                            out.push('}');
                        }
                    }
                    rest = &inner[end + 1..];
                    continue;
                }
            }
            out.push('$');
            rest = after;
            continue;
        }

        let len = after
            .find(|c: char| !is_bare_name_char(c))
            .unwrap_or(after.len());
        if len == 0 {
            out.push('$');
            rest = after;
            continue;
        }

        let name = &after[..len];
        match env.get(name) {
            Some(value) => out.push_str(value),
            None => {
                out.push('$');
                out.push_str(name);
            }
        }
        rest = &after[len..];
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env() -> HashMap<String, String> {
        HashMap::from([
            ("BUILD_NUMBER".to_string(), "42".to_string()),
            ("JOB_NAME".to_string(), "release".to_string()),
            ("git.branch".to_string(), "main".to_string()),
        ])
    }

    #[test]
    fn bare_and_braced_references() {
        assert_eq!(
            expand("fixVersion = ${JOB_NAME}-$BUILD_NUMBER", &env()),
            "fixVersion = release-42"
        );
    }

    #[test]
    fn braced_names_may_contain_dots() {
        assert_eq!(expand("branch ${git.branch}", &env()), "branch main");
        // bare form stops at the dot
        assert_eq!(expand("$git.branch", &env()), "$git.branch");
    }

    #[test]
    fn unknown_variables_are_left_verbatim() {
        assert_eq!(expand("$MISSING and ${ALSO_MISSING}", &env()), "$MISSING and ${ALSO_MISSING}");
    }

    #[test]
    fn double_dollar_is_literal() {
        assert_eq!(expand("cost: $$BUILD_NUMBER", &env()), "cost: $BUILD_NUMBER");
    }

    #[test]
    fn stray_dollars_and_unterminated_braces() {
        assert_eq!(expand("$ 5", &env()), "$ 5");
        assert_eq!(expand("trailing $", &env()), "trailing $");
        assert_eq!(expand("${BUILD_NUMBER", &env()), "${BUILD_NUMBER");
        assert_eq!(expand("${}", &env()), "${}");
        assert_eq!(expand("${has space}", &env()), "${has space}");
    }

    #[test]
    fn text_without_references_is_unchanged() {
        let jql = "project = ABC AND status = \"In Review\"";
        assert_eq!(expand(jql, &env()), jql);
    }

    #[test]
    fn multibyte_text_survives() {
        assert_eq!(expand("Résolu par $JOB_NAME ✓", &env()), "Résolu par release ✓");
    }
}
