//! Tool token parsing
//!
//! `tools` shows up as a YAML list, a flow sequence, or a comma-separated
//! string. Tokens can carry an argument pattern such as `Bash(git:*)`.

use super::value_to_list;

/// Parse a `tools` value into de-duplicated tokens, first occurrence first
pub fn parse_tools(value: &serde_yaml::Value) -> Vec<String> {
    let raw_items = match value {
        serde_yaml::Value::String(s) => vec![s.clone()],
        other => value_to_list(other),
    };

    let mut tools: Vec<String> = Vec::new();
    for raw in raw_items {
        for token in split_tokens(&raw) {
            if !tools.iter().any(|t| t == &token) {
                tools.push(token);
            }
        }
    }
    tools
}

/// Split on commas that are not inside an argument pattern
fn split_tokens(raw: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();

    for c in raw.chars() {
        match c {
            '(' => {
                depth += 1;
                current.push(c);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            ',' if depth == 0 => {
                tokens.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    tokens.push(current);

    tokens
        .into_iter()
        .map(|t| t.trim().trim_matches('`').trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Tool name without its argument pattern: `Bash(git:*)` -> `Bash`
pub fn base_name(token: &str) -> &str {
    token.split('(').next().unwrap_or(token).trim()
}

/// Whether a token is allowed by a known-tool list. MCP tools (`mcp__server__tool`) always pass.
pub fn is_known(token: &str, known: &[String]) -> bool {
    let base = base_name(token);
    base.starts_with("mcp__") || known.iter().any(|k| k.eq_ignore_ascii_case(base))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_yaml::Value;

    #[test]
    fn test_parse_tools_string() {
        let value = Value::String("Read, Write, Edit, MultiEdit, Grep, Glob, Bash".into());
        assert_eq!(
            parse_tools(&value),
            vec!["Read", "Write", "Edit", "MultiEdit", "Grep", "Glob", "Bash"]
        );
    }

    #[test]
    fn test_parse_tools_sequence_dedupes() {
        let value: Value = serde_yaml::from_str("[Read, Grep, Read, \"Bash(git:*)\"]").unwrap();
        assert_eq!(parse_tools(&value), vec!["Read", "Grep", "Bash(git:*)"]);
    }

    #[test]
    fn test_parse_tools_argument_pattern_with_comma() {
        let value = Value::String("Bash(git add, git commit), Read".into());
        assert_eq!(parse_tools(&value), vec!["Bash(git add, git commit)", "Read"]);
    }

    #[test]
    fn test_base_name() {
        assert_eq!(base_name("Bash(git:*)"), "Bash");
        assert_eq!(base_name("Read"), "Read");
    }

    #[test]
    fn test_is_known() {
        let known = vec!["Read".to_string(), "Bash".to_string()];
        assert!(is_known("read", &known));
        assert!(is_known("Bash(npm:*)", &known));
        assert!(is_known("mcp__github__create_issue", &known));
        assert!(!is_known("Teleport", &known));
    }
}
