//! Front matter detection
//!
//! Explicit `---` blocks are parsed as YAML. Documents without one are
//! searched for an inline block: a fenced YAML snippet, or a run of
//! `key: value` lines naming schema fields.

use indexmap::IndexMap;
use lazy_regex::regex_is_match;
use serde::Serialize;
use std::fmt;

use super::Field;

/// Minimum number of schema keys a run of `key: value` lines needs to count as front matter
const MIN_INLINE_FIELDS: usize = 2;

/// Why an explicit front matter block could not be used
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FrontMatterError {
    /// Opening `---` without a closing delimiter
    Unclosed,
    /// Block is not valid YAML
    InvalidYaml { message: String, line: Option<usize> },
    /// Block is valid YAML but not a mapping
    NotAMapping,
}

impl FrontMatterError {
    pub fn line(&self) -> Option<usize> {
        match self {
            FrontMatterError::Unclosed => Some(1),
            FrontMatterError::InvalidYaml { line, .. } => *line,
            FrontMatterError::NotAMapping => Some(1),
        }
    }
}

impl fmt::Display for FrontMatterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrontMatterError::Unclosed => write!(f, "no closing front matter delimiter (---) found"),
            FrontMatterError::InvalidYaml { message, .. } => write!(f, "invalid YAML in front matter: {}", message),
            FrontMatterError::NotAMapping => write!(f, "front matter is not a key/value mapping"),
        }
    }
}

/// Explicit front matter, if the file opens with one
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Explicit<'a> {
    None,
    Unclosed,
    Block { text: &'a str, first_line: usize },
}

/// Result of splitting a file into front matter and body
#[derive(Debug, Clone)]
pub struct Split<'a> {
    pub explicit: Explicit<'a>,
    pub body: &'a str,
    /// 1-based line number of the first body line
    pub body_line: usize,
}

/// Inline front matter found in a document body
#[derive(Debug, Clone)]
pub struct InlineBlock {
    pub metadata: IndexMap<String, serde_yaml::Value>,
    /// 0-based body line of each key
    pub key_lines: IndexMap<String, usize>,
    /// First body line of the block (0-based)
    pub first: usize,
    /// Last body line of the block (0-based, inclusive)
    pub last: usize,
}

fn is_delimiter(line: &str, closing: bool) -> bool {
    let line = line.trim_end();
    line == "---" || (closing && line == "...")
}

/// Split off an explicit `---` delimited block
pub fn split_front_matter(content: &str) -> Split<'_> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let mut offset = 0;
    let mut lines = content.split_inclusive('\n').enumerate();

    // Leading blank lines are allowed before the opening delimiter
    let opening = loop {
        match lines.next() {
            Some((_, line)) if line.trim().is_empty() => offset += line.len(),
            Some((idx, line)) => break Some((idx, line)),
            None => break None,
        }
    };

    let Some((open_idx, open_line)) = opening else {
        return Split {
            explicit: Explicit::None,
            body: content,
            body_line: 1,
        };
    };

    if !is_delimiter(open_line, false) {
        return Split {
            explicit: Explicit::None,
            body: content,
            body_line: 1,
        };
    }

    let block_start = offset + open_line.len();
    let mut cursor = block_start;
    for (idx, line) in lines {
        if is_delimiter(line, true) {
            return Split {
                explicit: Explicit::Block {
                    text: &content[block_start..cursor],
                    first_line: open_idx + 2,
                },
                body: &content[cursor + line.len()..],
                body_line: idx + 2,
            };
        }
        cursor += line.len();
    }

    Split {
        explicit: Explicit::Unclosed,
        body: content,
        body_line: 1,
    }
}

/// Parse a YAML block into an ordered mapping plus the line of each key
pub fn parse_mapping(
    text: &str,
    first_line: usize,
) -> Result<(IndexMap<String, serde_yaml::Value>, IndexMap<String, usize>), FrontMatterError> {
    if text.trim().is_empty() {
        return Ok((IndexMap::new(), IndexMap::new()));
    }

    let value: serde_yaml::Value = serde_yaml::from_str(text).map_err(|e| FrontMatterError::InvalidYaml {
        line: e.location().map(|loc| first_line + loc.line().saturating_sub(1)),
        message: e.to_string(),
    })?;

    let mapping = match value {
        serde_yaml::Value::Mapping(mapping) => mapping,
        serde_yaml::Value::Null => return Ok((IndexMap::new(), IndexMap::new())),
        _ => return Err(FrontMatterError::NotAMapping),
    };

    let metadata: IndexMap<String, serde_yaml::Value> = mapping
        .into_iter()
        .map(|(key, value)| (super::value_to_string(&key), value))
        .collect();

    let mut key_lines = IndexMap::new();
    for (idx, line) in text.lines().enumerate() {
        if line.starts_with(char::is_whitespace) {
            continue;
        }
        if let Some((key, _)) = line.split_once(':') {
            let key = key.trim().trim_matches(|c| c == '"' || c == '\'');
            if metadata.contains_key(key) && !key_lines.contains_key(key) {
                key_lines.insert(key.to_string(), first_line + idx);
            }
        }
    }

    Ok((metadata, key_lines))
}

/// Find inline front matter in a body without an explicit block
pub fn extract_inline(body: &str) -> Option<InlineBlock> {
    let lines: Vec<&str> = body.lines().collect();
    extract_fenced(&lines).or_else(|| extract_key_values(&lines))
}

/// Opening marker of a fenced code line, if it is one
pub fn fence_marker(line: &str) -> Option<&'static str> {
    let trimmed = line.trim_start();
    if trimmed.starts_with("```") {
        Some("```")
    } else if trimmed.starts_with("~~~") {
        Some("~~~")
    } else {
        None
    }
}

/// A fenced `yaml` (or untagged) block whose mapping names the agent
fn extract_fenced(lines: &[&str]) -> Option<InlineBlock> {
    let mut idx = 0;
    while idx < lines.len() {
        let Some(marker) = fence_marker(lines[idx]) else {
            idx += 1;
            continue;
        };
        let lang = lines[idx].trim_start().trim_start_matches(marker).trim().to_lowercase();
        let open = idx;
        let close = lines[open + 1..]
            .iter()
            .position(|l| l.trim_start().starts_with(marker))
            .map(|p| open + 1 + p)?;

        if matches!(lang.as_str(), "yaml" | "yml" | "") {
            let text = lines[open + 1..close].join("\n");
            if let Ok((metadata, key_lines)) = parse_mapping(&text, open + 1) {
                let names_agent = metadata
                    .keys()
                    .any(|k| matches!(Field::from_key(k), Some(Field::Name) | Some(Field::Description)));
                if names_agent {
                    return Some(InlineBlock {
                        metadata,
                        key_lines,
                        first: open,
                        last: close,
                    });
                }
            }
        }
        idx = close + 1;
    }
    None
}

/// Split `**Key**: value`, `Key: value` or `- **Key:** value` into its parts
fn split_key_value(line: &str) -> Option<(String, String)> {
    let trimmed = line.trim();
    let trimmed = trimmed.strip_prefix("- ").unwrap_or(trimmed);
    let (raw_key, raw_value) = trimmed.split_once(':')?;
    let key = raw_key.trim().trim_matches(|c| c == '*' || c == '_' || c == '`').trim();
    if !regex_is_match!(r"^[A-Za-z][A-Za-z0-9 _-]{0,40}$", key) {
        return None;
    }
    let value = raw_value.trim().trim_start_matches("**").trim_start_matches("__").trim();
    Some((key.to_string(), value.to_string()))
}

fn bullet_item(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    if !line.starts_with(char::is_whitespace) && !trimmed.starts_with("- ") {
        return None;
    }
    trimmed
        .strip_prefix("- ")
        .or_else(|| trimmed.strip_prefix("* "))
        .map(str::trim)
}

/// A run of consecutive `key: value` lines with enough schema keys
fn extract_key_values(lines: &[&str]) -> Option<InlineBlock> {
    let mut in_fence: Option<&str> = None;
    let mut idx = 0;

    while idx < lines.len() {
        let line = lines[idx];
        if let Some(marker) = fence_marker(line) {
            in_fence = match in_fence {
                Some(open) if open == marker => None,
                Some(open) => Some(open),
                None => Some(marker),
            };
            idx += 1;
            continue;
        }
        if in_fence.is_some() || split_key_value(line).is_none() {
            idx += 1;
            continue;
        }

        let first = idx;
        let mut metadata = IndexMap::new();
        let mut key_lines = IndexMap::new();
        let mut last = idx;

        while idx < lines.len() {
            let Some((key, value)) = split_key_value(lines[idx]) else {
                break;
            };
            let key_idx = idx;
            idx += 1;

            let yaml_value = if value.is_empty() {
                // `key:` followed by an indented or dashed list
                let mut items = Vec::new();
                while idx < lines.len() {
                    match bullet_item(lines[idx]) {
                        Some(item) if split_key_value(lines[idx]).is_none() || lines[idx].starts_with(' ') => {
                            items.push(serde_yaml::Value::String(item.to_string()));
                            idx += 1;
                        }
                        _ => break,
                    }
                }
                if items.is_empty() {
                    serde_yaml::Value::Null
                } else {
                    serde_yaml::Value::Sequence(items)
                }
            } else {
                serde_yaml::Value::String(value)
            };

            if !metadata.contains_key(&key) {
                key_lines.insert(key.clone(), key_idx);
                metadata.insert(key, yaml_value);
            }
            last = idx - 1;
        }

        let schema_keys = metadata.keys().filter(|k| Field::from_key(k).is_some()).count();
        if schema_keys >= MIN_INLINE_FIELDS {
            return Some(InlineBlock {
                metadata,
                key_lines,
                first,
                last,
            });
        }

        if idx == first {
            idx += 1;
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_explicit_block() {
        let content = "---\nname: a\n---\n# Body\n";
        let split = split_front_matter(content);
        assert_eq!(
            split.explicit,
            Explicit::Block {
                text: "name: a\n",
                first_line: 2
            }
        );
        assert_eq!(split.body, "# Body\n");
        assert_eq!(split.body_line, 4);
    }

    #[test]
    fn test_split_leading_blank_lines() {
        let content = "\n\n---\nname: a\n---\nbody";
        let split = split_front_matter(content);
        assert_eq!(
            split.explicit,
            Explicit::Block {
                text: "name: a\n",
                first_line: 4
            }
        );
        assert_eq!(split.body_line, 6);
    }

    #[test]
    fn test_split_no_front_matter() {
        let split = split_front_matter("# Title\n\nText\n");
        assert_eq!(split.explicit, Explicit::None);
        assert_eq!(split.body_line, 1);
    }

    #[test]
    fn test_split_unclosed() {
        let split = split_front_matter("---\nname: a\n");
        assert_eq!(split.explicit, Explicit::Unclosed);
    }

    #[test]
    fn test_split_dot_terminator() {
        let split = split_front_matter("---\nname: a\n...\nbody\n");
        assert!(matches!(split.explicit, Explicit::Block { .. }));
        assert_eq!(split.body, "body\n");
    }

    #[test]
    fn test_parse_mapping_invalid_yaml() {
        let err = parse_mapping("name: [unclosed\n", 2).unwrap_err();
        assert!(matches!(err, FrontMatterError::InvalidYaml { .. }));
    }

    #[test]
    fn test_parse_mapping_not_a_mapping() {
        assert_eq!(parse_mapping("- a\n- b\n", 2).unwrap_err(), FrontMatterError::NotAMapping);
    }

    #[test]
    fn test_parse_mapping_key_lines() {
        let (metadata, key_lines) = parse_mapping("name: a\ntools:\n  - Read\n\"description\": d\n", 2).unwrap();
        assert_eq!(metadata.len(), 3);
        assert_eq!(key_lines.get("name"), Some(&2));
        assert_eq!(key_lines.get("tools"), Some(&3));
        assert_eq!(key_lines.get("description"), Some(&5));
    }

    #[test]
    fn test_extract_fenced_yaml() {
        let body = "# Agent\n\n```yaml\nname: fenced\ndescription: In a fence\n```\n\nMore text\n";
        let block = extract_inline(body).unwrap();
        assert_eq!(block.first, 2);
        assert_eq!(block.last, 5);
        assert_eq!(block.metadata.get("name"), Some(&serde_yaml::Value::String("fenced".into())));
    }

    #[test]
    fn test_fenced_code_without_agent_keys_is_ignored() {
        let body = "```yaml\nversion: 2\nservices: {}\n```\n";
        assert!(extract_inline(body).is_none());
    }

    #[test]
    fn test_extract_key_values_with_list() {
        let body = "Intro\n\nname: lister\ndescription: Lists\nsub_domains:\n  - one\n  - two\nexpertise_level: senior\n\nText\n";
        let block = extract_inline(body).unwrap();
        assert_eq!(block.first, 2);
        assert_eq!(block.last, 7);
        assert_eq!(
            block.metadata.get("sub_domains"),
            Some(&serde_yaml::Value::Sequence(vec![
                serde_yaml::Value::String("one".into()),
                serde_yaml::Value::String("two".into()),
            ]))
        );
        assert_eq!(block.key_lines.get("expertise_level"), Some(&7));
    }

    #[test]
    fn test_single_schema_key_is_not_front_matter() {
        let body = "Note: this is prose\nName: only one\n";
        assert!(extract_inline(body).is_none());
    }

    #[test]
    fn test_key_values_inside_code_fence_are_ignored() {
        let body = "```python\nname: x\ndescription: y\n```\n";
        assert!(extract_inline(body).is_none());
    }

    #[test]
    fn test_split_key_value_emphasis() {
        assert_eq!(
            split_key_value("**Expertise Level**: Expert"),
            Some(("Expertise Level".to_string(), "Expert".to_string()))
        );
        assert_eq!(
            split_key_value("- **Tools:** Read, Grep"),
            Some(("Tools".to_string(), "Read, Grep".to_string()))
        );
        assert_eq!(split_key_value("# Heading: with colon"), None);
    }
}
