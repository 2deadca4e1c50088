//! Canonical front matter rendering
//!
//! Known fields come first in schema order, list fields as YAML sequences,
//! then any other keys in their original order and spelling.

use eyre::{Context, Result};
use serde_yaml::{Mapping, Value};

use super::frontmatter::{Explicit, split_front_matter};
use super::{AgentDocument, Field, FrontMatterKind};

/// Canonical front matter mapping for a document
pub fn front_matter_mapping(doc: &AgentDocument) -> Mapping {
    let mut mapping = Mapping::new();

    for field in Field::ALL {
        let value = if field.is_list() {
            doc.list_field(field)
                .map(|items| Value::Sequence(items.iter().cloned().map(Value::String).collect()))
        } else {
            doc.string_field(field).map(|s| Value::String(s.to_string()))
        };
        if let Some(value) = value {
            mapping.insert(Value::String(field.key().to_string()), value);
        }
    }

    for (key, value) in doc.extra() {
        mapping.insert(Value::String(key.clone()), value.clone());
    }

    mapping
}

/// Front matter as YAML text, without delimiters
pub fn render_front_matter(doc: &AgentDocument) -> Result<String> {
    serde_yaml::to_string(&front_matter_mapping(doc))
        .with_context(|| format!("Failed to serialize front matter for {}", doc.path.display()))
}

/// Body with any inline front matter block removed
fn body_without_inline(doc: &AgentDocument) -> String {
    let Some((first, last)) = doc.inline_span else {
        return doc.body.clone();
    };

    let mut out = String::with_capacity(doc.body.len());
    for (idx, line) in doc.body.lines().enumerate() {
        if idx >= first && idx <= last {
            continue;
        }
        out.push_str(line);
        out.push('\n');
    }
    collapse_blank_runs(&out)
}

fn collapse_blank_runs(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut blank = false;
    for line in text.lines() {
        let is_blank = line.trim().is_empty();
        if is_blank && blank {
            continue;
        }
        blank = is_blank;
        out.push_str(line);
        out.push('\n');
    }
    out
}

/// Whether the explicit front matter of `content` carries `#` comment lines,
/// which re-serialisation would drop
pub fn has_front_matter_comments(content: &str) -> bool {
    match split_front_matter(content).explicit {
        Explicit::Block { text, .. } => text.lines().any(|line| line.trim_start().starts_with('#')),
        _ => false,
    }
}

/// Whole document with explicit, canonical front matter.
///
/// Returns `None` for documents whose metadata cannot be lifted: malformed
/// blocks, heading-only metadata, or no metadata at all.
pub fn render_document(doc: &AgentDocument) -> Result<Option<String>> {
    if doc.front_matter_error.is_some() {
        return Ok(None);
    }
    if !matches!(doc.front_matter, FrontMatterKind::Yaml | FrontMatterKind::Inline) {
        return Ok(None);
    }

    let yaml = render_front_matter(doc)?;
    let body = body_without_inline(doc);
    let body = body.trim_start_matches(['\n', '\r']);

    if body.is_empty() {
        Ok(Some(format!("---\n{}---\n", yaml)))
    } else {
        Ok(Some(format!("---\n{}---\n\n{}", yaml, body)))
    }
}
