//! Agent definition documents
//!
//! An agent definition is a Markdown file describing one persona:
//! front matter carrying `name`, `description` and `tools` (plus a handful
//! of optional labels), followed by free-text sections.
//!
//! # Forms
//!
//! Three layouts show up in real corpora and all of them are accepted:
//!
//! ```markdown
//! ---
//! name: code-reviewer
//! description: Reviews diffs for correctness
//! tools: Read, Grep, Glob
//! ---
//! ```
//!
//! an inline pseudo-YAML block somewhere in the body (`**Name**: code-reviewer`),
//! or plain headings whose titles are the field labels (`## Domain Focus`).

use eyre::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub mod frontmatter;
pub mod render;
pub mod sections;
pub mod template;
pub mod tools;

use frontmatter::{Explicit, FrontMatterError, InlineBlock, extract_inline, parse_mapping, split_front_matter};
use sections::{Section, parse_sections};

/// Where a document's metadata was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FrontMatterKind {
    /// `---` delimited YAML at the top of the file
    Yaml,
    /// Pseudo-YAML embedded in the body
    Inline,
    /// Only headings named after schema fields
    Headers,
    /// Nothing recognisable
    Missing,
}

/// Schema fields with meaning to the linter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    Description,
    Tools,
    ExpertiseLevel,
    DomainFocus,
    SubDomains,
    IntegrationPoints,
    SuccessCriteria,
}

impl Field {
    /// Canonical key order, also used when rendering front matter
    pub const ALL: [Field; 8] = [
        Field::Name,
        Field::Description,
        Field::Tools,
        Field::ExpertiseLevel,
        Field::DomainFocus,
        Field::SubDomains,
        Field::IntegrationPoints,
        Field::SuccessCriteria,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Description => "description",
            Field::Tools => "tools",
            Field::ExpertiseLevel => "expertise_level",
            Field::DomainFocus => "domain_focus",
            Field::SubDomains => "sub_domains",
            Field::IntegrationPoints => "integration_points",
            Field::SuccessCriteria => "success_criteria",
        }
    }

    /// Whether the field holds a list rather than a single string
    pub fn is_list(&self) -> bool {
        matches!(
            self,
            Field::Tools | Field::SubDomains | Field::IntegrationPoints | Field::SuccessCriteria
        )
    }

    /// Resolve a raw key (`Expertise Level`, `expertise-level`, `**Tools**`) to a field
    pub fn from_key(raw: &str) -> Option<Field> {
        let normalized = normalize_key(raw);
        Field::ALL.into_iter().find(|f| f.key() == normalized)
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Lowercase snake_case form of a label, with emphasis and trailing colons removed
pub fn normalize_key(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches(':').trim_matches(|c| c == '*' || c == '`').trim();

    let mut out = String::with_capacity(trimmed.len());
    for c in trimmed.chars() {
        match c {
            ' ' | '-' | '_' => {
                if !out.ends_with('_') {
                    out.push('_');
                }
            }
            c => out.extend(c.to_lowercase()),
        }
    }
    out.trim_matches('_').to_string()
}

/// Presence of a field, as seen by required-field checks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldState {
    Absent,
    Empty,
    Present,
}

/// One parsed agent definition file
#[derive(Debug, Clone, Serialize)]
pub struct AgentDocument {
    pub path: PathBuf,
    pub front_matter: FrontMatterKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub front_matter_error: Option<FrontMatterError>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub tools: Option<Vec<String>>,
    pub expertise_level: Option<String>,
    pub domain_focus: Option<String>,
    pub sub_domains: Option<Vec<String>>,
    pub integration_points: Option<Vec<String>>,
    pub success_criteria: Option<Vec<String>>,
    /// Raw front matter pairs in file order, original key spelling
    pub metadata: IndexMap<String, serde_yaml::Value>,
    /// 1-based line of each front matter key
    #[serde(skip)]
    pub key_lines: IndexMap<String, usize>,
    pub sections: Vec<Section>,
    /// Everything after the explicit front matter block
    #[serde(skip)]
    pub body: String,
    /// 1-based line number of the first body line
    #[serde(skip)]
    pub body_line: usize,
    /// Body line range (0-based, inclusive) occupied by inline front matter
    #[serde(skip)]
    pub inline_span: Option<(usize, usize)>,
}

impl AgentDocument {
    fn empty(path: &Path, body: &str, body_line: usize) -> Self {
        Self {
            path: path.to_path_buf(),
            front_matter: FrontMatterKind::Missing,
            front_matter_error: None,
            name: None,
            description: None,
            tools: None,
            expertise_level: None,
            domain_focus: None,
            sub_domains: None,
            integration_points: None,
            success_criteria: None,
            metadata: IndexMap::new(),
            key_lines: IndexMap::new(),
            sections: Vec::new(),
            body: body.to_string(),
            body_line,
            inline_span: None,
        }
    }

    /// Name used to address the document: the `name` field, or the file stem
    pub fn agent_name(&self) -> String {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => file_stem_name(&self.path),
        }
    }

    pub fn string_field(&self, field: Field) -> Option<&str> {
        match field {
            Field::Name => self.name.as_deref(),
            Field::Description => self.description.as_deref(),
            Field::ExpertiseLevel => self.expertise_level.as_deref(),
            Field::DomainFocus => self.domain_focus.as_deref(),
            _ => None,
        }
    }

    pub fn list_field(&self, field: Field) -> Option<&[String]> {
        match field {
            Field::Tools => self.tools.as_deref(),
            Field::SubDomains => self.sub_domains.as_deref(),
            Field::IntegrationPoints => self.integration_points.as_deref(),
            Field::SuccessCriteria => self.success_criteria.as_deref(),
            _ => None,
        }
    }

    pub fn field_state(&self, field: Field) -> FieldState {
        if field.is_list() {
            match self.list_field(field) {
                None => FieldState::Absent,
                Some(items) if items.is_empty() => FieldState::Empty,
                Some(_) => FieldState::Present,
            }
        } else {
            match self.string_field(field) {
                None => FieldState::Absent,
                Some(s) if s.trim().is_empty() => FieldState::Empty,
                Some(_) => FieldState::Present,
            }
        }
    }

    /// Line where a field was declared, if it came from front matter
    pub fn field_line(&self, field: Field) -> Option<usize> {
        self.key_lines
            .iter()
            .find(|(key, _)| Field::from_key(key) == Some(field))
            .map(|(_, line)| *line)
    }

    /// Front matter pairs that are not schema fields
    pub fn extra(&self) -> impl Iterator<Item = (&String, &serde_yaml::Value)> {
        self.metadata.iter().filter(|(key, _)| Field::from_key(key).is_none())
    }

    fn set_field(&mut self, field: Field, value: &serde_yaml::Value) {
        if field.is_list() {
            let items = if field == Field::Tools {
                tools::parse_tools(value)
            } else {
                value_to_list(value)
            };
            match field {
                Field::Tools => self.tools = Some(items),
                Field::SubDomains => self.sub_domains = Some(items),
                Field::IntegrationPoints => self.integration_points = Some(items),
                Field::SuccessCriteria => self.success_criteria = Some(items),
                _ => {}
            }
        } else {
            let text = value_to_string(value);
            match field {
                Field::Name => self.name = Some(text),
                Field::Description => self.description = Some(text),
                Field::ExpertiseLevel => self.expertise_level = Some(text),
                Field::DomainFocus => self.domain_focus = Some(text),
                _ => {}
            }
        }
    }

    fn is_set(&self, field: Field) -> bool {
        self.field_state(field) != FieldState::Absent
    }

    fn apply_metadata(&mut self, metadata: IndexMap<String, serde_yaml::Value>) {
        for (key, value) in &metadata {
            if let Some(field) = Field::from_key(key) {
                // First spelling wins when a key appears twice under different labels
                if !self.is_set(field) {
                    self.set_field(field, value);
                }
            }
        }
        self.metadata = metadata;
    }

    /// Fill unset fields from headings titled after them
    fn apply_headers(&mut self) -> bool {
        let mut found = false;
        let sections = self.sections.clone();
        for section in &sections {
            let Some(field) = Field::from_key(&section.title) else {
                continue;
            };
            if self.is_set(field) {
                continue;
            }
            let value = if field.is_list() {
                let bullets = section.bullets();
                if bullets.is_empty() {
                    serde_yaml::Value::String(section.first_paragraph())
                } else {
                    serde_yaml::Value::Sequence(bullets.into_iter().map(serde_yaml::Value::String).collect())
                }
            } else {
                serde_yaml::Value::String(section.first_paragraph())
            };
            log::debug!("{}: field '{}' taken from heading", self.path.display(), field);
            self.set_field(field, &value);
            found = true;
        }
        found
    }
}

/// `<agent-name>` part of `<agent-name>.md`
pub fn file_stem_name(path: &Path) -> String {
    path.file_stem().map(|s| s.to_string_lossy().to_string()).unwrap_or_default()
}

/// Read and parse an agent definition file
pub fn parse_document(path: &Path) -> Result<AgentDocument> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read agent definition at {}", path.display()))?;

    Ok(parse_content(path, &content))
}

/// Parse agent definition text. Never fails; malformed front matter is recorded on the document.
pub fn parse_content(path: &Path, content: &str) -> AgentDocument {
    let split = split_front_matter(content);
    let mut doc = AgentDocument::empty(path, split.body, split.body_line);
    doc.sections = parse_sections(split.body, split.body_line);

    match split.explicit {
        Explicit::Block { text, first_line } => match parse_mapping(text, first_line) {
            Ok((metadata, key_lines)) => {
                doc.front_matter = FrontMatterKind::Yaml;
                doc.key_lines = key_lines;
                doc.apply_metadata(metadata);
            }
            Err(e) => {
                log::debug!("{}: {}", path.display(), e);
                doc.front_matter = FrontMatterKind::Yaml;
                doc.front_matter_error = Some(e);
            }
        },
        Explicit::Unclosed => {
            doc.front_matter = FrontMatterKind::Yaml;
            doc.front_matter_error = Some(FrontMatterError::Unclosed);
        }
        Explicit::None => {
            if let Some(InlineBlock {
                metadata,
                key_lines,
                first,
                last,
            }) = extract_inline(split.body)
            {
                doc.front_matter = FrontMatterKind::Inline;
                doc.inline_span = Some((first, last));
                doc.key_lines = key_lines
                    .into_iter()
                    .map(|(key, idx)| (key, split.body_line + idx))
                    .collect();
                doc.apply_metadata(metadata);
            }
        }
    }

    if doc.apply_headers() && doc.front_matter == FrontMatterKind::Missing {
        doc.front_matter = FrontMatterKind::Headers;
    }

    doc
}

/// Flatten a YAML scalar to text
pub fn value_to_string(value: &serde_yaml::Value) -> String {
    match value {
        serde_yaml::Value::Null => String::new(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::String(s) => s.trim().to_string(),
        serde_yaml::Value::Sequence(items) => items
            .iter()
            .map(value_to_string)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        serde_yaml::Value::Mapping(_) | serde_yaml::Value::Tagged(_) => serde_yaml::to_string(value)
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
    }
}

/// A YAML value as a list of strings; plain strings are split on commas
pub fn value_to_list(value: &serde_yaml::Value) -> Vec<String> {
    match value {
        serde_yaml::Value::Null => Vec::new(),
        serde_yaml::Value::Sequence(items) => items
            .iter()
            .map(value_to_string)
            .filter(|s| !s.is_empty())
            .collect(),
        serde_yaml::Value::String(s) => s
            .split(',')
            .map(|item| item.trim().to_string())
            .filter(|item| !item.is_empty())
            .collect(),
        other => {
            let text = value_to_string(other);
            if text.is_empty() { Vec::new() } else { vec![text] }
        }
    }
}
