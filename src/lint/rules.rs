//! Lint rules
//!
//! Document rules look at one file at a time; corpus rules (duplicate names,
//! dangling references) need every file.

use lazy_regex::regex_is_match;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::{Diagnostic, DiagnosticCode};
use crate::config::{LintConfig, SeverityLevel};
use crate::corpus::Corpus;
use crate::corpus::references::{ReferenceOrigin, extract_references};
use crate::document::{AgentDocument, Field, FieldState, FrontMatterKind, file_stem_name, tools};

/// Record a diagnostic unless its code is switched off
pub fn emit(
    out: &mut Vec<Diagnostic>,
    config: &LintConfig,
    code: DiagnosticCode,
    path: &Path,
    line: Option<usize>,
    field: Option<Field>,
    message: String,
) {
    let severity = match config.severity.get(&code) {
        Some(SeverityLevel::Off) => return,
        Some(level) => level.as_severity().unwrap_or_else(|| code.default_severity()),
        None => code.default_severity(),
    };

    out.push(Diagnostic {
        code,
        severity,
        path: path.to_path_buf(),
        line,
        field: field.map(|f| f.key().to_string()),
        message,
    });
}

pub fn is_kebab_case(name: &str) -> bool {
    regex_is_match!(r"^[a-z0-9]+(?:-[a-z0-9]+)*$", name)
}

/// Checks that only need the document itself
pub fn check_document(doc: &AgentDocument, config: &LintConfig, out: &mut Vec<Diagnostic>) {
    let path = doc.path.as_path();

    if let Some(err) = &doc.front_matter_error {
        emit(
            out,
            config,
            DiagnosticCode::MalformedFrontMatter,
            path,
            err.line(),
            None,
            err.to_string(),
        );
    }

    match doc.front_matter {
        FrontMatterKind::Missing => emit(
            out,
            config,
            DiagnosticCode::NoFrontMatter,
            path,
            None,
            None,
            "no front matter found (expected a --- block or inline key: value lines)".to_string(),
        ),
        FrontMatterKind::Inline | FrontMatterKind::Headers => emit(
            out,
            config,
            DiagnosticCode::InlineFrontMatter,
            path,
            doc.key_lines.values().next().copied(),
            None,
            format!(
                "metadata is embedded in the body ({}); `agentdoc fmt` can lift it into a --- block",
                if doc.front_matter == FrontMatterKind::Inline { "inline block" } else { "headings" }
            ),
        ),
        FrontMatterKind::Yaml => {}
    }

    for field in &config.required_fields {
        let field = *field;
        match doc.field_state(field) {
            FieldState::Absent => emit(
                out,
                config,
                DiagnosticCode::MissingField,
                path,
                None,
                Some(field),
                format!("required field '{}' is missing", field),
            ),
            FieldState::Empty => emit(
                out,
                config,
                DiagnosticCode::EmptyField,
                path,
                doc.field_line(field),
                Some(field),
                format!("required field '{}' is empty", field),
            ),
            FieldState::Present => {}
        }
    }

    check_name(doc, config, out);
    check_tools(doc, config, out);
}

fn check_name(doc: &AgentDocument, config: &LintConfig, out: &mut Vec<Diagnostic>) {
    let Some(name) = doc.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) else {
        return;
    };
    let line = doc.field_line(Field::Name);

    if !is_kebab_case(name) {
        emit(
            out,
            config,
            DiagnosticCode::NonKebabName,
            &doc.path,
            line,
            Some(Field::Name),
            format!("name '{}' is not kebab-case", name),
        );
    }

    let stem = file_stem_name(&doc.path);
    if name != stem {
        emit(
            out,
            config,
            DiagnosticCode::NameFileMismatch,
            &doc.path,
            line,
            Some(Field::Name),
            format!("name '{}' does not match file name '{}.md'", name, stem),
        );
    }
}

fn check_tools(doc: &AgentDocument, config: &LintConfig, out: &mut Vec<Diagnostic>) {
    if config.known_tools.is_empty() {
        return;
    }
    let line = doc.field_line(Field::Tools);
    for token in doc.tools.iter().flatten() {
        if !tools::is_known(token, &config.known_tools) {
            emit(
                out,
                config,
                DiagnosticCode::UnknownTool,
                &doc.path,
                line,
                Some(Field::Tools),
                format!("unknown tool '{}'", token),
            );
        }
    }
}

/// Every file after the first with a given name is a duplicate
pub fn check_duplicate_names(corpus: &Corpus, config: &LintConfig, out: &mut Vec<Diagnostic>) {
    let mut first_seen: HashMap<&str, &PathBuf> = HashMap::new();

    for doc in &corpus.documents {
        let Some(name) = doc.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) else {
            continue;
        };
        match first_seen.get(name) {
            Some(first) => emit(
                out,
                config,
                DiagnosticCode::DuplicateName,
                &doc.path,
                doc.field_line(Field::Name),
                Some(Field::Name),
                format!("name '{}' is already used by {}", name, first.display()),
            ),
            None => {
                first_seen.insert(name, &doc.path);
            }
        }
    }
}

/// `integration_points` that name no document in the corpus
pub fn check_references(corpus: &Corpus, config: &LintConfig, out: &mut Vec<Diagnostic>) {
    let known = corpus.names();
    for doc in &corpus.documents {
        for reference in extract_references(doc, &known) {
            if reference.origin == ReferenceOrigin::IntegrationPoint && !reference.resolved {
                emit(
                    out,
                    config,
                    DiagnosticCode::DanglingReference,
                    &doc.path,
                    doc.field_line(Field::IntegrationPoints),
                    Some(Field::IntegrationPoints),
                    format!("integration point '{}' names no agent in the corpus", reference.target),
                );
            }
        }
    }
}
