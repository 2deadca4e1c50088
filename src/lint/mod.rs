//! Corpus linting
//!
//! Lint findings are data, not errors: every check produces [`Diagnostic`]s
//! and the report decides PASS/FAIL per document.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::config::LintConfig;
use crate::corpus::Corpus;

pub mod rules;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiagnosticCode {
    MissingField,
    EmptyField,
    MalformedFrontMatter,
    NoFrontMatter,
    DuplicateName,
    NameFileMismatch,
    NonKebabName,
    UnknownTool,
    DanglingReference,
    InlineFrontMatter,
    UnreadableFile,
}

impl DiagnosticCode {
    pub const ALL: [DiagnosticCode; 11] = [
        DiagnosticCode::MissingField,
        DiagnosticCode::EmptyField,
        DiagnosticCode::MalformedFrontMatter,
        DiagnosticCode::NoFrontMatter,
        DiagnosticCode::DuplicateName,
        DiagnosticCode::NameFileMismatch,
        DiagnosticCode::NonKebabName,
        DiagnosticCode::UnknownTool,
        DiagnosticCode::DanglingReference,
        DiagnosticCode::InlineFrontMatter,
        DiagnosticCode::UnreadableFile,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticCode::MissingField => "MISSING_FIELD",
            DiagnosticCode::EmptyField => "EMPTY_FIELD",
            DiagnosticCode::MalformedFrontMatter => "MALFORMED_FRONT_MATTER",
            DiagnosticCode::NoFrontMatter => "NO_FRONT_MATTER",
            DiagnosticCode::DuplicateName => "DUPLICATE_NAME",
            DiagnosticCode::NameFileMismatch => "NAME_FILE_MISMATCH",
            DiagnosticCode::NonKebabName => "NON_KEBAB_NAME",
            DiagnosticCode::UnknownTool => "UNKNOWN_TOOL",
            DiagnosticCode::DanglingReference => "DANGLING_REFERENCE",
            DiagnosticCode::InlineFrontMatter => "INLINE_FRONT_MATTER",
            DiagnosticCode::UnreadableFile => "UNREADABLE_FILE",
        }
    }

    pub fn default_severity(&self) -> Severity {
        match self {
            DiagnosticCode::MissingField
            | DiagnosticCode::EmptyField
            | DiagnosticCode::MalformedFrontMatter
            | DiagnosticCode::DuplicateName
            | DiagnosticCode::UnreadableFile => Severity::Error,
            DiagnosticCode::NoFrontMatter
            | DiagnosticCode::NameFileMismatch
            | DiagnosticCode::NonKebabName
            | DiagnosticCode::UnknownTool => Severity::Warning,
            DiagnosticCode::DanglingReference | DiagnosticCode::InlineFrontMatter => Severity::Info,
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        };
        write!(f, "{}", s)
    }
}

/// One finding against one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub severity: Severity,
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Pass,
    Fail,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Pass => write!(f, "PASS"),
            Status::Fail => write!(f, "FAIL"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentStatus {
    pub path: PathBuf,
    pub name: Option<String>,
    pub status: Status,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Totals {
    pub documents: usize,
    pub passed: usize,
    pub failed: usize,
    pub errors: usize,
    pub warnings: usize,
    pub infos: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct LintReport {
    pub generated: String,
    pub documents: Vec<DocumentStatus>,
    pub diagnostics: Vec<Diagnostic>,
    pub totals: Totals,
}

impl LintReport {
    /// Whether the run should fail. Strict mode treats warnings as errors.
    pub fn has_errors(&self, strict: bool) -> bool {
        self.totals.errors > 0 || (strict && self.totals.warnings > 0)
    }

    pub fn diagnostics_for<'a>(&'a self, path: &'a std::path::Path) -> impl Iterator<Item = &'a Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.path == path)
    }
}

/// Run every rule over the corpus
pub fn lint_corpus(corpus: &Corpus, config: &LintConfig) -> LintReport {
    let mut diagnostics = Vec::new();

    for failure in &corpus.failures {
        rules::emit(
            &mut diagnostics,
            config,
            DiagnosticCode::UnreadableFile,
            &failure.path,
            None,
            None,
            failure.error.clone(),
        );
    }

    for doc in &corpus.documents {
        rules::check_document(doc, config, &mut diagnostics);
    }
    rules::check_duplicate_names(corpus, config, &mut diagnostics);
    rules::check_references(corpus, config, &mut diagnostics);

    diagnostics.sort_by(|a, b| {
        a.path
            .cmp(&b.path)
            .then(a.line.unwrap_or(0).cmp(&b.line.unwrap_or(0)))
            .then(a.code.cmp(&b.code))
    });

    let mut documents: Vec<DocumentStatus> = corpus
        .documents
        .iter()
        .map(|doc| DocumentStatus {
            path: doc.path.clone(),
            name: doc.name.clone(),
            status: status_of(&diagnostics, &doc.path),
        })
        .collect();
    documents.extend(corpus.failures.iter().map(|f| DocumentStatus {
        path: f.path.clone(),
        name: None,
        status: status_of(&diagnostics, &f.path),
    }));
    documents.sort_by(|a, b| a.path.cmp(&b.path));

    let totals = Totals {
        documents: documents.len(),
        passed: documents.iter().filter(|d| d.status == Status::Pass).count(),
        failed: documents.iter().filter(|d| d.status == Status::Fail).count(),
        errors: diagnostics.iter().filter(|d| d.severity == Severity::Error).count(),
        warnings: diagnostics.iter().filter(|d| d.severity == Severity::Warning).count(),
        infos: diagnostics.iter().filter(|d| d.severity == Severity::Info).count(),
    };

    log::info!(
        "Lint finished: {} document(s), {} error(s), {} warning(s)",
        totals.documents,
        totals.errors,
        totals.warnings
    );

    LintReport {
        generated: Utc::now().to_rfc3339(),
        documents,
        diagnostics,
        totals,
    }
}

fn status_of(diagnostics: &[Diagnostic], path: &std::path::Path) -> Status {
    if diagnostics.iter().any(|d| d.path == path && d.severity == Severity::Error) {
        Status::Fail
    } else {
        Status::Pass
    }
}
