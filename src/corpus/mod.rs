//! Agent definition corpora
//!
//! A corpus is every agent definition found under a set of roots. Files are
//! independent; nothing here enforces relationships between them.

use serde::Serialize;
use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::document::{AgentDocument, parse_document};

pub mod loader;
pub mod references;

/// A file that was found but could not be read
#[derive(Debug, Clone, Serialize)]
pub struct LoadFailure {
    pub path: PathBuf,
    pub error: String,
}

/// Parsed documents plus the files that failed to load
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    pub documents: Vec<AgentDocument>,
    pub failures: Vec<LoadFailure>,
}

impl Corpus {
    /// Load every agent definition under the given roots
    pub fn load(roots: &[PathBuf], ignore: &[String]) -> Self {
        let mut corpus = Corpus::default();

        for path in loader::discover_files(roots, ignore) {
            match parse_document(&path) {
                Ok(doc) => corpus.documents.push(doc),
                Err(e) => {
                    log::warn!("Failed to load agent definition from {}: {:#}", path.display(), e);
                    corpus.failures.push(LoadFailure {
                        path,
                        error: format!("{:#}", e),
                    });
                }
            }
        }

        log::info!(
            "Loaded {} agent definition(s), {} failure(s)",
            corpus.documents.len(),
            corpus.failures.len()
        );
        corpus
    }

    pub fn from_documents(documents: Vec<AgentDocument>) -> Self {
        Self {
            documents,
            failures: Vec::new(),
        }
    }

    /// Find a document by agent name (the file stem when it has no `name`)
    pub fn get(&self, name: &str) -> Option<&AgentDocument> {
        self.documents.iter().find(|d| d.agent_name() == name)
    }

    /// All agent names in the corpus
    pub fn names(&self) -> BTreeSet<String> {
        self.documents.iter().map(AgentDocument::agent_name).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty() && self.failures.is_empty()
    }
}
