//! List agents in the corpus

use colored::*;
use eyre::Result;
use serde::Serialize;
use std::path::PathBuf;

use super::{get_terminal_width, load_corpus, wrap_text};
use crate::cli::OutputFormat;
use crate::config::Config;
use crate::document::{AgentDocument, FrontMatterKind};

#[derive(Serialize)]
struct AgentSummary {
    name: String,
    path: String,
    front_matter: FrontMatterKind,
    description: Option<String>,
    tools: Vec<String>,
}

impl From<&AgentDocument> for AgentSummary {
    fn from(doc: &AgentDocument) -> Self {
        Self {
            name: doc.agent_name(),
            path: doc.path.display().to_string(),
            front_matter: doc.front_matter,
            description: doc.description.clone(),
            tools: doc.tools.clone().unwrap_or_default(),
        }
    }
}

pub fn run(paths: &[PathBuf], format: OutputFormat, config: &Config) -> Result<()> {
    let corpus = load_corpus(paths, config);
    let summaries: Vec<AgentSummary> = corpus.documents.iter().map(AgentSummary::from).collect();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summaries)?),
        OutputFormat::Yaml => println!("{}", serde_yaml::to_string(&summaries)?),
        OutputFormat::Text => {
            println!("{}", "Agents:".bold());
            println!();

            if summaries.is_empty() {
                let roots = config.agent_roots(paths);
                for root in &roots {
                    println!("  {} No agents found in {}", "(none)".dimmed(), root.display());
                }
                println!();
                println!("  Create one with: {}", "agentdoc new <name>".cyan());
                return Ok(());
            }

            let width = get_terminal_width().saturating_sub(4).max(20);
            for summary in &summaries {
                println!("  {} {}", "●".green(), summary.name.bold());
                if let Some(description) = summary.description.as_deref().filter(|d| !d.is_empty()) {
                    for line in wrap_text(description, width) {
                        println!("    {}", line.dimmed());
                    }
                }
                if !summary.tools.is_empty() {
                    println!("    Tools: {}", summary.tools.join(", ").cyan());
                }
                println!();
            }

            println!("Total: {} agent(s)", summaries.len());
            if !corpus.failures.is_empty() {
                println!(
                    "{} {} file(s) could not be read; run {} for details",
                    "⚠".yellow(),
                    corpus.failures.len(),
                    "agentdoc lint".cyan()
                );
            }
        }
    }

    Ok(())
}
