//! Show a single agent definition

use colored::*;
use eyre::Result;
use serde::Serialize;

use super::load_corpus;
use crate::cli::OutputFormat;
use crate::config::Config;
use crate::corpus::references::{Reference, ReferenceOrigin, extract_references};
use crate::document::sections::{is_conventional_title, outline};
use crate::document::{AgentDocument, Field};

#[derive(Serialize)]
struct AgentDetails<'a> {
    #[serde(flatten)]
    document: &'a AgentDocument,
    outline: Vec<String>,
    conventional_sections: usize,
    references: Vec<Reference>,
}

pub fn run(name: &str, format: OutputFormat, config: &Config) -> Result<()> {
    let corpus = load_corpus(&[], config);

    let Some(doc) = corpus.get(name) else {
        eyre::bail!("Agent '{}' not found.\nList agents with: agentdoc list", name);
    };

    let details = AgentDetails {
        document: doc,
        outline: outline(&doc.sections),
        conventional_sections: doc.sections.iter().filter(|s| is_conventional_title(&s.title)).count(),
        references: extract_references(doc, &corpus.names()),
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&details)?),
        OutputFormat::Yaml => println!("{}", serde_yaml::to_string(&details)?),
        OutputFormat::Text => print_text(&details),
    }

    Ok(())
}

fn print_text(details: &AgentDetails) {
    let doc = details.document;

    println!("{} {}", "Agent:".bold(), doc.agent_name().green().bold());
    println!("{} {}", "Path:".bold(), doc.path.display());
    println!("{} {:?}", "Front matter:".bold(), doc.front_matter);
    if let Some(err) = &doc.front_matter_error {
        println!("  {} {}", "✗".red(), err);
    }
    println!();

    for field in Field::ALL {
        if field == Field::Name {
            continue;
        }
        let label = format!("{}:", field.key());
        if let Some(value) = doc.string_field(field) {
            println!("{} {}", label.bold(), value);
        } else if let Some(items) = doc.list_field(field) {
            println!("{}", label.bold());
            if items.is_empty() {
                println!("  {}", "(empty)".dimmed());
            }
            for item in items {
                println!("  {} {}", "•".cyan(), item);
            }
        }
    }

    let extra: Vec<_> = doc.extra().collect();
    if !extra.is_empty() {
        println!();
        println!("{}", "Other metadata:".bold());
        for (key, value) in extra {
            println!("  {}: {}", key, crate::document::value_to_string(value));
        }
    }

    if !details.outline.is_empty() {
        println!();
        println!("{}", "Outline:".bold());
        for line in &details.outline {
            println!("  {}", line);
        }
    }

    if !details.references.is_empty() {
        println!();
        println!("{}", "References:".bold());
        for reference in &details.references {
            let symbol = if reference.resolved { "→".green() } else { "?".yellow() };
            let origin = match reference.origin {
                ReferenceOrigin::IntegrationPoint => "integration point",
                ReferenceOrigin::Prose => "prose",
            };
            println!("  {} {} {}", symbol, reference.target, format!("({})", origin).dimmed());
        }
    }
}
