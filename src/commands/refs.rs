//! Cross-reference graph command

use colored::*;
use eyre::Result;
use std::path::PathBuf;

use super::load_corpus;
use crate::cli::OutputFormat;
use crate::config::Config;
use crate::corpus::references::{ReferenceOrigin, reference_graph, to_mermaid};

pub fn run(paths: &[PathBuf], mermaid: bool, format: OutputFormat, config: &Config) -> Result<()> {
    let corpus = load_corpus(paths, config);
    let graph = reference_graph(&corpus);

    if mermaid {
        print!("{}", to_mermaid(&graph));
        return Ok(());
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&graph)?),
        OutputFormat::Yaml => println!("{}", serde_yaml::to_string(&graph)?),
        OutputFormat::Text => {
            println!("{}", "Agent References:".bold());
            println!();

            let mut unresolved = 0;
            for node in &graph {
                println!("  {} {}", "●".green(), node.name.bold());
                if node.references.is_empty() {
                    println!("    {}", "(no references)".dimmed());
                }
                for reference in &node.references {
                    let origin = match reference.origin {
                        ReferenceOrigin::IntegrationPoint => "integration point",
                        ReferenceOrigin::Prose => "prose",
                    };
                    if reference.resolved {
                        println!("    {} {} {}", "→".green(), reference.target, format!("({})", origin).dimmed());
                    } else {
                        unresolved += 1;
                        println!(
                            "    {} {} {}",
                            "?".yellow(),
                            reference.target.yellow(),
                            format!("({}, not in corpus)", origin).dimmed()
                        );
                    }
                }
                println!();
            }

            println!(
                "Total: {} agent(s), {} unresolved reference(s)",
                graph.len(),
                unresolved
            );
        }
    }

    Ok(())
}
