//! Front matter normalisation command

use colored::*;
use eyre::{Context, Result};
use std::fs;
use std::path::PathBuf;

use super::{Verbosity, load_corpus};
use crate::config::Config;
use crate::document::FrontMatterKind;
use crate::document::render::{has_front_matter_comments, render_document};

pub fn run(paths: &[PathBuf], write: bool, check: bool, verbosity: Verbosity, config: &Config) -> Result<()> {
    let corpus = load_corpus(paths, config);

    let mut changed = 0;
    let mut skipped = 0;

    for doc in &corpus.documents {
        let Some(rendered) = render_document(doc)? else {
            skipped += 1;
            if verbosity != Verbosity::Quiet {
                let reason = if doc.front_matter_error.is_some() {
                    "malformed front matter"
                } else if doc.front_matter == FrontMatterKind::Headers {
                    "metadata only in headings"
                } else {
                    "no front matter"
                };
                println!("{} {} ({})", "⚠".yellow(), doc.path.display(), reason.dimmed());
            }
            continue;
        };

        let original =
            fs::read_to_string(&doc.path).with_context(|| format!("Failed to read {}", doc.path.display()))?;
        if has_front_matter_comments(&original) {
            skipped += 1;
            if verbosity != Verbosity::Quiet {
                println!(
                    "{} {} ({})",
                    "⚠".yellow(),
                    doc.path.display(),
                    "front matter has comments".dimmed()
                );
            }
            continue;
        }

        if original == rendered {
            if verbosity == Verbosity::Verbose {
                println!("{} {}", "✓".green(), doc.path.display());
            }
            continue;
        }

        changed += 1;
        if write {
            fs::write(&doc.path, &rendered).with_context(|| format!("Failed to write {}", doc.path.display()))?;
            log::info!("Rewrote front matter in {}", doc.path.display());
            if verbosity != Verbosity::Quiet {
                println!("{} {}", "✎".green(), doc.path.display());
            }
        } else if verbosity != Verbosity::Quiet {
            println!("{} {} would change", "→".blue(), doc.path.display());
        }
    }

    if verbosity != Verbosity::Quiet {
        println!();
        let verb = if write { "rewritten" } else { "to rewrite" };
        println!(
            "{} file(s) {}, {} skipped, {} total",
            changed,
            verb,
            skipped,
            corpus.documents.len()
        );
    }

    if check && changed > 0 {
        std::process::exit(1);
    }

    Ok(())
}
