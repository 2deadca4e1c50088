//! Lint command

use colored::*;
use eyre::Result;
use std::path::PathBuf;

use super::{Verbosity, load_corpus};
use crate::cli::OutputFormat;
use crate::config::Config;
use crate::lint::{LintReport, Severity, Status, lint_corpus};

pub fn run(paths: &[PathBuf], strict: bool, format: OutputFormat, verbosity: Verbosity, config: &Config) -> Result<()> {
    let corpus = load_corpus(paths, config);

    if corpus.is_empty() {
        let roots = config.agent_roots(paths);
        eyre::bail!(
            "No agent definitions found in {}",
            roots.iter().map(|r| r.display().to_string()).collect::<Vec<_>>().join(", ")
        );
    }

    let report = lint_corpus(&corpus, &config.lint);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Yaml => println!("{}", serde_yaml::to_string(&report)?),
        OutputFormat::Text => print_text(&report, strict, verbosity),
    }

    if report.has_errors(strict) {
        std::process::exit(1);
    }

    Ok(())
}

fn severity_symbol(severity: Severity) -> ColoredString {
    match severity {
        Severity::Error => "✗".red(),
        Severity::Warning => "⚠".yellow(),
        Severity::Info => "ℹ".blue(),
    }
}

fn print_text(report: &LintReport, strict: bool, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        for doc in &report.documents {
            let diagnostics: Vec<_> = report.diagnostics_for(&doc.path).collect();

            if diagnostics.is_empty() {
                if verbosity == Verbosity::Verbose {
                    println!("{} {}", "✓".green(), doc.path.display());
                }
                continue;
            }

            let status = match doc.status {
                Status::Pass => doc.status.to_string().green(),
                Status::Fail => doc.status.to_string().red(),
            };
            println!("{} {}", status.bold(), doc.path.display().to_string().bold());

            for d in diagnostics {
                let location = d.line.map(|l| format!("{}:", l)).unwrap_or_default();
                println!(
                    "  {} {}{} {}",
                    severity_symbol(d.severity),
                    location.dimmed(),
                    d.code.to_string().cyan(),
                    d.message
                );
            }
        }
        println!();
    }

    let totals = &report.totals;
    let summary = format!(
        "{} document(s): {} passed, {} failed ({} error(s), {} warning(s), {} info)",
        totals.documents, totals.passed, totals.failed, totals.errors, totals.warnings, totals.infos
    );

    if report.has_errors(strict) {
        println!("{} {}", "✗".red().bold(), summary);
        if strict && totals.errors == 0 {
            println!("  {}", "warnings are treated as errors (--strict)".dimmed());
        }
    } else {
        println!("{} {}", "✓".green().bold(), summary);
    }
}
