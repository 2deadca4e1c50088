//! Create a new agent definition from template

use colored::*;
use eyre::{Context, Result};
use std::fs;
use std::path::PathBuf;

use crate::config::Config;
use crate::document::template::generate_agent_template;
use crate::lint::rules::is_kebab_case;

pub fn run(name: &str, tools: &[String], dir: Option<PathBuf>, config: &Config) -> Result<()> {
    if !is_kebab_case(name) {
        eyre::bail!("Agent name '{}' must be kebab-case (e.g. code-reviewer)", name);
    }

    let agents_dir = match dir {
        Some(dir) => Config::expand_path(&dir),
        None => config
            .agent_roots(&[])
            .into_iter()
            .next()
            .ok_or_else(|| eyre::eyre!("No agent directory configured; pass --dir"))?,
    };

    let agent_path = agents_dir.join(format!("{}.md", name));
    if agent_path.exists() {
        eyre::bail!("Agent '{}' already exists at {}", name, agent_path.display());
    }

    fs::create_dir_all(&agents_dir)
        .with_context(|| format!("Failed to create agent directory: {}", agents_dir.display()))?;

    let template = generate_agent_template(name, tools);
    fs::write(&agent_path, template).with_context(|| format!("Failed to write {}", agent_path.display()))?;
    log::info!("Created agent definition {}", agent_path.display());

    println!("{} Created agent template: {}", "✓".green(), agent_path.display());
    println!();
    println!("Next steps:");
    println!("  1. Edit {} to describe the persona", agent_path.display());
    println!("  2. Run {} to verify", format!("agentdoc lint {}", agent_path.display()).cyan());

    Ok(())
}
