use colored::*;
use eyre::Result;

use crate::cli::{ConfigAction, OutputFormat};
use crate::config::Config;
use crate::lint::DiagnosticCode;

pub fn run(action: ConfigAction, config: &Config) -> Result<()> {
    match action {
        ConfigAction::Show { format } => show(OutputFormat::resolve(format), config),
        ConfigAction::Get { key } => get(&key, config),
    }
}

fn show(format: OutputFormat, config: &Config) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(config)?);
        }
        OutputFormat::Yaml => {
            println!("{}", serde_yaml::to_string(config)?);
        }
        OutputFormat::Text => {
            println!("{}", "agentdoc Configuration".bold());
            println!();

            println!("{}:", "paths".cyan());
            println!("  agents:");
            for path in &config.paths.agents {
                println!("    - {}", path.display());
            }
            println!("  ignore: {}", config.paths.ignore.join(", "));
            println!();

            println!("{}:", "lint".cyan());
            let required: Vec<&str> = config.lint.required_fields.iter().map(|f| f.key()).collect();
            println!("  required_fields: {}", required.join(", "));
            println!("  known_tools: {}", config.lint.known_tools.join(", "));
            println!("  severity:");
            for code in DiagnosticCode::ALL {
                let effective = match config.lint.severity.get(&code) {
                    Some(level) => match level.as_severity() {
                        Some(severity) => format!("{} {}", severity, "(override)".dimmed()),
                        None => format!("off {}", "(override)".dimmed()),
                    },
                    None => code.default_severity().to_string(),
                };
                println!("    {}: {}", code, effective);
            }
            println!();

            println!("{}: {}", "log_level".cyan(), config.log_level.as_filter());
        }
    }

    Ok(())
}

fn lookup(key: &str, config: &Config) -> Option<String> {
    let join_paths = |paths: &[std::path::PathBuf]| {
        paths
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(",")
    };

    match key {
        "paths.agents" => Some(join_paths(&config.paths.agents)),
        "paths.ignore" => Some(config.paths.ignore.join(",")),
        "lint.required_fields" => Some(
            config
                .lint
                .required_fields
                .iter()
                .map(|f| f.key())
                .collect::<Vec<_>>()
                .join(","),
        ),
        "lint.known_tools" => Some(config.lint.known_tools.join(",")),
        "log_level" | "log-level" => Some(config.log_level.as_filter().to_string()),
        _ => None,
    }
}

fn get(key: &str, config: &Config) -> Result<()> {
    match lookup(key, config) {
        Some(v) => println!("{}", v),
        None => {
            eprintln!("{} Unknown config key: {}", "✗".red(), key);
            std::process::exit(1);
        }
    }

    Ok(())
}
