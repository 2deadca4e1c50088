use clap::{Parser, Subcommand, ValueEnum};
use std::io::IsTerminal;
use std::path::PathBuf;

/// Output format for commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

impl OutputFormat {
    /// Resolve the effective output format.
    /// If user specified a format, use it.
    /// Otherwise: TTY → Text, non-TTY (pipe) → Json
    pub fn resolve(user_choice: Option<OutputFormat>) -> OutputFormat {
        match user_choice {
            Some(fmt) => fmt,
            None => {
                if std::io::stdout().is_terminal() {
                    OutputFormat::Text
                } else {
                    OutputFormat::Json
                }
            }
        }
    }
}

#[derive(Parser)]
#[command(
    name = "agentdoc",
    about = "Load, lint and normalise Markdown agent definition corpora",
    version,
    after_help = "Logs are written to: ~/.local/share/agentdoc/logs/agentdoc.log"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to agentdoc.yaml config file")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, help = "Suppress non-error output")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check agent definitions against the schema
    Lint {
        /// Files or directories (defaults to the configured agent directories)
        paths: Vec<PathBuf>,

        /// Treat warnings as errors for the exit status
        #[arg(long)]
        strict: bool,

        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },

    /// List agents in the corpus
    List {
        /// Files or directories (defaults to the configured agent directories)
        paths: Vec<PathBuf>,

        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },

    /// Show one agent's parsed definition
    Show {
        /// Agent name
        name: String,

        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },

    /// Show cross-references between agents
    Refs {
        /// Files or directories (defaults to the configured agent directories)
        paths: Vec<PathBuf>,

        /// Emit a Mermaid flowchart instead
        #[arg(long)]
        mermaid: bool,

        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },

    /// Rewrite front matter as a canonical --- block
    ///
    /// Files whose front matter contains `#` comments are skipped, since
    /// rewriting would drop the comments.
    Fmt {
        /// Files or directories (defaults to the configured agent directories)
        paths: Vec<PathBuf>,

        /// Write changes back to disk
        #[arg(long)]
        write: bool,

        /// Exit non-zero if any file would change
        #[arg(long, conflicts_with = "write")]
        check: bool,
    },

    /// Create a new agent definition from template
    New {
        /// Agent name (kebab-case)
        name: String,

        /// Tools the agent may use
        #[arg(long, value_delimiter = ',')]
        tools: Vec<String>,

        /// Directory to create the file in (defaults to the first agent directory)
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show {
        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },

    /// Get a configuration value
    Get {
        /// Configuration key (dot notation)
        key: String,
    },
}
