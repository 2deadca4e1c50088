use eyre::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::document::Field;
use crate::lint::{DiagnosticCode, Severity};

/// Main agentdoc configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub paths: PathsConfig,
    pub lint: LintConfig,
    pub log_level: LogLevel,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directories (or files) holding agent definitions
    pub agents: Vec<PathBuf>,
    /// File names skipped during discovery
    pub ignore: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LintConfig {
    /// Fields every document must carry
    pub required_fields: Vec<Field>,
    /// Tool tokens accepted without an UNKNOWN_TOOL warning; empty disables the check
    pub known_tools: Vec<String>,
    /// Per-code severity overrides
    pub severity: IndexMap<DiagnosticCode, SeverityLevel>,
}

/// Severity override for a diagnostic code
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SeverityLevel {
    Error,
    Warning,
    Info,
    Off,
}

impl SeverityLevel {
    pub fn as_severity(&self) -> Option<Severity> {
        match self {
            SeverityLevel::Error => Some(Severity::Error),
            SeverityLevel::Warning => Some(Severity::Warning),
            SeverityLevel::Info => Some(Severity::Info),
            SeverityLevel::Off => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Off,
}

impl LogLevel {
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Off => "off",
        }
    }

    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Trace => log::LevelFilter::Trace,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Off => log::LevelFilter::Off,
        }
    }
}

/// Tools every Claude-style agent corpus draws from
const DEFAULT_KNOWN_TOOLS: &[&str] = &[
    "Read",
    "Write",
    "Edit",
    "MultiEdit",
    "Grep",
    "Glob",
    "Bash",
    "LS",
    "Task",
    "TodoWrite",
    "WebFetch",
    "WebSearch",
    "NotebookRead",
    "NotebookEdit",
];

impl Default for Config {
    fn default() -> Self {
        Self {
            paths: PathsConfig::default(),
            lint: LintConfig::default(),
            log_level: LogLevel::Info,
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            agents: vec![PathBuf::from(".claude").join("agents")],
            ignore: vec!["README.md".to_string(), "CHANGELOG.md".to_string()],
        }
    }
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            required_fields: vec![Field::Name, Field::Description, Field::Tools],
            known_tools: DEFAULT_KNOWN_TOOLS.iter().map(|t| t.to_string()).collect(),
            severity: IndexMap::new(),
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Check AGENTDOC_CONFIG env var
        if let Ok(env_path) = std::env::var("AGENTDOC_CONFIG") {
            let path = PathBuf::from(env_path);
            if path.exists() {
                match Self::load_from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from AGENTDOC_CONFIG: {}", e);
                    }
                }
            }
        }

        // Try AGENTDOC_DIR/agentdoc.yaml
        if let Ok(dir) = std::env::var("AGENTDOC_DIR") {
            let path = PathBuf::from(dir).join("agentdoc.yaml");
            if path.exists() {
                match Self::load_from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from AGENTDOC_DIR: {}", e);
                    }
                }
            }
        }

        // Try ~/.config/agentdoc/agentdoc.yaml
        if let Some(config_dir) = dirs::config_dir() {
            let path = config_dir.join("agentdoc").join("agentdoc.yaml");
            if path.exists() {
                match Self::load_from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", path.display(), e);
                    }
                }
            }
        }

        // Try ./agentdoc.yaml (per-repository settings)
        let local_config = PathBuf::from("agentdoc.yaml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load local config: {}", e);
                }
            }
        }

        // No config file found, use defaults
        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Expand a path that may contain ~ or env vars
    pub fn expand_path(path: &Path) -> PathBuf {
        let path_str = path.to_string_lossy();
        let expanded = shellexpand::full(&path_str).unwrap_or_else(|_| path_str.clone());
        PathBuf::from(expanded.as_ref())
    }

    /// Agent roots: explicit paths if given, otherwise the configured directories
    pub fn agent_roots(&self, explicit: &[PathBuf]) -> Vec<PathBuf> {
        let roots = if explicit.is_empty() { &self.paths.agents[..] } else { explicit };
        roots.iter().map(|p| Self::expand_path(p)).collect()
    }
}
