pub mod completions;
pub mod config;
pub mod fmt;
pub mod lint;
pub mod list;
pub mod new;
pub mod refs;
pub mod show;

use std::path::PathBuf;
use terminal_size::{Width, terminal_size};

use crate::config::Config;
use crate::corpus::Corpus;

/// How chatty text output should be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
}

impl Verbosity {
    pub fn from_flags(verbose: bool, quiet: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        }
    }
}

/// Load the corpus from explicit paths or the configured agent directories
pub fn load_corpus(paths: &[PathBuf], config: &Config) -> Corpus {
    let roots = config.agent_roots(paths);
    log::debug!("Loading corpus from: {:?}", roots);
    Corpus::load(&roots, &config.paths.ignore)
}

/// Get terminal width, defaulting to 80 if not available
pub fn get_terminal_width() -> usize {
    terminal_size().map(|(Width(w), _)| w as usize).unwrap_or(80)
}

/// Wrap text to max_width, returning lines
pub fn wrap_text(s: &str, max_width: usize) -> Vec<String> {
    if max_width == 0 {
        return vec![s.to_string()];
    }

    let mut lines = Vec::new();
    let mut current_line = String::new();
    let mut current_len = 0;

    for word in s.split_whitespace() {
        let word_len = word.chars().count();

        if current_len == 0 {
            current_line = word.to_string();
            current_len = word_len;
        } else if current_len + 1 + word_len <= max_width {
            current_line.push(' ');
            current_line.push_str(word);
            current_len += 1 + word_len;
        } else {
            lines.push(current_line);
            current_line = word.to_string();
            current_len = word_len;
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}
