//! Corpus discovery - find agent definition files under one or more roots

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Directory names never descended into
const SKIPPED_DIRS: &[&str] = &["node_modules", "target", "venv", "__pycache__", "dist", "build"];

/// Collect `*.md` files under the given roots, sorted by path across all roots
pub fn discover_files(roots: &[PathBuf], ignore: &[String]) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    let mut files = Vec::new();

    for root in roots {
        if !root.exists() {
            log::warn!("Agent directory does not exist: {}", root.display());
            continue;
        }

        if root.is_file() {
            if is_markdown(root) && seen.insert(root.clone()) {
                files.push(root.clone());
            }
            continue;
        }

        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(should_enter);

        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    log::debug!("Error walking directory: {}", e);
                    continue;
                }
            };

            let path = entry.path();
            if !entry.file_type().is_file() || !is_markdown(path) || is_ignored(path, ignore) {
                continue;
            }
            if seen.insert(path.to_path_buf()) {
                log::debug!("Found agent definition candidate: {}", path.display());
                files.push(path.to_path_buf());
            }
        }
    }

    files.sort();
    files
}

fn is_markdown(path: &Path) -> bool {
    path.extension().map(|e| e.eq_ignore_ascii_case("md")).unwrap_or(false)
}

fn is_ignored(path: &Path, ignore: &[String]) -> bool {
    path.file_name()
        .map(|name| {
            let name = name.to_string_lossy();
            ignore.iter().any(|i| i.eq_ignore_ascii_case(&name))
        })
        .unwrap_or(false)
}

/// Check if we should enter a directory (or yield a file) during discovery
fn should_enter(entry: &DirEntry) -> bool {
    // Always process the root (depth 0)
    if entry.depth() == 0 {
        return true;
    }

    let name = entry.file_name().to_string_lossy();

    // `.claude/agents` is the conventional home of agent definitions
    if name == ".claude" {
        return true;
    }

    if name.starts_with('.') {
        return false;
    }

    !(entry.file_type().is_dir() && SKIPPED_DIRS.contains(&name.as_ref()))
}
