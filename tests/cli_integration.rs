//! Integration tests for the agentdoc binary
//!
//! These tests run the built binary against:
//! - the sample corpus in `.claude/agents`
//! - throwaway corpora written into temp directories

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::TempDir;

/// Sample corpus shipped with the repository
fn sample_agents_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join(".claude").join("agents")
}

/// Write a config pointing at the given agent directory
fn write_config(home: &Path, agents_dir: &Path) -> PathBuf {
    let config_path = home.join("agentdoc.yaml");
    fs::write(
        &config_path,
        format!("paths:\n  agents:\n    - {}\n", agents_dir.display()),
    )
    .unwrap();
    config_path
}

/// Run agentdoc with an isolated data dir and explicit config
fn run_agentdoc(home: &Path, config: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_agentdoc"))
        .env("XDG_DATA_HOME", home.join("data"))
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env_remove("RUST_LOG")
        .arg("--config")
        .arg(config)
        .args(args)
        .output()
        .expect("Failed to execute agentdoc")
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap_or_else(|e| {
        panic!(
            "stdout is not JSON ({}): {}\nstderr: {}",
            e,
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        )
    })
}

fn write_agent(dir: &Path, file: &str, content: &str) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join(file), content).unwrap();
}

#[test]
fn test_sample_corpus_lints_clean() {
    let home = TempDir::new().unwrap();
    let config = write_config(home.path(), &sample_agents_dir());

    let output = run_agentdoc(home.path(), &config, &["lint", "-o", "json"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let report = stdout_json(&output);
    assert_eq!(report["totals"]["errors"], 0);
    assert_eq!(report["totals"]["documents"], 3);

    let code_reviewer = report["documents"]
        .as_array()
        .unwrap()
        .iter()
        .find(|d| d["name"] == "code-reviewer")
        .expect("code-reviewer in report");
    assert_eq!(code_reviewer["status"], "PASS");
}

#[test]
fn test_show_code_reviewer() {
    let home = TempDir::new().unwrap();
    let config = write_config(home.path(), &sample_agents_dir());

    let output = run_agentdoc(home.path(), &config, &["show", "code-reviewer", "-o", "json"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let doc = stdout_json(&output);
    assert_eq!(doc["name"], "code-reviewer");
    assert_eq!(doc["front_matter"], "yaml");
    assert!(!doc["description"].as_str().unwrap().is_empty());

    let tools: Vec<&str> = doc["tools"].as_array().unwrap().iter().map(|t| t.as_str().unwrap()).collect();
    for expected in ["Read", "Write", "Edit", "MultiEdit", "Grep", "Glob", "Bash"] {
        assert!(tools.contains(&expected), "missing tool {}", expected);
    }

    let targets: Vec<&str> = doc["references"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["target"].as_str().unwrap())
        .collect();
    assert!(targets.contains(&"security-auditor"));
    assert!(targets.contains(&"test-engineer"));
}

#[test]
fn test_show_unknown_agent_fails() {
    let home = TempDir::new().unwrap();
    let config = write_config(home.path(), &sample_agents_dir());

    let output = run_agentdoc(home.path(), &config, &["show", "nobody", "-o", "json"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("not found"));
}

#[test]
fn test_missing_name_fails_lint() {
    let home = TempDir::new().unwrap();
    let agents = home.path().join("agents");
    write_agent(&agents, "anonymous.md", "---\ndescription: Has no name\ntools: Read\n---\n# Anonymous\n");
    let config = write_config(home.path(), &agents);

    let output = run_agentdoc(home.path(), &config, &["lint", "-o", "json"]);
    assert_eq!(output.status.code(), Some(1));

    let report = stdout_json(&output);
    let diagnostics = report["diagnostics"].as_array().unwrap();
    assert!(
        diagnostics
            .iter()
            .any(|d| d["code"] == "MISSING_FIELD" && d["field"] == "name")
    );
    assert_eq!(report["documents"][0]["status"], "FAIL");
}

#[test]
fn test_duplicate_names_fail_lint() {
    let home = TempDir::new().unwrap();
    let agents = home.path().join("agents");
    let twin = "---\nname: twin\ndescription: Twin\ntools: Read\n---\n";
    write_agent(&agents.join("a"), "twin.md", twin);
    write_agent(&agents.join("b"), "twin.md", twin);
    let config = write_config(home.path(), &agents);

    let output = run_agentdoc(home.path(), &config, &["lint", "-o", "json"]);
    assert_eq!(output.status.code(), Some(1));

    let report = stdout_json(&output);
    let duplicates: Vec<&Value> = report["diagnostics"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|d| d["code"] == "DUPLICATE_NAME")
        .collect();
    assert_eq!(duplicates.len(), 1);
    assert!(duplicates[0]["path"].as_str().unwrap().ends_with("b/twin.md"));
}

#[test]
fn test_strict_fails_on_warnings() {
    let home = TempDir::new().unwrap();
    let agents = home.path().join("agents");
    write_agent(&agents, "odd.md", "---\nname: odd\ndescription: Odd\ntools: Read, Teleport\n---\n");
    let config = write_config(home.path(), &agents);

    let relaxed = run_agentdoc(home.path(), &config, &["lint", "-o", "json"]);
    assert!(relaxed.status.success());

    let strict = run_agentdoc(home.path(), &config, &["lint", "--strict", "-o", "json"]);
    assert_eq!(strict.status.code(), Some(1));
}

#[test]
fn test_new_agent_lints_clean() {
    let home = TempDir::new().unwrap();
    let agents = home.path().join("agents");
    let config = write_config(home.path(), &agents);

    let created = run_agentdoc(home.path(), &config, &["new", "data-wrangler", "--tools", "Read,Bash"]);
    assert!(created.status.success(), "stderr: {}", String::from_utf8_lossy(&created.stderr));
    assert!(agents.join("data-wrangler.md").exists());

    let again = run_agentdoc(home.path(), &config, &["new", "data-wrangler"]);
    assert!(!again.status.success());

    let bad_name = run_agentdoc(home.path(), &config, &["new", "Bad_Name"]);
    assert!(!bad_name.status.success());

    let lint = run_agentdoc(home.path(), &config, &["lint", "-o", "json"]);
    assert!(lint.status.success());
    assert_eq!(stdout_json(&lint)["diagnostics"].as_array().unwrap().len(), 0);
}

#[test]
fn test_fmt_lifts_inline_front_matter() {
    let home = TempDir::new().unwrap();
    let agents = home.path().join("agents");
    write_agent(
        &agents,
        "inline-agent.md",
        "# Inline Agent\n\n**Name**: inline-agent\n**Description**: Inline metadata\n**Tools**: Read, Grep\n\n## Use Cases\n\n- Testing fmt\n",
    );
    let config = write_config(home.path(), &agents);

    let check = run_agentdoc(home.path(), &config, &["fmt", "--check"]);
    assert_eq!(check.status.code(), Some(1));

    let write = run_agentdoc(home.path(), &config, &["fmt", "--write"]);
    assert!(write.status.success());

    let rewritten = fs::read_to_string(agents.join("inline-agent.md")).unwrap();
    assert!(rewritten.starts_with("---\nname: inline-agent\n"));
    assert!(rewritten.contains("## Use Cases"));
    assert!(!rewritten.contains("**Name**"));

    let recheck = run_agentdoc(home.path(), &config, &["fmt", "--check"]);
    assert!(recheck.status.success());

    let show = run_agentdoc(home.path(), &config, &["show", "inline-agent", "-o", "json"]);
    assert_eq!(stdout_json(&show)["front_matter"], "yaml");
}

#[test]
fn test_refs_mermaid() {
    let home = TempDir::new().unwrap();
    let config = write_config(home.path(), &sample_agents_dir());

    let output = run_agentdoc(home.path(), &config, &["refs", "--mermaid"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("graph LR\n"));
    assert!(stdout.contains("code-reviewer --> security-auditor"));
    assert!(stdout.contains("test-engineer --> code-reviewer"));
}

#[test]
fn test_config_get() {
    let home = TempDir::new().unwrap();
    let agents = home.path().join("agents");
    let config = write_config(home.path(), &agents);

    let output = run_agentdoc(home.path(), &config, &["config", "get", "paths.agents"]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), agents.display().to_string());

    let unknown = run_agentdoc(home.path(), &config, &["config", "get", "nope"]);
    assert_eq!(unknown.status.code(), Some(1));
}

#[test]
fn test_fmt_leaves_commented_front_matter_alone() {
    let home = TempDir::new().unwrap();
    let agents = home.path().join("agents");
    let content = "---\n# reviewed by the platform team\ntools: Read\nname: noted\ndescription: Has a comment\n---\n\n# Noted\n";
    write_agent(&agents, "noted.md", content);
    let config = write_config(home.path(), &agents);

    let write = run_agentdoc(home.path(), &config, &["fmt", "--write"]);
    assert!(write.status.success());
    assert_eq!(fs::read_to_string(agents.join("noted.md")).unwrap(), content);
    assert!(String::from_utf8_lossy(&write.stdout).contains("front matter has comments"));

    let check = run_agentdoc(home.path(), &config, &["fmt", "--check"]);
    assert!(check.status.success());
}
