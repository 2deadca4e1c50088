//! Cross-references between agent definitions
//!
//! Documents mention each other in `integration_points` and in prose
//! ("works with the code-reviewer agent"). These are free text; nothing
//! guarantees the target exists, so references carry a `resolved` flag.

use lazy_regex::regex_is_match;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::PathBuf;

use super::Corpus;
use crate::document::AgentDocument;

/// Prose patterns that name another agent. `name` is the candidate; `tick` is
/// present when the candidate was written in backticks.
static PROSE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)\bworks?\s+(?:closely\s+)?with\s+(?:the\s+)?(?P<tick>`)?(?P<name>[a-z0-9][a-z0-9-]*)").unwrap(),
        Regex::new(r"(?i)\bhand(?:s|ing)?[\s-]*offs?\s+to\s+(?:the\s+)?(?P<tick>`)?(?P<name>[a-z0-9][a-z0-9-]*)").unwrap(),
        Regex::new(r"(?P<tick>`)(?P<name>[a-z0-9][a-z0-9-]*)`\s+(?:sub-?)?agent\b").unwrap(),
        Regex::new(r"\b(?P<name>[a-z0-9]+(?:-[a-z0-9]+)+)\s+(?:sub-?)?agent\b").unwrap(),
    ]
});

/// Where a reference was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceOrigin {
    IntegrationPoint,
    Prose,
}

/// A mention of another agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reference {
    pub target: String,
    pub origin: ReferenceOrigin,
    pub resolved: bool,
}

/// Outgoing references of one document
#[derive(Debug, Clone, Serialize)]
pub struct GraphNode {
    pub name: String,
    pub path: PathBuf,
    pub references: Vec<Reference>,
}

fn is_kebab(candidate: &str) -> bool {
    regex_is_match!(r"^[a-z0-9]+(?:-[a-z0-9]+)*$", candidate)
}

/// A candidate counts if it names a known agent, or at least looks like an agent name
fn accept(candidate: &str, known: &BTreeSet<String>) -> bool {
    known.contains(candidate) || (candidate.contains('-') && is_kebab(candidate))
}

/// Target of an `integration_points` item such as `code-reviewer: final review`.
/// The document's own name is never a target.
fn integration_target(item: &str, own: &str, known: &BTreeSet<String>) -> Option<String> {
    let lowered = item.to_lowercase();

    // A known name anywhere in the item wins
    if let Some(name) = known.iter().filter(|name| name.as_str() != own).find(|name| {
        lowered
            .split(|c: char| !(c.is_ascii_alphanumeric() || c == '-'))
            .any(|word| word == name.as_str())
    }) {
        return Some(name.clone());
    }

    let token = lowered
        .split(|c: char| c.is_whitespace() || c == ':' || c == ',' || c == '(')
        .map(|t| t.trim_matches(|c: char| c == '`' || c == '*' || c == '"' || c == '\''))
        .find(|t| !t.is_empty() && *t != own)?;

    if accept(token, known) { Some(token.to_string()) } else { None }
}

/// Prose candidates must name a known agent unless written in backticks
fn accept_prose(candidate: &str, ticked: bool, known: &BTreeSet<String>) -> bool {
    known.contains(candidate) || (ticked && accept(candidate, known))
}

/// Collect references from a document to other agents
pub fn extract_references(doc: &AgentDocument, known: &BTreeSet<String>) -> Vec<Reference> {
    let own = doc.agent_name();
    let mut refs: Vec<Reference> = Vec::new();

    let mut push = |target: String, origin: ReferenceOrigin| {
        if target == own || refs.iter().any(|r| r.target == target) {
            return;
        }
        let resolved = known.contains(&target);
        refs.push(Reference {
            target,
            origin,
            resolved,
        });
    };

    for item in doc.integration_points.iter().flatten() {
        if let Some(target) = integration_target(item, &own, known) {
            push(target, ReferenceOrigin::IntegrationPoint);
        }
    }

    let mut prose = String::new();
    if let Some(description) = &doc.description {
        prose.push_str(description);
        prose.push('\n');
    }
    for section in &doc.sections {
        prose.push_str(&section.body);
    }

    for pattern in PROSE_PATTERNS.iter() {
        for caps in pattern.captures_iter(&prose) {
            let candidate = caps["name"].to_lowercase();
            if accept_prose(&candidate, caps.name("tick").is_some(), known) {
                push(candidate, ReferenceOrigin::Prose);
            }
        }
    }

    refs
}

/// Outgoing references for every document in the corpus
pub fn reference_graph(corpus: &Corpus) -> Vec<GraphNode> {
    let known = corpus.names();
    corpus
        .documents
        .iter()
        .map(|doc| GraphNode {
            name: doc.agent_name(),
            path: doc.path.clone(),
            references: extract_references(doc, &known),
        })
        .collect()
}

/// Render the graph as a Mermaid flowchart; unresolved targets use dotted edges
pub fn to_mermaid(graph: &[GraphNode]) -> String {
    let mut out = String::from("graph LR\n");
    for node in graph {
        if node.references.is_empty() {
            out.push_str(&format!("    {}\n", node.name));
        }
        for reference in &node.references {
            let arrow = if reference.resolved { "-->" } else { "-.->" };
            out.push_str(&format!("    {} {} {}\n", node.name, arrow, reference.target));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parse_content;
    use std::path::Path;

    fn known(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_integration_points_resolved_and_dangling() {
        let doc = parse_content(
            Path::new("planner.md"),
            "---\nname: planner\nintegration_points:\n  - \"code-reviewer: final review\"\n  - test-writer for coverage\n  - CI pipelines\n---\n",
        );
        let refs = extract_references(&doc, &known(&["planner", "code-reviewer"]));

        assert_eq!(
            refs,
            vec![
                Reference {
                    target: "code-reviewer".into(),
                    origin: ReferenceOrigin::IntegrationPoint,
                    resolved: true,
                },
                Reference {
                    target: "test-writer".into(),
                    origin: ReferenceOrigin::IntegrationPoint,
                    resolved: false,
                },
            ]
        );
    }

    #[test]
    fn test_prose_references() {
        let doc = parse_content(
            Path::new("planner.md"),
            "---\nname: planner\n---\n\n## Collaboration\n\nWorks closely with debugger. Hand off to the `security-auditor` agent.\nThe `docs-writer` agent polishes output. Works with Docker-Compose and the release-bot agent.\n",
        );
        let refs = extract_references(&doc, &known(&["planner", "debugger", "security-auditor"]));
        let targets: Vec<&str> = refs.iter().map(|r| r.target.as_str()).collect();

        assert_eq!(targets, vec!["debugger", "security-auditor", "docs-writer"]);
        assert!(refs.iter().all(|r| r.origin == ReferenceOrigin::Prose));
        assert!(!refs[2].resolved);
    }

    #[test]
    fn test_bare_prose_names_must_resolve() {
        let doc = parse_content(
            Path::new("planner.md"),
            "---\nname: planner\n---\n\nWorks with Docker-Compose. The build-cache agent is unrelated. Works with `ci-runner` too.\n",
        );
        let refs = extract_references(&doc, &known(&["planner"]));
        let targets: Vec<&str> = refs.iter().map(|r| r.target.as_str()).collect();

        assert_eq!(targets, vec!["ci-runner"]);
        assert!(!refs[0].resolved);
    }

    #[test]
    fn test_own_name_does_not_hide_integration_target() {
        let doc = parse_content(
            Path::new("code-reviewer.md"),
            "---\nname: code-reviewer\nintegration_points:\n  - code-reviewer findings go to security-auditor\n---\n",
        );
        let refs = extract_references(&doc, &known(&["code-reviewer", "security-auditor"]));

        assert_eq!(
            refs,
            vec![
                Reference {
                    target: "security-auditor".into(),
                    origin: ReferenceOrigin::IntegrationPoint,
                    resolved: true,
                },
            ]
        );
    }

    #[test]
    fn test_self_reference_is_ignored() {
        let doc = parse_content(
            Path::new("planner.md"),
            "---\nname: planner\nintegration_points: [planner]\n---\n\nThe planner agent plans.\n",
        );
        assert!(extract_references(&doc, &known(&["planner"])).is_empty());
    }

    #[test]
    fn test_to_mermaid() {
        let graph = vec![
            GraphNode {
                name: "a".into(),
                path: "a.md".into(),
                references: vec![
                    Reference {
                        target: "b".into(),
                        origin: ReferenceOrigin::Prose,
                        resolved: true,
                    },
                    Reference {
                        target: "ghost-agent".into(),
                        origin: ReferenceOrigin::IntegrationPoint,
                        resolved: false,
                    },
                ],
            },
            GraphNode {
                name: "b".into(),
                path: "b.md".into(),
                references: vec![],
            },
        ];

        assert_eq!(to_mermaid(&graph), "graph LR\n    a --> b\n    a -.-> ghost-agent\n    b\n");
    }
}
