//! Agent definition template generation
//!
//! Generates new agent documents with explicit front matter and the
//! conventional prose sections.

/// Title-case a kebab or snake name: `code-reviewer` -> `Code Reviewer`
pub fn title_case(name: &str) -> String {
    name.split(&['-', '_'][..])
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Generate an agent definition for a new persona
pub fn generate_agent_template(name: &str, tools: &[String]) -> String {
    let title = title_case(name);
    let tools = if tools.is_empty() {
        "Read, Grep, Glob".to_string()
    } else {
        tools.join(", ")
    };

    format!(
        r#"---
name: {name}
description: "Describe when to use the {title} agent and what it delivers"
tools: {tools}
expertise_level: expert
domain_focus: "[primary domain]"
sub_domains: []
integration_points: []
success_criteria: []
---

# {title}

## Core Competencies

- [Competency 1]
- [Competency 2]

## Task Breakdown & QA Loop

1. [Understand the request and gather context]
2. [Do the work in small, verifiable steps]
3. [Check the result against the success criteria]

## Best Practices

- [Practice 1]

## Use Cases

- [When should this agent be chosen?]

## Limitations

- [What this agent should not be used for]
"#,
        name = name,
        title = title,
        tools = tools
    )
}
