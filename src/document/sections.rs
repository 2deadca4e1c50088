//! Markdown section splitting
//!
//! Documents are free text under ATX headings. Sections are kept for
//! outlines and for headings that carry schema labels.

use lazy_regex::{regex_captures, regex_is_match, regex_replace};
use serde::Serialize;

use super::frontmatter::fence_marker;

/// Text under one heading, up to the next heading of any level
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub level: usize,
    pub title: String,
    /// 1-based line of the heading
    pub line: usize,
    #[serde(skip)]
    pub body: String,
}

impl Section {
    /// Bullet and numbered list items, markers stripped
    pub fn bullets(&self) -> Vec<String> {
        self.body
            .lines()
            .filter_map(|line| {
                let trimmed = line.trim();
                if let Some((_, item)) = regex_captures!(r"^(?:[-*+]|\d+[.)])\s+(.+)$", trimmed) {
                    Some(item.trim().to_string())
                } else {
                    None
                }
            })
            .collect()
    }

    /// First paragraph of the body, joined onto one line
    pub fn first_paragraph(&self) -> String {
        self.body
            .lines()
            .map(str::trim)
            .skip_while(|line| line.is_empty())
            .take_while(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Split a body into sections. Headings inside fenced code are ignored.
pub fn parse_sections(body: &str, first_line: usize) -> Vec<Section> {
    let mut sections: Vec<Section> = Vec::new();
    let mut in_fence: Option<&str> = None;

    for (idx, line) in body.lines().enumerate() {
        // A fence closes only on the marker that opened it
        if let Some(marker) = fence_marker(line) {
            in_fence = match in_fence {
                Some(open) if open == marker => None,
                Some(open) => Some(open),
                None => Some(marker),
            };
        }

        if in_fence.is_none()
            && let Some((_, hashes, title)) = regex_captures!(r"^(#{1,6})\s+(.+?)\s*$", line)
        {
            let title = regex_replace!(r"\s+#+$", title, "").trim().to_string();
            sections.push(Section {
                level: hashes.len(),
                title,
                line: first_line + idx,
                body: String::new(),
            });
            continue;
        }

        if let Some(current) = sections.last_mut() {
            current.body.push_str(line);
            current.body.push('\n');
        }
    }

    sections
}

/// Indented heading titles
pub fn outline(sections: &[Section]) -> Vec<String> {
    sections
        .iter()
        .map(|s| format!("{}{}", "  ".repeat(s.level.saturating_sub(1)), s.title))
        .collect()
}

/// Whether a heading title looks like one of the conventional prose sections
pub fn is_conventional_title(title: &str) -> bool {
    regex_is_match!(
        r"(?i)^(core competencies|task breakdown|best practices|use cases|limitations|methodolog)",
        title
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sections_levels_and_lines() {
        let body = "# Title\n\nIntro\n\n## Core Competencies\n\n- One\n- Two\n\n### Detail ##\ntext\n";
        let sections = parse_sections(body, 5);

        assert_eq!(sections.len(), 3);
        assert_eq!(sections[0].level, 1);
        assert_eq!(sections[0].title, "Title");
        assert_eq!(sections[0].line, 5);
        assert_eq!(sections[1].title, "Core Competencies");
        assert_eq!(sections[1].line, 9);
        assert_eq!(sections[2].title, "Detail");
        assert_eq!(sections[2].level, 3);
    }

    #[test]
    fn test_headings_in_code_fences_are_ignored() {
        let body = "## Real\n\n```bash\n# not a heading\n```\n";
        let sections = parse_sections(body, 1);
        assert_eq!(sections.len(), 1);
        assert!(sections[0].body.contains("# not a heading"));
    }

    #[test]
    fn test_fence_closes_only_on_its_own_marker() {
        let body = "## Real\n\n```text\n~~~\n# not a heading\n```\n\n## After\n";
        let titles: Vec<String> = parse_sections(body, 1).into_iter().map(|s| s.title).collect();
        assert_eq!(titles, vec!["Real", "After"]);
    }

    #[test]
    fn test_fenced_field_heading_does_not_fill_metadata() {
        let doc = crate::document::parse_content(
            std::path::Path::new("x.md"),
            "# X\n\n~~~markdown\n```\n## Tools\n\n- Bash\n~~~\n",
        );
        assert!(doc.tools.is_none());
        assert_eq!(doc.sections.len(), 1);
    }

    #[test]
    fn test_bullets() {
        let section = Section {
            level: 2,
            title: "Use Cases".into(),
            line: 1,
            body: "- first\n* second\n1. third\n2) fourth\nnot a bullet\n".into(),
        };
        assert_eq!(section.bullets(), vec!["first", "second", "third", "fourth"]);
    }

    #[test]
    fn test_first_paragraph() {
        let section = Section {
            level: 2,
            title: "Description".into(),
            line: 1,
            body: "\nLine one\nline two\n\nSecond paragraph\n".into(),
        };
        assert_eq!(section.first_paragraph(), "Line one line two");
    }

    #[test]
    fn test_outline() {
        let sections = parse_sections("# A\n## B\n### C\n## D\n", 1);
        assert_eq!(outline(&sections), vec!["A", "  B", "    C", "  D"]);
    }

    #[test]
    fn test_is_conventional_title() {
        assert!(is_conventional_title("Core Competencies"));
        assert!(is_conventional_title("Task Breakdown & QA Loop"));
        assert!(is_conventional_title("Methodology"));
        assert!(!is_conventional_title("Random notes"));
    }
}
