//! Input resolution. Raw résumé text is sniffed exactly once and resolved into a
//! tagged variant; everything downstream takes one unambiguous shape.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const HEADING_KEYS: &[&str] = &["heading", "title", "name"];
const ITEM_KEYS: &[&str] = &["items", "content", "entries", "bullets", "lines"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuredSection {
    pub heading: String,
    /// One raw line per item, still untokenized.
    pub items: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructuredResume {
    pub name: String,
    pub sections: Vec<StructuredSection>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResumeSource {
    Structured(StructuredResume),
    Plain(String),
}

impl ResumeSource {
    /// JSON objects with a `sections` array/map or a flat heading→items shape are
    /// structured; anything else, including malformed JSON, is plain text.
    pub fn detect(raw: &str) -> Self {
        let trimmed = raw.trim();
        if !trimmed.starts_with('{') {
            return ResumeSource::Plain(raw.to_string());
        }
        match serde_json::from_str::<Value>(trimmed) {
            Ok(Value::Object(map)) => match structured_from_map(&map) {
                Some(resume) => ResumeSource::Structured(resume),
                None => ResumeSource::Plain(raw.to_string()),
            },
            _ => ResumeSource::Plain(raw.to_string()),
        }
    }

    pub fn is_structured(&self) -> bool {
        matches!(self, ResumeSource::Structured(_))
    }
}

fn structured_from_map(map: &Map<String, Value>) -> Option<StructuredResume> {
    let name = map
        .get("name")
        .or_else(|| map.get("fullName"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .trim()
        .to_string();

    let sections = match map.get("sections") {
        Some(Value::Array(list)) => list.iter().filter_map(section_from_value).collect(),
        Some(Value::Object(by_heading)) => by_heading
            .iter()
            .map(|(heading, value)| StructuredSection {
                heading: heading.trim().to_string(),
                items: value_lines(value),
            })
            .collect(),
        Some(_) => return None,
        None => {
            let flat: Vec<StructuredSection> = map
                .iter()
                .filter(|(key, _)| !matches!(key.as_str(), "name" | "fullName"))
                .filter(|(_, value)| matches!(value, Value::String(_) | Value::Array(_)))
                .map(|(heading, value)| StructuredSection {
                    heading: heading.trim().to_string(),
                    items: value_lines(value),
                })
                .collect();
            if flat.is_empty() {
                return None;
            }
            flat
        }
    };

    Some(StructuredResume { name, sections })
}

fn section_from_value(value: &Value) -> Option<StructuredSection> {
    let obj = value.as_object()?;
    let heading = HEADING_KEYS
        .iter()
        .find_map(|k| obj.get(*k).and_then(Value::as_str))?
        .trim()
        .to_string();
    let items = ITEM_KEYS
        .iter()
        .find_map(|k| obj.get(*k))
        .map(value_lines)
        .unwrap_or_default();
    Some(StructuredSection { heading, items })
}

/// A string splits into lines; an array yields one item per element. Object
/// elements become pipe-joined headers so the tokenizer treats them as job lines.
fn value_lines(value: &Value) -> Vec<String> {
    let mut out = Vec::new();
    match value {
        Value::String(s) => out.extend(s.lines().map(str::to_string)),
        Value::Array(list) => {
            for element in list {
                match element {
                    Value::String(s) => out.push(s.clone()),
                    Value::Number(n) => out.push(n.to_string()),
                    Value::Object(obj) => {
                        let parts: Vec<&str> = obj
                            .values()
                            .filter_map(Value::as_str)
                            .map(str::trim)
                            .filter(|s| !s.is_empty())
                            .collect();
                        if !parts.is_empty() {
                            out.push(parts.join(" | "));
                        }
                    }
                    Value::Array(_) => out.extend(value_lines(element)),
                    _ => {}
                }
            }
        }
        Value::Number(n) => out.push(n.to_string()),
        _ => {}
    }
    out.retain(|line| !line.trim().is_empty());
    out
}

// ────────────────────────────────────────────────────────────────────────────
// Job-skill lists
// ────────────────────────────────────────────────────────────────────────────

/// Job skills as callers send them: a delimited string or arbitrarily nested arrays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SkillList {
    Text(String),
    Nested(Vec<SkillList>),
}

impl SkillList {
    /// Flattens, splits on `,` `;` and newlines, and dedupes case-insensitively
    /// keeping the first spelling.
    pub fn flatten(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        self.collect_into(&mut seen, &mut out);
        out
    }

    fn collect_into(&self, seen: &mut HashSet<String>, out: &mut Vec<String>) {
        match self {
            SkillList::Text(text) => {
                for skill in text.split([',', ';', '\n']) {
                    let skill = skill.trim();
                    if !skill.is_empty() && seen.insert(skill.to_lowercase()) {
                        out.push(skill.to_string());
                    }
                }
            }
            SkillList::Nested(list) => {
                for inner in list {
                    inner.collect_into(seen, out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_text_and_bad_json_are_plain() {
        assert!(!ResumeSource::detect("Alex Doe\n# Skills").is_structured());
        assert!(!ResumeSource::detect("{ not json").is_structured());
        assert!(!ResumeSource::detect("{\"sections\": 3}").is_structured());
    }

    #[test]
    fn test_sections_array() {
        let raw = json!({
            "name": "Alex Doe",
            "sections": [
                {"heading": "Skills", "items": ["Rust, Go"]},
                {"title": "Summary", "content": "Builds things.\nShips them."},
                {"no_heading": true}
            ]
        })
        .to_string();
        let ResumeSource::Structured(resume) = ResumeSource::detect(&raw) else {
            panic!("expected structured input");
        };
        assert_eq!(resume.name, "Alex Doe");
        assert_eq!(resume.sections.len(), 2);
        assert_eq!(resume.sections[1].items, vec!["Builds things.", "Ships them."]);
    }

    #[test]
    fn test_flat_heading_map_keeps_order() {
        let raw = r#"{"name": "A", "Experience": ["Engineer | Acme"], "Education": "BSc CS"}"#;
        let ResumeSource::Structured(resume) = ResumeSource::detect(raw) else {
            panic!("expected structured input");
        };
        let headings: Vec<&str> = resume.sections.iter().map(|s| s.heading.as_str()).collect();
        assert_eq!(headings, vec!["Experience", "Education"]);
    }

    #[test]
    fn test_object_items_become_pipe_lines() {
        let raw = json!({"sections": {"Experience": [{"title": "SRE", "company": "Globex"}]}});
        let ResumeSource::Structured(resume) = ResumeSource::detect(&raw.to_string()) else {
            panic!("expected structured input");
        };
        assert_eq!(resume.sections[0].items, vec!["SRE | Globex"]);
    }

    #[test]
    fn test_skill_list_flattens_and_dedupes() {
        let skills: SkillList =
            serde_json::from_value(json!(["AWS, sql", ["SQL", "Docker\nKubernetes"], "aws"]))
                .unwrap();
        assert_eq!(skills.flatten(), vec!["AWS", "sql", "Docker", "Kubernetes"]);

        let single: SkillList = serde_json::from_value(json!("Rust; Go")).unwrap();
        assert_eq!(single.flatten(), vec!["Rust", "Go"]);
    }
}
