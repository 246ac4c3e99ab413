//! Entity extractors. Each re-derives one entity kind straight from the raw text,
//! independently of the document assembler, so a bad assembly never hides entities.

pub mod certification;
pub mod contact;
pub mod dates;
pub mod education;
pub mod experience;

use crate::lexicon::Lexicon;
use crate::parser::assembler::heading_text;
use crate::parser::headings::canonicalize_heading;
use crate::parser::input::ResumeSource;

/// Line-oriented view of a résumé. Structured JSON input is flattened back into
/// `# Heading` blocks so every extractor reads one shape.
pub fn line_view(raw: &str) -> String {
    match ResumeSource::detect(raw) {
        ResumeSource::Plain(text) => text,
        ResumeSource::Structured(resume) => {
            let mut out = String::new();
            if !resume.name.is_empty() {
                out.push_str(&resume.name);
                out.push('\n');
            }
            for section in resume.sections {
                out.push_str("# ");
                out.push_str(&section.heading);
                out.push('\n');
                for item in section.items {
                    out.push_str(&item);
                    out.push('\n');
                }
            }
            out
        }
    }
}

/// Lines of every section whose canonical heading satisfies `wanted`, each block
/// bounded by the next heading line.
pub(crate) fn section_lines<'a>(
    text: &'a str,
    lex: &Lexicon,
    wanted: impl Fn(&str) -> bool,
) -> Vec<&'a str> {
    let mut out = Vec::new();
    let mut inside = false;
    for line in text.lines() {
        if let Some(heading) = heading_text(line, lex) {
            inside = wanted(&canonicalize_heading(&heading, lex));
            continue;
        }
        if inside && !line.trim().is_empty() {
            out.push(line);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_lines_are_bounded_by_next_heading() {
        let text = "Alex\nEDUCATION\nBSc Physics\n\n# Skills\nRust\nEducation:\nMSc CS";
        let lines = section_lines(text, Lexicon::shared(), |h| h == "Education");
        assert_eq!(lines, vec!["BSc Physics", "MSc CS"]);
    }

    #[test]
    fn test_line_view_flattens_structured_input() {
        let raw = r#"{"name": "Alex", "sections": [{"heading": "Education", "items": ["BSc"]}]}"#;
        assert_eq!(line_view(raw), "Alex\n# Education\nBSc\n");
        assert_eq!(line_view("plain"), "plain");
    }
}
