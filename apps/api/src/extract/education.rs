use super::section_lines;
use crate::lexicon::Lexicon;
use crate::models::entities::{EducationInput, EducationRecord};
use crate::parser::emphasis::strip_markers;
use crate::parser::tokenizer::strip_bullet;

fn clean_line(line: &str) -> String {
    let trimmed = line.trim();
    strip_markers(strip_bullet(trimmed).unwrap_or(trimmed))
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Education lines from the résumé, one per non-blank line; indented lines continue
/// the previous one.
pub fn extract_education(text: &str, lex: &Lexicon) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for line in section_lines(text, lex, |h| h == "Education") {
        let cleaned = clean_line(line);
        if cleaned.is_empty() {
            continue;
        }
        let continues = line.starts_with("  ") || line.starts_with('\t');
        match out.last_mut() {
            Some(prev) if continues && strip_bullet(line.trim()).is_none() => {
                prev.push_str(", ");
                prev.push_str(&cleaned);
            }
            _ => out.push(cleaned),
        }
    }
    out
}

/// "Degree in Field, School (start - end)" with absent parts left out.
fn format_record(record: &EducationRecord) -> String {
    let get = |v: &Option<String>| v.as_deref().map(str::trim).unwrap_or_default().to_string();
    let (degree, field, school) = (get(&record.degree), get(&record.field), get(&record.school));
    let (start, end) = (get(&record.start_date), get(&record.end_date));

    let program = match (degree.is_empty(), field.is_empty()) {
        (false, false) => format!("{degree} in {field}"),
        (false, true) => degree,
        (true, false) => field,
        (true, true) => String::new(),
    };
    let mut line = [program, school]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(", ");
    let dates = match (start.is_empty(), end.is_empty()) {
        (false, false) => format!("{start} - {end}"),
        (true, false) => end,
        (false, true) => start,
        (true, true) => String::new(),
    };
    if !line.is_empty() && !dates.is_empty() {
        line.push_str(&format!(" ({dates})"));
    }
    line
}

pub fn resolve_education_inputs(inputs: &[EducationInput]) -> Vec<String> {
    inputs
        .iter()
        .map(|input| match input {
            EducationInput::Line(text) => clean_line(text),
            EducationInput::Record(record) => format_record(record),
        })
        .filter(|line| !line.is_empty())
        .collect()
}
