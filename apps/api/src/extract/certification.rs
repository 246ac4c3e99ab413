use std::sync::LazyLock;

use regex::Regex;

use super::dates::{find_date, find_date_range, most_recent};
use super::section_lines;
use crate::lexicon::Lexicon;
use crate::models::entities::{CertificationInput, CertificationRecord};
use crate::models::{CertificationEntry, Entry};
use crate::parser::emphasis::strip_markers;
use crate::parser::links::{normalize_url, split_trailing, LINK_RE};
use crate::parser::tokenizer::strip_bullet;

static PROVIDER_PARENS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<name>.+?)\s*\((?P<provider>[^()]+)\)$").unwrap());

static SPLIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+[-–—|]\s+|\s*[|:]\s+").unwrap());

static EMPTY_PARENS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[(\[]\s*[-–—,|]?\s*[)\]]").unwrap());

fn clean(text: &str) -> String {
    text.trim_matches(|c: char| c.is_whitespace() || matches!(c, ',' | '-' | '–' | '—' | '|' | ':' | ';'))
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Pulls the first link out of `body`: a markdown link leaves its label behind, a bare
/// URL is removed entirely.
fn take_link(body: &str) -> (String, Option<String>) {
    for caps in LINK_RE.captures_iter(body) {
        let Some(whole) = caps.get(0) else { continue };
        if let (Some(label), Some(url)) = (caps.name("label"), caps.name("url")) {
            if let Some(href) = normalize_url(url.as_str()) {
                let rest = format!("{}{}{}", &body[..whole.start()], label.as_str(), &body[whole.end()..]);
                return (rest, Some(href));
            }
            continue;
        }
        let (core, _) = split_trailing(whole.as_str());
        if let Some(href) = normalize_url(core) {
            let rest = format!("{}{}", &body[..whole.start()], &body[whole.start() + core.len()..]);
            return (rest, Some(href));
        }
    }
    (body.to_string(), None)
}

fn is_date_like(text: &str) -> bool {
    find_date(text).is_some_and(|(date, _)| date.len() + 4 >= text.trim().len())
}

/// Parses one certification line: `Name (Provider)`, `Name - Provider`, with an
/// optional markdown or bare link and an optional date anywhere on the line.
pub fn parse_certification_line(line: &str) -> Option<CertificationEntry> {
    let trimmed = line.trim();
    let body = strip_bullet(trimmed).unwrap_or(trimmed);
    let (body, url) = take_link(body);
    let mut body = strip_markers(&body);

    let span = find_date_range(&body)
        .map(|r| (r.end, r.span))
        .or_else(|| find_date(&body));
    let date = span.map(|(date, range)| {
        body.replace_range(range, "");
        date
    });
    let body = clean(&EMPTY_PARENS_RE.replace_all(&body, ""));

    let (name, provider) = match PROVIDER_PARENS_RE.captures(&body) {
        Some(caps) if !is_date_like(&caps["provider"]) => {
            (clean(&caps["name"]), clean(&caps["provider"]))
        }
        _ => match SPLIT_RE.splitn(&body, 2).collect::<Vec<_>>().as_slice() {
            [name, provider] => (clean(name), clean(provider)),
            _ => (body.clone(), String::new()),
        },
    };

    if name.is_empty() {
        return None;
    }
    Some(CertificationEntry {
        name,
        provider,
        url,
        date: date.filter(|d| !d.is_empty() && d != "Present"),
    })
}

/// Certification entries from "Certification" sections of the raw text.
pub fn extract_certifications(text: &str, lex: &Lexicon) -> Vec<CertificationEntry> {
    section_lines(text, lex, |h| h == "Certification")
        .into_iter()
        .filter_map(parse_certification_line)
        .collect()
}

/// Reads an already-tokenized section item; link tokens supply the URL.
pub fn entry_from_item(entry: &Entry) -> Option<CertificationEntry> {
    let mut cert = parse_certification_line(&entry.text)?;
    if cert.url.is_none() {
        cert.url = entry.links.first().map(|l| l.href.clone());
    }
    Some(cert)
}

fn entry_from_record(record: &CertificationRecord) -> Option<CertificationEntry> {
    let name = clean(&strip_markers(record.name.as_deref().unwrap_or_default()));
    if name.is_empty() {
        return None;
    }
    Some(CertificationEntry {
        name,
        provider: clean(record.provider.as_deref().unwrap_or_default()),
        url: record.url.as_deref().and_then(normalize_url),
        date: most_recent(record.date_fields()).map(str::to_string),
    })
}

pub fn resolve_certification_inputs(inputs: &[CertificationInput]) -> Vec<CertificationEntry> {
    inputs
        .iter()
        .filter_map(|input| match input {
            CertificationInput::Line(text) => parse_certification_line(text),
            CertificationInput::Record(record) => entry_from_record(record),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::EntryLink;
    use serde_json::json;

    #[test]
    fn test_name_provider_in_parens_with_date() {
        let cert = parse_certification_line("- AWS Solutions Architect (Amazon), 2021").unwrap();
        assert_eq!(cert.name, "AWS Solutions Architect");
        assert_eq!(cert.provider, "Amazon");
        assert_eq!(cert.date.as_deref(), Some("2021"));
        assert_eq!(cert.url, None);
    }

    #[test]
    fn test_dash_split_and_markdown_link() {
        let cert = parse_certification_line(
            "[CKA](https://credly.com/badges/abc) - CNCF | Mar 2022",
        )
        .unwrap();
        assert_eq!(cert.name, "CKA");
        assert_eq!(cert.provider, "CNCF");
        assert_eq!(cert.url.as_deref(), Some("https://credly.com/badges/abc"));
        assert_eq!(cert.date.as_deref(), Some("Mar 2022"));
    }

    #[test]
    fn test_bare_url_and_date_in_parens() {
        let cert = parse_certification_line("Terraform Associate (2020) www.credly.com/b/1").unwrap();
        assert_eq!(cert.name, "Terraform Associate");
        assert_eq!(cert.provider, "");
        assert_eq!(cert.url.as_deref(), Some("https://www.credly.com/b/1"));
        assert_eq!(cert.date.as_deref(), Some("2020"));
    }

    #[test]
    fn test_extract_certifications_section() {
        let text = "Alex\nLicenses & Certifications\n- CKA (CNCF)\n- PMP - PMI\nSkills\nRust";
        let certs = extract_certifications(text, Lexicon::shared());
        let labels: Vec<String> = certs.iter().map(CertificationEntry::label).collect();
        assert_eq!(labels, vec!["CKA (CNCF)", "PMP (PMI)"]);
    }

    #[test]
    fn test_entry_from_item_uses_link_token() {
        let entry = Entry {
            text: "CKA (CNCF)".into(),
            bullet: true,
            links: vec![EntryLink {
                text: "CKA".into(),
                href: "https://credly.com/x".into(),
            }],
        };
        let cert = entry_from_item(&entry).unwrap();
        assert_eq!(cert.url.as_deref(), Some("https://credly.com/x"));
    }

    #[test]
    fn test_records_take_most_recent_date() {
        let inputs: Vec<CertificationInput> = serde_json::from_value(json!([
            {"title": "CKA", "issuer": "CNCF", "issuedOn": "2021-03-01", "earnedOn": "2022-05-10",
             "badgeUrl": "credly.com/badges/cka"},
            {"issuer": "nameless"},
            "PMP - PMI"
        ]))
        .unwrap();
        let certs = resolve_certification_inputs(&inputs);
        assert_eq!(certs.len(), 2);
        assert_eq!(certs[0].date.as_deref(), Some("2022-05-10"));
        assert_eq!(certs[0].url.as_deref(), Some("https://credly.com/badges/cka"));
        assert_eq!(certs[1].provider, "PMI");
    }
}
