use std::sync::LazyLock;

use regex::Regex;

use crate::models::ContactDetails;
use crate::parser::emphasis::strip_markers;
use crate::parser::links::{normalize_url, split_trailing};
use crate::parser::tokenizer::strip_bullet;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}\b").unwrap());

static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\+\d{1,3}[\s.-]?)?(?:\(\d{3}\)|\b\d{3})[\s.-]?\d{3}[\s.-]?\d{4}\b").unwrap()
});

static LINKEDIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:https?://)?(?:[a-z]{2,3}\.)?linkedin\.com/[^\s|,<>\]]+").unwrap()
});

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bhttps?://|\bwww\.|\b[a-z0-9-]+\.(?:com|io|dev|me|net|org)/").unwrap());

static CITY_STATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<city>[A-Z][A-Za-z.' -]{1,40}),\s*(?P<region>[A-Z]{2}|[A-Z][a-z]+(?:\s+[A-Z][a-z]+){0,2})(?:\s+\d{5}(?:-\d{4})?)?$",
    )
    .unwrap()
});

static MONTH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sept?(?:ember)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\.?$").unwrap()
});

/// Words that mark a "Role, Company" or "Company, Inc" line rather than a place.
const NOT_A_PLACE: &[&str] = &[
    "inc", "llc", "ltd", "corp", "gmbh", "plc", "engineer", "developer", "manager",
    "analyst", "intern", "lead", "director", "consultant", "designer", "architect",
    "scientist", "senior", "junior", "university", "college", "school",
];

const MAX_PLACE_WORDS: usize = 3;

const HEADER_LINES: usize = 8;
const SEGMENT_SEPARATORS: &[char] = &['|', '•', '·', '●'];

/// True for text carrying an email, phone number, LinkedIn or other URL.
pub fn looks_like_contact(text: &str) -> bool {
    EMAIL_RE.is_match(text)
        || PHONE_RE.is_match(text)
        || LINKEDIN_RE.is_match(text)
        || URL_RE.is_match(text)
}

fn is_place_name(text: &str) -> bool {
    let words: Vec<&str> = text.split_whitespace().collect();
    !words.is_empty()
        && words.len() <= MAX_PLACE_WORDS
        && words.iter().all(|w| {
            let lower = w.trim_matches('.').to_lowercase();
            !MONTH_RE.is_match(w) && !NOT_A_PLACE.contains(&lower.as_str())
        })
}

/// `City, ST` or `City, Region` where the region is a capitalized phrase.
fn city_state(segment: &str) -> Option<String> {
    let caps = CITY_STATE_RE.captures(segment.trim())?;
    let city = caps["city"].trim();
    let region = &caps["region"];
    (is_place_name(city) && is_place_name(region)).then(|| format!("{city}, {region}"))
}

fn header_lines(text: &str) -> impl Iterator<Item = String> + '_ {
    text.lines()
        .filter(|l| !l.trim().is_empty())
        .take_while(|l| !l.trim_start().starts_with('#'))
        .take(HEADER_LINES)
        .map(|l| {
            let t = l.trim();
            strip_markers(strip_bullet(t).unwrap_or(t)).trim().to_string()
        })
}

/// Best-effort contact details. An explicit LinkedIn URL wins over one found in the text.
pub fn extract_contact(text: &str, linkedin_override: Option<&str>) -> ContactDetails {
    let email = EMAIL_RE.find(text).map(|m| m.as_str().to_string());
    let phone = PHONE_RE.find(text).map(|m| m.as_str().trim().to_string());

    let linkedin = linkedin_override
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(normalize_url)
        .or_else(|| {
            let found = LINKEDIN_RE.find(text)?;
            normalize_url(split_trailing(found.as_str()).0)
        });

    let mut city = None;
    let mut contact_lines = Vec::new();
    for line in header_lines(text) {
        let mut line_has_city = false;
        for segment in line.split(SEGMENT_SEPARATORS) {
            if looks_like_contact(segment) {
                continue;
            }
            if let Some(found) = city_state(segment) {
                line_has_city = true;
                city.get_or_insert(found);
            }
        }
        if line_has_city || looks_like_contact(&line) {
            contact_lines.push(line);
        }
    }

    ContactDetails {
        email,
        phone,
        linkedin,
        city_state: city,
        contact_lines,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "**Alex Doe**\nAustin, TX | alex.doe@example.com | (512) 555-0134\n\
                          linkedin.com/in/alexdoe.\n\n# Experience\nSRE at Globex (2017 - 2019)";

    #[test]
    fn test_extracts_all_fields() {
        let contact = extract_contact(HEADER, None);
        assert_eq!(contact.email.as_deref(), Some("alex.doe@example.com"));
        assert_eq!(contact.phone.as_deref(), Some("(512) 555-0134"));
        assert_eq!(contact.linkedin.as_deref(), Some("https://linkedin.com/in/alexdoe"));
        assert_eq!(contact.city_state.as_deref(), Some("Austin, TX"));
        assert_eq!(contact.contact_lines.len(), 2);
    }

    #[test]
    fn test_linkedin_override_wins() {
        let contact = extract_contact(HEADER, Some("www.linkedin.com/in/other"));
        assert_eq!(contact.linkedin.as_deref(), Some("https://www.linkedin.com/in/other"));
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(extract_contact("", None), ContactDetails::default());
    }

    #[test]
    fn test_date_ranges_are_not_phones() {
        assert!(!looks_like_contact("Staff Engineer at Acme (Jan 2020 - Present)"));
        assert!(!looks_like_contact("SRE | Globex | 2017 - 2019"));
        assert!(looks_like_contact("+1 512.555.0134"));
    }

    #[test]
    fn test_city_with_region_name() {
        let contact = extract_contact("Alex Doe\nBerlin, Germany\nalex@x.io", None);
        assert_eq!(contact.city_state.as_deref(), Some("Berlin, Germany"));

        let contact = extract_contact("Alex Doe\nAustin, Texas | (512) 555-0134", None);
        assert_eq!(contact.city_state.as_deref(), Some("Austin, Texas"));

        assert_eq!(city_state("New York, NY 10001").as_deref(), Some("New York, NY"));
        assert_eq!(city_state("Denver, CO").as_deref(), Some("Denver, CO"));
        assert_eq!(city_state("Marseille, France").as_deref(), Some("Marseille, France"));
        assert_eq!(city_state("San Luis Obispo, New South Wales").as_deref(), Some("San Luis Obispo, New South Wales"));
    }

    #[test]
    fn test_role_company_and_month_lines_are_not_places() {
        assert_eq!(city_state("Senior Engineer, Acme"), None);
        assert_eq!(city_state("Acme, Inc"), None);
        assert_eq!(city_state("Started, January"), None);
        assert_eq!(city_state("Rust, Go, Python"), None);

        let contact = extract_contact("Alex Doe\nalex@x.io\n# Skills\nRust, Go", None);
        assert_eq!(contact.city_state, None);
    }
}
