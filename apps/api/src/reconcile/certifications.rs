use std::collections::HashMap;

use tracing::debug;

use super::sections::ensure_section;
use super::ReconcileContext;
use crate::extract::certification::entry_from_item;
use crate::extract::dates::{cmp_newest_first, parse_date};
use crate::models::{CertificationEntry, Document, Entry, Item, Token};

pub const CERTIFICATION: &str = "Certification";
pub const PROFILE_LINK_LABEL: &str = "Verified credential profile";

/// Union in precedence order, deduplicated by `(name, provider)`. A later duplicate
/// only fills a missing URL or date.
pub fn merge_certifications(
    lists: impl IntoIterator<Item = CertificationEntry>,
) -> Vec<CertificationEntry> {
    let mut index: HashMap<(String, String), usize> = HashMap::new();
    let mut out: Vec<CertificationEntry> = Vec::new();
    for cert in lists {
        let key = cert.identity_key();
        match index.get(&key) {
            Some(&pos) => {
                let kept = &mut out[pos];
                if kept.url.is_none() {
                    kept.url = cert.url;
                }
                if kept.date.is_none() {
                    kept.date = cert.date;
                }
            }
            None => {
                index.insert(key, out.len());
                out.push(cert);
            }
        }
    }
    out.sort_by(|a, b| {
        cmp_newest_first(
            a.date.as_deref().and_then(parse_date),
            b.date.as_deref().and_then(parse_date),
        )
    });
    out
}

fn render(cert: &CertificationEntry) -> Item {
    let mut item = vec![Token::Bullet];
    match &cert.url {
        Some(url) => item.push(Token::link(cert.label(), url.clone())),
        None => item.push(Token::text(cert.label())),
    }
    if let Some(date) = &cert.date {
        item.push(Token::text(format!(" ({date})")));
    }
    item
}

fn links_to(item: &Item, url: &str) -> bool {
    item.iter()
        .any(|t| matches!(t, Token::Link { href, .. } if href.eq_ignore_ascii_case(url)))
}

/// Rebuilds the Certification section from every known source, most recent first,
/// with the verification profile appended when nothing links to it yet.
pub fn reconcile_certifications(doc: &mut Document, ctx: &ReconcileContext) {
    let profile_url = ctx
        .profile_url
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty());

    let existing: Vec<CertificationEntry> = doc
        .section(CERTIFICATION)
        .map(|section| {
            section
                .items
                .iter()
                .filter(|item| !profile_url.is_some_and(|url| links_to(item, url)))
                .filter_map(|item| entry_from_item(&Entry::from_tokens(item)))
                .collect()
        })
        .unwrap_or_default();

    let certs = merge_certifications(
        existing
            .into_iter()
            .chain(ctx.verified_credentials.iter().cloned())
            .chain(ctx.resume_certifications.iter().cloned())
            .chain(ctx.profile_certifications.iter().cloned()),
    );
    if certs.is_empty() && profile_url.is_none() {
        return;
    }
    debug!(count = certs.len(), "Reconciled certifications");

    let mut items: Vec<Item> = certs.iter().map(render).collect();
    if let Some(url) = profile_url {
        if !items.iter().any(|item| links_to(item, url)) {
            items.push(vec![Token::Bullet, Token::link(PROFILE_LINK_LABEL, url)]);
        }
    }
    ensure_section(doc, CERTIFICATION).items = items;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Section;

    fn cert(name: &str, provider: &str, url: Option<&str>, date: Option<&str>) -> CertificationEntry {
        CertificationEntry {
            name: name.into(),
            provider: provider.into(),
            url: url.map(str::to_string),
            date: date.map(str::to_string),
        }
    }

    #[test]
    fn test_dedupe_fills_missing_fields_and_sorts() {
        let merged = merge_certifications(vec![
            cert("CKA", "CNCF", None, None),
            cert("PMP", "PMI", None, Some("2018")),
            cert("cka", "cncf", Some("https://credly.com/cka"), Some("2022-05-10")),
            cert("Scrum", "", None, None),
        ]);
        assert_eq!(merged.len(), 3);
        assert_eq!(merged[0].name, "CKA");
        assert_eq!(merged[0].url.as_deref(), Some("https://credly.com/cka"));
        assert_eq!(merged[1].name, "PMP");
        assert_eq!(merged[2].name, "Scrum");
    }

    #[test]
    fn test_section_rebuilt_with_profile_link() {
        let mut doc = Document {
            name: String::new(),
            sections: vec![Section {
                heading: CERTIFICATION.into(),
                items: vec![vec![Token::Bullet, Token::text("CKA (CNCF), 2021")]],
            }],
        };
        let ctx = ReconcileContext {
            verified_credentials: vec![cert("CKA", "CNCF", Some("https://credly.com/cka"), None)],
            profile_url: Some("https://credly.com/users/alex".into()),
            ..Default::default()
        };
        reconcile_certifications(&mut doc, &ctx);
        reconcile_certifications(&mut doc, &ctx);

        let items = &doc.section(CERTIFICATION).unwrap().items;
        assert_eq!(items.len(), 2);
        assert_eq!(
            items[0],
            vec![
                Token::Bullet,
                Token::link("CKA (CNCF)", "https://credly.com/cka"),
                Token::text(" (2021)"),
            ]
        );
        assert_eq!(Entry::from_tokens(&items[1]).text, PROFILE_LINK_LABEL);
    }

    #[test]
    fn test_no_sources_leaves_document_alone() {
        let mut doc = Document::default();
        reconcile_certifications(&mut doc, &ReconcileContext::default());
        assert!(doc.sections.is_empty());
    }
}
