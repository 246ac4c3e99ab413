//! Inline link detection and URL normalization.

use std::sync::LazyLock;

use regex::Regex;

/// `[label](url)` or a bare URL (scheme, `www.`, or a bare LinkedIn/Credly host).
pub static LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\[(?P<label>[^\[\]]+)\]\((?P<url>[^()\s]*)\)|(?P<bare>(?:https?://|www\.)[^\s<>\[\]]+|\b(?:[a-z0-9-]+\.)*(?:linkedin|credly)\.com(?:/[^\s<>\[\]]*)?)",
    )
    .unwrap()
});

static SCHEME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?i)[a-z][a-z0-9+.-]*:(?://)?\S").unwrap());

const KNOWN_BARE_HOSTS: &[&str] = &["linkedin.com", "credly.com"];

const LEADING_JUNK: &[char] = &['<', '(', '[', '{', '"', '\''];
const TRAILING_JUNK: &[char] = &['.', ',', ';', ':', '!', '?', ']', '}', '>', '"', '\'', '*'];

/// Splits a raw URL candidate into the URL proper and trailing punctuation that
/// belongs to the surrounding sentence. A trailing `)` is kept while parens balance.
pub fn split_trailing(raw: &str) -> (&str, &str) {
    let mut end = raw.len();
    loop {
        let core = &raw[..end];
        let Some(last) = core.chars().last() else {
            break;
        };
        let unbalanced_paren =
            last == ')' && core.matches('(').count() < core.matches(')').count();
        if TRAILING_JUNK.contains(&last) || unbalanced_paren {
            end -= last.len_utf8();
        } else {
            break;
        }
    }
    (&raw[..end], &raw[end..])
}

/// Host part of a URL-ish string: scheme, `//`, credentials and port removed.
pub fn host_of(url: &str) -> &str {
    let rest = match url.find("://") {
        Some(idx) => &url[idx + 3..],
        None => url.trim_start_matches("//"),
    };
    let end = rest
        .find(|c| matches!(c, '/' | '?' | '#'))
        .unwrap_or(rest.len());
    let authority = &rest[..end];
    let authority = authority.rsplit('@').next().unwrap_or(authority);
    authority.split(':').next().unwrap_or(authority)
}

fn is_known_bare_host(candidate: &str) -> bool {
    let host = host_of(candidate).to_lowercase();
    KNOWN_BARE_HOSTS
        .iter()
        .any(|known| host == *known || host.ends_with(&format!(".{known}")))
}

/// Normalizes a link target. Returns `None` when the candidate is not an acceptable
/// URL after stripping surrounding punctuation; callers then keep the original text.
pub fn normalize_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_start_matches(LEADING_JUNK);
    let (core, _) = split_trailing(trimmed);
    if core.is_empty() {
        return None;
    }

    let lower = core.to_lowercase();
    if lower.starts_with("www.") || (!lower.contains(':') && is_known_bare_host(core)) {
        if lower.starts_with("//") {
            return Some(core.to_string());
        }
        return Some(format!("https://{core}"));
    }
    if SCHEME_RE.is_match(core) || core.starts_with("//") || core.starts_with('/') {
        return Some(core.to_string());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_linkedin_gets_https() {
        assert_eq!(
            normalize_url("linkedin.com/in/alex").as_deref(),
            Some("https://linkedin.com/in/alex")
        );
        assert_eq!(
            normalize_url("www.credly.com/badges/x").as_deref(),
            Some("https://www.credly.com/badges/x")
        );
    }

    #[test]
    fn test_scheme_and_relative_urls_kept() {
        assert_eq!(
            normalize_url("https://github.com/alex").as_deref(),
            Some("https://github.com/alex")
        );
        assert_eq!(normalize_url("/portfolio").as_deref(), Some("/portfolio"));
        assert_eq!(normalize_url("//cdn.example.com/a").as_deref(), Some("//cdn.example.com/a"));
        assert_eq!(normalize_url("mailto:a@b.co").as_deref(), Some("mailto:a@b.co"));
    }

    #[test]
    fn test_punctuation_is_stripped() {
        assert_eq!(
            normalize_url("(https://example.com/a).").as_deref(),
            Some("https://example.com/a")
        );
        assert_eq!(
            normalize_url("https://en.wikipedia.org/wiki/Rust_(language)").as_deref(),
            Some("https://en.wikipedia.org/wiki/Rust_(language)")
        );
    }

    #[test]
    fn test_rejects_non_urls() {
        assert_eq!(normalize_url("portfolio"), None);
        assert_eq!(normalize_url("example.com/a"), None);
        assert_eq!(normalize_url("..."), None);
    }

    #[test]
    fn test_split_trailing() {
        assert_eq!(split_trailing("linkedin.com/in/alex."), ("linkedin.com/in/alex", "."));
        assert_eq!(split_trailing("https://a.io/x),"), ("https://a.io/x", "),"));
    }

    #[test]
    fn test_host_of() {
        assert_eq!(host_of("https://user@www.LinkedIn.com:443/in/a"), "www.LinkedIn.com");
        assert_eq!(host_of("linkedin.com/in/a"), "linkedin.com");
    }

    #[test]
    fn test_link_regex_finds_both_forms() {
        let text = "See [site](https://a.io) or linkedin.com/in/alex";
        let found: Vec<&str> = LINK_RE.find_iter(text).map(|m| m.as_str()).collect();
        assert_eq!(found, vec!["[site](https://a.io)", "linkedin.com/in/alex"]);
    }
}
