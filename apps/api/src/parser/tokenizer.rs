//! Line tokenizer: one raw line → bullet / link / tab / newline / paragraph / jobsep tokens.

use std::sync::LazyLock;

use regex::Regex;

use super::emphasis::{resolve_inline, strip_markers, ATOM};
use super::links::{host_of, normalize_url, split_trailing, LINK_RE};
use crate::lexicon::Lexicon;
use crate::models::Token;

pub const BULLET_GLYPHS: &[char] = &['-', '*', '•', '●', '◦', '▪', '‣', '–', '·'];

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{[^{}]*\}\}").unwrap());

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenizeOptions {
    /// Keep bare URLs' text as written instead of the host label ("LinkedIn").
    pub preserve_link_labels: bool,
}

/// Strips a leading bullet glyph. Returns the remaining text when one was present.
pub fn strip_bullet(line: &str) -> Option<&str> {
    let mut chars = line.char_indices();
    let (_, first) = chars.next()?;
    if !BULLET_GLYPHS.contains(&first) {
        return None;
    }
    match chars.next() {
        None => Some(""),
        Some((idx, c)) if c.is_whitespace() => Some(line[idx..].trim_start()),
        Some(_) => None,
    }
}

/// Non-empty pipe segments when the line is a job header (`Title | Company | Dates`).
pub fn job_header_segments(body: &str) -> Option<Vec<&str>> {
    if body.starts_with('|') || !body.contains('|') {
        return None;
    }
    let segments: Vec<&str> = body
        .split('|')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    (segments.len() >= 2).then_some(segments)
}

pub fn tokenize_line(line: &str, lex: &Lexicon, opts: TokenizeOptions) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut body = line.trim();

    if let Some(rest) = strip_bullet(body) {
        tokens.push(Token::Bullet);
        body = rest;
    }

    match job_header_segments(body) {
        Some(segments) => {
            for (idx, segment) in segments.into_iter().enumerate() {
                let mut run = tokenize_segment(segment, lex, opts);
                if idx == 0 {
                    for token in &mut run {
                        if let Token::Paragraph { style, .. } = token {
                            *style = style.emboldened();
                        }
                    }
                } else {
                    tokens.push(Token::Jobsep);
                }
                tokens.extend(run);
            }
        }
        None => tokens.extend(tokenize_segment(body, lex, opts)),
    }

    coalesce(tokens)
}

/// Splits on literal and escaped (`\t`, `\n`) tab/newline characters.
pub fn tokenize_segment(text: &str, lex: &Lexicon, opts: TokenizeOptions) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut buf = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        let structural = match c {
            '\t' => Some(Token::Tab),
            '\n' => Some(Token::Newline),
            '\r' => continue,
            '\\' => match chars.peek() {
                Some('t') => Some(Token::Tab),
                Some('n') => Some(Token::Newline),
                _ => None,
            },
            _ => None,
        };
        match structural {
            Some(token) => {
                if c == '\\' {
                    chars.next();
                }
                tokens.extend(tokenize_inline(&std::mem::take(&mut buf), lex, opts));
                tokens.push(token);
            }
            None => buf.push(c),
        }
    }
    tokens.extend(tokenize_inline(&buf, lex, opts));
    tokens
}

/// Placeholders and links become atoms; emphasis is then resolved across the whole
/// segment, so a styled span may wrap either.
fn tokenize_inline(text: &str, lex: &Lexicon, opts: TokenizeOptions) -> Vec<Token> {
    let mut run = String::new();
    let mut atoms = Vec::new();
    let mut cursor = 0;
    for m in PLACEHOLDER_RE.find_iter(text) {
        collect_links(&text[cursor..m.start()], lex, opts, &mut run, &mut atoms);
        push_atom(&mut run, &mut atoms, Token::text(m.as_str()));
        cursor = m.end();
    }
    collect_links(&text[cursor..], lex, opts, &mut run, &mut atoms);
    resolve_inline(&run, atoms)
}

fn push_plain(run: &mut String, text: &str) {
    run.extend(text.chars().filter(|&c| c != ATOM));
}

fn push_atom(run: &mut String, atoms: &mut Vec<Token>, token: Token) {
    run.push(ATOM);
    atoms.push(token);
}

fn collect_links(
    text: &str,
    lex: &Lexicon,
    opts: TokenizeOptions,
    run: &mut String,
    atoms: &mut Vec<Token>,
) {
    let mut cursor = 0;

    for caps in LINK_RE.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };

        if let (Some(label), Some(url)) = (caps.name("label"), caps.name("url")) {
            push_plain(run, &text[cursor..whole.start()]);
            let token = match normalize_url(url.as_str()) {
                Some(href) => {
                    let label = strip_markers(label.as_str()).trim().to_string();
                    let label = if label.is_empty() { href.clone() } else { label };
                    Token::link(label, href)
                }
                None => Token::text(whole.as_str()),
            };
            push_atom(run, atoms, token);
            cursor = whole.end();
            continue;
        }

        // A bare host glued to an email or another word is not a link.
        let glued = text[..whole.start()]
            .chars()
            .last()
            .is_some_and(|c| c == '@' || c.is_alphanumeric() || c == '.' || c == '/');
        if glued {
            continue;
        }

        let (core, _) = split_trailing(whole.as_str());
        let Some(href) = normalize_url(core) else {
            continue;
        };
        push_plain(run, &text[cursor..whole.start()]);
        let label = if opts.preserve_link_labels {
            core.to_string()
        } else {
            lex.link_label(host_of(&href))
                .map(str::to_string)
                .unwrap_or_else(|| core.to_string())
        };
        push_atom(run, atoms, Token::link(label, href));
        cursor = whole.start() + core.len();
    }

    push_plain(run, &text[cursor..]);
}

/// Merges neighbouring paragraph tokens that share a style.
pub(super) fn coalesce(tokens: Vec<Token>) -> Vec<Token> {
    let mut out: Vec<Token> = Vec::with_capacity(tokens.len());
    for token in tokens {
        if let (
            Some(Token::Paragraph { text: prev, style: prev_style }),
            Token::Paragraph { text, style },
        ) = (out.last_mut(), &token)
        {
            if *prev_style == *style {
                prev.push_str(text);
                continue;
            }
        }
        if matches!(&token, Token::Paragraph { text, .. } if text.is_empty()) {
            continue;
        }
        out.push(token);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Style;

    fn tokenize(line: &str) -> Vec<Token> {
        tokenize_line(line, Lexicon::shared(), TokenizeOptions::default())
    }

    #[test]
    fn test_bullet_with_bold_run() {
        assert_eq!(
            tokenize("- Led *platform* migration (2019-2022)"),
            vec![
                Token::Bullet,
                Token::text("Led "),
                Token::styled("platform", Style::Bold),
                Token::text(" migration (2019-2022)"),
            ]
        );
    }

    #[test]
    fn test_bare_linkedin_becomes_labelled_link() {
        assert_eq!(
            tokenize("linkedin.com/in/alex"),
            vec![Token::link("LinkedIn", "https://linkedin.com/in/alex")]
        );
    }

    #[test]
    fn test_preserve_link_labels_keeps_written_text() {
        let opts = TokenizeOptions {
            preserve_link_labels: true,
        };
        assert_eq!(
            tokenize_line("Profile: linkedin.com/in/alex.", Lexicon::shared(), opts),
            vec![
                Token::text("Profile: "),
                Token::link("linkedin.com/in/alex", "https://linkedin.com/in/alex"),
                Token::text("."),
            ]
        );
    }

    #[test]
    fn test_markdown_link_and_rejected_link() {
        assert_eq!(
            tokenize("See [my *site*](https://alex.dev) and [notes](notes)"),
            vec![
                Token::text("See "),
                Token::link("my site", "https://alex.dev"),
                Token::text(" and [notes](notes)"),
            ]
        );
    }

    #[test]
    fn test_email_host_is_not_a_link() {
        assert_eq!(
            tokenize("alex@linkedin.com"),
            vec![Token::text("alex@linkedin.com")]
        );
    }

    #[test]
    fn test_unknown_host_keeps_url_text() {
        assert_eq!(
            tokenize("https://alex.dev/blog"),
            vec![Token::link("https://alex.dev/blog", "https://alex.dev/blog")]
        );
    }

    #[test]
    fn test_pipe_line_is_job_header() {
        assert_eq!(
            tokenize("Staff Engineer | Acme | Jan 2020 - Present"),
            vec![
                Token::styled("Staff Engineer", Style::Bold),
                Token::Jobsep,
                Token::text("Acme"),
                Token::Jobsep,
                Token::text("Jan 2020 - Present"),
            ]
        );
    }

    #[test]
    fn test_table_row_is_not_job_header() {
        assert_eq!(tokenize("| a | b |"), vec![Token::text("| a | b |")]);
        assert_eq!(tokenize("Rust |"), vec![Token::text("Rust |")]);
    }

    #[test]
    fn test_escaped_and_literal_tabs_and_newlines() {
        assert_eq!(
            tokenize("One\\nTwo\tThree"),
            vec![
                Token::text("One"),
                Token::Newline,
                Token::text("Two"),
                Token::Tab,
                Token::text("Three"),
            ]
        );
    }

    #[test]
    fn test_placeholders_pass_through() {
        assert_eq!(
            tokenize("Hello {{first_name}} *team*"),
            vec![
                Token::text("Hello {{first_name}} "),
                Token::styled("team", Style::Bold),
            ]
        );
        assert_eq!(tokenize("{{__raw__}}"), vec![Token::text("{{__raw__}}")]);
    }

    #[test]
    fn test_emphasis_spans_placeholders_and_links() {
        assert_eq!(
            tokenize("**bold {{name}} text** done"),
            vec![
                Token::styled("bold {{name}} text", Style::Bold),
                Token::text(" done"),
            ]
        );
        assert_eq!(
            tokenize("*Certified [CKA](https://credly.com/b/1) holder*"),
            vec![
                Token::styled("Certified ", Style::Bold),
                Token::link("CKA", "https://credly.com/b/1"),
                Token::styled(" holder", Style::Bold),
            ]
        );
    }

    #[test]
    fn test_plain_line_round_trips() {
        for line in [
            "Reduced infra spend by 30% in two quarters",
            "Worked with max_retries and 2 * 3 settings",
        ] {
            let expected = line.replace(" * ", "  ");
            assert_eq!(tokenize(line), vec![Token::text(expected)]);
        }
    }

    #[test]
    fn test_strip_bullet() {
        assert_eq!(strip_bullet("• Shipped v2"), Some("Shipped v2"));
        assert_eq!(strip_bullet("-5% churn"), None);
        assert_eq!(strip_bullet("**Bold**"), None);
        assert_eq!(strip_bullet("-"), Some(""));
    }
}
