//! Emphasis resolution: turns `*`/`_` delimiter runs inside one text run into styled
//! paragraph tokens.
//!
//! # Rules
//! - Delimiter runs are 1–3 characters of the same marker. `*` and `**` are bold,
//!   `_` is italic, `__` is bold, `***` / `___` are bold-italic.
//! - An opener is accepted only if a closer with the same marker and run length
//!   appears later in the run; otherwise the run is literal.
//! - Openers must be followed by non-whitespace, closers preceded by non-whitespace.
//! - `_` between two alphanumerics (`snake_case`) is an ordinary character.
//! - If any opener is still unclosed at the end, all styling for the run is dropped.
//!
//! Literal delimiter runs are removed from the emitted text: tokens never carry raw
//! emphasis markers.

use crate::models::{Style, Token};
use super::tokenizer::coalesce;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Delim {
    marker: char,
    len: usize,
    can_open: bool,
    can_close: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Text(String),
    Delim(Delim),
}

/// Splits a run into text pieces and delimiter runs with their flanking flags.
fn scan(run: &str) -> Vec<Piece> {
    let chars: Vec<char> = run.chars().collect();
    let mut pieces = Vec::new();
    let mut buf = String::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c != '*' && c != '_' {
            buf.push(c);
            i += 1;
            continue;
        }

        let mut j = i;
        while j < chars.len() && chars[j] == c {
            j += 1;
        }
        let prev = i.checked_sub(1).map(|p| chars[p]);
        let next = chars.get(j).copied();

        if c == '_' && prev.is_some_and(char::is_alphanumeric) && next.is_some_and(char::is_alphanumeric)
        {
            buf.extend(&chars[i..j]);
            i = j;
            continue;
        }

        if !buf.is_empty() {
            pieces.push(Piece::Text(std::mem::take(&mut buf)));
        }
        pieces.push(Piece::Delim(Delim {
            marker: c,
            len: j - i,
            can_open: next.is_some_and(|n| !n.is_whitespace()),
            can_close: prev.is_some_and(|p| !p.is_whitespace()),
        }));
        i = j;
    }

    if !buf.is_empty() {
        pieces.push(Piece::Text(buf));
    }
    pieces
}

fn has_later_closer(pieces: &[Piece], from: usize, marker: char, len: usize) -> bool {
    pieces[from + 1..].iter().any(|p| {
        matches!(p, Piece::Delim(d) if d.marker == marker && d.len == len && d.can_close)
    })
}

fn style_of(stack: &[(char, usize)]) -> Style {
    let bold = stack
        .iter()
        .any(|&(marker, len)| len >= 2 || (marker == '*' && len == 1));
    let italic = stack
        .iter()
        .any(|&(marker, len)| len == 3 || (marker == '_' && len == 1));
    Style::from_flags(bold, italic)
}

/// Stands in for an atomic token (link, placeholder) inside a run, so emphasis can
/// span it without looking inside it.
pub const ATOM: char = '\u{FFFC}';

/// Styled text pieces of `run`. An unbalanced run comes back as one plain piece with
/// the markers stripped.
fn resolve_styled(run: &str) -> Vec<(String, Style)> {
    let pieces = scan(run);
    let mut stack: Vec<(char, usize)> = Vec::new();
    let mut styled: Vec<(String, Style)> = Vec::new();

    for (idx, piece) in pieces.iter().enumerate() {
        match piece {
            Piece::Text(text) => styled.push((text.clone(), style_of(&stack))),
            Piece::Delim(d) if d.len <= 3 => {
                let closes_top = stack.last() == Some(&(d.marker, d.len));
                if d.can_close && closes_top {
                    stack.pop();
                } else if d.can_open && has_later_closer(&pieces, idx, d.marker, d.len) {
                    stack.push((d.marker, d.len));
                }
            }
            Piece::Delim(_) => {}
        }
    }

    if !stack.is_empty() {
        let plain: String = styled.into_iter().map(|(text, _)| text).collect();
        return vec![(plain, Style::None)];
    }
    styled
}

/// Resolves emphasis in a single text run. Never fails.
pub fn resolve_emphasis(run: &str) -> Vec<Token> {
    resolve_inline(run, Vec::new())
}

/// Resolves emphasis across a run whose `ATOM` characters stand for `atoms`, in order.
/// Placeholder paragraphs take the style around them; links keep their own shape.
pub fn resolve_inline(run: &str, atoms: Vec<Token>) -> Vec<Token> {
    let mut atoms = atoms.into_iter();
    let mut out: Vec<(Option<Token>, String, Style)> = Vec::new();
    for (text, style) in resolve_styled(run) {
        for (i, part) in text.split(ATOM).enumerate() {
            if i > 0 {
                match atoms.next() {
                    Some(Token::Paragraph { text, .. }) => out.push((None, text, style)),
                    Some(token) => out.push((Some(token), String::new(), style)),
                    None => {}
                }
            }
            out.push((None, part.to_string(), style));
        }
    }

    let mut merged: Vec<(String, Style)> = Vec::new();
    let mut tokens = Vec::new();
    for (atom, text, style) in out {
        if let Some(token) = atom {
            tokens.extend(coalesce(std::mem::take(&mut merged).into_iter().map(|(t, s)| Token::styled(t, s)).collect()));
            tokens.push(token);
        } else {
            merged.push((text, style));
        }
    }
    tokens.extend(coalesce(merged.into_iter().map(|(t, s)| Token::styled(t, s)).collect()));
    tokens
}

/// Removes emphasis markers without keeping any styling (headings, labels, names).
pub fn strip_markers(text: &str) -> String {
    scan(text)
        .into_iter()
        .filter_map(|p| match p {
            Piece::Text(t) => Some(t),
            Piece::Delim(_) => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn para(text: &str, style: Style) -> Token {
        Token::styled(text, style)
    }

    #[test]
    fn test_single_star_is_bold() {
        let tokens = resolve_emphasis("Led *platform* migration (2019-2022)");
        assert_eq!(
            tokens,
            vec![
                para("Led ", Style::None),
                para("platform", Style::Bold),
                para(" migration (2019-2022)", Style::None),
            ]
        );
    }

    #[test]
    fn test_underscore_is_italic_and_triple_is_bolditalic() {
        let tokens = resolve_emphasis("_remote_ and ***urgent***");
        assert_eq!(
            tokens,
            vec![
                para("remote", Style::Italic),
                para(" and ", Style::None),
                para("urgent", Style::BoldItalic),
            ]
        );
    }

    #[test]
    fn test_nested_bold_and_italic() {
        let tokens = resolve_emphasis("**Acme _Labs_ Inc**");
        assert_eq!(
            tokens,
            vec![
                para("Acme ", Style::Bold),
                para("Labs", Style::BoldItalic),
                para(" Inc", Style::Bold),
            ]
        );
    }

    #[test]
    fn test_opener_without_closer_is_literal_and_stripped() {
        assert_eq!(resolve_emphasis("5* rating"), vec![para("5 rating", Style::None)]);
    }

    #[test]
    fn test_crossed_delimiters_drop_all_styling() {
        // `*` opens, `**` opens, the inner `*` cannot close past `**`, `**` closes,
        // leaving `*` open at the end.
        let tokens = resolve_emphasis("*a **b* c**");
        assert_eq!(tokens, vec![para("a b c", Style::None)]);
    }

    #[test]
    fn test_intraword_underscore_is_kept() {
        assert_eq!(
            resolve_emphasis("tuned max_connections"),
            vec![para("tuned max_connections", Style::None)]
        );
    }

    #[test]
    fn test_whitespace_flanked_star_is_not_emphasis() {
        assert_eq!(resolve_emphasis("2 * 3 * 4"), vec![para("2  3  4", Style::None)]);
    }

    #[test]
    fn test_runs_longer_than_three_are_literal() {
        assert_eq!(resolve_emphasis("****x****"), vec![para("x", Style::None)]);
    }

    #[test]
    fn test_plain_text_round_trips() {
        let line = "Reduced p99 latency by 40% across 12 services";
        assert_eq!(resolve_emphasis(line), vec![para(line, Style::None)]);
    }

    #[test]
    fn test_empty_run() {
        assert!(resolve_emphasis("").is_empty());
        assert!(resolve_emphasis("**").is_empty());
    }

    #[test]
    fn test_strip_markers() {
        assert_eq!(strip_markers("**Work** _Experience_"), "Work Experience");
        assert_eq!(strip_markers("snake_case"), "snake_case");
    }
}
