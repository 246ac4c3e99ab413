use serde::{Deserialize, Serialize};

/// Text style carried by a `paragraph` token after emphasis resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    #[default]
    None,
    Bold,
    Italic,
    BoldItalic,
}

impl Style {
    pub fn from_flags(bold: bool, italic: bool) -> Self {
        match (bold, italic) {
            (true, true) => Style::BoldItalic,
            (true, false) => Style::Bold,
            (false, true) => Style::Italic,
            (false, false) => Style::None,
        }
    }

    pub fn is_italic(self) -> bool {
        matches!(self, Style::Italic | Style::BoldItalic)
    }

    /// Adds bold on top of whatever the run already had (used for job-header titles).
    pub fn emboldened(self) -> Self {
        Style::from_flags(true, self.is_italic())
    }
}

/// Smallest unit of parsed text carrying rendering intent.
///
/// The renderer walks these in order; `style` and `href` must survive untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Token {
    Bullet,
    Newline,
    Tab,
    Link {
        text: String,
        href: String,
    },
    Paragraph {
        text: String,
        #[serde(default)]
        style: Style,
    },
    Jobsep,
}

impl Token {
    pub fn text(text: impl Into<String>) -> Self {
        Token::Paragraph {
            text: text.into(),
            style: Style::None,
        }
    }

    pub fn styled(text: impl Into<String>, style: Style) -> Self {
        Token::Paragraph {
            text: text.into(),
            style,
        }
    }

    pub fn link(text: impl Into<String>, href: impl Into<String>) -> Self {
        Token::Link {
            text: text.into(),
            href: href.into(),
        }
    }

    /// Visible text of a text-bearing token; structural tokens have none.
    pub fn visible_text(&self) -> Option<&str> {
        match self {
            Token::Paragraph { text, .. } | Token::Link { text, .. } => Some(text),
            _ => None,
        }
    }
}

/// One renderable section item: an ordered token sequence.
pub type Item = Vec<Token>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub heading: String,
    pub items: Vec<Item>,
}

impl Section {
    pub fn new(heading: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
            items: Vec::new(),
        }
    }

    pub fn entries(&self) -> Vec<Entry> {
        self.items.iter().map(|item| Entry::from_tokens(item)).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub name: String,
    pub sections: Vec<Section>,
}

impl Document {
    pub fn section(&self, heading: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.heading == heading)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryLink {
    pub text: String,
    pub href: String,
}

/// Renderer-agnostic view of an item, used by extraction and reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub text: String,
    pub bullet: bool,
    pub links: Vec<EntryLink>,
}

impl Entry {
    pub fn from_tokens(tokens: &[Token]) -> Self {
        let mut entry = Entry::default();
        for token in tokens {
            match token {
                Token::Bullet => entry.bullet = true,
                Token::Newline | Token::Tab => push_separator(&mut entry.text, ' '),
                Token::Jobsep => {
                    push_separator(&mut entry.text, ' ');
                    entry.text.push_str("| ");
                }
                Token::Link { text, href } => {
                    entry.text.push_str(text);
                    entry.links.push(EntryLink {
                        text: text.clone(),
                        href: href.clone(),
                    });
                }
                Token::Paragraph { text, .. } => entry.text.push_str(text),
            }
        }
        entry.text = entry.text.trim().to_string();
        entry
    }
}

fn push_separator(buf: &mut String, sep: char) {
    if !buf.is_empty() && !buf.ends_with(char::is_whitespace) {
        buf.push(sep);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_token_serializes_with_type_tag() {
        let value = serde_json::to_value(Token::styled("Acme", Style::Bold)).unwrap();
        assert_eq!(value, json!({"type": "paragraph", "text": "Acme", "style": "bold"}));

        let link = serde_json::to_value(Token::link("LinkedIn", "https://linkedin.com/in/a")).unwrap();
        assert_eq!(link["type"], "link");
        assert_eq!(link["href"], "https://linkedin.com/in/a");

        assert_eq!(serde_json::to_value(Token::Jobsep).unwrap(), json!({"type": "jobsep"}));
    }

    #[test]
    fn test_bolditalic_style_name() {
        assert_eq!(serde_json::to_value(Style::BoldItalic).unwrap(), json!("bolditalic"));
    }

    #[test]
    fn test_entry_flattens_job_header() {
        let tokens = vec![
            Token::Bullet,
            Token::styled("Staff Engineer", Style::Bold),
            Token::Jobsep,
            Token::text("Acme"),
            Token::text(" "),
            Token::link("site", "https://acme.io"),
        ];
        let entry = Entry::from_tokens(&tokens);
        assert!(entry.bullet);
        assert_eq!(entry.text, "Staff Engineer | Acme site");
        assert_eq!(entry.links.len(), 1);
    }

    #[test]
    fn test_emboldened_keeps_italic() {
        assert_eq!(Style::Italic.emboldened(), Style::BoldItalic);
        assert_eq!(Style::None.emboldened(), Style::Bold);
    }
}
