pub mod assembler;
pub mod emphasis;
pub mod handlers;
pub mod headings;
pub mod input;
pub mod links;
pub mod tokenizer;

use tracing::debug;

use crate::lexicon::Lexicon;
use crate::models::Document;

use self::assembler::assemble;
use self::input::ResumeSource;
use self::tokenizer::TokenizeOptions;

/// Parses raw résumé text (plain or JSON) into a document. Never fails: malformed
/// JSON is parsed as plain text.
pub fn parse_document(raw: &str, lex: &Lexicon, opts: TokenizeOptions) -> Document {
    let source = ResumeSource::detect(raw);
    let doc = assemble(&source, lex, opts);
    debug!(
        structured = source.is_structured(),
        sections = doc.sections.len(),
        "Parsed résumé document"
    );
    doc
}
