//! Text analysis for full-text catalogue fields.
//!
//! Text fields run through a simple tokenizer, a lower-caser, a filter that
//! drops tokens longer than 40 bytes, and a stemmer for the configured
//! language. Query text is analyzed with the same pipeline so terms line up.

use tantivy::tokenizer::{
    Language, LowerCaser, RemoveLongFilter, SimpleTokenizer, Stemmer, TextAnalyzer, TokenStream,
};

use crate::IndexError;

/// Name of the analyzer registered with Tantivy for text fields.
pub const CATALOG_TOKENIZER: &str = "catalog_text";

/// Maximum token length in bytes before filtering.
const MAX_TOKEN_LENGTH: usize = 40;

/// Stemmer languages by their `search.stemmer` name.
const LANGUAGES: [(&str, Language); 18] = [
    ("arabic", Language::Arabic),
    ("danish", Language::Danish),
    ("dutch", Language::Dutch),
    ("english", Language::English),
    ("finnish", Language::Finnish),
    ("french", Language::French),
    ("german", Language::German),
    ("greek", Language::Greek),
    ("hungarian", Language::Hungarian),
    ("italian", Language::Italian),
    ("norwegian", Language::Norwegian),
    ("portuguese", Language::Portuguese),
    ("romanian", Language::Romanian),
    ("russian", Language::Russian),
    ("spanish", Language::Spanish),
    ("swedish", Language::Swedish),
    ("tamil", Language::Tamil),
    ("turkish", Language::Turkish),
];

/// Parses a stemmer language name, case-insensitively.
pub fn parse_language(name: &str) -> Result<Language, IndexError> {
    LANGUAGES
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(name))
        .map(|(_, language)| *language)
        .ok_or_else(|| IndexError::InvalidLanguage(name.to_string()))
}

/// Builds the text analyzer for `language`.
pub fn build_analyzer(language: Language) -> TextAnalyzer {
    TextAnalyzer::builder(SimpleTokenizer::default())
        .filter(LowerCaser)
        .filter(RemoveLongFilter::limit(MAX_TOKEN_LENGTH))
        .filter(Stemmer::new(language))
        .build()
}

/// Builds the text analyzer from a `search.stemmer` value.
pub fn build_analyzer_from_name(language_name: &str) -> Result<TextAnalyzer, IndexError> {
    Ok(build_analyzer(parse_language(language_name)?))
}

/// Runs `text` through `analyzer` and collects the resulting terms.
pub(crate) fn analyze(analyzer: &mut TextAnalyzer, text: &str) -> Vec<String> {
    let mut stream = analyzer.token_stream(text);
    let mut terms = Vec::new();
    while let Some(token) = stream.next() {
        terms.push(token.text.clone());
    }
    terms
}
