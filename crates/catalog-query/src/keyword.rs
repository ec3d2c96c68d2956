//! Keyword analysis: quoted phrases and delimiter fragments.

/// Characters that split a keyword into fragments, in the order they are tried.
pub const FRAGMENT_DELIMITERS: [char; 11] =
    [' ', '-', '_', ',', '.', '/', ';', ':', '\'', '[', ']'];

/// Fragments longer than this many characters count as long keywords.
pub const SHORT_KEYWORD_MAX_CHARS: usize = 4;

/// The keyword broken down for the compiler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordParts {
    /// Quoted phrases followed by the whole keyword without quotes, skipping
    /// blank ones.
    pub phrases: Vec<String>,
    /// The whole unquoted keyword when it has no internal delimiter.
    pub single: Option<String>,
    /// Fragments longer than [`SHORT_KEYWORD_MAX_CHARS`].
    pub long: Vec<String>,
    /// Remaining non-empty fragments.
    pub short: Vec<String>,
}

/// Analyzes a non-blank keyword.
pub fn analyze(keyword: &str) -> KeywordParts {
    let unquoted = keyword.replace('"', "");

    let mut phrases = Vec::new();
    for phrase in quoted_phrases(keyword).into_iter().chain([unquoted.clone()]) {
        if !phrase.trim().is_empty() && !phrases.contains(&phrase) {
            phrases.push(phrase);
        }
    }

    if split_trimmed(&unquoted, is_keyword_delimiter).len() == 1 {
        return KeywordParts {
            phrases,
            single: Some(unquoted),
            ..KeywordParts::default()
        };
    }

    let mut long = Vec::new();
    let mut short = Vec::new();
    // Each delimiter splits the whole keyword on its own; fragments from
    // different delimiters accumulate and may overlap.
    for delimiter in FRAGMENT_DELIMITERS {
        if !unquoted.contains(delimiter) {
            continue;
        }
        for fragment in split_trimmed(&unquoted, |c| c == delimiter) {
            if fragment.is_empty() {
                continue;
            }
            if fragment.chars().count() > SHORT_KEYWORD_MAX_CHARS {
                long.push(fragment.to_string());
            } else {
                short.push(fragment.to_string());
            }
        }
    }

    KeywordParts {
        phrases,
        single: None,
        long,
        short,
    }
}

/// Returns the quoted phrases in `keyword`.
///
/// Splitting on `"` has to produce an odd number of parts, more than one, for
/// the quotes to be balanced; every odd-indexed part is then a phrase.
pub fn quoted_phrases(keyword: &str) -> Vec<String> {
    let parts: Vec<&str> = keyword.split('"').collect();
    if parts.len() <= 1 || parts.len() % 2 == 0 {
        return Vec::new();
    }
    parts
        .into_iter()
        .skip(1)
        .step_by(2)
        .map(str::to_string)
        .collect()
}

/// Splits on a predicate and drops trailing empty fragments.
///
/// Leading and interior empty fragments are kept. A string made only of
/// delimiters yields no fragments at all.
pub fn split_trimmed(s: &str, is_delimiter: impl Fn(char) -> bool) -> Vec<&str> {
    let mut parts: Vec<&str> = s.split(is_delimiter).collect();
    while parts.last().is_some_and(|p| p.is_empty()) {
        parts.pop();
    }
    parts
}

/// Whitespace or one of the fragment delimiters.
fn is_keyword_delimiter(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\x0B' | '\x0C' | '\r') || FRAGMENT_DELIMITERS.contains(&c)
}
