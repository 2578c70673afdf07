//! # Text Preprocessing
//! Normalization pipeline feeding the emotion extractor: lowercase, URL
//! stripping, charset filtering, stop-word removal, and noun lemmatization.
//!
//! Negation words are deliberately kept out of the stop list — they carry
//! emotional polarity. Empty or whitespace-only input yields an empty token
//! sequence, never an error.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static URL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"http\S+|www\S+").expect("url regex"));

/// Negation words retained even though the stop list contains some of them.
pub const NEGATION_WORDS: &[&str] = &[
    "not", "no", "never", "neither", "nobody", "nothing", "nowhere", "n't",
];

/// Standard English stop-word list (the one the emotion lexicon was tuned
/// against). Apostrophe forms can never survive tokenization but are kept so
/// the list matches its source.
const STOP_WORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan", "shan't",
    "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't", "wouldn",
    "wouldn't",
];

/// Irregular noun plurals the suffix rules below would mangle.
const IRREGULAR_NOUNS: &[(&str, &str)] = &[
    ("men", "man"),
    ("women", "woman"),
    ("children", "child"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("geese", "goose"),
    ("mice", "mouse"),
    ("people", "person"),
    ("wives", "wife"),
    ("lives", "life"),
    ("knives", "knife"),
    ("leaves", "leaf"),
    ("selves", "self"),
];

/// Review-text preprocessor. Cheap to construct; the stop set is built once
/// per instance.
#[derive(Debug, Clone)]
pub struct TextPreprocessor {
    stop_words: HashSet<&'static str>,
}

impl Default for TextPreprocessor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextPreprocessor {
    pub fn new() -> Self {
        let mut stop_words: HashSet<&'static str> = STOP_WORDS.iter().copied().collect();
        for neg in NEGATION_WORDS {
            stop_words.remove(neg);
        }
        Self { stop_words }
    }

    /// Lowercase, strip URLs, and drop every character that is not an ASCII
    /// letter, whitespace, or sentence punctuation (`.`, `!`, `?`).
    pub fn clean(&self, text: &str) -> String {
        let lowered = text.to_lowercase();
        let stripped = URL_RE.replace_all(&lowered, "");
        stripped
            .chars()
            .filter(|c| c.is_ascii_alphabetic() || c.is_whitespace() || matches!(c, '.' | '!' | '?'))
            .collect()
    }

    /// Full pipeline: clean → tokenize → stop-word filter (negations kept) →
    /// length filter (> 2) → lemmatize.
    ///
    /// The stop-word and length filters look at the raw token; the lemma of a
    /// surviving token is what gets returned.
    pub fn preprocess(&self, text: &str) -> Vec<String> {
        let cleaned = self.clean(text);
        cleaned
            .split(|c: char| !c.is_ascii_alphabetic())
            .filter(|t| !t.is_empty())
            .filter(|t| !self.stop_words.contains(*t))
            .filter(|t| t.len() > 2)
            .map(lemmatize)
            .collect()
    }
}

/// Noun lemmatization: irregular table first, then plural suffix rules.
/// Tokens the rules don't recognize pass through unchanged.
fn lemmatize(token: &str) -> String {
    for (plural, singular) in IRREGULAR_NOUNS {
        if token == *plural {
            return (*singular).to_string();
        }
    }

    if token.len() > 4 && token.ends_with("ies") {
        return format!("{}y", &token[..token.len() - 3]);
    }
    for suffix in ["sses", "ches", "shes", "xes", "zes"] {
        if token.len() > suffix.len() && token.ends_with(suffix) {
            return token[..token.len() - 2].to_string();
        }
    }
    if token.len() > 3
        && token.ends_with('s')
        && !token.ends_with("ss")
        && !token.ends_with("us")
        && !token.ends_with("is")
    {
        return token[..token.len() - 1].to_string();
    }

    token.to_string()
}
