// Description normalizer: raw scraped text to a clean token sequence.
//
// Scraping glues words together ("requirementsYou're", "offerings.If") and
// every page ends with the same three button labels, so on top of the usual
// lowercase / punctuation / stopword / lemma steps we split merged words
// first and trim the trailing artifact at the end.

use std::collections::HashSet;

use anyhow::Result;
use regex_lite::Regex;
use stop_words::{get, LANGUAGE};

use super::lemma::Lemmatizer;

/// Rows whose description normalizes to this many tokens or fewer are dropped.
pub const MIN_TOKENS: usize = 3;

/// Number of trailing tokens removed from every description.
pub const TRAILING_ARTIFACT_TOKENS: usize = 3;

/// Symbol tokens that survive punctuation stripping and tokenization.
const RESIDUAL_PUNCTUATION: &[&str] = &[
    "!", ",", ".", ";", ":", "?", "(", ")", "[", "]", "-", "+", "\"", "*", "—", "•", "’", "‘",
    "“", "”", "``",
];

pub struct Normalizer {
    stop_words: HashSet<String>,
    lemmatizer: Lemmatizer,
    /// "offerings.If" -> "offerings. If"
    punct_boundary: Regex,
    /// "requirementsYou" -> "requirements You"
    case_boundary: Regex,
}

impl Normalizer {
    pub fn new() -> Result<Self> {
        let stop_words: Vec<String> = get(LANGUAGE::English);
        Ok(Self {
            stop_words: stop_words.into_iter().collect(),
            lemmatizer: Lemmatizer::default(),
            punct_boundary: Regex::new(r"([!?,.;:])([A-Z])")?,
            case_boundary: Regex::new(r"([a-z])([A-Z])")?,
        })
    }

    /// Normalize a raw description into tokens.
    ///
    /// The result may be short or empty; callers drop rows with
    /// `MIN_TOKENS` tokens or fewer.
    pub fn normalize(&self, text: &str) -> Vec<String> {
        let text = self.split_combined_words(text).to_lowercase();
        let text = strip_punctuation_and_digits(&text);

        let mut tokens: Vec<String> = tokenize(&text)
            .into_iter()
            .filter(|t| !self.stop_words.contains(t))
            .map(|t| self.lemmatizer.lemmatize(&t))
            .filter(|t| !RESIDUAL_PUNCTUATION.contains(&t.as_str()))
            .collect();

        tokens.truncate(tokens.len().saturating_sub(TRAILING_ARTIFACT_TOKENS));

        strip_numeric_tokens(tokens)
    }

    /// Insert a space wherever scraping merged two words.
    pub fn split_combined_words(&self, text: &str) -> String {
        let text = self.punct_boundary.replace_all(text, "${1} ${2}");
        self.case_boundary
            .replace_all(&text, "${1} ${2}")
            .into_owned()
    }
}

/// Remove ASCII punctuation and ASCII digits.
fn strip_punctuation_and_digits(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_ascii_punctuation() && !c.is_ascii_digit())
        .collect()
}

/// Split on whitespace, then split any non-alphanumeric symbol off into a
/// token of its own ("•skills" -> ["•", "skills"]).
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    for chunk in text.split_whitespace() {
        let mut word = String::new();
        for c in chunk.chars() {
            if c.is_alphanumeric() {
                word.push(c);
            } else {
                if !word.is_empty() {
                    tokens.push(std::mem::take(&mut word));
                }
                tokens.push(c.to_string());
            }
        }
        if !word.is_empty() {
            tokens.push(word);
        }
    }
    tokens
}

/// Reduce tokens to ASCII alphanumerics and drop any that contain a digit
/// or end up empty.
pub fn strip_numeric_tokens(tokens: Vec<String>) -> Vec<String> {
    tokens
        .into_iter()
        .map(|t| t.chars().filter(char::is_ascii_alphanumeric).collect::<String>())
        .filter(|t| !t.is_empty() && !t.chars().any(|c| c.is_ascii_digit()))
        .collect()
}
