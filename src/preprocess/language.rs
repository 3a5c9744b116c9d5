// Language filter: keep only English descriptions.
//
// Two signals over the opening of the description. `whatlang` trigram
// detection decides when it is confident. Otherwise a stopword vote breaks
// the tie: each candidate language scores one point per word found in its
// stopword list and has to win outright. When neither is conclusive the
// low-confidence trigram guess is used. Empty or symbol-only text counts as
// "not English"; the filter never errors.

use std::collections::HashSet;

use stop_words::{get, LANGUAGE};
use whatlang::{Detector, Lang};

/// Only the first this-many characters of a description are inspected.
pub const DETECTION_PREFIX_CHARS: usize = 100;

/// Candidate languages: code and trigram model. The scrape is mostly
/// Scandinavian, so those are always in the running.
const CANDIDATES: &[(&str, Lang)] = &[
    ("en", Lang::Eng),
    ("da", Lang::Dan),
    ("sv", Lang::Swe),
    ("no", Lang::Nob),
    ("fi", Lang::Fin),
    ("de", Lang::Deu),
    ("fr", Lang::Fra),
    ("es", Lang::Spa),
    ("it", Lang::Ita),
    ("nl", Lang::Nld),
    ("pt", Lang::Por),
    ("pl", Lang::Pol),
];

fn stopword_list(code: &str) -> Vec<String> {
    match code {
        "da" => get(LANGUAGE::Danish),
        "sv" => get(LANGUAGE::Swedish),
        "no" => get(LANGUAGE::Norwegian),
        "fi" => get(LANGUAGE::Finnish),
        "de" => get(LANGUAGE::German),
        "fr" => get(LANGUAGE::French),
        "es" => get(LANGUAGE::Spanish),
        "it" => get(LANGUAGE::Italian),
        "nl" => get(LANGUAGE::Dutch),
        "pt" => get(LANGUAGE::Portuguese),
        "pl" => get(LANGUAGE::Polish),
        _ => get(LANGUAGE::English),
    }
}

pub struct LanguageDetector {
    trigrams: Detector,
    profiles: Vec<(&'static str, HashSet<String>)>,
}

impl Default for LanguageDetector {
    fn default() -> Self {
        let allowlist: Vec<Lang> = CANDIDATES.iter().map(|(_, lang)| *lang).collect();
        let profiles: Vec<(&'static str, HashSet<String>)> = CANDIDATES
            .iter()
            .map(|(code, _)| (*code, stopword_list(code).into_iter().collect()))
            .collect();

        Self {
            trigrams: Detector::with_allowlist(allowlist),
            profiles,
        }
    }
}

impl LanguageDetector {
    /// Language code for the opening of the text, or None when there is
    /// nothing to detect.
    pub fn detect(&self, text: &str) -> Option<&'static str> {
        let prefix: String = text.chars().take(DETECTION_PREFIX_CHARS).collect();
        let lower = prefix.to_lowercase();
        let words: Vec<&str> = lower
            .split(|c: char| !c.is_alphabetic())
            .filter(|w| !w.is_empty())
            .collect();

        if words.is_empty() {
            return None;
        }

        let guess = self.trigrams.detect(&prefix);
        if let Some(info) = guess.as_ref().filter(|info| info.is_reliable()) {
            return code_for(info.lang());
        }

        self.stopword_vote(&words)
            .or_else(|| guess.and_then(|info| code_for(info.lang())))
    }

    /// True if the opening of the description is detected as English.
    pub fn is_english(&self, text: &str) -> bool {
        self.detect(text) == Some("en")
    }

    /// Language whose stopword list matches strictly more words than any
    /// other, if there is one.
    fn stopword_vote(&self, words: &[&str]) -> Option<&'static str> {
        let mut scores: Vec<(&'static str, usize)> = self
            .profiles
            .iter()
            .map(|(code, stop)| (*code, words.iter().filter(|w| stop.contains(**w)).count()))
            .collect();
        scores.sort_by(|a, b| b.1.cmp(&a.1));

        match scores.as_slice() {
            [(best, top), (_, runner_up), ..] if *top > 0 && top > runner_up => Some(*best),
            [(best, top)] if *top > 0 => Some(*best),
            _ => None,
        }
    }
}

fn code_for(lang: Lang) -> Option<&'static str> {
    CANDIDATES
        .iter()
        .find(|(_, candidate)| *candidate == lang)
        .map(|(code, _)| *code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_description() {
        let d = LanguageDetector::default();
        assert!(d.is_english(
            "We are looking for a senior engineer who will join our team and help us build the platform"
        ));
    }

    #[test]
    fn test_title_style_english_opening() {
        let d = LanguageDetector::default();
        assert!(d.is_english(
            "Senior Backend Engineer - Python, Kafka, AWS. Remote-friendly fintech scaleup."
        ));
        assert!(d.is_english(
            "Job Description: Software Engineer II. Location: Copenhagen. Responsibilities include"
        ));
    }

    #[test]
    fn test_german_description() {
        let d = LanguageDetector::default();
        assert!(!d.is_english(
            "Wir suchen ab sofort einen Mitarbeiter für unser Team und freuen uns auf deine Bewerbung"
        ));
    }

    #[test]
    fn test_danish_description() {
        let d = LanguageDetector::default();
        assert!(!d.is_english(
            "Vi søger en dygtig udvikler til vores team i København, som har erfaring med"
        ));
    }

    #[test]
    fn test_swedish_description() {
        let d = LanguageDetector::default();
        assert!(!d.is_english(
            "Vi söker en erfaren utvecklare till vårt team i Stockholm som vill arbeta med"
        ));
    }

    #[test]
    fn test_undetectable_is_not_english() {
        let d = LanguageDetector::default();
        assert!(!d.is_english(""));
        assert!(!d.is_english("12345 !!! ---"));
        assert_eq!(d.detect("   "), None);
    }
}
