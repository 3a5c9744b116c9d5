// Rule-based noun lemmatizer.
//
// Reduces plural nouns to their singular dictionary form: an exception table
// for irregular forms, then inflection suffix rules. Words the rules can't
// safely handle (short words, -ss/-us/-is endings, non-ASCII) pass through
// unchanged, so lemmatizing a lemma is always a no-op.

use std::collections::HashMap;

/// Irregular plurals and plural-looking words that map to a fixed lemma.
const EXCEPTIONS: &[(&str, &str)] = &[
    ("children", "child"),
    ("men", "man"),
    ("women", "woman"),
    ("people", "people"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("mice", "mouse"),
    ("criteria", "criterion"),
    ("phenomena", "phenomenon"),
    ("analyses", "analysis"),
    ("bases", "basis"),
    ("crises", "crisis"),
    ("theses", "thesis"),
    ("diagnoses", "diagnosis"),
    ("hypotheses", "hypothesis"),
    ("lives", "life"),
    ("wives", "wife"),
    ("knives", "knife"),
    ("halves", "half"),
    ("shelves", "shelf"),
    ("leaves", "leaf"),
    ("selves", "self"),
    ("news", "news"),
    ("series", "series"),
    ("species", "species"),
    ("physics", "physics"),
    ("mathematics", "mathematics"),
    ("economics", "economics"),
    ("politics", "politics"),
    ("logistics", "logistics"),
    ("ethics", "ethics"),
    ("headquarters", "headquarters"),
    ("means", "means"),
];

/// Suffix rewrites, tried in order; the first match wins.
const SUFFIX_RULES: &[(&str, &str)] = &[
    ("sses", "ss"),
    ("ies", "y"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("xes", "x"),
    ("zes", "z"),
    ("s", ""),
];

/// Endings that look plural but aren't ("process", "status", "analysis").
const PROTECTED_ENDINGS: &[&str] = &["ss", "us", "is"];

pub struct Lemmatizer {
    exceptions: HashMap<&'static str, &'static str>,
}

impl Default for Lemmatizer {
    fn default() -> Self {
        Self {
            exceptions: EXCEPTIONS.iter().copied().collect(),
        }
    }
}

impl Lemmatizer {
    /// Lemmatize a single lowercase token.
    pub fn lemmatize(&self, word: &str) -> String {
        if let Some(lemma) = self.exceptions.get(word) {
            return (*lemma).to_string();
        }

        if word.len() <= 3 || !word.bytes().all(|b| b.is_ascii_lowercase()) {
            return word.to_string();
        }
        if PROTECTED_ENDINGS.iter().any(|end| word.ends_with(end)) {
            return word.to_string();
        }

        for (suffix, replacement) in SUFFIX_RULES {
            if let Some(stem) = word.strip_suffix(suffix) {
                // Keep at least three characters of stem ("yes" stays "yes")
                if stem.len() + replacement.len() < 3 {
                    break;
                }
                return format!("{stem}{replacement}");
            }
        }

        word.to_string()
    }
}
