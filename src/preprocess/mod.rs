// Preprocessing: raw scraped rows to cleaned, tokenized postings.

pub mod dates;
pub mod fields;
pub mod language;
pub mod lemma;
pub mod normalizer;

use std::collections::HashSet;

use anyhow::Result;

use crate::postings::models::{Posting, RawPosting};
use dates::convert_date_posted;
use fields::FieldCleaner;
use language::LanguageDetector;
use normalizer::{Normalizer, MIN_TOKENS};

/// Row counts after each filtering step, for logging and the run summary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreprocessStats {
    pub raw: usize,
    pub after_dedupe: usize,
    pub after_language: usize,
    pub after_industries: usize,
    pub after_tokens: usize,
}

/// Drop duplicate ids, then duplicate descriptions, then rows without a
/// description. The first occurrence always wins.
pub fn dedupe(rows: Vec<RawPosting>) -> Vec<RawPosting> {
    let mut seen_ids: HashSet<String> = HashSet::new();
    let mut seen_descriptions: HashSet<Option<String>> = HashSet::new();

    rows.into_iter()
        .filter(|row| seen_ids.insert(row.id.clone()))
        .filter(|row| seen_descriptions.insert(row.description_text().map(str::to_string)))
        .filter(|row| row.description_text().is_some())
        .collect()
}

/// Holds the per-row cleaning stages so they are built once per run.
pub struct Preprocessor {
    normalizer: Normalizer,
    detector: LanguageDetector,
    fields: FieldCleaner,
}

impl Preprocessor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            normalizer: Normalizer::new()?,
            detector: LanguageDetector::default(),
            fields: FieldCleaner::new()?,
        })
    }

    /// True if the row has an English description.
    pub fn keep_language(&self, row: &RawPosting) -> bool {
        row.description_text()
            .is_some_and(|d| self.detector.is_english(d))
    }

    /// Infer the posting date and clean the categorical columns. Returns
    /// None for industries outliers. The description is left untouched.
    pub fn clean_fields(&self, row: RawPosting) -> Option<RawPosting> {
        let industries = self.fields.clean_industries(&row.industries);
        if self.fields.is_outlier_industries(&industries) {
            return None;
        }

        Some(RawPosting {
            date_posted: convert_date_posted(&row.date_posted, &row.date_scraped),
            title: self.fields.clean_title(&row.title),
            function: self.fields.clean_function(&row.function),
            industries,
            ..row
        })
    }

    /// Tokenize the description. Returns None when too few tokens survive.
    pub fn tokenize(&self, row: RawPosting) -> Option<Posting> {
        let tokens = self.normalizer.normalize(row.description_text()?);
        if tokens.len() <= MIN_TOKENS {
            return None;
        }

        Some(Posting {
            id: row.id,
            title: row.title,
            tokens,
            function: row.function,
            industries: row.industries,
            date_posted: row.date_posted,
            date_scraped: row.date_scraped,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(id: &str, description: Option<&str>) -> RawPosting {
        RawPosting {
            id: id.to_string(),
            title: "Data Engineer".to_string(),
            description: description.map(str::to_string),
            function: "Engineering and IT".to_string(),
            industries: "Software".to_string(),
            date_posted: "2 days ago".to_string(),
            date_scraped: "2024-01-10".to_string(),
        }
    }

    #[test]
    fn test_dedupe_keeps_first_id() {
        let rows = vec![raw("1", Some("a")), raw("1", Some("b")), raw("2", Some("c"))];
        let kept = dedupe(rows);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].description.as_deref(), Some("a"));
    }

    #[test]
    fn test_dedupe_drops_duplicate_descriptions_and_missing() {
        let rows = vec![
            raw("1", Some("same")),
            raw("2", Some("same")),
            raw("3", None),
            raw("4", Some("")),
            raw("5", Some("other")),
        ];
        let ids: Vec<String> = dedupe(rows).into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["1", "5"]);
    }

    #[test]
    fn test_clean_fields() {
        let p = Preprocessor::new().unwrap();
        let row = p.clean_fields(raw("1", Some("x"))).unwrap();
        assert_eq!(row.title, "data engineer");
        assert_eq!(row.function, "engineering,it");
        assert_eq!(row.date_posted, "2024-01-08");
    }

    #[test]
    fn test_clean_fields_drops_outlier() {
        let p = Preprocessor::new().unwrap();
        let mut row = raw("1", Some("x"));
        row.industries = "this is actually a long block of description text that was scraped into the wrong column".to_string();
        assert!(p.clean_fields(row).is_none());
    }

    #[test]
    fn test_tokenize_drops_short_descriptions() {
        let p = Preprocessor::new().unwrap();
        assert!(p.tokenize(raw("1", Some("backend docker terraform kubernetes"))).is_none());
        let posting = p
            .tokenize(raw(
                "2",
                Some("engineer developer database backend frontend docker terraform kubernetes"),
            ))
            .unwrap();
        assert_eq!(posting.tokens.len(), 5);
    }
}
