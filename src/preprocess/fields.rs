// Categorical field cleanup for title / function / industries.
//
// Industries and function are comma lists on the site but arrive joined with
// "and", slashes and stray separators. When the scraper picks up the wrong
// element the industries cell holds a chunk of description text instead;
// those rows are dropped.

use anyhow::Result;
use regex_lite::Regex;

/// An industries value with at least this many words is a scraping outlier.
pub const MAX_INDUSTRY_WORDS: usize = 15;

pub struct FieldCleaner {
    repeated_separator: Regex,
}

impl FieldCleaner {
    pub fn new() -> Result<Self> {
        Ok(Self {
            repeated_separator: Regex::new(r",,|, ,")?,
        })
    }

    pub fn clean_title(&self, title: &str) -> String {
        title.to_lowercase()
    }

    pub fn clean_function(&self, function: &str) -> String {
        self.normalize_list(&function.to_lowercase())
    }

    pub fn clean_industries(&self, industries: &str) -> String {
        self.normalize_list(&industries.to_lowercase().replace('\n', " "))
    }

    /// True when the (cleaned) industries value is really description text.
    pub fn is_outlier_industries(&self, industries: &str) -> bool {
        industries.split_whitespace().count() >= MAX_INDUSTRY_WORDS
    }

    fn normalize_list(&self, value: &str) -> String {
        let value = value.replace(" and ", ",").replace('/', ",");
        self.repeated_separator.replace_all(&value, ",").into_owned()
    }
}
