// Data models: the records that flow between pipeline stages.
//
// RawPosting mirrors the scraped CSV exactly. Posting is the cleaned record
// written to the processed dataset, with the description replaced by its
// token sequence.

use serde::{Deserialize, Serialize};

/// Label assigned to DBSCAN noise points.
pub const NOISE: i64 = -1;

/// A row of the raw, semicolon-delimited scrape.
///
/// Columns beyond these are ignored; a missing column fails deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPosting {
    pub id: String,
    pub title: String,
    /// Scraped description (None when the cell is empty)
    pub description: Option<String>,
    pub function: String,
    pub industries: String,
    pub date_posted: String,
    pub date_scraped: String,
}

impl RawPosting {
    /// The description, treating empty or whitespace-only cells as missing.
    pub fn description_text(&self) -> Option<&str> {
        self.description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
    }
}

/// A cleaned posting, ready for vectorization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Posting {
    pub id: String,
    pub title: String,
    /// Normalized description tokens (always more than `MIN_TOKENS`)
    pub tokens: Vec<String>,
    pub function: String,
    pub industries: String,
    /// Absolute posting date (YYYY-MM-DD) or the scrape date as a fallback
    pub date_posted: String,
    pub date_scraped: String,
}

impl Posting {
    /// The token sequence joined back into a single space-separated string.
    pub fn sentence(&self) -> String {
        self.tokens.join(" ")
    }
}

/// A posting paired with the cluster it was assigned to.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterAssignment {
    pub id: String,
    pub title: String,
    pub function: String,
    pub industries: String,
    pub cluster: i64,
}

impl ClusterAssignment {
    pub fn new(posting: &Posting, cluster: i64) -> Self {
        Self {
            id: posting.id.clone(),
            title: posting.title.clone(),
            function: posting.function.clone(),
            industries: posting.industries.clone(),
            cluster,
        }
    }

    pub fn is_noise(&self) -> bool {
        self.cluster == NOISE
    }
}
