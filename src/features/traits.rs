// Vectorizer trait: swap-ready abstraction.
//
// The pipeline only sees `Vectorizer`, so TF-IDF and embedding averaging
// are chosen by configuration without touching the clustering code.

use super::Features;
use anyhow::Result;

/// Trait for turning tokenized documents into a feature matrix.
pub trait Vectorizer {
    /// Vectorize every document; row `i` of the result belongs to `docs[i]`.
    fn vectorize(&self, docs: &[Vec<String>]) -> Result<Features>;

    /// Short name used in logs and output file names.
    fn name(&self) -> &'static str;
}
