// TF-IDF vectorization.
//
// Each posting is one document. The vocabulary is every token of at least
// two characters seen in the corpus, sorted alphabetically so column order
// is stable between runs. Weights are raw term counts times the smoothed
// inverse document frequency
//
//   idf(t) = ln((1 + n) / (1 + df(t))) + 1
//
// and every row is scaled to unit L2 norm. Words that appear in every
// posting ("experience", "team") get the minimum idf; words distinctive to
// a few postings get boosted, which is what separates job categories.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use anyhow::Result;
use tracing::info;

use super::traits::Vectorizer;
use super::{Features, SparseRow};

pub struct TfIdfVectorizer {
    /// Tokens shorter than this are ignored
    pub min_token_len: usize,
}

impl Default for TfIdfVectorizer {
    fn default() -> Self {
        Self { min_token_len: 2 }
    }
}

impl Vectorizer for TfIdfVectorizer {
    fn vectorize(&self, docs: &[Vec<String>]) -> Result<Features> {
        if docs.is_empty() {
            anyhow::bail!("No documents to vectorize");
        }

        // Term counts per document, restricted to usable tokens
        let counts: Vec<BTreeMap<&str, f64>> = docs
            .iter()
            .map(|doc| {
                let mut tf = BTreeMap::new();
                for token in doc.iter().filter(|t| t.chars().count() >= self.min_token_len) {
                    *tf.entry(token.as_str()).or_insert(0.0) += 1.0;
                }
                tf
            })
            .collect();

        let vocabulary: BTreeSet<&str> = counts.iter().flat_map(|tf| tf.keys().copied()).collect();
        if vocabulary.is_empty() {
            anyhow::bail!(
                "TF-IDF found no usable tokens in {} documents",
                docs.len()
            );
        }
        let index: HashMap<&str, usize> = vocabulary
            .iter()
            .enumerate()
            .map(|(i, term)| (*term, i))
            .collect();

        // Document frequency per term
        let mut df = vec![0usize; vocabulary.len()];
        for tf in &counts {
            for term in tf.keys() {
                df[index[term]] += 1;
            }
        }

        let n = docs.len() as f64;
        let idf: Vec<f64> = df
            .iter()
            .map(|&d| ((1.0 + n) / (1.0 + d as f64)).ln() + 1.0)
            .collect();

        let rows: Vec<SparseRow> = counts
            .iter()
            .map(|tf| {
                // BTreeMap iteration is alphabetical, so indices come out sorted
                let (indices, mut values): (Vec<usize>, Vec<f64>) = tf
                    .iter()
                    .map(|(term, count)| {
                        let j = index[term];
                        (j, count * idf[j])
                    })
                    .unzip();
                let norm = values.iter().map(|v| v * v).sum::<f64>().sqrt();
                if norm > 0.0 {
                    for v in &mut values {
                        *v /= norm;
                    }
                }
                SparseRow { indices, values }
            })
            .collect();

        info!(
            documents = docs.len(),
            vocabulary = vocabulary.len(),
            "Built TF-IDF matrix"
        );

        Ok(Features::Sparse {
            dim: vocabulary.len(),
            rows,
        })
    }

    fn name(&self) -> &'static str {
        "tfidf"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(texts: &[&str]) -> Vec<Vec<String>> {
        texts
            .iter()
            .map(|t| t.split_whitespace().map(str::to_string).collect())
            .collect()
    }

    #[test]
    fn test_rows_are_unit_norm() {
        let features = TfIdfVectorizer::default()
            .vectorize(&docs(&["rust engineer rust", "python engineer", "nurse hospital"]))
            .unwrap();
        let dense = features.to_dense();
        for row in dense.rows() {
            let norm: f64 = row.iter().map(|v| v * v).sum::<f64>().sqrt();
            assert!((norm - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_vocabulary_is_sorted_and_skips_short_tokens() {
        // Only single-character tokens: nothing usable
        assert!(TfIdfVectorizer::default()
            .vectorize(&docs(&["b a c", "a c"]))
            .is_err());

        let features = TfIdfVectorizer::default()
            .vectorize(&docs(&["zeta alpha", "alpha x"]))
            .unwrap();
        assert_eq!(features.dim(), 2);
        match features {
            Features::Sparse { rows, .. } => {
                // "alpha" is column 0, "zeta" column 1
                assert_eq!(rows[0].indices, vec![0, 1]);
                assert_eq!(rows[1].indices, vec![0]);
            }
            Features::Dense(_) => panic!("TF-IDF should be sparse"),
        }
    }

    #[test]
    fn test_rare_terms_weigh_more() {
        let features = TfIdfVectorizer::default()
            .vectorize(&docs(&["team nurse", "team engineer", "team driver"]))
            .unwrap();
        let dense = features.to_dense();
        // Columns: driver, engineer, nurse, team
        assert!(dense[[0, 2]] > dense[[0, 3]]);
    }

    #[test]
    fn test_empty_corpus_fails() {
        assert!(TfIdfVectorizer::default().vectorize(&[]).is_err());
    }
}
