// Word-embedding averaging using a pretrained GloVe-style vector file.
//
// The file has one entry per line: a word followed by N floats, separated
// by whitespace. Lines with the wrong field count or unparseable values are
// skipped (GloVe dumps contain a handful of tokens with embedded spaces).
//
// A posting's vector is the mean of the vectors of its known tokens, or the
// zero vector when none of its tokens are in the table.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

use super::traits::Vectorizer;
use super::Features;

/// Default dimensionality of the GloVe Twitter vectors.
pub const DEFAULT_EMBEDDING_DIM: usize = 100;

/// Word -> vector lookup table with a fixed dimension.
pub struct WordVectors {
    dim: usize,
    vectors: HashMap<String, Vec<f64>>,
}

impl WordVectors {
    /// Load a vector file, keeping only lines with exactly `dim` values.
    pub fn load(path: &Path, dim: usize) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Opening word-vector file {}", path.display()))?;
        let table = Self::from_reader(BufReader::new(file), dim)
            .with_context(|| format!("Reading word-vector file {}", path.display()))?;

        info!(
            words = table.len(),
            dim,
            path = %path.display(),
            "Loaded word vectors"
        );
        Ok(table)
    }

    pub fn from_reader<R: BufRead>(reader: R, dim: usize) -> Result<Self> {
        if dim == 0 {
            anyhow::bail!("Embedding dimension must be positive");
        }

        let mut vectors = HashMap::new();
        let mut skipped = 0usize;

        for line in reader.lines() {
            let line = line?;
            match parse_line(&line, dim) {
                Some((word, vector)) => {
                    vectors.insert(word.to_string(), vector);
                }
                None => skipped += 1,
            }
        }

        debug!(kept = vectors.len(), skipped, "Parsed word-vector lines");
        Ok(Self { dim, vectors })
    }

    /// Build a table directly from in-memory vectors of dimension `dim`.
    pub fn from_map(dim: usize, vectors: HashMap<String, Vec<f64>>) -> Result<Self> {
        if let Some((word, v)) = vectors.iter().find(|(_, v)| v.len() != dim) {
            anyhow::bail!(
                "Vector for {word:?} has dimension {}, expected {dim}",
                v.len()
            );
        }
        Ok(Self { dim, vectors })
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn get(&self, word: &str) -> Option<&[f64]> {
        self.vectors.get(word).map(Vec::as_slice)
    }

    /// Mean vector of the known tokens, or zeros if none are known.
    pub fn document_vector(&self, tokens: &[String]) -> Vec<f64> {
        let known: Vec<&[f64]> = tokens.iter().filter_map(|t| self.get(t)).collect();
        mean_embedding(&known, self.dim)
    }
}

/// Split a line into word + exactly `dim` floats.
fn parse_line(line: &str, dim: usize) -> Option<(&str, Vec<f64>)> {
    let mut fields = line.split_whitespace();
    let word = fields.next()?;
    let values: Vec<f64> = fields
        .map(|f| f.parse::<f64>().ok())
        .collect::<Option<Vec<f64>>>()?;
    if values.len() != dim {
        return None;
    }
    Some((word, values))
}

/// Element-wise mean of equal-length vectors; zeros of `dim` when empty.
pub fn mean_embedding(embeddings: &[&[f64]], dim: usize) -> Vec<f64> {
    let mut mean = vec![0.0_f64; dim];
    if embeddings.is_empty() {
        return mean;
    }

    for emb in embeddings {
        for (acc, &val) in mean.iter_mut().zip(emb.iter()) {
            *acc += val;
        }
    }

    let n = embeddings.len() as f64;
    for val in &mut mean {
        *val /= n;
    }
    mean
}

/// Dense vectorizer averaging pretrained word vectors.
pub struct EmbeddingVectorizer {
    table: WordVectors,
}

impl EmbeddingVectorizer {
    pub fn new(table: WordVectors) -> Self {
        Self { table }
    }
}

impl Vectorizer for EmbeddingVectorizer {
    fn vectorize(&self, docs: &[Vec<String>]) -> Result<Features> {
        if docs.is_empty() {
            anyhow::bail!("No documents to vectorize");
        }

        let rows: Vec<Vec<f64>> = docs
            .iter()
            .map(|doc| self.table.document_vector(doc))
            .collect();

        let uncovered = docs
            .iter()
            .filter(|doc| doc.iter().all(|t| self.table.get(t).is_none()))
            .count();
        info!(
            documents = docs.len(),
            dim = self.table.dim(),
            uncovered,
            "Averaged word embeddings"
        );

        Features::dense_from_rows(rows, self.table.dim())
    }

    fn name(&self) -> &'static str {
        "embedding"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
engineer 1.0 0.0 0.0
nurse 0.0 1.0 0.0
new york 0.5 0.5 0.5
broken 1.0 nan?
short 1.0 2.0
rust 0.0 0.0 1.0
";

    #[test]
    fn test_from_reader_skips_bad_lines() {
        let table = WordVectors::from_reader(SAMPLE.as_bytes(), 3).unwrap();
        assert_eq!(table.len(), 3);
        assert!(table.get("engineer").is_some());
        assert!(table.get("new").is_none());
        assert!(table.get("short").is_none());
        assert!(table.get("broken").is_none());
    }

    #[test]
    fn test_document_vector_averages_known_tokens() {
        let table = WordVectors::from_reader(SAMPLE.as_bytes(), 3).unwrap();
        let doc: Vec<String> = ["engineer", "rust", "unknown"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(table.document_vector(&doc), vec![0.5, 0.0, 0.5]);
    }

    #[test]
    fn test_document_vector_no_known_tokens_is_zero() {
        let table = WordVectors::from_reader(SAMPLE.as_bytes(), 3).unwrap();
        let doc = vec!["zzz".to_string(), "qqq".to_string()];
        assert_eq!(table.document_vector(&doc), vec![0.0; 3]);
        assert_eq!(table.document_vector(&[]), vec![0.0; 3]);
    }

    #[test]
    fn test_mean_embedding_empty() {
        assert_eq!(mean_embedding(&[], 4), vec![0.0; 4]);
    }

    #[test]
    fn test_from_map_rejects_wrong_dimension() {
        let mut map = HashMap::new();
        map.insert("a".to_string(), vec![1.0, 2.0]);
        assert!(WordVectors::from_map(3, map).is_err());
    }
}
