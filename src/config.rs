use std::env;
use std::path::PathBuf;

use anyhow::Result;

use crate::features::embeddings::DEFAULT_EMBEDDING_DIM;

/// Which vectorizer turns token sequences into features.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VectorizerMethod {
    /// Sparse TF-IDF over the corpus vocabulary (default)
    TfIdf,
    /// Dense average of pretrained word vectors
    Embedding,
}

impl VectorizerMethod {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "tfidf" | "tf-idf" => Ok(VectorizerMethod::TfIdf),
            "embedding" | "embeddings" | "glove" => Ok(VectorizerMethod::Embedding),
            other => anyhow::bail!(
                "Unknown vectorizer {other:?} in JOBCLUSTER_VECTORIZER (expected tfidf or embedding)"
            ),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VectorizerMethod::TfIdf => "tfidf",
            VectorizerMethod::Embedding => "embedding",
        }
    }

    /// File name prefix for the cluster CSVs.
    pub fn output_prefix(&self) -> &'static str {
        match self {
            VectorizerMethod::TfIdf => "text_clustering",
            VectorizerMethod::Embedding => "word2vec_clustering",
        }
    }
}

/// Which clustering algorithm assigns labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusteringMethod {
    /// K-Means with k chosen by a score sweep (default)
    KMeans,
    /// Density-based; k is discovered, noise is labeled -1
    Dbscan,
}

impl ClusteringMethod {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "kmeans" | "k-means" => Ok(ClusteringMethod::KMeans),
            "dbscan" => Ok(ClusteringMethod::Dbscan),
            other => anyhow::bail!(
                "Unknown clustering method {other:?} in JOBCLUSTER_CLUSTERING (expected kmeans or dbscan)"
            ),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ClusteringMethod::KMeans => "K-MEANS",
            ClusteringMethod::Dbscan => "DBSCAN",
        }
    }
}

/// Central configuration loaded from environment variables.
///
/// Only file paths and the two method selectors live here; the .env file
/// is loaded automatically at startup via dotenvy. Hyperparameters are
/// command-line flags.
#[derive(Debug, Clone)]
pub struct Config {
    /// Raw semicolon-delimited scrape
    pub raw_path: PathBuf,
    /// Cleaned, tokenized postings (JSON Lines)
    pub processed_path: PathBuf,
    /// Directory receiving the cluster CSVs
    pub output_dir: PathBuf,
    /// Pretrained word-vector file (only read by the embedding vectorizer)
    pub embeddings_path: PathBuf,
    /// Values per line in the word-vector file (`--embedding-dim`)
    pub embedding_dim: usize,
    pub vectorizer: VectorizerMethod,
    pub clustering: ClusteringMethod,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            raw_path: PathBuf::from("data/raw/jobs.csv"),
            processed_path: PathBuf::from("data/processed/cleaned_jobs.jsonl"),
            output_dir: PathBuf::from("csv_files"),
            embeddings_path: PathBuf::from(
                "models/glove.twitter.27B/glove.twitter.27B.100d.txt",
            ),
            embedding_dim: DEFAULT_EMBEDDING_DIM,
            vectorizer: VectorizerMethod::TfIdf,
            clustering: ClusteringMethod::KMeans,
        }
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to the
    /// defaults for anything unset.
    pub fn load() -> Result<Self> {
        let defaults = Self::default();

        let vectorizer = match env::var("JOBCLUSTER_VECTORIZER") {
            Ok(v) => VectorizerMethod::parse(&v)?,
            Err(_) => defaults.vectorizer,
        };
        let clustering = match env::var("JOBCLUSTER_CLUSTERING") {
            Ok(v) => ClusteringMethod::parse(&v)?,
            Err(_) => defaults.clustering,
        };

        Ok(Self {
            raw_path: env::var("JOBCLUSTER_RAW_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.raw_path),
            processed_path: env::var("JOBCLUSTER_PROCESSED_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.processed_path),
            output_dir: env::var("JOBCLUSTER_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            embeddings_path: env::var("JOBCLUSTER_EMBEDDINGS_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.embeddings_path),
            embedding_dim: defaults.embedding_dim,
            vectorizer,
            clustering,
        })
    }

    /// Check that the raw scrape exists.
    /// Call this before preprocessing.
    pub fn require_raw(&self) -> Result<()> {
        if !self.raw_path.exists() {
            anyhow::bail!(
                "Raw CSV not found at {}\n\
                 Set JOBCLUSTER_RAW_PATH in your .env file to point at the scrape.",
                self.raw_path.display()
            );
        }
        Ok(())
    }

    /// Validate that the chosen vectorizer has what it needs.
    /// For TF-IDF nothing; for embeddings the vector file must exist.
    pub fn require_embeddings(&self) -> Result<()> {
        match self.vectorizer {
            VectorizerMethod::TfIdf => Ok(()),
            VectorizerMethod::Embedding => {
                if !self.embeddings_path.exists() {
                    anyhow::bail!(
                        "Word-vector file not found at {}\n\
                         Set JOBCLUSTER_EMBEDDINGS_PATH, or JOBCLUSTER_VECTORIZER=tfidf to use TF-IDF instead.",
                        self.embeddings_path.display()
                    );
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_methods() {
        assert_eq!(VectorizerMethod::parse("TF-IDF").unwrap(), VectorizerMethod::TfIdf);
        assert_eq!(VectorizerMethod::parse("glove").unwrap(), VectorizerMethod::Embedding);
        assert!(VectorizerMethod::parse("bert").is_err());
        assert_eq!(ClusteringMethod::parse("K-MEANS").unwrap(), ClusteringMethod::KMeans);
        assert_eq!(ClusteringMethod::parse("dbscan").unwrap(), ClusteringMethod::Dbscan);
        assert!(ClusteringMethod::parse("gmm").is_err());
    }

    #[test]
    fn test_require_embeddings_only_for_embedding_method() {
        let mut config = Config {
            embeddings_path: PathBuf::from("/nonexistent/vectors.txt"),
            ..Config::default()
        };
        assert!(config.require_embeddings().is_ok());
        config.vectorizer = VectorizerMethod::Embedding;
        assert!(config.require_embeddings().is_err());
    }
}
