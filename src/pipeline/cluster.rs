// Clustering stage: processed postings -> cluster assignments on disk.
//
// Vectorize with the configured method, then either run DBSCAN directly or
// pick k for K-Means (by sweep, unless a fixed k was given) and fit the
// final model. Both output CSVs are written only after labels exist for
// every posting.

use std::path::PathBuf;

use anyhow::Result;
use tracing::info;

use crate::clustering::dbscan::DbscanClusterer;
use crate::clustering::kmeans::{KMeansClusterer, KMeansSettings};
use crate::clustering::metrics::ScorePolicy;
use crate::clustering::selection::{select_k, Selection};
use crate::clustering::Clusterer;
use crate::config::{ClusteringMethod, Config, VectorizerMethod};
use crate::features::embeddings::{EmbeddingVectorizer, WordVectors};
use crate::features::tfidf::TfIdfVectorizer;
use crate::features::traits::Vectorizer;
use crate::postings::io;
use crate::postings::models::{ClusterAssignment, Posting};

/// Hyperparameters for the clustering stage (CLI flags).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterOptions {
    /// Inclusive k range swept when `fixed_k` is None
    pub k_min: usize,
    pub k_max: usize,
    /// Skip the sweep and fit exactly this many clusters
    pub fixed_k: Option<usize>,
    pub policy: ScorePolicy,
    pub kmeans: KMeansSettings,
    pub eps: f64,
    pub min_samples: usize,
}

impl Default for ClusterOptions {
    fn default() -> Self {
        Self {
            k_min: 2,
            k_max: 20,
            fixed_k: None,
            policy: ScorePolicy::DaviesBouldin,
            kmeans: KMeansSettings::default(),
            eps: 0.5,
            min_samples: 2,
        }
    }
}

/// Everything a clustering run produced, for display.
#[derive(Debug, Clone)]
pub struct ClusterRun {
    pub method: ClusteringMethod,
    pub vectorizer: VectorizerMethod,
    pub feature_dim: usize,
    pub selection: Option<Selection>,
    pub assignments: Vec<ClusterAssignment>,
    /// Space-joined tokens per posting, aligned with `assignments`
    pub documents: Vec<String>,
    pub labels_path: PathBuf,
    pub ids_path: PathBuf,
}

/// Build the configured vectorizer.
pub fn build_vectorizer(config: &Config) -> Result<Box<dyn Vectorizer>> {
    match config.vectorizer {
        VectorizerMethod::TfIdf => Ok(Box::new(TfIdfVectorizer::default())),
        VectorizerMethod::Embedding => {
            config.require_embeddings()?;
            let table = WordVectors::load(&config.embeddings_path, config.embedding_dim)?;
            Ok(Box::new(EmbeddingVectorizer::new(table)))
        }
    }
}

/// Label postings in memory. Returns labels (aligned with `postings`), the
/// k sweep if one ran, and the feature dimension.
pub fn assign_clusters(
    postings: &[Posting],
    vectorizer: &dyn Vectorizer,
    method: ClusteringMethod,
    options: &ClusterOptions,
) -> Result<(Vec<i64>, Option<Selection>, usize)> {
    if postings.is_empty() {
        anyhow::bail!("No postings to cluster");
    }

    let docs: Vec<Vec<String>> = postings.iter().map(|p| p.tokens.clone()).collect();
    let features = vectorizer.vectorize(&docs)?;
    if features.n_rows() != postings.len() {
        anyhow::bail!(
            "Vectorizer returned {} rows for {} postings",
            features.n_rows(),
            postings.len()
        );
    }
    let dim = features.dim();
    let matrix = features.to_dense();

    let (clusterer, selection): (Box<dyn Clusterer>, Option<Selection>) = match method {
        ClusteringMethod::Dbscan => (
            Box::new(DbscanClusterer {
                eps: options.eps,
                min_samples: options.min_samples,
            }),
            None,
        ),
        ClusteringMethod::KMeans => {
            let (k, selection) = match options.fixed_k {
                Some(k) => (k, None),
                None => {
                    println!(
                        "Choosing k in {}..={} by {} score...",
                        options.k_min,
                        options.k_max,
                        options.policy.as_str()
                    );
                    let sel = select_k(
                        &matrix,
                        options.k_min,
                        options.k_max,
                        options.policy,
                        options.kmeans,
                    )?;
                    (sel.best_k, Some(sel))
                }
            };
            (Box::new(KMeansClusterer::new(k, options.kmeans)), selection)
        }
    };

    let labels = clusterer.fit_predict(&matrix)?;
    if labels.len() != postings.len() {
        anyhow::bail!(
            "{} returned {} labels for {} postings",
            clusterer.name(),
            labels.len(),
            postings.len()
        );
    }

    info!(
        method = clusterer.name(),
        vectorizer = vectorizer.name(),
        postings = postings.len(),
        dim,
        "Assigned clusters"
    );
    Ok((labels, selection, dim))
}

/// Run the whole stage from the processed dataset to the output CSVs.
pub fn run(config: &Config, options: &ClusterOptions) -> Result<ClusterRun> {
    let postings = io::read_processed(&config.processed_path)?;
    println!(
        "Clustering {} postings ({} vectors, {})...",
        postings.len(),
        match config.vectorizer {
            VectorizerMethod::TfIdf => "TF-IDF",
            VectorizerMethod::Embedding => "word-embedding",
        },
        config.clustering.as_str()
    );

    let vectorizer = build_vectorizer(config)?;
    let (labels, selection, feature_dim) =
        assign_clusters(&postings, vectorizer.as_ref(), config.clustering, options)?;

    let assignments: Vec<ClusterAssignment> = postings
        .iter()
        .zip(&labels)
        .map(|(p, &label)| ClusterAssignment::new(p, label))
        .collect();

    let (labels_path, ids_path) = io::write_assignments(
        &config.output_dir,
        config.vectorizer.output_prefix(),
        &assignments,
    )?;

    Ok(ClusterRun {
        method: config.clustering,
        vectorizer: config.vectorizer,
        feature_dim,
        selection,
        documents: postings.iter().map(Posting::sentence).collect(),
        assignments,
        labels_path,
        ids_path,
    })
}
