// Feature extraction: token sequences to numeric vectors.
//
// Two interchangeable vectorizers sit behind the `Vectorizer` trait: sparse
// TF-IDF and dense averaged word embeddings. Either way the output is one
// row per document, in input order, all of the same dimension.

pub mod embeddings;
pub mod keywords;
pub mod tfidf;
pub mod traits;

use anyhow::Result;
use ndarray::Array2;

/// One sparse row: sorted column indices with their weights.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseRow {
    pub indices: Vec<usize>,
    pub values: Vec<f64>,
}

/// A document-by-feature matrix.
#[derive(Debug, Clone, PartialEq)]
pub enum Features {
    Sparse { dim: usize, rows: Vec<SparseRow> },
    Dense(Array2<f64>),
}

impl Features {
    /// Build a dense matrix from equal-length rows.
    ///
    /// Fails if any row's length differs from `dim`.
    pub fn dense_from_rows(rows: Vec<Vec<f64>>, dim: usize) -> Result<Self> {
        let n = rows.len();
        let mut flat = Vec::with_capacity(n * dim);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != dim {
                anyhow::bail!(
                    "Vector dimension mismatch at row {i}: expected {dim}, got {}",
                    row.len()
                );
            }
            flat.extend(row);
        }
        Ok(Features::Dense(Array2::from_shape_vec((n, dim), flat)?))
    }

    pub fn n_rows(&self) -> usize {
        match self {
            Features::Sparse { rows, .. } => rows.len(),
            Features::Dense(m) => m.nrows(),
        }
    }

    pub fn dim(&self) -> usize {
        match self {
            Features::Sparse { dim, .. } => *dim,
            Features::Dense(m) => m.ncols(),
        }
    }

    /// Materialize as a dense matrix (clustering works on dense input).
    pub fn to_dense(&self) -> Array2<f64> {
        match self {
            Features::Dense(m) => m.clone(),
            Features::Sparse { dim, rows } => {
                let mut m = Array2::zeros((rows.len(), *dim));
                for (i, row) in rows.iter().enumerate() {
                    for (&j, &v) in row.indices.iter().zip(&row.values) {
                        m[[i, j]] = v;
                    }
                }
                m
            }
        }
    }
}
