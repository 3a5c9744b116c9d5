// Clustering: partition feature vectors into job categories.
//
// `Clusterer` is the swap point between K-Means (fixed k, usually chosen by
// `selection::select_k`) and DBSCAN (k discovered from density). Both
// return one integer label per row; DBSCAN marks noise with `NOISE`.

pub mod dbscan;
pub mod kmeans;
pub mod metrics;
pub mod selection;

use std::collections::BTreeMap;

use anyhow::Result;
use ndarray::Array2;

pub use crate::postings::models::NOISE;

/// Trait for algorithms that assign a cluster label to every row.
pub trait Clusterer {
    /// Label every row of `features`; output order matches row order.
    fn fit_predict(&self, features: &Array2<f64>) -> Result<Vec<i64>>;

    /// Short name used in logs.
    fn name(&self) -> &'static str;
}

/// Number of rows per label, ordered by label (noise first when present).
pub fn cluster_sizes(labels: &[i64]) -> BTreeMap<i64, usize> {
    let mut sizes = BTreeMap::new();
    for &label in labels {
        *sizes.entry(label).or_insert(0) += 1;
    }
    sizes
}

/// Number of real clusters, not counting noise.
pub fn cluster_count(labels: &[i64]) -> usize {
    cluster_sizes(labels)
        .keys()
        .filter(|&&l| l != NOISE)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cluster_sizes_and_count() {
        let labels = vec![1, 0, NOISE, 1, 1];
        let sizes = cluster_sizes(&labels);
        assert_eq!(sizes[&1], 3);
        assert_eq!(sizes[&NOISE], 1);
        assert_eq!(sizes.keys().next(), Some(&NOISE));
        assert_eq!(cluster_count(&labels), 2);
    }
}
