// DBSCAN via linfa-clustering.
//
// Points within `eps` (Euclidean) of at least `min_samples` points form
// dense cores; clusters grow from cores, everything unreachable is noise.

use anyhow::{Context, Result};
use linfa::prelude::*;
use linfa_clustering::Dbscan;
use ndarray::{Array1, Array2};
use tracing::debug;

use super::{Clusterer, NOISE};

pub struct DbscanClusterer {
    /// Neighborhood radius
    pub eps: f64,
    /// Minimum neighborhood size for a core point
    pub min_samples: usize,
}

impl Default for DbscanClusterer {
    fn default() -> Self {
        Self {
            eps: 0.5,
            min_samples: 2,
        }
    }
}

impl Clusterer for DbscanClusterer {
    fn fit_predict(&self, features: &Array2<f64>) -> Result<Vec<i64>> {
        if features.nrows() == 0 {
            return Ok(Vec::new());
        }

        let assignments: Array1<Option<usize>> = Dbscan::params(self.min_samples)
            .tolerance(self.eps)
            .transform(features)
            .with_context(|| {
                format!(
                    "DBSCAN failed (eps={}, min_samples={})",
                    self.eps, self.min_samples
                )
            })?;

        let labels: Vec<i64> = assignments
            .iter()
            .map(|a| a.map_or(NOISE, |c| c as i64))
            .collect();

        debug!(
            noise = labels.iter().filter(|&&l| l == NOISE).count(),
            samples = labels.len(),
            "DBSCAN fitted"
        );
        Ok(labels)
    }

    fn name(&self) -> &'static str {
        "dbscan"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_dense_groups_and_noise() {
        let data = array![
            [0.0, 0.0],
            [0.1, 0.0],
            [0.0, 0.1],
            [5.0, 5.0],
            [5.1, 5.0],
            [5.0, 5.1],
            [50.0, 50.0]
        ];
        let labels = DbscanClusterer::default().fit_predict(&data).unwrap();
        assert_eq!(labels.len(), 7);
        assert_eq!(labels[0], labels[1]);
        assert_eq!(labels[0], labels[2]);
        assert_eq!(labels[3], labels[4]);
        assert_ne!(labels[0], labels[3]);
        assert!(labels[0] >= 0 && labels[3] >= 0);
        assert_eq!(labels[3], labels[5]);
        assert_eq!(labels[6], NOISE);
    }

    #[test]
    fn test_empty_input() {
        let data = Array2::<f64>::zeros((0, 3));
        assert!(DbscanClusterer::default().fit_predict(&data).unwrap().is_empty());
    }
}
