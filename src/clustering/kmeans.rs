// K-Means via linfa-clustering.
//
// The RNG is seeded explicitly so a fixed seed gives identical labels on
// every run. `n_runs` independent initializations are fitted and the one
// with the lowest inertia is kept.

use anyhow::{Context, Result};
use linfa::traits::{Fit, Predict};
use linfa::DatasetBase;
use linfa_clustering::KMeans;
use ndarray::{Array1, Array2};
use rand_xoshiro::rand_core::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;
use tracing::debug;

use super::Clusterer;

/// K-Means hyperparameters other than k.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KMeansSettings {
    pub seed: u64,
    /// Independent initializations; the lowest-inertia fit wins
    pub n_runs: usize,
    pub max_iterations: u64,
    pub tolerance: f64,
}

impl Default for KMeansSettings {
    fn default() -> Self {
        Self {
            seed: 0,
            n_runs: 10,
            max_iterations: 300,
            tolerance: 1e-4,
        }
    }
}

pub struct KMeansClusterer {
    pub n_clusters: usize,
    pub settings: KMeansSettings,
}

impl KMeansClusterer {
    pub fn new(n_clusters: usize, settings: KMeansSettings) -> Self {
        Self {
            n_clusters,
            settings,
        }
    }
}

impl Clusterer for KMeansClusterer {
    fn fit_predict(&self, features: &Array2<f64>) -> Result<Vec<i64>> {
        let n = features.nrows();
        if self.n_clusters == 0 {
            anyhow::bail!("K-Means needs at least one cluster");
        }
        if self.n_clusters > n {
            anyhow::bail!(
                "K-Means asked for {} clusters but only {n} samples are available",
                self.n_clusters
            );
        }

        let rng = Xoshiro256Plus::seed_from_u64(self.settings.seed);
        let dataset = DatasetBase::from(features.clone());

        let model = KMeans::params_with_rng(self.n_clusters, rng)
            .n_runs(self.settings.n_runs.max(1))
            .max_n_iterations(self.settings.max_iterations)
            .tolerance(self.settings.tolerance)
            .fit(&dataset)
            .with_context(|| format!("K-Means fit failed for k={}", self.n_clusters))?;

        let labels: Array1<usize> = model.predict(features);
        debug!(k = self.n_clusters, samples = n, "K-Means fitted");

        Ok(labels.iter().map(|&l| l as i64).collect())
    }

    fn name(&self) -> &'static str {
        "kmeans"
    }
}
