// Choosing k for K-Means.
//
// Sweep k over an inclusive range, fit a seeded K-Means for each value,
// score the partition and keep the best. A k is skipped (and reported as
// such) when it cannot be scored: k < 2, k >= the sample count, or a fit
// that collapsed to a single distinct label. Equal scores keep the earlier,
// smaller k.

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use ndarray::Array2;
use tracing::{debug, info, warn};

use super::kmeans::{KMeansClusterer, KMeansSettings};
use super::metrics::ScorePolicy;
use super::Clusterer;

/// Outcome for a single k in the sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateScore {
    pub k: usize,
    /// None when this k could not be scored
    pub score: Option<f64>,
}

/// The full sweep and its winner.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub policy: ScorePolicy,
    pub best_k: usize,
    pub best_score: f64,
    pub candidates: Vec<CandidateScore>,
}

/// Sweep `k_min..=k_max` and return the best-scoring k.
///
/// Fails if the range is empty or no k in it could be scored.
pub fn select_k(
    features: &Array2<f64>,
    k_min: usize,
    k_max: usize,
    policy: ScorePolicy,
    settings: KMeansSettings,
) -> Result<Selection> {
    if k_min > k_max {
        anyhow::bail!("Empty k range: {k_min}..={k_max}");
    }

    let n = features.nrows();
    let pb = ProgressBar::new((k_max - k_min + 1) as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  Choosing k [{bar:30}] {pos}/{len} ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let mut candidates = Vec::with_capacity(k_max - k_min + 1);
    let mut best: Option<(usize, f64)> = None;

    for k in k_min..=k_max {
        let score = if k < 2 || k >= n {
            debug!(k, samples = n, "Skipping k outside the scorable range");
            None
        } else {
            let labels = KMeansClusterer::new(k, settings).fit_predict(features)?;
            match policy.score(features, &labels) {
                Ok(score) => Some(score),
                Err(e) => {
                    warn!(k, error = %e, "Partition could not be scored");
                    None
                }
            }
        };

        if let Some(score) = score {
            debug!(k, score, policy = policy.as_str(), "Scored partition");
            let current = best.map_or(policy.worst(), |(_, s)| s);
            if policy.is_better(score, current) {
                best = Some((k, score));
            }
        }

        candidates.push(CandidateScore { k, score });
        pb.inc(1);
    }
    pb.finish_and_clear();

    let Some((best_k, best_score)) = best else {
        anyhow::bail!(
            "No k in {k_min}..={k_max} could be scored for {n} samples \
             (k must be at least 2 and below the sample count)"
        );
    };

    info!(
        best_k,
        best_score,
        policy = policy.as_str(),
        "Selected number of clusters"
    );

    Ok(Selection {
        policy,
        best_k,
        best_score,
        candidates,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_empty_range_fails() {
        let data = array![[0.0], [1.0], [2.0]];
        assert!(select_k(&data, 5, 2, ScorePolicy::Silhouette, KMeansSettings::default()).is_err());
    }

    #[test]
    fn test_unscorable_range_fails() {
        // 3 samples: only k = 2 is scorable, and it's excluded here
        let data = array![[0.0], [1.0], [2.0]];
        assert!(select_k(&data, 3, 6, ScorePolicy::DaviesBouldin, KMeansSettings::default()).is_err());
    }

    #[test]
    fn test_out_of_range_k_is_reported_unscored() {
        let data = array![[0.0], [0.1], [5.0], [5.1]];
        let sel = select_k(&data, 1, 5, ScorePolicy::Silhouette, KMeansSettings::default()).unwrap();
        assert_eq!(sel.candidates.len(), 5);
        assert!(sel.candidates[0].score.is_none()); // k = 1
        assert!(sel.candidates[3].score.is_none()); // k = 4 = n
        assert!(sel.candidates[4].score.is_none()); // k = 5 > n
        assert_eq!(sel.best_k, 2);
    }
}
