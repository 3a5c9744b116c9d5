// Partition quality scores used to choose k.
//
// Both follow the usual definitions over Euclidean distance:
//
// - Silhouette: per sample s = (b - a) / max(a, b), where a is the mean
//   distance to its own cluster and b the mean distance to the nearest other
//   cluster; singletons score 0. The result is the mean over samples, in
//   [-1, 1], higher is better.
// - Davies-Bouldin: for each cluster, the worst ratio
//   (scatter_i + scatter_j) / centroid_distance_ij over the other clusters,
//   averaged over clusters. 0 is perfect, lower is better.
//
// Both require 2 <= distinct labels <= n_samples - 1.

use std::collections::BTreeMap;

use anyhow::Result;
use ndarray::{Array1, Array2, ArrayView1, Axis};

/// Which score drives model selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScorePolicy {
    Silhouette,
    DaviesBouldin,
}

impl ScorePolicy {
    /// Compute this policy's score for a partition.
    pub fn score(&self, features: &Array2<f64>, labels: &[i64]) -> Result<f64> {
        match self {
            ScorePolicy::Silhouette => silhouette_score(features, labels),
            ScorePolicy::DaviesBouldin => davies_bouldin_score(features, labels),
        }
    }

    /// True if `candidate` is strictly better than `best`.
    pub fn is_better(&self, candidate: f64, best: f64) -> bool {
        match self {
            ScorePolicy::Silhouette => candidate > best,
            ScorePolicy::DaviesBouldin => candidate < best,
        }
    }

    /// The starting "best" value that any real score beats.
    pub fn worst(&self) -> f64 {
        match self {
            ScorePolicy::Silhouette => f64::NEG_INFINITY,
            ScorePolicy::DaviesBouldin => f64::INFINITY,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScorePolicy::Silhouette => "silhouette",
            ScorePolicy::DaviesBouldin => "davies-bouldin",
        }
    }
}

/// Row indices grouped by label.
fn group_rows(labels: &[i64]) -> BTreeMap<i64, Vec<usize>> {
    let mut groups: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
    for (i, &label) in labels.iter().enumerate() {
        groups.entry(label).or_default().push(i);
    }
    groups
}

fn check_partition(features: &Array2<f64>, labels: &[i64]) -> Result<BTreeMap<i64, Vec<usize>>> {
    let n = features.nrows();
    if labels.len() != n {
        anyhow::bail!("Got {} labels for {n} samples", labels.len());
    }
    let groups = group_rows(labels);
    if groups.len() < 2 || groups.len() >= n {
        anyhow::bail!(
            "Score needs 2 to n_samples - 1 clusters, got {} clusters for {n} samples",
            groups.len()
        );
    }
    Ok(groups)
}

fn euclidean(a: ArrayView1<f64>, b: ArrayView1<f64>) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

/// Mean silhouette coefficient over all samples. Higher is better.
pub fn silhouette_score(features: &Array2<f64>, labels: &[i64]) -> Result<f64> {
    let groups = check_partition(features, labels)?;
    let n = features.nrows();

    let mut total = 0.0;
    for i in 0..n {
        let own = labels[i];
        let row = features.row(i);

        // Mean distance from sample i to each cluster
        let mut a = 0.0;
        let mut b = f64::INFINITY;
        for (&label, members) in &groups {
            if label == own {
                if members.len() == 1 {
                    continue;
                }
                let sum: f64 = members
                    .iter()
                    .filter(|&&j| j != i)
                    .map(|&j| euclidean(row, features.row(j)))
                    .sum();
                a = sum / (members.len() - 1) as f64;
            } else {
                let sum: f64 = members
                    .iter()
                    .map(|&j| euclidean(row, features.row(j)))
                    .sum();
                b = b.min(sum / members.len() as f64);
            }
        }

        let own_size = groups.get(&own).map_or(0, Vec::len);
        let s = if own_size <= 1 {
            0.0
        } else {
            let denom = a.max(b);
            if denom > 0.0 {
                (b - a) / denom
            } else {
                0.0
            }
        };
        total += s;
    }

    Ok(total / n as f64)
}

/// Davies-Bouldin index. Lower is better.
pub fn davies_bouldin_score(features: &Array2<f64>, labels: &[i64]) -> Result<f64> {
    let groups = check_partition(features, labels)?;

    let centroids: Vec<Array1<f64>> = groups
        .values()
        .map(|members| {
            features
                .select(Axis(0), members)
                .mean_axis(Axis(0))
                .unwrap_or_else(|| Array1::zeros(features.ncols()))
        })
        .collect();

    // Average distance of members to their centroid
    let scatter: Vec<f64> = groups
        .values()
        .zip(&centroids)
        .map(|(members, c)| {
            members
                .iter()
                .map(|&j| euclidean(features.row(j), c.view()))
                .sum::<f64>()
                / members.len() as f64
        })
        .collect();

    let k = centroids.len();
    let mut centroid_dist = vec![vec![0.0; k]; k];
    for i in 0..k {
        for j in (i + 1)..k {
            let d = euclidean(centroids[i].view(), centroids[j].view());
            centroid_dist[i][j] = d;
            centroid_dist[j][i] = d;
        }
    }

    if scatter.iter().all(|&s| s == 0.0) || centroid_dist.iter().flatten().all(|&d| d == 0.0) {
        return Ok(0.0);
    }

    let mut total = 0.0;
    for i in 0..k {
        let worst = (0..k)
            .filter(|&j| j != i)
            .map(|j| {
                // Coincident centroids contribute nothing
                if centroid_dist[i][j] == 0.0 {
                    0.0
                } else {
                    (scatter[i] + scatter[j]) / centroid_dist[i][j]
                }
            })
            .fold(0.0, f64::max);
        total += worst;
    }

    Ok(total / k as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn two_groups() -> Array2<f64> {
        array![[0.0, 0.0], [0.0, 1.0], [10.0, 0.0], [10.0, 1.0]]
    }

    #[test]
    fn test_silhouette_known_value() {
        let labels = [0, 0, 1, 1];
        let s = silhouette_score(&two_groups(), &labels).unwrap();
        // a = 1, b = (10 + sqrt(101)) / 2 for every sample
        let b = (10.0 + 101f64.sqrt()) / 2.0;
        let expected = (b - 1.0) / b;
        assert!((s - expected).abs() < 1e-9, "got {s}, expected {expected}");
    }

    #[test]
    fn test_silhouette_bad_partition_is_negative() {
        let labels = [0, 1, 0, 1];
        let s = silhouette_score(&two_groups(), &labels).unwrap();
        assert!(s < 0.0);
    }

    #[test]
    fn test_davies_bouldin_known_value() {
        let labels = [0, 0, 1, 1];
        let db = davies_bouldin_score(&two_groups(), &labels).unwrap();
        // scatter 0.5 each, centroid distance 10
        assert!((db - 0.1).abs() < 1e-9, "got {db}");
    }

    #[test]
    fn test_scores_reject_degenerate_partitions() {
        let data = two_groups();
        assert!(silhouette_score(&data, &[0, 0, 0, 0]).is_err());
        assert!(davies_bouldin_score(&data, &[0, 1, 2, 3]).is_err());
        assert!(silhouette_score(&data, &[0, 1]).is_err());
    }

    #[test]
    fn test_policy_direction() {
        assert!(ScorePolicy::Silhouette.is_better(0.8, 0.5));
        assert!(ScorePolicy::DaviesBouldin.is_better(0.2, 0.5));
        assert!(!ScorePolicy::DaviesBouldin.is_better(0.5, 0.5));
        assert!(ScorePolicy::DaviesBouldin.is_better(3.0, ScorePolicy::DaviesBouldin.worst()));
    }
}
