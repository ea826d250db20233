//! Threshold-graph clustering (single linkage with a hard cutoff).
//!
//! # The Algorithm
//!
//! Connect every pair of points whose squared Euclidean distance is strictly
//! below `threshold`, then report the connected components of that graph.
//! Exact duplicates (distance 0) are always connected.
//!
//! Unlike centroid methods, membership is transitive: a chain of close points
//! ends up in one cluster even when its endpoints are far apart.
//!
//! ## Edge Cases
//!
//! - `threshold = 0`: no pair passes the strict test, so only exact duplicates
//!   merge and every other point is a singleton.
//! - `threshold = +inf`: every pair passes; one cluster.
//!
//! ## Complexity
//!
//! - **Time**: O(n²·d) for the pairwise phase; union-find is amortized O(1).
//! - **Space**: O(n) plus the accepted edge list.
//!
//! The number of clusters never increases as `threshold` grows.

use super::traits::Clustering;
use super::util::{self, UnionFind};
use crate::error::{Error, Result};
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Threshold-graph clusterer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdGraph {
    /// Squared-distance cutoff (exclusive).
    threshold: f64,
}

impl ThresholdGraph {
    /// Create a clusterer with a squared-distance cutoff.
    ///
    /// The value is validated when clustering; use [`crate::Algorithm::greedy`]
    /// for eager validation.
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// The configured cutoff.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.threshold.is_nan() || self.threshold < 0.0 {
            return Err(Error::InvalidParameter {
                name: "threshold",
                message: "must be a non-negative number",
            });
        }
        Ok(())
    }

    /// Pairs `(i, j)`, `i < j`, closer than the threshold.
    fn edges(&self, data: &[Vec<f64>]) -> Vec<(usize, usize)> {
        let n = data.len();
        let threshold = self.threshold;
        let row = |i: usize| {
            let a = &data[i];
            ((i + 1)..n)
                .filter(move |&j| {
                    let d = util::squared_euclidean(a, &data[j]);
                    d < threshold || d == 0.0
                })
                .map(move |j| (i, j))
        };

        #[cfg(feature = "parallel")]
        {
            (0..n).into_par_iter().flat_map_iter(row).collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            (0..n).flat_map(row).collect()
        }
    }
}

impl Clustering for ThresholdGraph {
    fn fit_predict(&self, data: &[Vec<f64>]) -> Result<Vec<usize>> {
        self.validate()?;
        let d = util::common_dim(data)?;
        let n = data.len();
        if n == 0 {
            return Ok(Vec::new());
        }

        let edges = self.edges(data);
        let mut uf = UnionFind::new(n);
        for (i, j) in edges.iter().copied() {
            uf.union(i, j);
        }
        let labels = uf.labels();

        debug!(
            n,
            d,
            threshold = self.threshold,
            edges = edges.len(),
            clusters = labels.iter().max().map_or(0, |m| m + 1),
            "threshold graph clustered"
        );
        Ok(labels)
    }

    /// The cluster count depends on the data, so this returns 0.
    fn n_clusters(&self) -> usize {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::assemble::ordered_partition;

    fn two_groups() -> Vec<Vec<f64>> {
        let mut data: Vec<Vec<f64>> = (0..5).map(|y| vec![1.0, y as f64]).collect();
        data.extend((-4..=0).map(|y| vec![9.0, y as f64]));
        data
    }

    fn line() -> Vec<Vec<f64>> {
        [0.0, 2.0, 4.0, 100.0, 102.0, 104.0]
            .iter()
            .map(|&x| vec![x])
            .collect()
    }

    #[test]
    fn test_two_groups_threshold_18() {
        let labels = ThresholdGraph::new(18.0).fit_predict(&two_groups()).unwrap();
        let groups = ordered_partition(&labels);
        assert_eq!(groups, vec![vec![0, 1, 2, 3, 4], vec![5, 6, 7, 8, 9]]);
    }

    #[test]
    fn test_zero_threshold_gives_singletons() {
        let labels = ThresholdGraph::new(0.0).fit_predict(&line()).unwrap();
        assert_eq!(ordered_partition(&labels).len(), 6);
    }

    #[test]
    fn test_huge_threshold_gives_one_cluster() {
        let labels = ThresholdGraph::new(1e9).fit_predict(&line()).unwrap();
        assert_eq!(ordered_partition(&labels), vec![vec![0, 1, 2, 3, 4, 5]]);

        let labels = ThresholdGraph::new(f64::INFINITY).fit_predict(&line()).unwrap();
        assert_eq!(ordered_partition(&labels).len(), 1);
    }

    #[test]
    fn test_cutoff_is_strict() {
        // Adjacent points are exactly 4.0 apart (squared).
        let labels = ThresholdGraph::new(4.0).fit_predict(&line()).unwrap();
        assert_eq!(ordered_partition(&labels).len(), 6);

        let labels = ThresholdGraph::new(4.0 + 1e-9).fit_predict(&line()).unwrap();
        assert_eq!(
            ordered_partition(&labels),
            vec![vec![0, 1, 2], vec![3, 4, 5]]
        );
    }

    #[test]
    fn test_chain_merges_distant_endpoints() {
        let data: Vec<Vec<f64>> = (0..20).map(|i| vec![i as f64, 0.0]).collect();
        let labels = ThresholdGraph::new(1.5).fit_predict(&data).unwrap();
        assert!(labels.iter().all(|&l| l == labels[0]));
    }

    #[test]
    fn test_duplicates_merge_with_zero_threshold() {
        let data = vec![vec![1.0], vec![2.0], vec![1.0]];
        let labels = ThresholdGraph::new(0.0).fit_predict(&data).unwrap();
        assert_eq!(ordered_partition(&labels), vec![vec![0, 2], vec![1]]);
    }

    #[test]
    fn test_empty_input_is_empty_result() {
        let labels = ThresholdGraph::new(1.0).fit_predict(&[]).unwrap();
        assert!(labels.is_empty());
    }

    #[test]
    fn test_invalid_threshold() {
        let data = vec![vec![0.0]];
        assert!(ThresholdGraph::new(-1.0).fit_predict(&data).is_err());
        assert!(ThresholdGraph::new(f64::NAN).fit_predict(&data).is_err());
    }
}
