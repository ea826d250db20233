//! Parameter-free clustering.
//!
//! Derives a threshold from the data and hands off to [`ThresholdGraph`].
//!
//! # Heuristic
//!
//! 1. If every point sits on (or within float tolerance of) the same
//!    location, return a single cluster.
//! 2. Build the minimum spanning tree of the squared-distance graph.
//! 3. Remove the heaviest MST edge. If every squared distance inside the two
//!    resulting components is below every squared distance between them, the
//!    data is two separated groups: cut halfway between the two extremes.
//!    Whenever such a split exists the heaviest MST edge is its only bridge,
//!    so this finds it.
//! 4. Otherwise sort the edge weights and scan consecutive pairs from the
//!    median edge upward for the largest multiplicative jump `w[i+1] / w[i]`.
//!    This is the knee of the single-linkage merge curve: below it edges join
//!    points of one group, above it edges bridge groups.
//! 5. If the largest jump is at least `min_gap_ratio`, cut there with
//!    `threshold = sqrt(w[i] * w[i+1])`; otherwise the data is one group.
//!
//! The threshold graph's components at a cutoff are exactly the MST's
//! components below that cutoff, so delegating reproduces the cut tree.

use super::threshold::ThresholdGraph;
use super::traits::Clustering;
use super::util;
use crate::error::{Error, Result};
use tracing::debug;

/// Automatic clusterer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Automatic {
    /// Minimum jump between consecutive MST edges (squared distances) to cut.
    min_gap_ratio: f64,
    /// Relative tolerance for treating points as identical.
    tolerance: f64,
}

impl Default for Automatic {
    fn default() -> Self {
        Self {
            min_gap_ratio: 4.0,
            tolerance: 1e-12,
        }
    }
}

impl Automatic {
    /// Create an automatic clusterer with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum edge-weight jump required to split the data.
    pub fn with_min_gap_ratio(mut self, ratio: f64) -> Self {
        self.min_gap_ratio = ratio;
        self
    }

    /// Set the relative duplicate tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if !(self.min_gap_ratio.is_finite() && self.min_gap_ratio >= 1.0) {
            return Err(Error::InvalidParameter {
                name: "min_gap_ratio",
                message: "must be finite and at least 1",
            });
        }
        if !(self.tolerance.is_finite() && self.tolerance >= 0.0) {
            return Err(Error::InvalidParameter {
                name: "tolerance",
                message: "must be finite and non-negative",
            });
        }
        Ok(())
    }

    /// The squared-distance cutoff this clusterer would use, or `None` when
    /// the data forms a single group.
    pub fn threshold(&self, data: &[Vec<f64>]) -> Result<Option<f64>> {
        self.validate()?;
        util::common_dim(data)?;
        if util::is_degenerate(data, self.tolerance) {
            return Ok(None);
        }

        let n = data.len();
        let mst = util::prim_mst(n, |i, j| util::squared_euclidean(&data[i], &data[j]));
        if let Some(threshold) = two_way_split(data, &mst) {
            return Ok(Some(threshold));
        }

        let mut weights: Vec<f64> = mst.into_iter().map(|(_, _, w)| w).collect();
        weights.sort_by(f64::total_cmp);

        let floor = util::duplicate_floor(data, self.tolerance).max(f64::MIN_POSITIVE);
        let m = weights.len();
        let mut best: Option<(f64, f64, f64)> = None;
        for pair in weights[(m - 1) / 2..].windows(2) {
            let lo = pair[0].max(floor);
            let hi = pair[1].max(floor);
            let ratio = hi / lo;
            if best.is_none_or(|(r, _, _)| ratio > r) {
                best = Some((ratio, lo, hi));
            }
        }

        Ok(match best {
            Some((ratio, lo, hi)) if ratio >= self.min_gap_ratio => Some((lo * hi).sqrt()),
            _ => None,
        })
    }
}

/// Cutoff separating the two components left by removing the heaviest MST
/// edge, when every within-component distance is below every cross distance.
fn two_way_split(data: &[Vec<f64>], mst: &[(usize, usize, f64)]) -> Option<f64> {
    let heaviest = mst
        .iter()
        .enumerate()
        .max_by(|a, b| a.1 .2.total_cmp(&b.1 .2))
        .map(|(i, _)| i)?;

    let n = data.len();
    let mut uf = util::UnionFind::new(n);
    for (e, &(u, v, _)) in mst.iter().enumerate() {
        if e != heaviest {
            uf.union(u, v);
        }
    }
    let side = uf.labels();

    let mut within = 0.0f64;
    let mut across = f64::INFINITY;
    for i in 0..n {
        for j in (i + 1)..n {
            let d = util::squared_euclidean(&data[i], &data[j]);
            if side[i] == side[j] {
                within = within.max(d);
            } else {
                across = across.min(d);
            }
        }
    }
    if within >= across {
        return None;
    }

    let mid = 0.5 * (within + across);
    Some(if mid > within { mid } else { across })
}

impl Clustering for Automatic {
    fn fit_predict(&self, data: &[Vec<f64>]) -> Result<Vec<usize>> {
        self.validate()?;
        let n = data.len();
        if n == 0 {
            return Ok(Vec::new());
        }

        match self.threshold(data)? {
            Some(threshold) => {
                debug!(n, threshold, "automatic: delegating to threshold graph");
                ThresholdGraph::new(threshold).fit_predict(data)
            }
            None => {
                debug!(n, "automatic: no separating gap, single cluster");
                Ok(vec![0; n])
            }
        }
    }

    /// The cluster count depends on the data, so this returns 0.
    fn n_clusters(&self) -> usize {
        0
    }
}
