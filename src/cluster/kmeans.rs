//! K-means clustering.
//!
//! Partitions data into k clusters by minimizing **within-cluster sum of squares**
//! (WCSS, a.k.a. inertia).
//!
//! ```text
//! WCSS = Σₖ Σᵢ∈Cₖ ||xᵢ - μₖ||²
//! ```
//!
//! # Lloyd's Algorithm
//!
//! 1. Initialize k centroids (k-means++ or uniform sampling)
//! 2. **Assign**: each point → nearest centroid
//! 3. **Update**: each centroid → mean of its points
//! 4. Repeat until assignments stop changing or `max_iter` is hit
//!
//! Lloyd only finds a local minimum, so every fit runs several independent
//! restarts and keeps the lowest-inertia partition. On small, well-separated
//! inputs this recovers the global optimum in practice.
//!
//! # Degenerate Cases
//!
//! - `k > n` is reduced to `n` (one point per cluster).
//! - A centroid that loses all its points is re-seeded with the point lying
//!   farthest from its own centroid, taken from a cluster that can spare it.
//!   Every returned cluster is therefore non-empty.

use super::traits::Clustering;
use super::util;
use crate::error::{Error, Result};
use rand::prelude::*;
use tracing::{debug, trace};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Centroid seeding strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KmeansInit {
    /// k-means++: sample proportional to squared distance from chosen centroids.
    #[default]
    PlusPlus,
    /// k distinct points sampled uniformly.
    Random,
}

/// K-means clustering algorithm.
#[derive(Debug, Clone, PartialEq)]
pub struct Kmeans {
    /// Number of clusters.
    k: usize,
    /// Maximum Lloyd iterations per restart.
    max_iter: usize,
    /// Independent restarts; the best inertia wins.
    restarts: usize,
    /// Seeding strategy.
    init: KmeansInit,
    /// Random seed.
    seed: Option<u64>,
}

/// Result of a k-means fit.
#[derive(Debug, Clone, PartialEq)]
pub struct KmeansFit {
    /// Cluster label per input row, in `0..centroids.len()`.
    pub labels: Vec<usize>,
    /// Final centroids (means of their clusters).
    pub centroids: Vec<Vec<f64>>,
    /// Within-cluster sum of squared distances.
    pub inertia: f64,
    /// Lloyd iterations used by the winning restart.
    pub iterations: usize,
}

impl Kmeans {
    /// Create a new K-means clusterer.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            max_iter: 300,
            restarts: 10,
            init: KmeansInit::default(),
            seed: None,
        }
    }

    /// Set maximum iterations.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set the number of restarts.
    pub fn with_restarts(mut self, restarts: usize) -> Self {
        self.restarts = restarts;
        self
    }

    /// Set the seeding strategy.
    pub fn with_init(mut self, init: KmeansInit) -> Self {
        self.init = init;
        self
    }

    /// Set random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Requested number of clusters.
    pub fn k(&self) -> usize {
        self.k
    }

    pub(crate) fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.k == 0 {
            return Err(Error::InvalidParameter {
                name: "k",
                message: "must be at least 1",
            });
        }
        if self.max_iter == 0 {
            return Err(Error::InvalidParameter {
                name: "max_iter",
                message: "must be at least 1",
            });
        }
        if self.restarts == 0 {
            return Err(Error::InvalidParameter {
                name: "restarts",
                message: "must be at least 1",
            });
        }
        Ok(())
    }

    /// Fit and return labels, centroids and inertia of the best restart.
    pub fn fit(&self, data: &[Vec<f64>]) -> Result<KmeansFit> {
        self.validate()?;
        let d = util::common_dim(data)?;
        let n = data.len();
        if n == 0 {
            return Ok(KmeansFit {
                labels: Vec::new(),
                centroids: Vec::new(),
                inertia: 0.0,
                iterations: 0,
            });
        }

        let k = self.k.min(n);
        let base_seed = self.seed.unwrap_or_else(|| rand::rng().random());

        let run = |r: usize| {
            let mut rng = StdRng::seed_from_u64(base_seed.wrapping_add(r as u64));
            let fit = self.lloyd(data, k, d, &mut rng);
            trace!(
                restart = r,
                iterations = fit.iterations,
                inertia = fit.inertia,
                "k-means restart finished"
            );
            fit
        };

        let mut best = run(0);
        for r in 1..self.restarts {
            let fit = run(r);
            if fit.inertia < best.inertia {
                best = fit;
            }
        }
        debug!(n, d, k, inertia = best.inertia, "k-means fit");
        Ok(best)
    }

    /// One Lloyd run from a fresh seeding.
    fn lloyd(&self, data: &[Vec<f64>], k: usize, d: usize, rng: &mut StdRng) -> KmeansFit {
        let n = data.len();
        let mut centroids = self.init_centroids(data, k, rng);
        let mut labels = vec![usize::MAX; n];
        let mut iterations = 0;

        for iter in 0..self.max_iter {
            iterations = iter + 1;
            let previous = labels.clone();

            assign(data, &centroids, &mut labels);
            reseed_empty(data, &centroids, &mut labels, k);

            if labels == previous {
                break;
            }
            centroids = means(data, &labels, k, d);
        }

        let inertia = inertia(data, &centroids, &labels);
        KmeansFit {
            labels,
            centroids,
            inertia,
            iterations,
        }
    }

    fn init_centroids(&self, data: &[Vec<f64>], k: usize, rng: &mut StdRng) -> Vec<Vec<f64>> {
        let n = data.len();
        match self.init {
            KmeansInit::Random => rand::seq::index::sample(rng, n, k)
                .into_iter()
                .map(|i| data[i].clone())
                .collect(),
            KmeansInit::PlusPlus => {
                let mut centroids: Vec<Vec<f64>> = Vec::with_capacity(k);
                centroids.push(data[rng.random_range(0..n)].clone());

                // Squared distance from each point to its nearest chosen centroid.
                let mut min_dist: Vec<f64> = data
                    .iter()
                    .map(|p| util::squared_euclidean(p, &centroids[0]))
                    .collect();

                while centroids.len() < k {
                    let total: f64 = min_dist.iter().sum();
                    let selected = if total > 0.0 {
                        let target = rng.random::<f64>() * total;
                        let mut cumsum = 0.0;
                        let mut selected = n - 1;
                        for (j, &dj) in min_dist.iter().enumerate() {
                            cumsum += dj;
                            if dj > 0.0 && cumsum >= target {
                                selected = j;
                                break;
                            }
                        }
                        selected
                    } else {
                        rng.random_range(0..n)
                    };

                    let c = data[selected].clone();
                    for (m, p) in min_dist.iter_mut().zip(data) {
                        *m = m.min(util::squared_euclidean(p, &c));
                    }
                    centroids.push(c);
                }
                centroids
            }
        }
    }
}

impl Clustering for Kmeans {
    fn fit_predict(&self, data: &[Vec<f64>]) -> Result<Vec<usize>> {
        self.fit(data).map(|fit| fit.labels)
    }

    fn n_clusters(&self) -> usize {
        self.k
    }
}

/// Index and squared distance of the nearest centroid (lowest index on ties).
fn nearest(point: &[f64], centroids: &[Vec<f64>]) -> (usize, f64) {
    let mut best = (0, f64::INFINITY);
    for (c, centroid) in centroids.iter().enumerate() {
        let dist = util::squared_euclidean(point, centroid);
        if dist < best.1 {
            best = (c, dist);
        }
    }
    best
}

fn assign(data: &[Vec<f64>], centroids: &[Vec<f64>], labels: &mut [usize]) {
    #[cfg(feature = "parallel")]
    labels.par_iter_mut().enumerate().for_each(|(i, label)| {
        *label = nearest(&data[i], centroids).0;
    });

    #[cfg(not(feature = "parallel"))]
    for (i, label) in labels.iter_mut().enumerate() {
        *label = nearest(&data[i], centroids).0;
    }
}

/// Give every empty cluster one point, taken from a cluster with at least two.
///
/// Requires `k <= n`, which guarantees a donor cluster exists.
fn reseed_empty(data: &[Vec<f64>], centroids: &[Vec<f64>], labels: &mut [usize], k: usize) {
    let mut counts = vec![0usize; k];
    for &l in labels.iter() {
        counts[l] += 1;
    }
    if counts.iter().all(|&c| c > 0) {
        return;
    }

    let mut spread: Vec<f64> = data
        .iter()
        .zip(labels.iter())
        .map(|(p, &l)| util::squared_euclidean(p, &centroids[l]))
        .collect();

    for empty in 0..k {
        if counts[empty] > 0 {
            continue;
        }
        let donor = (0..data.len())
            .filter(|&i| counts[labels[i]] > 1)
            .max_by(|&a, &b| spread[a].total_cmp(&spread[b]).then(b.cmp(&a)));
        let Some(i) = donor else {
            break;
        };
        trace!(cluster = empty, point = i, "re-seeding empty k-means cluster");
        counts[labels[i]] -= 1;
        labels[i] = empty;
        counts[empty] = 1;
        spread[i] = f64::NEG_INFINITY;
    }
}

fn means(data: &[Vec<f64>], labels: &[usize], k: usize, d: usize) -> Vec<Vec<f64>> {
    let mut sums = vec![vec![0.0; d]; k];
    let mut counts = vec![0usize; k];
    for (p, &l) in data.iter().zip(labels) {
        for (s, x) in sums[l].iter_mut().zip(p) {
            *s += x;
        }
        counts[l] += 1;
    }
    for (s, &c) in sums.iter_mut().zip(&counts) {
        if c > 0 {
            s.iter_mut().for_each(|x| *x /= c as f64);
        }
    }
    sums
}

fn inertia(data: &[Vec<f64>], centroids: &[Vec<f64>], labels: &[usize]) -> f64 {
    data.iter()
        .zip(labels)
        .map(|(p, &l)| util::squared_euclidean(p, &centroids[l]))
        .sum()
}
