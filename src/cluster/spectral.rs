//! Spectral clustering via graph Laplacian eigenvectors.
//!
//! # Algorithm
//!
//! ```text
//! 1. Compute affinity matrix A (Gaussian, locally scaled Gaussian, or kNN)
//! 2. Compute normalized Laplacian L_sym = I - D^{-1/2} A D^{-1/2}
//! 3. Find the k eigenvectors of L_sym with the smallest eigenvalues
//! 4. Form U ∈ R^{n×k} from those eigenvectors as columns
//! 5. Normalize rows of U to unit length
//! 6. Run k-means on rows of U
//! ```
//!
//! The smallest eigenvectors of `L_sym` are the largest of
//! `D^{-1/2} A D^{-1/2}`, which is what gets decomposed. Following
//! Ng–Jordan–Weiss, the first (trivial) eigenvector is kept; row normalization
//! removes its degree scaling.
//!
//! The affinity includes self-loops (`A_ii = 1`), so every degree is at least
//! one and `D^{-1/2}` is always defined, even for isolated points.
//!
//! # Degenerate Cases
//!
//! - `n < k`: no embedding is computed; every point becomes its own cluster.
//! - All points identical, a zero-variance embedding, or an eigen-solver that
//!   fails to converge: everything coalesces into a single cluster.
//!
//! # Trade-offs
//!
//! | Aspect | Spectral | K-means |
//! |--------|----------|---------|
//! | Shape | Any | Convex |
//! | Complexity | O(n³) eigendecomp | O(nkd × iter) |
//! | Memory | O(n²) affinity | O(nd) |
//!
//! # References
//!
//! - Ng, Jordan, Weiss (2001). "On Spectral Clustering"
//! - Zelnik-Manor, Perona (2004). "Self-Tuning Spectral Clustering"
//! - von Luxburg (2007). "A Tutorial on Spectral Clustering"

use nalgebra::{DMatrix, SymmetricEigen};
use tracing::debug;

use super::kmeans::Kmeans;
use super::traits::Clustering;
use super::util;
use crate::error::{Error, Result};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Sweep cap handed to the symmetric eigen-solver.
const EIGEN_MAX_ITER: usize = 10_000;

/// How the affinity (similarity) graph is built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Affinity {
    /// Gaussian (RBF) kernel: `exp(-||x-y||² / 2σ²)`.
    Gaussian {
        /// Kernel bandwidth.
        sigma: f64,
    },
    /// Self-tuning Gaussian: `exp(-||x-y||² / (σ_x σ_y))` where `σ_x` is the
    /// distance from `x` to its `neighbors`-th nearest neighbor.
    LocalScaling {
        /// Neighbor rank defining each point's local scale.
        neighbors: usize,
    },
    /// Symmetric k-nearest-neighbor graph with unit weights.
    Knn {
        /// Neighbors per point.
        neighbors: usize,
    },
}

impl Default for Affinity {
    fn default() -> Self {
        Affinity::LocalScaling { neighbors: 7 }
    }
}

/// Spectral clustering configuration and runner.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectral {
    /// Number of clusters.
    k: usize,
    /// Affinity graph construction.
    affinity: Affinity,
    /// K-means settings for the embedded points.
    kmeans: Kmeans,
    /// Relative tolerance for treating points as identical.
    tolerance: f64,
}

impl Spectral {
    /// Create new spectral clustering with k clusters.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            affinity: Affinity::default(),
            kmeans: Kmeans::new(k),
            tolerance: 1e-12,
        }
    }

    /// Set affinity type.
    pub fn with_affinity(mut self, affinity: Affinity) -> Self {
        self.affinity = affinity;
        self
    }

    /// K-means settings for the embedding. Its `k` is replaced by this
    /// clusterer's `k`.
    pub fn with_kmeans(mut self, kmeans: Kmeans) -> Self {
        self.kmeans = kmeans;
        self
    }

    /// Seed the embedded k-means run.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.kmeans = self.kmeans.with_seed(seed);
        self
    }

    /// Requested number of clusters.
    pub fn k(&self) -> usize {
        self.k
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.k == 0 {
            return Err(Error::InvalidParameter {
                name: "k",
                message: "must be at least 1",
            });
        }
        match self.affinity {
            Affinity::Gaussian { sigma } if !(sigma.is_finite() && sigma > 0.0) => {
                return Err(Error::InvalidParameter {
                    name: "sigma",
                    message: "must be positive and finite",
                });
            }
            Affinity::LocalScaling { neighbors: 0 } | Affinity::Knn { neighbors: 0 } => {
                return Err(Error::InvalidParameter {
                    name: "neighbors",
                    message: "must be at least 1",
                });
            }
            _ => {}
        }
        self.kmeans.clone().with_k(self.k).validate()
    }

    /// Build the symmetric affinity matrix.
    fn affinity_matrix(&self, data: &[Vec<f64>]) -> DMatrix<f64> {
        let n = data.len();
        let dist = pairwise_squared(data);

        match self.affinity {
            Affinity::Gaussian { sigma } => {
                let denom = 2.0 * sigma * sigma;
                DMatrix::from_fn(n, n, |i, j| (-dist[i * n + j] / denom).exp())
            }
            Affinity::LocalScaling { neighbors } => {
                let rank = neighbors.min(n - 1).max(1);
                let scale: Vec<f64> = (0..n)
                    .map(|i| kth_neighbor_squared(&dist[i * n..(i + 1) * n], i, rank).sqrt())
                    .collect();
                DMatrix::from_fn(n, n, |i, j| {
                    let d = dist[i * n + j];
                    let s = scale[i] * scale[j];
                    if s > 0.0 {
                        (-d / s).exp()
                    } else if d == 0.0 {
                        1.0
                    } else {
                        0.0
                    }
                })
            }
            Affinity::Knn { neighbors } => {
                let m = neighbors.min(n - 1);
                let mut a = DMatrix::identity(n, n);
                for i in 0..n {
                    let row = &dist[i * n..(i + 1) * n];
                    let mut order: Vec<usize> = (0..n).filter(|&j| j != i).collect();
                    order.sort_by(|&x, &y| row[x].total_cmp(&row[y]).then(x.cmp(&y)));
                    for &j in order.iter().take(m) {
                        a[(i, j)] = 1.0;
                        a[(j, i)] = 1.0;
                    }
                }
                a
            }
        }
    }
}

impl Spectral {
    /// Row-normalized spectral embedding, `None` when the solver fails or
    /// produces non-finite values.
    fn embed(&self, affinity: DMatrix<f64>, k: usize) -> Option<Vec<Vec<f64>>> {
        let n = affinity.nrows();
        let inv_sqrt_deg: Vec<f64> = affinity
            .row_iter()
            .map(|row| 1.0 / row.sum().sqrt())
            .collect();

        let normalized =
            DMatrix::from_fn(n, n, |i, j| inv_sqrt_deg[i] * affinity[(i, j)] * inv_sqrt_deg[j]);

        let eigen = SymmetricEigen::try_new(normalized, f64::EPSILON, EIGEN_MAX_ITER)?;

        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| eigen.eigenvalues[b].total_cmp(&eigen.eigenvalues[a]));

        let mut rows: Vec<Vec<f64>> = (0..n)
            .map(|i| order[..k].iter().map(|&c| eigen.eigenvectors[(i, c)]).collect())
            .collect();

        for row in &mut rows {
            let norm = row.iter().map(|x| x * x).sum::<f64>().sqrt();
            if norm > 0.0 {
                row.iter_mut().for_each(|x| *x /= norm);
            }
        }

        rows.iter()
            .all(|row| row.iter().all(|x| x.is_finite()))
            .then_some(rows)
    }
}

impl Clustering for Spectral {
    fn fit_predict(&self, data: &[Vec<f64>]) -> Result<Vec<usize>> {
        self.validate()?;
        let d = util::common_dim(data)?;
        let n = data.len();
        let k = self.k;
        if n == 0 {
            return Ok(Vec::new());
        }

        if n < k {
            debug!(n, k, "spectral: fewer points than clusters, returning singletons");
            return Ok((0..n).collect());
        }

        if util::is_degenerate(data, self.tolerance) {
            debug!(n, d, "spectral: zero-variance input, coalescing");
            return Ok(vec![0; n]);
        }

        let affinity = self.affinity_matrix(data);
        let Some(embedding) = self.embed(affinity, k) else {
            debug!(n, k, "spectral: eigen-decomposition failed, coalescing");
            return Ok(vec![0; n]);
        };

        if util::is_degenerate(&embedding, self.tolerance) {
            debug!(n, k, "spectral: zero-variance embedding, coalescing");
            return Ok(vec![0; n]);
        }

        let labels = self.kmeans.clone().with_k(k).fit_predict(&embedding)?;
        debug!(n, d, k, "spectral clustered");
        Ok(labels)
    }

    fn n_clusters(&self) -> usize {
        self.k
    }
}

/// Dense row-major matrix of squared distances.
fn pairwise_squared(data: &[Vec<f64>]) -> Vec<f64> {
    let n = data.len();
    let row = |i: usize| -> Vec<f64> {
        data.iter()
            .map(|other| util::squared_euclidean(&data[i], other))
            .collect()
    };

    #[cfg(feature = "parallel")]
    let rows: Vec<Vec<f64>> = (0..n).into_par_iter().map(row).collect();

    #[cfg(not(feature = "parallel"))]
    let rows: Vec<Vec<f64>> = (0..n).map(row).collect();

    rows.concat()
}

/// Squared distance from point `i` to its `rank`-th nearest other point.
fn kth_neighbor_squared(row: &[f64], i: usize, rank: usize) -> f64 {
    let mut others: Vec<f64> = row
        .iter()
        .enumerate()
        .filter(|&(j, _)| j != i)
        .map(|(_, &d)| d)
        .collect();
    others.sort_by(f64::total_cmp);
    others[rank - 1]
}
