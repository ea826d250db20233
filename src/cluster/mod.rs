//! Clustering algorithms for feature vectors.
//!
//! Every algorithm produces a **hard partition**: each point lands in exactly
//! one cluster, no point is dropped, and no cluster is empty. Degenerate
//! inputs (identical points, fewer points than clusters, empty centroids) are
//! absorbed by fallback rules rather than reported as errors.
//!
//! ## Algorithms
//!
//! ### Threshold graph ("greedy")
//!
//! Single-linkage with a hard cutoff: connect every pair of points closer than
//! a squared-distance threshold and report connected components. Chains of
//! close points merge even when their endpoints are far apart.
//!
//! **When to use**: you know the scale at which two items count as "the same
//! group".
//!
//! ### K-means
//!
//! The classic algorithm: assign each point to the nearest centroid, then
//! update centroids to the mean of their points. Repeat.
//!
//! **Objective**: Minimize within-cluster sum of squares:
//!
//! ```text
//! J = Σ_k Σ_{x ∈ C_k} ||x - μ_k||²
//! ```
//!
//! **Assumptions**:
//! - Clusters are roughly spherical
//! - Clusters have similar sizes
//! - You know k in advance
//!
//! ### Spectral
//!
//! Embed points with the low-order eigenvectors of the normalized graph
//! Laplacian of an affinity graph, then run k-means in that embedding.
//! Finds non-convex clusters k-means misses, at O(n³) cost.
//!
//! ### Automatic
//!
//! No parameters: finds the largest jump in the minimum-spanning-tree edge
//! weights and cuts there with the threshold graph. Identical points collapse
//! into one cluster.
//!
//! ## Output Order
//!
//! [`Algorithm::cluster`] returns clusters sorted by descending size; equal
//! sizes are ordered by their smallest point id, so the output depends only
//! on the partition.
//!
//! ## Usage
//!
//! ```rust
//! use featclust::cluster::{Algorithm, Clustering, Kmeans, ThresholdGraph};
//!
//! let data = vec![
//!     vec![0.0, 0.0],
//!     vec![0.1, 0.1],
//!     vec![10.0, 10.0],
//!     vec![10.1, 10.1],
//! ];
//!
//! // Raw labels from a single strategy
//! let labels = Kmeans::new(2).with_seed(42).fit_predict(&data).unwrap();
//! assert_eq!(labels[0], labels[1]);  // First two together
//! assert_ne!(labels[0], labels[2]);  // Separate from last two
//!
//! let labels = ThresholdGraph::new(1.0).fit_predict(&data).unwrap();
//! assert_eq!(labels, vec![0, 0, 1, 1]);
//!
//! // Ordered clusters of arbitrary items
//! let clusters = Algorithm::automatic()
//!     .cluster_items(data, |row| row.clone())
//!     .unwrap();
//! assert_eq!(clusters.len(), 2);
//! ```

mod algorithm;
mod assemble;
mod automatic;
mod kmeans;
mod spectral;
mod threshold;
mod traits;
pub(crate) mod util;

pub use algorithm::Algorithm;
pub use assemble::{Cluster, ItemCluster};
pub use automatic::Automatic;
pub use kmeans::{Kmeans, KmeansFit, KmeansInit};
pub use spectral::{Affinity, Spectral};
pub use threshold::ThresholdGraph;
pub use traits::Clustering;
