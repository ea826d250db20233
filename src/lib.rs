//! Feature-vector clustering.
//!
//! `featclust` partitions items into clusters from numeric feature vectors.
//!
//! - [`FeaturePoint`] / [`PointFactory`]: identity-bearing vectors; equality is by id
//! - [`Algorithm`]: threshold graph, k-means, spectral, or automatic, behind one
//!   `cluster` call
//! - [`Algorithm::cluster_items`]: cluster any item type through an extractor
//!
//! ```rust
//! use featclust::{Algorithm, PointFactory};
//!
//! let mut factory = PointFactory::new(2);
//! let mut points = Vec::new();
//! for y in 0..5 {
//!     points.push(factory.new_point([1.0, y as f64]).unwrap());
//! }
//! for y in -4..=0 {
//!     points.push(factory.new_point([9.0, y as f64]).unwrap());
//! }
//!
//! let clusters = Algorithm::kmeans(2).unwrap().cluster(&points).unwrap();
//! assert_eq!(clusters.len(), 2);
//! assert!(clusters[0].contains(&points[0]));
//! assert!(clusters[1].contains(&points[9]));
//! ```

#![forbid(unsafe_code)]

pub mod cluster;
pub mod error;
pub mod features;
pub mod point;

pub use cluster::{
    Affinity, Algorithm, Automatic, Cluster, Clustering, ItemCluster, Kmeans, KmeansFit,
    KmeansInit, Spectral, ThresholdGraph,
};
pub use error::{Error, Result};
pub use features::{extract, Extracted};
pub use point::{mean, FeaturePoint, PointFactory, PointId};

#[doc = include_str!("../README.md")]
#[cfg(doctest)]
pub struct ReadmeDoctests;
