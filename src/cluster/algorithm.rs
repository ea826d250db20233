//! One entry point over every clustering strategy.

use super::assemble::{self, Cluster, ItemCluster};
use super::automatic::Automatic;
use super::kmeans::Kmeans;
use super::spectral::Spectral;
use super::threshold::ThresholdGraph;
use super::traits::Clustering;
use crate::error::Result;
use crate::features;
use crate::point::FeaturePoint;

/// A configured clustering strategy.
///
/// The constructors validate parameters up front; a configured strategy can
/// also be converted with `From` to keep its tuning.
///
/// ```rust
/// use featclust::{Algorithm, PointFactory};
///
/// let mut factory = PointFactory::new(1);
/// let points: Vec<_> = [0.0, 2.0, 4.0, 100.0, 102.0, 104.0]
///     .iter()
///     .map(|&x| factory.new_point([x]).unwrap())
///     .collect();
///
/// let clusters = Algorithm::greedy(1e9).unwrap().cluster(&points).unwrap();
/// assert_eq!(clusters.len(), 1);
///
/// let clusters = Algorithm::automatic().cluster(&points).unwrap();
/// assert_eq!(clusters.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Algorithm {
    /// Threshold-graph (single-linkage) clustering.
    Greedy(ThresholdGraph),
    /// Lloyd's k-means with restarts.
    KMeans(Kmeans),
    /// Spectral embedding followed by k-means.
    Spectral(Spectral),
    /// Parameter-free threshold derivation.
    Automatic(Automatic),
}

impl Algorithm {
    /// Parameter-free clustering.
    pub fn automatic() -> Self {
        Algorithm::Automatic(Automatic::new())
    }

    /// Threshold-graph clustering; `threshold` is a squared distance `>= 0`.
    pub fn greedy(threshold: f64) -> Result<Self> {
        let g = ThresholdGraph::new(threshold);
        g.validate()?;
        Ok(Algorithm::Greedy(g))
    }

    /// K-means with `k >= 1` clusters.
    pub fn kmeans(k: usize) -> Result<Self> {
        let km = Kmeans::new(k);
        km.validate()?;
        Ok(Algorithm::KMeans(km))
    }

    /// Spectral clustering with `k >= 1` clusters.
    pub fn spectral(k: usize) -> Result<Self> {
        let s = Spectral::new(k);
        s.validate()?;
        Ok(Algorithm::Spectral(s))
    }

    fn inner(&self) -> &dyn Clustering {
        match self {
            Algorithm::Greedy(a) => a,
            Algorithm::KMeans(a) => a,
            Algorithm::Spectral(a) => a,
            Algorithm::Automatic(a) => a,
        }
    }

    /// Cluster points, returning clusters by descending size.
    ///
    /// Equal-size clusters are ordered by their smallest point id.
    pub fn cluster(&self, points: &[FeaturePoint]) -> Result<Vec<Cluster>> {
        let rows: Vec<Vec<f64>> = points.iter().map(|p| p.features().to_vec()).collect();
        let labels = self.fit_predict(&rows)?;
        Ok(assemble::assemble_points(points, &labels))
    }

    /// Cluster arbitrary items through a feature extractor.
    ///
    /// Each cluster lists `(item, features)` in input order; clusters follow
    /// the same ordering as [`Algorithm::cluster`], with input position as
    /// the tie-breaking id.
    pub fn cluster_items<T, I, F>(&self, items: I, extractor: F) -> Result<Vec<ItemCluster<T>>>
    where
        I: IntoIterator<Item = T>,
        F: Fn(&T) -> Vec<f64>,
    {
        let extracted = features::extract(items, extractor)?;
        let rows = extracted.rows();
        let labels = self.fit_predict(&rows)?;
        Ok(assemble::assemble_items(extracted.items, rows, &labels))
    }
}

impl Default for Algorithm {
    fn default() -> Self {
        Algorithm::automatic()
    }
}

impl Clustering for Algorithm {
    fn fit_predict(&self, data: &[Vec<f64>]) -> Result<Vec<usize>> {
        self.inner().fit_predict(data)
    }

    fn n_clusters(&self) -> usize {
        self.inner().n_clusters()
    }
}

impl From<ThresholdGraph> for Algorithm {
    fn from(a: ThresholdGraph) -> Self {
        Algorithm::Greedy(a)
    }
}

impl From<Kmeans> for Algorithm {
    fn from(a: Kmeans) -> Self {
        Algorithm::KMeans(a)
    }
}

impl From<Spectral> for Algorithm {
    fn from(a: Spectral) -> Self {
        Algorithm::Spectral(a)
    }
}

impl From<Automatic> for Algorithm {
    fn from(a: Automatic) -> Self {
        Algorithm::Automatic(a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::point::PointFactory;
    use std::collections::HashSet;

    fn two_groups(factory: &mut PointFactory) -> (Vec<FeaturePoint>, Vec<FeaturePoint>) {
        let a = (0..5)
            .map(|y| factory.new_point([1.0, y as f64]).unwrap())
            .collect();
        let b = (-4..=0)
            .map(|y| factory.new_point([9.0, y as f64]).unwrap())
            .collect();
        (a, b)
    }

    fn as_sets(clusters: &[Cluster]) -> Vec<HashSet<FeaturePoint>> {
        clusters
            .iter()
            .map(|c| c.iter().cloned().collect())
            .collect()
    }

    #[test]
    fn test_greedy_and_kmeans_recover_two_groups() {
        let mut factory = PointFactory::new(2);
        let (a, b) = two_groups(&mut factory);
        let points: Vec<_> = a.iter().chain(&b).cloned().collect();
        let expected: Vec<HashSet<FeaturePoint>> = vec![
            a.iter().cloned().collect(),
            b.iter().cloned().collect(),
        ];

        for algo in [
            Algorithm::greedy(18.0).unwrap(),
            Algorithm::kmeans(2).unwrap(),
            Algorithm::automatic(),
        ] {
            let clusters = algo.cluster(&points).unwrap();
            assert_eq!(as_sets(&clusters), expected, "{algo:?}");
        }
    }

    #[test]
    fn test_ties_broken_by_min_id_not_input_order() {
        let mut factory = PointFactory::new(2);
        let (a, b) = two_groups(&mut factory);
        // Second group first in the input.
        let points: Vec<_> = b.iter().chain(&a).cloned().collect();
        let clusters = Algorithm::greedy(18.0).unwrap().cluster(&points).unwrap();
        assert_eq!(clusters[0].min_id(), Some(a[0].id()));
        assert_eq!(clusters[0].points(), a.as_slice());
    }

    #[test]
    fn test_cluster_echoes_caller_instances() {
        let mut factory = PointFactory::new(1);
        let points: Vec<_> = (0..4)
            .map(|i| factory.new_point([i as f64 * 10.0]).unwrap())
            .collect();
        let clusters = Algorithm::greedy(0.0).unwrap().cluster(&points).unwrap();
        assert_eq!(clusters.len(), 4);
        for (c, p) in clusters.iter().zip(&points) {
            assert_eq!(c.points(), std::slice::from_ref(p));
            assert_eq!(c.points()[0].features(), p.features());
        }
    }

    #[test]
    fn test_cluster_items_generic() {
        let words = vec!["apple", "kiwi", "fig", "banana", "cherry", "plum"];
        let clusters = Algorithm::greedy(0.5)
            .unwrap()
            .cluster_items(words, |w| vec![w.len() as f64])
            .unwrap();

        let names: Vec<Vec<&str>> = clusters
            .iter()
            .map(|c| c.iter().map(|(w, _)| *w).collect())
            .collect();
        assert_eq!(
            names,
            vec![
                vec!["kiwi", "plum"],
                vec!["banana", "cherry"],
                vec!["apple"],
                vec!["fig"],
            ]
        );
        assert_eq!(clusters[0][0].1, vec![4.0]);
    }

    #[test]
    fn test_cluster_items_inconsistent_dimensions() {
        let err = Algorithm::automatic()
            .cluster_items(vec![1, 2], |&i| vec![0.0; i])
            .unwrap_err();
        assert!(matches!(err, Error::InconsistentDimensions { index: 1, .. }));
    }

    #[test]
    fn test_constructors_validate() {
        assert!(Algorithm::greedy(-0.1).is_err());
        assert!(Algorithm::greedy(f64::NAN).is_err());
        assert!(Algorithm::greedy(0.0).is_ok());
        assert!(Algorithm::kmeans(0).is_err());
        assert!(Algorithm::spectral(0).is_err());
        assert!(Algorithm::spectral(1).is_ok());
    }

    #[test]
    fn test_cluster_rejects_mixed_dimensions() {
        let mut f2 = PointFactory::new(2);
        let mut f3 = PointFactory::new(3);
        let points = vec![
            f2.new_point([0.0, 0.0]).unwrap(),
            f3.new_point([0.0, 0.0, 0.0]).unwrap(),
        ];
        let err = Algorithm::automatic().cluster(&points).unwrap_err();
        assert!(matches!(err, Error::DimensionMismatch { .. }));
    }

    #[test]
    fn test_n_clusters_delegates() {
        assert_eq!(Algorithm::kmeans(4).unwrap().n_clusters(), 4);
        assert_eq!(Algorithm::automatic().n_clusters(), 0);
        assert_eq!(Algorithm::from(Spectral::new(3)).n_clusters(), 3);
    }

    #[test]
    fn test_empty_points() {
        for algo in [
            Algorithm::automatic(),
            Algorithm::greedy(1.0).unwrap(),
            Algorithm::kmeans(2).unwrap(),
            Algorithm::spectral(2).unwrap(),
        ] {
            assert!(algo.cluster(&[]).unwrap().is_empty());
        }
    }
}
