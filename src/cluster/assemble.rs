//! Turning raw labels into the public, ordered result.
//!
//! Every algorithm reports a label per row. Assembly groups rows by label,
//! drops empty groups, orders members by id and orders clusters by
//! descending size with the smallest member id breaking ties. The order is a
//! function of the partition alone, never of label values.

use std::collections::BTreeMap;

use crate::error::Result;
use crate::point::{self, FeaturePoint, PointId};

/// A cluster of the generic entry point: items paired with their features,
/// in input order.
pub type ItemCluster<T> = Vec<(T, Vec<f64>)>;

/// A non-empty set of points, kept sorted by id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cluster {
    points: Vec<FeaturePoint>,
}

impl Cluster {
    /// Number of member points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false for clusters produced by this crate.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Member points in id order.
    pub fn points(&self) -> &[FeaturePoint] {
        &self.points
    }

    /// Iterate member points in id order.
    pub fn iter(&self) -> std::slice::Iter<'_, FeaturePoint> {
        self.points.iter()
    }

    /// Member ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = PointId> + '_ {
        self.points.iter().map(FeaturePoint::id)
    }

    /// Smallest member id.
    pub fn min_id(&self) -> Option<PointId> {
        self.points.first().map(FeaturePoint::id)
    }

    /// Membership test by id.
    pub fn contains(&self, point: &FeaturePoint) -> bool {
        self.points
            .binary_search_by(|p| p.id().cmp(&point.id()))
            .is_ok()
    }

    /// Coordinate-wise mean of the members.
    pub fn centroid(&self) -> Result<FeaturePoint> {
        point::mean(&self.points)
    }

    /// Consume the cluster, returning its points in id order.
    pub fn into_points(self) -> Vec<FeaturePoint> {
        self.points
    }
}

impl<'a> IntoIterator for &'a Cluster {
    type Item = &'a FeaturePoint;
    type IntoIter = std::slice::Iter<'a, FeaturePoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// Group row indices by label.
fn groups_from_labels(labels: &[usize]) -> Vec<Vec<usize>> {
    let mut by_label: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (i, &l) in labels.iter().enumerate() {
        by_label.entry(l).or_default().push(i);
    }
    by_label.into_values().collect()
}

/// Sort members by `key`, then clusters by (size desc, min key asc).
fn order_groups<K: Ord + Copy>(groups: Vec<Vec<usize>>, key: impl Fn(usize) -> K) -> Vec<Vec<usize>> {
    let mut groups: Vec<Vec<usize>> = groups.into_iter().filter(|g| !g.is_empty()).collect();
    for g in &mut groups {
        g.sort_by_key(|&i| key(i));
    }
    groups.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| key(a[0]).cmp(&key(b[0]))));
    groups
}

/// Ordered row-index partition for `labels`, ties broken by row index.
pub(crate) fn ordered_partition(labels: &[usize]) -> Vec<Vec<usize>> {
    order_groups(groups_from_labels(labels), |i| i)
}

/// Map labels over `points` back to point clusters.
pub(crate) fn assemble_points(points: &[FeaturePoint], labels: &[usize]) -> Vec<Cluster> {
    debug_assert_eq!(points.len(), labels.len());
    order_groups(groups_from_labels(labels), |i| points[i].id())
        .into_iter()
        .map(|g| Cluster {
            points: g.into_iter().map(|i| points[i].clone()).collect(),
        })
        .collect()
}

/// Map labels over items back to `(item, features)` groups.
///
/// Items are identified by their position, which is also their creation order.
pub(crate) fn assemble_items<T>(
    items: Vec<T>,
    features: Vec<Vec<f64>>,
    labels: &[usize],
) -> Vec<ItemCluster<T>> {
    debug_assert_eq!(items.len(), labels.len());
    let mut slots: Vec<Option<(T, Vec<f64>)>> = items.into_iter().zip(features).map(Some).collect();
    ordered_partition(labels)
        .into_iter()
        .map(|g| g.into_iter().filter_map(|i| slots[i].take()).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::PointFactory;

    #[test]
    fn test_ordered_partition_size_then_min_index() {
        let labels = vec![7, 3, 3, 9, 7, 5];
        let groups = ordered_partition(&labels);
        assert_eq!(groups, vec![vec![0, 4], vec![1, 2], vec![3], vec![5]]);
    }

    #[test]
    fn test_ordering_ignores_label_values() {
        let a = ordered_partition(&[0, 0, 1, 1, 1]);
        let b = ordered_partition(&[4, 4, 2, 2, 2]);
        assert_eq!(a, b);
        assert_eq!(a, vec![vec![2, 3, 4], vec![0, 1]]);
    }

    #[test]
    fn test_assemble_points_uses_point_ids() {
        let mut factory = PointFactory::new(1);
        let p: Vec<_> = (0..4).map(|i| factory.new_point([i as f64]).unwrap()).collect();
        // Supply points out of creation order.
        let shuffled = vec![p[3].clone(), p[1].clone(), p[2].clone(), p[0].clone()];
        let clusters = assemble_points(&shuffled, &[0, 1, 0, 1]);

        assert_eq!(clusters.len(), 2);
        // Both have size 2; the one containing p[0] comes first.
        assert_eq!(clusters[0].points(), &[p[0].clone(), p[1].clone()]);
        assert_eq!(clusters[1].points(), &[p[2].clone(), p[3].clone()]);
        assert!(clusters[1].contains(&p[3]));
        assert!(!clusters[1].contains(&p[0]));
    }

    #[test]
    fn test_assemble_items_keeps_items() {
        let items = vec!["a", "b", "c"];
        let feats = vec![vec![0.0], vec![9.0], vec![0.5]];
        let out = assemble_items(items, feats, &[1, 0, 1]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0], vec![("a", vec![0.0]), ("c", vec![0.5])]);
        assert_eq!(out[1], vec![("b", vec![9.0])]);
    }

    #[test]
    fn test_cluster_centroid() {
        let mut factory = PointFactory::new(2);
        let pts = vec![
            factory.new_point([0.0, 0.0]).unwrap(),
            factory.new_point([2.0, 2.0]).unwrap(),
        ];
        let clusters = assemble_points(&pts, &[0, 0]);
        let c = clusters[0].centroid().unwrap();
        assert_eq!(c.features(), &[1.0, 1.0]);
    }
}
