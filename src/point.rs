//! Identity-bearing feature vectors.
//!
//! A [`FeaturePoint`] pairs an immutable coordinate buffer with a [`PointId`].
//! Equality and hashing look only at the id, so two points with the same
//! coordinates are still distinct items, and a clustering result hands back the
//! very instances the caller supplied.
//!
//! Points are created through a [`PointFactory`], which fixes the
//! dimensionality (up front, or lazily from the first point). Ids increase
//! with creation order, which is what breaks ties between equal-size clusters.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::cluster::util;
use crate::error::{Error, Result};

/// First id of the range reserved for synthetic points (centroids).
const SYNTHETIC_BASE: u64 = 1 << 63;

// Ids are process-wide so points from different factories never compare equal.
static NEXT_ID: AtomicU64 = AtomicU64::new(0);
static NEXT_SYNTHETIC: AtomicU64 = AtomicU64::new(SYNTHETIC_BASE);

/// Opaque, stable point identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PointId(u64);

impl PointId {
    /// Raw numeric value.
    pub fn get(self) -> u64 {
        self.0
    }

    /// True for ids minted by [`mean`] rather than by a factory.
    pub fn is_synthetic(self) -> bool {
        self.0 >= SYNTHETIC_BASE
    }

    fn next() -> Self {
        PointId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    fn synthetic() -> Self {
        PointId(NEXT_SYNTHETIC.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_synthetic() {
            write!(f, "~{}", self.0 - SYNTHETIC_BASE)
        } else {
            write!(f, "#{}", self.0)
        }
    }
}

/// A fixed-length feature vector with an identity.
///
/// Cloning is cheap: the coordinates live behind an `Arc`.
#[derive(Clone)]
pub struct FeaturePoint {
    id: PointId,
    features: Arc<[f64]>,
}

impl FeaturePoint {
    /// The point's identifier.
    pub fn id(&self) -> PointId {
        self.id
    }

    /// The feature vector.
    pub fn features(&self) -> &[f64] {
        &self.features
    }

    /// Dimensionality of the feature vector.
    pub fn dim(&self) -> usize {
        self.features.len()
    }

    /// Squared Euclidean distance to another point.
    pub fn squared_distance(&self, other: &FeaturePoint) -> f64 {
        util::squared_euclidean(&self.features, &other.features)
    }
}

impl PartialEq for FeaturePoint {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for FeaturePoint {}

impl Hash for FeaturePoint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for FeaturePoint {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FeaturePoint {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.id.cmp(&other.id)
    }
}

impl fmt::Debug for FeaturePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:?}", self.id, &*self.features)
    }
}

/// Creates [`FeaturePoint`]s of a single dimensionality.
///
/// Ids increase with creation order, across all factories in the process.
#[derive(Debug, Clone, Default)]
pub struct PointFactory {
    dim: Option<usize>,
}

impl PointFactory {
    /// Factory with a fixed dimensionality.
    pub fn new(dim: usize) -> Self {
        Self { dim: Some(dim) }
    }

    /// Factory whose dimensionality is taken from the first point it creates.
    pub fn unbound() -> Self {
        Self::default()
    }

    /// Current dimensionality, `None` while still unbound.
    pub fn dim(&self) -> Option<usize> {
        self.dim
    }

    /// Create a point from owned coordinates.
    pub fn new_point(&mut self, features: impl Into<Vec<f64>>) -> Result<FeaturePoint> {
        let features: Vec<f64> = features.into();
        self.validate(&features)?;
        Ok(self.issue(features.into()))
    }

    /// Create a point by copying a coordinate slice.
    pub fn from_slice(&mut self, features: &[f64]) -> Result<FeaturePoint> {
        self.validate(features)?;
        Ok(self.issue(features.into()))
    }

    fn validate(&mut self, features: &[f64]) -> Result<()> {
        match self.dim {
            Some(expected) if expected != features.len() => {
                return Err(Error::DimensionMismatch {
                    expected,
                    found: features.len(),
                });
            }
            Some(_) => {}
            None => {
                if features.is_empty() {
                    return Err(Error::InvalidParameter {
                        name: "features",
                        message: "must have at least one coordinate",
                    });
                }
            }
        }
        if features.iter().any(|x| !x.is_finite()) {
            return Err(Error::InvalidParameter {
                name: "features",
                message: "must be finite",
            });
        }
        self.dim.get_or_insert(features.len());
        Ok(())
    }

    fn issue(&self, features: Arc<[f64]>) -> FeaturePoint {
        FeaturePoint {
            id: PointId::next(),
            features,
        }
    }
}

/// Coordinate-wise arithmetic mean of a set of points.
///
/// The result carries a synthetic id and is never part of any cluster.
pub fn mean<'a, I>(points: I) -> Result<FeaturePoint>
where
    I: IntoIterator<Item = &'a FeaturePoint>,
{
    let mut iter = points.into_iter();
    let first = iter.next().ok_or(Error::EmptyInput)?;
    let mut sum = first.features().to_vec();
    let mut count = 1usize;
    for p in iter {
        if p.dim() != sum.len() {
            return Err(Error::DimensionMismatch {
                expected: sum.len(),
                found: p.dim(),
            });
        }
        for (s, x) in sum.iter_mut().zip(p.features()) {
            *s += x;
        }
        count += 1;
    }
    sum.iter_mut().for_each(|s| *s /= count as f64);
    Ok(FeaturePoint {
        id: PointId::synthetic(),
        features: sum.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_follow_creation_order() {
        let mut factory = PointFactory::new(2);
        let a = factory.new_point([1.0, 2.0]).unwrap();
        let b = factory.new_point(vec![3.0, 4.0]).unwrap();
        assert!(a.id() < b.id());
        assert_eq!(b.features(), &[3.0, 4.0]);
    }

    #[test]
    fn test_equality_is_by_id() {
        let mut factory = PointFactory::new(1);
        let a = factory.new_point([5.0]).unwrap();
        let b = factory.new_point([5.0]).unwrap();
        assert_ne!(a, b);
        assert_eq!(a, a.clone());

        let set: HashSet<_> = [a.clone(), b, a].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_fixed_dimension_rejects_mismatch() {
        let mut factory = PointFactory::new(3);
        let err = factory.new_point([1.0, 2.0]).unwrap_err();
        assert_eq!(
            err,
            Error::DimensionMismatch {
                expected: 3,
                found: 2
            }
        );
    }

    #[test]
    fn test_unbound_infers_from_first_point() {
        let mut factory = PointFactory::unbound();
        assert_eq!(factory.dim(), None);
        factory.from_slice(&[0.0, 0.0, 0.0, 0.0]).unwrap();
        assert_eq!(factory.dim(), Some(4));
        assert!(factory.from_slice(&[0.0]).is_err());
    }

    #[test]
    fn test_rejected_point_does_not_bind_dimension() {
        let mut factory = PointFactory::unbound();
        assert!(factory.new_point([f64::NAN, 1.0]).is_err());
        assert_eq!(factory.dim(), None);
        assert!(factory.new_point([1.0]).is_ok());
    }

    #[test]
    fn test_non_finite_rejected() {
        let mut factory = PointFactory::new(2);
        assert!(factory.new_point([f64::INFINITY, 0.0]).is_err());
    }

    #[test]
    fn test_mean() {
        let mut factory = PointFactory::new(2);
        let pts = vec![
            factory.new_point([0.0, 0.0]).unwrap(),
            factory.new_point([2.0, 4.0]).unwrap(),
            factory.new_point([4.0, 2.0]).unwrap(),
        ];
        let c = mean(&pts).unwrap();
        assert_eq!(c.features(), &[2.0, 2.0]);
        assert!(c.id().is_synthetic());
        assert!(!pts.contains(&c));
    }

    #[test]
    fn test_mean_empty() {
        let pts: Vec<FeaturePoint> = Vec::new();
        assert_eq!(mean(&pts).unwrap_err(), Error::EmptyInput);
    }

    #[test]
    fn test_synthetic_ids_are_distinct() {
        let mut factory = PointFactory::new(1);
        let pts = vec![factory.new_point([1.0]).unwrap()];
        let a = mean(&pts).unwrap();
        let b = mean(&pts).unwrap();
        assert_ne!(a, b);
    }
}
