//! Feature extraction for arbitrary item types.
//!
//! Items do not implement any clustering trait. A caller-supplied extractor
//! maps each item to a feature vector; the items themselves are held
//! alongside their points so results can hand them back.

use crate::error::{Error, Result};
use crate::point::{FeaturePoint, PointFactory};

/// Items paired positionally with the points extracted from them.
#[derive(Debug, Clone)]
pub struct Extracted<T> {
    /// Input items, in input order.
    pub items: Vec<T>,
    /// One point per item; ids follow input order.
    pub points: Vec<FeaturePoint>,
}

impl<T> Extracted<T> {
    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when no items were supplied.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Feature rows, in input order.
    pub fn rows(&self) -> Vec<Vec<f64>> {
        self.points.iter().map(|p| p.features().to_vec()).collect()
    }
}

/// Run `extractor` over every item.
///
/// Fails with [`Error::InconsistentDimensions`] when an item's vector length
/// differs from the first item's.
pub fn extract<T, I, F>(items: I, extractor: F) -> Result<Extracted<T>>
where
    I: IntoIterator<Item = T>,
    F: Fn(&T) -> Vec<f64>,
{
    let items: Vec<T> = items.into_iter().collect();
    let mut factory = PointFactory::unbound();
    let mut points = Vec::with_capacity(items.len());

    for (index, item) in items.iter().enumerate() {
        let point = factory.new_point(extractor(item)).map_err(|e| match e {
            Error::DimensionMismatch { expected, found } => Error::InconsistentDimensions {
                index,
                expected,
                found,
            },
            other => other,
        })?;
        points.push(point);
    }

    Ok(Extracted { items, points })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct City {
        name: &'static str,
        lat: f64,
        lon: f64,
    }

    #[test]
    fn test_extract_preserves_items_and_order() {
        let cities = vec![
            City {
                name: "a",
                lat: 1.0,
                lon: 2.0,
            },
            City {
                name: "b",
                lat: 3.0,
                lon: 4.0,
            },
        ];
        let ex = extract(cities, |c| vec![c.lat, c.lon]).unwrap();
        assert_eq!(ex.len(), 2);
        assert_eq!(ex.items[1].name, "b");
        assert_eq!(ex.rows(), vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        assert!(ex.points[0].id() < ex.points[1].id());
    }

    #[test]
    fn test_extract_inconsistent_dimensions() {
        let items = vec![1usize, 2, 3];
        let err = extract(items, |&n| vec![0.0; if n == 3 { 1 } else { 2 }]).unwrap_err();
        assert_eq!(
            err,
            Error::InconsistentDimensions {
                index: 2,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_extract_empty() {
        let ex = extract(Vec::<String>::new(), |s| vec![s.len() as f64]).unwrap();
        assert!(ex.is_empty());
    }
}
