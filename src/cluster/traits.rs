use crate::error::Result;

/// Common interface for hard clustering algorithms (one label per point).
///
/// Labels are only meaningful as a partition: two rows share a cluster iff
/// they share a label. Use [`crate::Algorithm::cluster`] to get ordered
/// clusters back instead of raw labels.
pub trait Clustering {
    /// Fit the model and return one cluster label per input row.
    ///
    /// Empty input yields an empty label vector.
    fn fit_predict(&self, data: &[Vec<f64>]) -> Result<Vec<usize>>;

    /// The configured number of clusters (if applicable).
    ///
    /// For algorithms that discover the number of clusters from the data
    /// (threshold graph, automatic), this returns 0.
    fn n_clusters(&self) -> usize;
}
