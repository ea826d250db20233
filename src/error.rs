use thiserror::Error;

/// Errors returned by point construction and clustering entry points.
///
/// Only caller misuse is reported. Numerically degenerate inputs (identical
/// points, empty centroids, fewer points than clusters) are absorbed by the
/// algorithms and still produce a complete partition.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// An operation that needs at least one point was given none.
    #[error("empty input")]
    EmptyInput,

    /// A feature vector disagrees with the factory's dimensionality.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Dimensionality fixed by the factory (or by the first point).
        expected: usize,
        /// Length of the rejected vector.
        found: usize,
    },

    /// The feature extractor returned vectors of different lengths.
    #[error("inconsistent dimensions: item {index} has {found} features, expected {expected}")]
    InconsistentDimensions {
        /// Position of the offending item in the input.
        index: usize,
        /// Length produced for the first item.
        expected: usize,
        /// Length produced for this item.
        found: usize,
    },

    /// Invalid parameter value.
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Human-readable explanation.
        message: &'static str,
    },
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;
