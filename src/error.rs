use thiserror::Error;

/// Errors produced by the analysis core.
///
/// Absence of a key is not an error (lookups return `Option`);
/// only conditions the caller cannot recover by inspection are reported here.
#[derive(Debug, Error)]
pub enum SimilarityError {
    /// Bucket storage for a table grow could not be obtained.
    #[error("allocation failure: could not obtain {0} buckets")]
    Allocation(usize),

    /// The operation was handed input it cannot work with.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    /// Two dense vectors of different dimensionality were combined.
    #[error("vector length mismatch: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SimilarityError>;
