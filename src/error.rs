//! Error types for fuzzycluster.

use serde::Serialize;
use thiserror::Error;

/// Top-level error type for clustering operations.
#[derive(Debug, Error)]
pub enum ClusterError {
    /// Parameters that can never produce a valid fit.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Input data that violates the feature matrix contract.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("dimension mismatch: expected {expected} features, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    /// A transform or prediction was requested before `fit`.
    #[error("{0} not fitted, call fit() first")]
    NotFitted(&'static str),

    /// I/O error wrapper.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serde serialization/deserialization error.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Result type for clustering operations.
pub type Result<T> = std::result::Result<T, ClusterError>;

/// Statistically valid but uninteresting input, handled by a numeric fallback
/// instead of an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Degeneracy {
    /// Column has zero variance; its standard deviation was replaced by 1.
    ZeroVariance { column: usize },
    /// Fewer than two principal axes carry variance.
    RankDeficient { informative_axes: usize },
    /// Entity has no membership above the characterization threshold.
    NoMajorityMembership { entity: usize },
}

impl std::fmt::Display for Degeneracy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Degeneracy::ZeroVariance { column } => {
                write!(f, "column {} has zero variance", column)
            }
            Degeneracy::RankDeficient { informative_axes } => {
                write!(f, "only {} informative principal axes", informative_axes)
            }
            Degeneracy::NoMajorityMembership { entity } => {
                write!(f, "entity {} belongs to no cluster above threshold", entity)
            }
        }
    }
}
