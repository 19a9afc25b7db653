//! Error types for memweave-core.

use thiserror::Error;

/// Result type alias using memweave-core's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during graph operations.
///
/// All graph variants are local validation failures raised at the offending
/// call. A call that returns one of them has left its graph untouched.
#[derive(Error, Debug)]
pub enum Error {
    /// A parent id was supplied but no such memory node exists
    #[error("Invalid parent: memory node {0} does not exist")]
    InvalidParent(String),

    /// A ghost branch could not be attached to its origin
    #[error("Invalid origin {origin}: {message}")]
    InvalidOrigin { origin: String, message: String },

    /// Lookup of a node that is not in the graph
    #[error("Node not found: {0}")]
    NotFound(String),

    /// A lattice node with this id already exists
    #[error("Duplicate id: {0}")]
    DuplicateId(String),

    /// A lattice edge references a node that does not exist
    #[error("Dangling endpoint: edge {source_id} -> {target_id} references missing node {missing}")]
    DanglingEndpoint {
        source_id: String,
        target_id: String,
        missing: String,
    },

    /// Confidence was NaN, infinite, or outside [0, 1] where clamping does not apply
    #[error("Invalid confidence: {0}")]
    InvalidConfidence(f64),

    /// Edge weight was NaN, infinite, or negative
    #[error("Invalid edge weight: {0}")]
    InvalidWeight(f64),

    /// Snapshot or graph failed a structural integrity check
    #[error("Integrity violation: {0}")]
    Integrity(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an invalid origin error.
    pub fn invalid_origin(origin: impl ToString, message: impl Into<String>) -> Self {
        Self::InvalidOrigin {
            origin: origin.to_string(),
            message: message.into(),
        }
    }

    /// Create a dangling endpoint error.
    pub fn dangling_endpoint(
        source_id: impl ToString,
        target_id: impl ToString,
        missing: impl ToString,
    ) -> Self {
        Self::DanglingEndpoint {
            source_id: source_id.to_string(),
            target_id: target_id.to_string(),
            missing: missing.to_string(),
        }
    }

    /// Create an integrity violation error.
    pub fn integrity(message: impl Into<String>) -> Self {
        Self::Integrity(message.into())
    }

    /// Whether this error is one of the caller-input validation failures.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidParent(_)
                | Self::InvalidOrigin { .. }
                | Self::NotFound(_)
                | Self::DuplicateId(_)
                | Self::DanglingEndpoint { .. }
                | Self::InvalidConfidence(_)
                | Self::InvalidWeight(_)
        )
    }
}
