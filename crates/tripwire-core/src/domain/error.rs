//! Domain-level error taxonomy for tripwire.
//!
//! These are faults in *this* program. The failures the corpus exists to
//! provoke (unresolved dependency, undeclared reference, assertion mismatch,
//! hardcoded secret) are data, not errors - see
//! [`crate::domain::failure::FailureKind`].

/// Tripwire domain errors.
#[derive(Debug, thiserror::Error)]
pub enum TripwireError {
    #[error("invalid fixture '{id}': {reason}")]
    InvalidFixture { id: String, reason: String },

    #[error("duplicate fixture id: {0}")]
    DuplicateFixture(String),

    #[error("unknown fixture id: {0}")]
    UnknownFixture(String),

    #[error("unknown failure category: {0}")]
    UnknownCategory(String),

    #[error("workspace {} is not empty (use force to overwrite)", .0.display())]
    WorkspaceNotEmpty(std::path::PathBuf),

    #[error("fixture path escapes the workspace root: {0}")]
    UnsafeFixturePath(String),

    #[error("digest mismatch: expected {expected}, got {actual}")]
    DigestMismatch { expected: String, actual: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for tripwire domain operations.
pub type Result<T> = std::result::Result<T, TripwireError>;
