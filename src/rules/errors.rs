//! # Rule Store Errors

use thiserror::Error;

/// Result type for rule store operations
pub type RuleStoreResult<T> = Result<T, RuleStoreError>;

/// Rule store errors
///
/// Not-found is deliberately not an error: lookups return `Option` so
/// callers can tell a missing record apart from a caller bug.
#[derive(Debug, Clone, Error)]
pub enum RuleStoreError {
    #[error("Invalid rule id format: '{0}'")]
    InvalidIdentifier(String),

    #[error("Rule id '{0}' already exists")]
    AlreadyExists(String),

    #[error("Rule payload id '{payload}' does not match addressed id '{addressed}'")]
    IdMismatch { addressed: String, payload: String },

    #[error("Rules directory unavailable: {0}")]
    StorageUnavailable(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl RuleStoreError {
    /// Get HTTP status code for the adapter layer
    pub fn status_code(&self) -> u16 {
        match self {
            RuleStoreError::InvalidIdentifier(_) => 400,
            RuleStoreError::AlreadyExists(_) => 409,
            RuleStoreError::IdMismatch { .. } => 400,
            RuleStoreError::StorageUnavailable(_) => 500,
            RuleStoreError::Io(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            RuleStoreError::InvalidIdentifier("a b".into()).status_code(),
            400
        );
        assert_eq!(
            RuleStoreError::AlreadyExists("java_001".into()).status_code(),
            409
        );
        assert_eq!(
            RuleStoreError::StorageUnavailable("denied".into()).status_code(),
            500
        );
    }

    #[test]
    fn test_display_names_the_id() {
        let err = RuleStoreError::AlreadyExists("java_001".into());
        assert!(err.to_string().contains("java_001"));
    }
}
