// Allow unused assignments for diagnostic fields - they're used by the macros
#![allow(unused_assignments)]

use miette::Diagnostic;
use thiserror::Error;

/// Core error type for schedkit operations
///
/// Claim lookups treat every variant the same way ("claim unavailable"); the split
/// only exists so diagnostics can say what went wrong.
#[derive(Error, Debug, Diagnostic)]
pub enum SchedkitError {
    /// Claim does not exist in the index
    #[error("Persistent volume claim not found: {namespace}/{name}")]
    #[diagnostic(
        code(schedkit::claim_not_found),
        help("Create the claim before scheduling pods that mount it")
    )]
    ClaimNotFound {
        #[allow(unused)]
        namespace: String,
        #[allow(unused)]
        name: String,
    },

    /// Claim exists but carries no UID
    #[error("Persistent volume claim {namespace}/{name} has no UID")]
    #[diagnostic(
        code(schedkit::claim_without_uid),
        help("Claims get a UID on creation; make sure the index is fed from the API server")
    )]
    ClaimWithoutUid {
        #[allow(unused)]
        namespace: String,
        #[allow(unused)]
        name: String,
    },

    /// The backing index failed
    #[error("Claim lookup backend error: {message}")]
    #[diagnostic(
        code(schedkit::lookup_backend),
        help("Check the claim informer or index feeding the scheduler")
    )]
    Backend {
        #[allow(unused)]
        message: String,
        #[source]
        #[allow(unused)]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Serialization error
    #[error("Serialization error: {message}")]
    #[diagnostic(
        code(schedkit::serialization_error),
        help("Ensure the input is valid JSON or YAML")
    )]
    Serialization {
        #[allow(unused)]
        message: String,
        #[source]
        #[allow(unused)]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, SchedkitError>;

impl SchedkitError {
    /// Create a ClaimNotFound error
    pub fn claim_not_found(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::ClaimNotFound {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Create a ClaimWithoutUid error
    pub fn claim_without_uid(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::ClaimWithoutUid {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Create a Backend error
    pub fn backend(
        message: impl Into<String>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Backend {
            message: message.into(),
            source,
        }
    }

    /// Create a Serialization error
    pub fn serialization(
        message: impl Into<String>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Serialization {
            message: message.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = SchedkitError::claim_not_found("default", "data");
        assert!(matches!(err, SchedkitError::ClaimNotFound { .. }));
        assert_eq!(
            err.to_string(),
            "Persistent volume claim not found: default/data"
        );

        let err = SchedkitError::backend("index poisoned", None);
        assert!(matches!(err, SchedkitError::Backend { .. }));
    }

    #[test]
    fn test_error_diagnostic_code() {
        let err = SchedkitError::claim_without_uid("default", "data");
        let code = err.code().map(|c| c.to_string());
        assert_eq!(code.as_deref(), Some("schedkit::claim_without_uid"));
    }
}
