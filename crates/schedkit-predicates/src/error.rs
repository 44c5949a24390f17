// Allow unused assignments for diagnostic fields - they're used by the macros
#![allow(unused_assignments)]

use crate::ports::PortKeyError;
use miette::Diagnostic;
use thiserror::Error;

/// Predicate error type
#[derive(Error, Debug, Diagnostic)]
pub enum PredicateError {
    /// Malformed host port key
    #[error("Invalid host port key: {0}")]
    #[diagnostic(
        code(predicates::invalid_port_key),
        help("Port keys are encoded as <protocol>/<hostIP>/<hostPort>")
    )]
    InvalidPortKey(#[from] PortKeyError),

    /// Unknown filter predicate name
    #[error("Unknown filter predicate: {name}")]
    #[diagnostic(
        code(predicates::unknown_filter),
        help("Supported filters: PodFitsHostPorts")
    )]
    UnknownFilter {
        name: String,
    },

    /// Invalid configuration
    #[error("Invalid predicates configuration: {message}")]
    #[diagnostic(
        code(predicates::invalid_config),
        help("{suggestion}")
    )]
    InvalidConfig {
        message: String,
        suggestion: String,
    },

    /// Core error
    #[error("Core error: {0}")]
    #[diagnostic(
        code(predicates::core_error),
        help("Check the claim index and input objects")
    )]
    Core(#[from] schedkit_core::SchedkitError),
}

/// Result type for predicate operations
pub type Result<T> = std::result::Result<T, PredicateError>;

impl PredicateError {
    /// Create an UnknownFilter error
    pub fn unknown_filter(name: impl Into<String>) -> Self {
        Self::UnknownFilter { name: name.into() }
    }

    /// Create an InvalidConfig error
    pub fn invalid_config(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }
}
