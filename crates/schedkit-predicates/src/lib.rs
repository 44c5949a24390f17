//! Schedkit Predicates - Scheduling predicate support
//!
//! This crate provides:
//! - Equivalence keys for caching predicate results across pods
//! - Host port bindings and the port conflict check
//! - Filter predicates (host ports)
//! - Label and namespace helpers
//! - Predicate configuration

pub mod config;
pub mod equivalence;
pub mod error;
pub mod filter;
pub mod labels;
pub mod ports;
pub mod types;

// Re-export commonly used types
pub use config::PredicatesConfig;
pub use equivalence::{
    compute_equivalence_key, ControllerRef, EquivalenceKey, EquivalencePodGenerator,
};
pub use error::{PredicateError, Result};
pub use filter::{default_filters, FilterPredicate, PodFitsHostPorts};
pub use ports::{
    ports_conflict, ports_conflict_encoded, HostPortBinding, PortBindingSet, PortKeyError,
    WILDCARD_HOST_IP,
};
pub use types::{FilterResult, NodeInfo, SchedulingContext};
