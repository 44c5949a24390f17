use crate::equivalence::EquivalencePodGenerator;
use crate::error::{PredicateError, Result};
use crate::filter::{filter_by_name, FilterPredicate, PodFitsHostPorts};
use schedkit_core::ClaimLookup;
use serde::{Deserialize, Serialize};

/// Configuration for the predicate set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PredicatesConfig {
    /// Names of the filter predicates to run, in order
    pub filters: Vec<String>,
    /// Whether pods are grouped into equivalence classes
    pub equivalence_class: bool,
}

impl Default for PredicatesConfig {
    fn default() -> Self {
        Self {
            filters: vec![PodFitsHostPorts::NAME.to_string()],
            equivalence_class: true,
        }
    }
}

impl PredicatesConfig {
    /// Parse a configuration document; missing fields take their defaults
    pub fn from_yaml(data: &str) -> Result<Self> {
        schedkit_core::from_yaml(data).map_err(|e| {
            PredicateError::invalid_config(
                e.to_string(),
                "Expected keys: filters (list of names), equivalenceClass (bool)",
            )
        })
    }

    /// Instantiate the configured filters
    pub fn build_filters(&self) -> Result<Vec<Box<dyn FilterPredicate>>> {
        self.filters.iter().map(|name| filter_by_name(name)).collect()
    }

    /// Equivalence generator over `lookup`, or `None` when equivalence classes are disabled
    pub fn equivalence_generator<L: ClaimLookup>(
        &self,
        lookup: L,
    ) -> Option<EquivalencePodGenerator<L>> {
        self.equivalence_class
            .then(|| EquivalencePodGenerator::new(lookup))
    }
}
