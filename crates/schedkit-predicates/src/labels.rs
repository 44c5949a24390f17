//! Label map helpers used by affinity-style predicates

use schedkit_core::Pod;
use std::collections::BTreeMap;

/// Copy as many of `keys` as `labels` carries into a new map
pub fn find_labels_in_set(
    keys: &[String],
    labels: &BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    keys.iter()
        .filter_map(|k| labels.get(k).map(|v| (k.clone(), v.clone())))
        .collect()
}

/// Backfill `target` with values from `labels` for each of `keys` not already present
pub fn add_unset_labels_to_map(
    target: &mut BTreeMap<String, String>,
    keys: &[String],
    labels: &BTreeMap<String, String>,
) {
    for key in keys {
        if target.contains_key(key) {
            continue;
        }
        if let Some(value) = labels.get(key) {
            target.insert(key.clone(), value.clone());
        }
    }
}

/// Pods in `namespace`, in input order
pub fn filter_pods_by_namespace<'a>(pods: &'a [Pod], namespace: &str) -> Vec<&'a Pod> {
    pods.iter()
        .filter(|p| p.metadata.namespace.as_deref().unwrap_or_default() == namespace)
        .collect()
}

/// Equality-based label selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelSelector {
    /// Matches every label set
    Everything,
    /// Matches label sets containing all of these pairs
    MatchLabels(BTreeMap<String, String>),
}

impl LabelSelector {
    pub fn matches(&self, labels: &BTreeMap<String, String>) -> bool {
        match self {
            LabelSelector::Everything => true,
            LabelSelector::MatchLabels(required) => required
                .iter()
                .all(|(k, v)| labels.get(k) == Some(v)),
        }
    }
}

/// Selector requiring every pair in `labels`; an absent or empty map selects everything
pub fn selector_from_labels(labels: Option<&BTreeMap<String, String>>) -> LabelSelector {
    match labels {
        Some(l) if !l.is_empty() => LabelSelector::MatchLabels(l.clone()),
        _ => LabelSelector::Everything,
    }
}
