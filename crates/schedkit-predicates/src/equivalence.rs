//! Equivalence classes for predicate result caching
//!
//! Pods created by the same controller and mounting the same persistent
//! volume claims get identical predicate results, so the scheduler can
//! reuse what it computed for one of them. [`EquivalenceKey`] is the
//! comparable form of that class.

use schedkit_core::{ClaimIdentity, ClaimLookup, OwnerReference, Pod, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{trace, warn};

/// Identity-bearing fields of a controller owner reference
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControllerRef {
    pub api_version: String,
    pub kind: String,
    pub name: String,
    pub uid: String,
}

impl From<&OwnerReference> for ControllerRef {
    fn from(owner: &OwnerReference) -> Self {
        Self {
            api_version: owner.api_version.clone(),
            kind: owner.kind.clone(),
            name: owner.name.clone(),
            uid: owner.uid.clone(),
        }
    }
}

/// Key shared by pods that can reuse each other's predicate results
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EquivalenceKey {
    /// Controller that owns the pod
    pub controller: ControllerRef,
    /// Identities of every claim the pod mounts
    pub claims: BTreeSet<ClaimIdentity>,
}

/// Generates equivalence keys using an injected claim lookup
#[derive(Debug, Clone)]
pub struct EquivalencePodGenerator<L> {
    lookup: L,
}

impl<L: ClaimLookup> EquivalencePodGenerator<L> {
    /// Create a generator backed by `lookup`
    pub fn new(lookup: L) -> Self {
        Self { lookup }
    }

    /// Compute the equivalence key of a pod
    ///
    /// Returns `None` when the pod has no controller owner reference or when
    /// any of its claims cannot be resolved. Only the first owner reference
    /// flagged as controller is used.
    pub fn equivalence_key(&self, pod: &Pod) -> Option<EquivalenceKey> {
        let pod_name = pod.metadata.name.as_deref().unwrap_or("unknown");

        let Some(controller) = controller_ref(pod) else {
            trace!("Pod {} has no controller owner reference", pod_name);
            return None;
        };

        match self.claim_set(pod) {
            Ok(claims) => Some(EquivalenceKey {
                controller: ControllerRef::from(controller),
                claims,
            }),
            Err(e) => {
                warn!(
                    "Equivalence class for pod {} unavailable: {}",
                    pod_name, e
                );
                None
            }
        }
    }

    /// Resolve every claim mounted by the pod, failing on the first lookup error
    pub fn claim_set(&self, pod: &Pod) -> Result<BTreeSet<ClaimIdentity>> {
        let namespace = pod.metadata.namespace.as_deref().unwrap_or_default();
        let mut claims = BTreeSet::new();

        let volumes = pod.spec.iter().flat_map(|s| s.volumes.iter().flatten());
        for source in volumes.filter_map(|v| v.persistent_volume_claim.as_ref()) {
            claims.insert(self.lookup.get_claim(namespace, &source.claim_name)?);
        }

        Ok(claims)
    }

    /// The lookup this generator resolves claims with
    pub fn lookup(&self) -> &L {
        &self.lookup
    }
}

/// First owner reference flagged as controller, in input order
pub fn controller_ref(pod: &Pod) -> Option<&OwnerReference> {
    pod.metadata
        .owner_references
        .iter()
        .flatten()
        .find(|r| r.controller == Some(true))
}

/// Compute the equivalence key of `pod` with a one-off lookup
pub fn compute_equivalence_key(pod: &Pod, lookup: &dyn ClaimLookup) -> Option<EquivalenceKey> {
    EquivalencePodGenerator::new(lookup).equivalence_key(pod)
}
