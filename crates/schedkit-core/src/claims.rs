use crate::error::{SchedkitError, Result};
use crate::types::{ClaimIdentity, ClaimKey};
use k8s_openapi::api::core::v1::PersistentVolumeClaim;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

/// Capability for resolving a persistent volume claim to its identity
///
/// Implementations are shared across scheduling threads, so they must be
/// safe for concurrent use. Any error means "claim unavailable"; callers do
/// not distinguish not-found from transient failures.
pub trait ClaimLookup: Send + Sync {
    /// Resolve the claim `name` in `namespace`
    fn get_claim(&self, namespace: &str, name: &str) -> Result<ClaimIdentity>;
}

impl<T: ClaimLookup + ?Sized> ClaimLookup for &T {
    fn get_claim(&self, namespace: &str, name: &str) -> Result<ClaimIdentity> {
        (**self).get_claim(namespace, name)
    }
}

impl<T: ClaimLookup + ?Sized> ClaimLookup for Arc<T> {
    fn get_claim(&self, namespace: &str, name: &str) -> Result<ClaimIdentity> {
        (**self).get_claim(namespace, name)
    }
}

impl<T: ClaimLookup + ?Sized> ClaimLookup for Box<T> {
    fn get_claim(&self, namespace: &str, name: &str) -> Result<ClaimIdentity> {
        (**self).get_claim(namespace, name)
    }
}

/// In-memory claim index keyed by namespace and name
///
/// Meant to be fed by a claim informer and shared behind an `Arc`; also
/// serves as the fake lookup in tests.
#[derive(Debug, Default)]
pub struct InMemoryClaimIndex {
    claims: RwLock<HashMap<ClaimKey, PersistentVolumeClaim>>,
}

impl InMemoryClaimIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a claim. Returns the previous claim under the same key.
    pub fn insert(&self, claim: PersistentVolumeClaim) -> Result<Option<PersistentVolumeClaim>> {
        let key = ClaimKey::new(
            claim.metadata.namespace.clone().unwrap_or_default(),
            claim.metadata.name.clone().unwrap_or_default(),
        );
        debug!("Indexing claim {}", key);

        let mut claims = self.write()?;
        Ok(claims.insert(key, claim))
    }

    /// Remove a claim, returning it if it was present
    pub fn remove(&self, namespace: &str, name: &str) -> Result<Option<PersistentVolumeClaim>> {
        let key = ClaimKey::new(namespace, name);
        debug!("Removing claim {} from index", key);

        let mut claims = self.write()?;
        Ok(claims.remove(&key))
    }

    /// Number of indexed claims
    pub fn len(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.read()?.is_empty())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<ClaimKey, PersistentVolumeClaim>>> {
        self.claims
            .read()
            .map_err(|e| SchedkitError::backend(format!("claim index lock poisoned: {}", e), None))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<ClaimKey, PersistentVolumeClaim>>> {
        self.claims
            .write()
            .map_err(|e| SchedkitError::backend(format!("claim index lock poisoned: {}", e), None))
    }
}

impl ClaimLookup for InMemoryClaimIndex {
    fn get_claim(&self, namespace: &str, name: &str) -> Result<ClaimIdentity> {
        let claims = self.read()?;

        let claim = claims
            .get(&ClaimKey::new(namespace, name))
            .ok_or_else(|| SchedkitError::claim_not_found(namespace, name))?;

        claim
            .metadata
            .uid
            .as_ref()
            .filter(|uid| !uid.is_empty())
            .map(|uid| ClaimIdentity::new(uid.as_str()))
            .ok_or_else(|| SchedkitError::claim_without_uid(namespace, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_claim(namespace: &str, name: &str, uid: Option<&str>) -> PersistentVolumeClaim {
        let mut claim = PersistentVolumeClaim::default();
        claim.metadata.namespace = Some(namespace.to_string());
        claim.metadata.name = Some(name.to_string());
        claim.metadata.uid = uid.map(|u| u.to_string());
        claim
    }

    #[test]
    fn test_get_claim_returns_uid() {
        let index = InMemoryClaimIndex::new();
        index
            .insert(create_test_claim("default", "data", Some("uid-1")))
            .unwrap();

        let id = index.get_claim("default", "data").unwrap();
        assert_eq!(id, ClaimIdentity::from("uid-1"));
    }

    #[test]
    fn test_get_claim_is_namespace_scoped() {
        let index = InMemoryClaimIndex::new();
        index
            .insert(create_test_claim("team-a", "data", Some("uid-1")))
            .unwrap();

        let err = index.get_claim("team-b", "data").unwrap_err();
        assert!(matches!(err, SchedkitError::ClaimNotFound { .. }));
    }

    #[test]
    fn test_get_claim_without_uid_fails() {
        let index = InMemoryClaimIndex::new();
        index
            .insert(create_test_claim("default", "data", None))
            .unwrap();

        let err = index.get_claim("default", "data").unwrap_err();
        assert!(matches!(err, SchedkitError::ClaimWithoutUid { .. }));
    }

    #[test]
    fn test_insert_replaces_and_remove() {
        let index = InMemoryClaimIndex::new();
        assert!(index.is_empty().unwrap());

        index
            .insert(create_test_claim("default", "data", Some("uid-1")))
            .unwrap();
        let previous = index
            .insert(create_test_claim("default", "data", Some("uid-2")))
            .unwrap();
        assert!(previous.is_some());
        assert_eq!(index.len().unwrap(), 1);
        assert_eq!(
            index.get_claim("default", "data").unwrap(),
            ClaimIdentity::from("uid-2")
        );

        let removed = index.remove("default", "data").unwrap();
        assert!(removed.is_some());
        assert!(index.get_claim("default", "data").is_err());
        assert!(index.is_empty().unwrap());
    }

    #[test]
    fn test_poisoned_index_reports_backend_error() {
        let index = InMemoryClaimIndex::new();
        index
            .insert(create_test_claim("default", "data", Some("uid-1")))
            .unwrap();

        std::thread::scope(|s| {
            let result = s
                .spawn(|| {
                    let _guard = index.claims.write().unwrap();
                    panic!("writer died holding the lock");
                })
                .join();
            assert!(result.is_err());
        });

        assert!(matches!(index.len(), Err(SchedkitError::Backend { .. })));
        assert!(matches!(index.is_empty(), Err(SchedkitError::Backend { .. })));
        assert!(matches!(
            index.get_claim("default", "data"),
            Err(SchedkitError::Backend { .. })
        ));
    }

    #[test]
    fn test_lookup_through_arc_and_reference() {
        let index = Arc::new(InMemoryClaimIndex::new());
        index
            .insert(create_test_claim("default", "data", Some("uid-1")))
            .unwrap();

        let shared: Arc<dyn ClaimLookup> = index.clone();
        assert!(shared.get_claim("default", "data").is_ok());

        let by_ref = &*index;
        assert!(ClaimLookup::get_claim(&by_ref, "default", "data").is_ok());
    }
}
