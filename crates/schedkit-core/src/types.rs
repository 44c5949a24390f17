use serde::{Deserialize, Serialize};
use std::fmt;

/// ClaimKey addresses a persistent volume claim within a namespace
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClaimKey {
    /// Namespace of the claim (empty when the owning pod has none)
    pub namespace: String,
    /// Claim name
    pub name: String,
}

impl ClaimKey {
    /// Create a new ClaimKey
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for ClaimKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// Claim identity - the UID the API server assigned to a claim
///
/// Opaque: two identities are only ever compared for equality and ordering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimIdentity(pub String);

impl ClaimIdentity {
    pub fn new(uid: impl Into<String>) -> Self {
        Self(uid.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClaimIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ClaimIdentity {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ClaimIdentity {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_key_display() {
        let key = ClaimKey::new("default", "data");
        assert_eq!(key.to_string(), "default/data");

        let key = ClaimKey::new("", "scratch");
        assert_eq!(key.to_string(), "/scratch");
    }

    #[test]
    fn test_claim_identity_serializes_as_plain_string() {
        let id = ClaimIdentity::from("6f1c-uid");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"6f1c-uid\"");
        assert_eq!(id.as_str(), "6f1c-uid");
    }
}
