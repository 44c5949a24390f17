//! Host port bindings and the node port conflict check
//!
//! A binding is the `(protocol, host IP, host port)` triple a container asks
//! for. Between components it travels as `"<protocol>/<hostIP>/<hostPort>"`;
//! inside this crate it is always a decoded [`HostPortBinding`].

use schedkit_core::Pod;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Delimiter between the fields of an encoded binding
pub const PORT_KEY_DELIMITER: char = '/';

/// Host IP meaning "bind on every interface of the node"
pub const WILDCARD_HOST_IP: &str = "0.0.0.0";

/// Protocol assumed when a container port leaves it unset
pub const DEFAULT_PROTOCOL: &str = "TCP";

/// Errors produced when building or decoding a binding
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortKeyError {
    #[error("Port key {key:?} has {found} fields, expected 3")]
    FieldCount { key: String, found: usize },

    #[error("Port key {key:?} has an empty {field}")]
    EmptyField { key: String, field: &'static str },

    #[error("{field} {value:?} contains the port key delimiter")]
    DelimiterInField { field: &'static str, value: String },
}

/// A single host port allocation on a node
///
/// Fields are kept exactly as encoded, so two bindings are equal only when
/// their keys are identical strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HostPortBinding {
    protocol: String,
    host_ip: String,
    host_port: String,
}

impl HostPortBinding {
    /// Build a binding, rejecting empty fields and fields containing the delimiter
    pub fn new(
        protocol: impl Into<String>,
        host_ip: impl Into<String>,
        host_port: impl Into<String>,
    ) -> Result<Self, PortKeyError> {
        let protocol = protocol.into();
        let host_ip = host_ip.into();
        let host_port = host_port.into();

        let fields = [
            ("protocol", &protocol),
            ("host IP", &host_ip),
            ("host port", &host_port),
        ];
        for (field, value) in fields {
            if value.contains(PORT_KEY_DELIMITER) {
                return Err(PortKeyError::DelimiterInField {
                    field,
                    value: value.clone(),
                });
            }
            if value.is_empty() {
                return Err(PortKeyError::EmptyField {
                    key: format!(
                        "{}{d}{}{d}{}",
                        protocol,
                        host_ip,
                        host_port,
                        d = PORT_KEY_DELIMITER
                    ),
                    field,
                });
            }
        }

        Ok(Self {
            protocol,
            host_ip,
            host_port,
        })
    }

    /// Decode `"<protocol>/<hostIP>/<hostPort>"`
    pub fn decode(key: &str) -> Result<Self, PortKeyError> {
        let fields: Vec<&str> = key.split(PORT_KEY_DELIMITER).collect();
        match fields.as_slice() {
            [protocol, host_ip, host_port] => Self::new(*protocol, *host_ip, *host_port),
            _ => Err(PortKeyError::FieldCount {
                key: key.to_string(),
                found: fields.len(),
            }),
        }
    }

    /// Encode as `"<protocol>/<hostIP>/<hostPort>"`
    pub fn encode(&self) -> String {
        self.to_string()
    }

    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    pub fn host_ip(&self) -> &str {
        &self.host_ip
    }

    pub fn host_port(&self) -> &str {
        &self.host_port
    }

    /// Whether this binding occupies the port on every interface
    pub fn is_wildcard(&self) -> bool {
        self.host_ip == WILDCARD_HOST_IP
    }

    /// Same protocol and same port, whatever the host IP
    fn shares_port_with(&self, other: &HostPortBinding) -> bool {
        self.host_port == other.host_port && self.protocol == other.protocol
    }
}

impl fmt::Display for HostPortBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{d}{}{d}{}",
            self.protocol,
            self.host_ip,
            self.host_port,
            d = PORT_KEY_DELIMITER
        )
    }
}

impl FromStr for HostPortBinding {
    type Err = PortKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

impl TryFrom<String> for HostPortBinding {
    type Error = PortKeyError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::decode(&s)
    }
}

impl From<HostPortBinding> for String {
    fn from(binding: HostPortBinding) -> Self {
        binding.encode()
    }
}

/// Set of host port bindings, either in use on a node or wanted by a pod
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortBindingSet {
    bindings: HashSet<HostPortBinding>,
}

impl PortBindingSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a set of encoded keys, failing on the first malformed one
    pub fn decode<I, S>(keys: I) -> Result<Self, PortKeyError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        keys.into_iter()
            .map(|k| HostPortBinding::decode(k.as_ref()))
            .collect()
    }

    /// Insert a binding, returning false if it was already present
    pub fn insert(&mut self, binding: HostPortBinding) -> bool {
        self.bindings.insert(binding)
    }

    pub fn contains(&self, binding: &HostPortBinding) -> bool {
        self.bindings.contains(binding)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HostPortBinding> {
        self.bindings.iter()
    }

    /// Add every binding of `other` to this set
    pub fn extend_from(&mut self, other: &PortBindingSet) {
        self.bindings.extend(other.bindings.iter().cloned());
    }

    /// Encoded form of every binding, sorted
    pub fn encode(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.bindings.iter().map(HostPortBinding::encode).collect();
        keys.sort();
        keys
    }
}

impl FromIterator<HostPortBinding> for PortBindingSet {
    fn from_iter<T: IntoIterator<Item = HostPortBinding>>(iter: T) -> Self {
        Self {
            bindings: iter.into_iter().collect(),
        }
    }
}

impl Extend<HostPortBinding> for PortBindingSet {
    fn extend<T: IntoIterator<Item = HostPortBinding>>(&mut self, iter: T) {
        self.bindings.extend(iter);
    }
}

impl<'a> IntoIterator for &'a PortBindingSet {
    type Item = &'a HostPortBinding;
    type IntoIter = std::collections::hash_set::Iter<'a, HostPortBinding>;

    fn into_iter(self) -> Self::IntoIter {
        self.bindings.iter()
    }
}

/// True if `binding` is a wildcard that shares protocol and port with any of `others`
fn wildcard_conflict(binding: &HostPortBinding, others: &PortBindingSet) -> bool {
    binding.is_wildcard() && others.iter().any(|other| binding.shares_port_with(other))
}

/// Check whether `wanted` can be allocated next to `existing` on the same node
///
/// Returns true on conflict. A wildcard binding on either side collides with
/// anything on the other side using the same protocol and port; bindings on
/// specific IPs only collide when identical. The verdict is symmetric in its
/// two arguments.
pub fn ports_conflict(existing: &PortBindingSet, wanted: &PortBindingSet) -> bool {
    if existing.iter().any(|e| wildcard_conflict(e, wanted)) {
        return true;
    }

    wanted
        .iter()
        .any(|w| wildcard_conflict(w, existing) || existing.contains(w))
}

/// [`ports_conflict`] over encoded keys
///
/// Every key on both sides is decoded before anything is compared, so a
/// malformed key is always reported rather than read as "no conflict".
pub fn ports_conflict_encoded<E, W, S, T>(existing: E, wanted: W) -> Result<bool, PortKeyError>
where
    E: IntoIterator<Item = S>,
    W: IntoIterator<Item = T>,
    S: AsRef<str>,
    T: AsRef<str>,
{
    let existing = PortBindingSet::decode(existing)?;
    let wanted = PortBindingSet::decode(wanted)?;
    Ok(ports_conflict(&existing, &wanted))
}

/// Collect the host ports requested by every container of a pod
///
/// Only ports with a positive `hostPort` count. An empty host IP means the
/// wildcard and a missing protocol means TCP. Ports that cannot be
/// represented as a binding are skipped.
pub fn host_ports_for_pod(pod: &Pod) -> PortBindingSet {
    let mut set = PortBindingSet::new();
    let Some(spec) = &pod.spec else {
        return set;
    };

    let pod_name = pod.metadata.name.as_deref().unwrap_or("unknown");

    for port in spec.containers.iter().flat_map(|c| c.ports.iter().flatten()) {
        let Some(host_port) = port.host_port.filter(|p| *p > 0) else {
            continue;
        };

        let host_port = match u16::try_from(host_port) {
            Ok(p) => p,
            Err(_) => {
                debug!("Pod {} skips out-of-range host port {}", pod_name, host_port);
                continue;
            }
        };

        let protocol = port
            .protocol
            .as_deref()
            .filter(|p| !p.is_empty())
            .unwrap_or(DEFAULT_PROTOCOL);
        let host_ip = port
            .host_ip
            .as_deref()
            .filter(|ip| !ip.is_empty())
            .unwrap_or(WILDCARD_HOST_IP);

        match HostPortBinding::new(protocol, host_ip, host_port.to_string()) {
            Ok(binding) => {
                set.insert(binding);
            }
            Err(e) => debug!("Pod {} skips host port: {}", pod_name, e),
        }
    }

    set
}
