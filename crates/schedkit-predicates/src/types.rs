use crate::ports::{host_ports_for_pod, PortBindingSet};
use schedkit_core::{Node, Pod};

/// Scheduling context containing the pod being placed
#[derive(Debug, Clone)]
pub struct SchedulingContext {
    /// Pod to be scheduled
    pub pod: Pod,
}

impl SchedulingContext {
    /// Create a new scheduling context
    pub fn new(pod: Pod) -> Self {
        Self { pod }
    }
}

/// A node together with the pods already bound to it
#[derive(Debug, Clone, Default)]
pub struct NodeInfo {
    /// Node object
    pub node: Node,
    /// Pods assigned to the node
    pub pods: Vec<Pod>,
}

impl NodeInfo {
    /// Create node info for a node and its pods
    pub fn new(node: Node, pods: Vec<Pod>) -> Self {
        Self { node, pods }
    }

    /// Node name, or "unknown" if unset
    pub fn name(&self) -> &str {
        self.node.metadata.name.as_deref().unwrap_or("unknown")
    }

    /// Host ports held by every pod on the node
    pub fn used_ports(&self) -> PortBindingSet {
        let mut used = PortBindingSet::new();
        for pod in &self.pods {
            used.extend_from(&host_ports_for_pod(pod));
        }
        used
    }
}

/// Result of filtering a node
#[derive(Debug, Clone)]
pub struct FilterResult {
    /// Node name
    pub node_name: String,
    /// Whether the node passed the filter
    pub passed: bool,
    /// Reason for failure (if any)
    pub reason: Option<String>,
}

impl FilterResult {
    /// Create a passing filter result
    pub fn pass(node_name: String) -> Self {
        Self {
            node_name,
            passed: true,
            reason: None,
        }
    }

    /// Create a failing filter result
    pub fn fail(node_name: String, reason: String) -> Self {
        Self {
            node_name,
            passed: false,
            reason: Some(reason),
        }
    }
}
