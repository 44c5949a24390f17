use crate::error::{PredicateError, Result};
use crate::ports::{host_ports_for_pod, ports_conflict};
use crate::types::{FilterResult, NodeInfo, SchedulingContext};
use tracing::debug;

/// Filter predicate trait
pub trait FilterPredicate: Send + Sync {
    /// Filter a node for the given pod
    fn filter(&self, context: &SchedulingContext, node: &NodeInfo) -> FilterResult;

    /// Name of the filter
    fn name(&self) -> &str;
}

/// Filter for host port availability
pub struct PodFitsHostPorts;

impl PodFitsHostPorts {
    pub const NAME: &'static str = "PodFitsHostPorts";
}

impl FilterPredicate for PodFitsHostPorts {
    fn filter(&self, context: &SchedulingContext, node: &NodeInfo) -> FilterResult {
        let node_name = node.name().to_string();

        let wanted = host_ports_for_pod(&context.pod);
        if wanted.is_empty() {
            return FilterResult::pass(node_name);
        }

        let existing = node.used_ports();
        debug!(
            "Node {} has {} host ports in use, pod wants {}",
            node_name,
            existing.len(),
            wanted.len()
        );

        if ports_conflict(&existing, &wanted) {
            return FilterResult::fail(
                node_name,
                format!(
                    "Host port conflict: wanted [{}], in use [{}]",
                    wanted.encode().join(", "),
                    existing.encode().join(", ")
                ),
            );
        }

        FilterResult::pass(node_name)
    }

    fn name(&self) -> &str {
        Self::NAME
    }
}

/// Look up a filter predicate by name
pub fn filter_by_name(name: &str) -> Result<Box<dyn FilterPredicate>> {
    match name {
        PodFitsHostPorts::NAME => Ok(Box::new(PodFitsHostPorts)),
        other => Err(PredicateError::unknown_filter(other)),
    }
}

/// Get default filter predicates
pub fn default_filters() -> Vec<Box<dyn FilterPredicate>> {
    vec![Box::new(PodFitsHostPorts)]
}

/// Run every filter against every node, keeping the nodes that pass all of them
pub fn feasible_nodes<'a>(
    filters: &[Box<dyn FilterPredicate>],
    context: &SchedulingContext,
    nodes: &'a [NodeInfo],
) -> Vec<&'a NodeInfo> {
    nodes
        .iter()
        .filter(|node| {
            filters.iter().all(|filter| {
                let result = filter.filter(context, node);
                if !result.passed {
                    debug!(
                        "Node {} filtered out by {}: {}",
                        result.node_name,
                        filter.name(),
                        result.reason.unwrap_or_default()
                    );
                }
                result.passed
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use schedkit_core::{Container, ContainerPort, Node, Pod};

    fn create_test_node(name: &str, pods: Vec<Pod>) -> NodeInfo {
        let mut node = Node::default();
        node.metadata.name = Some(name.to_string());
        NodeInfo::new(node, pods)
    }

    fn create_test_pod(ports: &[(&str, &str, i32)]) -> Pod {
        let mut pod = Pod::default();
        pod.metadata.name = Some("test-pod".to_string());
        pod.spec = Some(Default::default());
        pod.spec.as_mut().unwrap().containers = vec![Container {
            name: "app".to_string(),
            ports: Some(
                ports
                    .iter()
                    .map(|(protocol, host_ip, host_port)| ContainerPort {
                        container_port: *host_port,
                        protocol: Some(protocol.to_string()),
                        host_ip: Some(host_ip.to_string()),
                        host_port: Some(*host_port),
                        ..Default::default()
                    })
                    .collect(),
            ),
            ..Default::default()
        }];
        pod
    }

    #[test]
    fn test_host_ports_pass_on_free_node() {
        let node = create_test_node("node1", vec![]);
        let context = SchedulingContext::new(create_test_pod(&[("TCP", "", 8080)]));

        let result = PodFitsHostPorts.filter(&context, &node);
        assert!(result.passed);
    }

    #[test]
    fn test_host_ports_pass_without_host_ports() {
        let node = create_test_node("node1", vec![create_test_pod(&[("TCP", "", 8080)])]);
        let context = SchedulingContext::new(Pod::default());

        let result = PodFitsHostPorts.filter(&context, &node);
        assert!(result.passed);
    }

    #[test]
    fn test_host_ports_fail_on_wildcard_conflict() {
        let node = create_test_node("node1", vec![create_test_pod(&[("TCP", "10.0.0.1", 8080)])]);
        let context = SchedulingContext::new(create_test_pod(&[("TCP", "", 8080)]));

        let result = PodFitsHostPorts.filter(&context, &node);
        assert!(!result.passed);
        assert!(result.reason.unwrap().contains("Host port conflict"));
    }

    #[test]
    fn test_host_ports_pass_on_distinct_ips() {
        let node = create_test_node("node1", vec![create_test_pod(&[("TCP", "10.0.0.1", 8080)])]);
        let context = SchedulingContext::new(create_test_pod(&[("TCP", "10.0.0.2", 8080)]));

        let result = PodFitsHostPorts.filter(&context, &node);
        assert!(result.passed);
    }

    #[test]
    fn test_filter_by_name() {
        assert_eq!(filter_by_name("PodFitsHostPorts").unwrap().name(), "PodFitsHostPorts");
        assert!(matches!(
            filter_by_name("PodFitsResources"),
            Err(PredicateError::UnknownFilter { .. })
        ));
    }

    #[test]
    fn test_feasible_nodes() {
        let nodes = vec![
            create_test_node("busy", vec![create_test_pod(&[("UDP", "", 53)])]),
            create_test_node("free", vec![create_test_pod(&[("TCP", "", 53)])]),
        ];
        let context = SchedulingContext::new(create_test_pod(&[("UDP", "10.0.0.9", 53)]));

        let feasible = feasible_nodes(&default_filters(), &context, &nodes);
        let names: Vec<&str> = feasible.iter().map(|n| n.name()).collect();
        assert_eq!(names, vec!["free"]);
    }
}
