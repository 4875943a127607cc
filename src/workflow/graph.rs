use crate::error::{FlowForgeError, FlowResult};
use crate::workflow::edge::WorkflowEdge;
use crate::workflow::node::WorkflowNode;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Node and edge snapshot backing one editing session.
///
/// `nodes` keeps insertion order; that order, not the edges, is what gets
/// persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowGraph {
    pub nodes: Vec<WorkflowNode>,
    pub edges: Vec<WorkflowEdge>,
}

impl WorkflowGraph {
    pub fn node(&self, id: &str) -> Option<&WorkflowNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    pub fn edge(&self, id: &str) -> Option<&WorkflowEdge> {
        self.edges.iter().find(|edge| edge.id == id)
    }

    /// Checks that node ids and edge ids are unique and that every edge
    /// endpoint names an existing node.
    pub fn validate(&self) -> FlowResult<()> {
        let mut node_ids = HashSet::new();
        for node in &self.nodes {
            if !node_ids.insert(node.id.as_str()) {
                return Err(FlowForgeError::InvalidGraph(format!("duplicate node id: {}", node.id)));
            }
        }

        let mut edge_ids = HashSet::new();
        for edge in &self.edges {
            if !edge_ids.insert(edge.id.as_str()) {
                return Err(FlowForgeError::InvalidGraph(format!("duplicate edge id: {}", edge.id)));
            }
            for endpoint in [&edge.source, &edge.target] {
                if !node_ids.contains(endpoint.as_str()) {
                    return Err(FlowForgeError::InvalidGraph(format!(
                        "edge {} references missing node {}",
                        edge.id, endpoint
                    )));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::node::{Position, StepType};

    fn node(id: &str) -> WorkflowNode {
        WorkflowNode::new(id, StepType::Api, "api", Position::default())
    }

    #[test]
    fn test_empty_graph_is_valid() {
        assert!(WorkflowGraph::default().validate().is_ok());
    }

    #[test]
    fn test_disconnected_graph_is_valid() {
        let graph = WorkflowGraph {
            nodes: vec![node("1"), node("2"), node("3")],
            edges: vec![WorkflowEdge::new("e1-2", "1", "2")],
        };
        assert!(graph.validate().is_ok());
    }

    #[test]
    fn test_duplicate_node_id_rejected() {
        let graph = WorkflowGraph {
            nodes: vec![node("1"), node("1")],
            edges: Vec::new(),
        };
        assert!(matches!(graph.validate(), Err(FlowForgeError::InvalidGraph(_))));
    }

    #[test]
    fn test_dangling_edge_rejected() {
        let graph = WorkflowGraph {
            nodes: vec![node("1")],
            edges: vec![WorkflowEdge::new("e1-9", "1", "9")],
        };
        let error = graph.validate().unwrap_err();
        assert!(error.to_string().contains("missing node 9"));
    }
}
