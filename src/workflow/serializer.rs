//! Conversion between the persisted step list and the editor graph.
//!
//! The conversion is deliberately asymmetric. Loading always rebuilds a
//! straight chain through the steps in order; saving reads the node list in
//! its in-memory order and ignores edges entirely. Any other topology drawn
//! in the editor is flattened on the next save/load cycle.

use crate::config::LayoutConfig;
use crate::workflow::catalog;
use crate::workflow::edge::WorkflowEdge;
use crate::workflow::graph::WorkflowGraph;
use crate::workflow::node::WorkflowNode;
use crate::workflow::step::Step;

pub fn deserialize(steps: &[Step]) -> WorkflowGraph {
    deserialize_with_layout(steps, &LayoutConfig::default())
}

/// Builds nodes `"1"..="N"` and the chain edges between consecutive nodes.
/// Steps without a stored position land in the default column.
pub fn deserialize_with_layout(steps: &[Step], layout: &LayoutConfig) -> WorkflowGraph {
    let nodes: Vec<WorkflowNode> = steps
        .iter()
        .enumerate()
        .map(|(index, step)| {
            WorkflowNode::new(
                (index + 1).to_string(),
                step.step_type.clone(),
                catalog::default_label(&step.step_type),
                step.position.unwrap_or_else(|| layout.slot(index)),
            )
            .with_config(step.config.clone())
        })
        .collect();

    let edges = nodes
        .windows(2)
        .map(|pair| WorkflowEdge::new(WorkflowEdge::base_id(&pair[0].id, &pair[1].id), &pair[0].id, &pair[1].id))
        .collect();

    WorkflowGraph { nodes, edges }
}

pub fn serialize(graph: &WorkflowGraph) -> Vec<Step> {
    graph
        .nodes
        .iter()
        .map(|node| Step {
            step_type: node.step_type.clone(),
            config: node.config.clone(),
            position: Some(node.position),
        })
        .collect()
}
