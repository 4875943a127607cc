use crate::config::LayoutConfig;
use crate::error::{FlowForgeError, FlowResult};
use crate::workflow::catalog;
use crate::workflow::edge::WorkflowEdge;
use crate::workflow::graph::WorkflowGraph;
use crate::workflow::node::{Position, StepType, WorkflowNode};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

pub const TRACING_TARGET: &str = "flowforge::graph";

/// User-driven mutation of a single node, as reported by the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum NodeChange {
    Position {
        id: String,
        position: Position,
        #[serde(default)]
        dragging: bool,
    },
    Select {
        id: String,
        selected: bool,
    },
    Remove {
        id: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EdgeChange {
    Select { id: String, selected: bool },
    Remove { id: String },
}

/// Emitted to observers after each successful mutation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum GraphEvent {
    Reset,
    NodeAdded { id: String },
    NodeMoved { id: String, position: Position, dragging: bool },
    NodeSelected { id: String, selected: bool },
    NodeRemoved { id: String },
    EdgeAdded { id: String },
    EdgeSelected { id: String, selected: bool },
    EdgeRemoved { id: String },
}

type GraphObserver = Box<dyn FnMut(&GraphEvent) + Send>;

/// Mutable node graph for one editing session.
///
/// Node ids come from a counter that only moves forward, so an id freed by a
/// removal is never handed out again. No operation leaves an edge pointing at
/// a missing node.
pub struct NodeGraphModel {
    graph: WorkflowGraph,
    layout: LayoutConfig,
    next_node_id: u64,
    observers: Vec<GraphObserver>,
}

impl fmt::Debug for NodeGraphModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeGraphModel")
            .field("graph", &self.graph)
            .field("next_node_id", &self.next_node_id)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

impl Default for NodeGraphModel {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

impl NodeGraphModel {
    pub fn new(layout: LayoutConfig) -> Self {
        Self {
            graph: WorkflowGraph::default(),
            layout,
            next_node_id: 1,
            observers: Vec::new(),
        }
    }

    pub fn graph(&self) -> &WorkflowGraph {
        &self.graph
    }

    pub fn nodes(&self) -> &[WorkflowNode] {
        &self.graph.nodes
    }

    pub fn edges(&self) -> &[WorkflowEdge] {
        &self.graph.edges
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn subscribe(&mut self, observer: impl FnMut(&GraphEvent) + Send + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Replaces the whole graph, e.g. with a freshly deserialized step list.
    pub fn load(&mut self, graph: WorkflowGraph) -> FlowResult<()> {
        graph.validate()?;

        let highest = graph
            .nodes
            .iter()
            .filter_map(|node| node.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        let resume_at = highest
            .checked_add(1)
            .ok_or_else(|| FlowForgeError::InvalidGraph(format!("node id {} leaves no room for new ids", highest)))?;
        self.next_node_id = self.next_node_id.max(resume_at);
        self.graph = graph;

        tracing::debug!(
            target: TRACING_TARGET,
            nodes = self.graph.nodes.len(),
            edges = self.graph.edges.len(),
            "Graph loaded"
        );
        self.emit(GraphEvent::Reset);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.graph = WorkflowGraph::default();
        self.emit(GraphEvent::Reset);
    }

    /// Appends a node of `step_type` in the next free slot below the others.
    pub fn add_node(&mut self, step_type: StepType) -> WorkflowNode {
        let position = self.layout.slot(self.graph.nodes.len());
        self.add_node_at(step_type, position)
    }

    pub fn add_node_at(&mut self, step_type: StepType, position: Position) -> WorkflowNode {
        let id = self.allocate_node_id();
        let label = catalog::default_label(&step_type);
        let node = WorkflowNode::new(id, step_type, label, position);
        self.graph.nodes.push(node.clone());

        tracing::debug!(
            target: TRACING_TARGET,
            node_id = %node.id,
            step_type = %node.step_type,
            "Node added"
        );
        self.emit(GraphEvent::NodeAdded { id: node.id.clone() });
        node
    }

    /// Draws an edge from `source` to `target`. Repeating a pair is allowed;
    /// the new edge then gets a suffixed id.
    pub fn connect(&mut self, source: &str, target: &str) -> FlowResult<WorkflowEdge> {
        for endpoint in [source, target] {
            if !self.graph.contains_node(endpoint) {
                tracing::debug!(target: TRACING_TARGET, node_id = endpoint, "Connect rejected");
                return Err(FlowForgeError::InvalidReference(format!("node {} does not exist", endpoint)));
            }
        }

        let edge = WorkflowEdge::new(self.allocate_edge_id(source, target), source, target);
        self.graph.edges.push(edge.clone());

        tracing::debug!(target: TRACING_TARGET, edge_id = %edge.id, "Edge added");
        self.emit(GraphEvent::EdgeAdded { id: edge.id.clone() });
        Ok(edge)
    }

    pub fn apply_node_change(&mut self, change: NodeChange) -> FlowResult<()> {
        match change {
            NodeChange::Position { id, position, dragging } => {
                self.node_mut(&id)?.position = position;
                self.emit(GraphEvent::NodeMoved { id, position, dragging });
            }
            NodeChange::Select { id, selected } => {
                self.node_mut(&id)?.selected = selected;
                self.emit(GraphEvent::NodeSelected { id, selected });
            }
            NodeChange::Remove { id } => {
                let index = self
                    .graph
                    .nodes
                    .iter()
                    .position(|node| node.id == id)
                    .ok_or_else(|| missing_node(&id))?;
                self.graph.nodes.remove(index);

                let (dropped, kept): (Vec<_>, Vec<_>) =
                    std::mem::take(&mut self.graph.edges).into_iter().partition(|edge| edge.touches(&id));
                self.graph.edges = kept;

                tracing::debug!(
                    target: TRACING_TARGET,
                    node_id = %id,
                    cascaded_edges = dropped.len(),
                    "Node removed"
                );
                self.emit(GraphEvent::NodeRemoved { id });
                for edge in dropped {
                    self.emit(GraphEvent::EdgeRemoved { id: edge.id });
                }
            }
        }
        Ok(())
    }

    pub fn apply_edge_change(&mut self, change: EdgeChange) -> FlowResult<()> {
        match change {
            EdgeChange::Select { id, selected } => {
                let edge = self
                    .graph
                    .edges
                    .iter_mut()
                    .find(|edge| edge.id == id)
                    .ok_or_else(|| missing_edge(&id))?;
                edge.selected = selected;
                self.emit(GraphEvent::EdgeSelected { id, selected });
            }
            EdgeChange::Remove { id } => {
                let index = self
                    .graph
                    .edges
                    .iter()
                    .position(|edge| edge.id == id)
                    .ok_or_else(|| missing_edge(&id))?;
                self.graph.edges.remove(index);
                tracing::debug!(target: TRACING_TARGET, edge_id = %id, "Edge removed");
                self.emit(GraphEvent::EdgeRemoved { id });
            }
        }
        Ok(())
    }

    /// Applies a batch of node changes as one unit. Every change is checked
    /// against the graph as it would be at that point in the batch; if any
    /// names a missing node, nothing is applied.
    pub fn apply_node_changes(&mut self, changes: Vec<NodeChange>) -> FlowResult<()> {
        let mut live: HashSet<&str> = self.graph.nodes.iter().map(|node| node.id.as_str()).collect();
        for change in &changes {
            let id = match change {
                NodeChange::Position { id, .. } | NodeChange::Select { id, .. } | NodeChange::Remove { id } => id,
            };
            if !live.contains(id.as_str()) {
                return Err(missing_node(id));
            }
            if matches!(change, NodeChange::Remove { .. }) {
                live.remove(id.as_str());
            }
        }

        for change in changes {
            self.apply_node_change(change)?;
        }
        Ok(())
    }

    /// Edge counterpart of [`NodeGraphModel::apply_node_changes`].
    pub fn apply_edge_changes(&mut self, changes: Vec<EdgeChange>) -> FlowResult<()> {
        let mut live: HashSet<&str> = self.graph.edges.iter().map(|edge| edge.id.as_str()).collect();
        for change in &changes {
            let id = match change {
                EdgeChange::Select { id, .. } | EdgeChange::Remove { id } => id,
            };
            if !live.contains(id.as_str()) {
                return Err(missing_edge(id));
            }
            if matches!(change, EdgeChange::Remove { .. }) {
                live.remove(id.as_str());
            }
        }

        for change in changes {
            self.apply_edge_change(change)?;
        }
        Ok(())
    }

    fn node_mut(&mut self, id: &str) -> FlowResult<&mut WorkflowNode> {
        self.graph
            .nodes
            .iter_mut()
            .find(|node| node.id == id)
            .ok_or_else(|| missing_node(id))
    }

    fn allocate_node_id(&mut self) -> String {
        loop {
            let candidate = self.next_node_id.to_string();
            self.next_node_id = self.next_node_id.saturating_add(1);
            if !self.graph.contains_node(&candidate) {
                return candidate;
            }
        }
    }

    fn allocate_edge_id(&self, source: &str, target: &str) -> String {
        let base = WorkflowEdge::base_id(source, target);
        if self.graph.edge(&base).is_none() {
            return base;
        }
        let mut n = 2;
        loop {
            let candidate = format!("{}#{}", base, n);
            if self.graph.edge(&candidate).is_none() {
                return candidate;
            }
            n += 1;
        }
    }

    fn emit(&mut self, event: GraphEvent) {
        for observer in &mut self.observers {
            observer(&event);
        }
    }
}

fn missing_node(id: &str) -> FlowForgeError {
    FlowForgeError::InvalidReference(format!("node {} does not exist", id))
}

fn missing_edge(id: &str) -> FlowForgeError {
    FlowForgeError::InvalidReference(format!("edge {} does not exist", id))
}
