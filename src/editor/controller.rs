use crate::config::{AppConfig, LayoutConfig};
use crate::editor::events::EditorEvent;
use crate::editor::session::{SessionHandle, SessionTicket};
use crate::error::{FlowForgeError, FlowResult};
use crate::gateway::PersistenceGateway;
use crate::workflow::edge::WorkflowEdge;
use crate::workflow::graph::WorkflowGraph;
use crate::workflow::model::{EdgeChange, GraphEvent, NodeChange, NodeGraphModel};
use crate::workflow::node::{StepType, WorkflowNode};
use crate::workflow::serializer;
use crate::workflow::step::{Workflow, WorkflowPayload};
use std::fmt;

pub const TRACING_TARGET: &str = "flowforge::editor";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorMode {
    New,
    Edit { id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Loading,
    Ready,
    Closed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Idle => "idle",
            SessionState::Loading => "loading",
            SessionState::Ready => "ready",
            SessionState::Closed => "closed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The graph is populated and editable.
    Ready,
    /// The fetch failed; the session is over and navigation was requested.
    Aborted,
    /// The session ended while the fetch was pending; the result was dropped.
    Discarded,
}

#[derive(Debug)]
pub enum SaveOutcome {
    Saved(Workflow),
    /// Already logged. The session stays open with the graph untouched.
    Failed,
}

type EditorObserver = Box<dyn FnMut(&EditorEvent) + Send>;

/// Drives one editing session: entry in new or edit mode, graph mutations,
/// and save.
///
/// Fetch and save failures never reach the caller as errors. A failed fetch
/// ends the session with a [`EditorEvent::NavigateToList`] signal; a failed
/// save is logged and otherwise ignored. Saving is last-write-wins.
pub struct EditorController<G> {
    gateway: G,
    mode: EditorMode,
    state: SessionState,
    name: String,
    description: String,
    graph: NodeGraphModel,
    session: SessionHandle,
    ticket: SessionTicket,
    observers: Vec<EditorObserver>,
}

impl<G> fmt::Debug for EditorController<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorController")
            .field("mode", &self.mode)
            .field("state", &self.state)
            .field("name", &self.name)
            .field("graph", &self.graph)
            .finish_non_exhaustive()
    }
}

impl<G: PersistenceGateway> EditorController<G> {
    pub fn new(gateway: G, config: &AppConfig) -> Self {
        Self::with_layout(gateway, config.layout)
    }

    pub fn with_layout(gateway: G, layout: LayoutConfig) -> Self {
        let session = SessionHandle::new();
        let ticket = session.ticket();
        Self {
            gateway,
            mode: EditorMode::New,
            state: SessionState::Idle,
            name: String::new(),
            description: String::new(),
            graph: NodeGraphModel::new(layout),
            session,
            ticket,
            observers: Vec::new(),
        }
    }

    pub fn mode(&self) -> &EditorMode {
        &self.mode
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn graph(&self) -> &WorkflowGraph {
        self.graph.graph()
    }

    /// Handle that can end this session from elsewhere, e.g. a router.
    pub fn session_handle(&self) -> SessionHandle {
        self.session.clone()
    }

    pub fn subscribe(&mut self, observer: impl FnMut(&EditorEvent) + Send + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn subscribe_graph(&mut self, observer: impl FnMut(&GraphEvent) + Send + 'static) {
        self.graph.subscribe(observer);
    }

    /// Starts the session. `None` opens a blank workflow, `Some(id)` loads an
    /// existing one.
    pub async fn enter(&mut self, workflow_id: Option<&str>) -> FlowResult<LoadOutcome> {
        if self.state != SessionState::Idle {
            return Err(FlowForgeError::NotReady(self.state.to_string()));
        }

        match workflow_id {
            None => {
                self.start_new();
                Ok(LoadOutcome::Ready)
            }
            Some(id) => Ok(self.load_existing(id).await),
        }
    }

    fn start_new(&mut self) {
        self.mode = EditorMode::New;
        self.graph.clear();
        let start_position = self.graph.layout().start_position;
        self.graph.add_node_at(StepType::Start, start_position);
        self.state = SessionState::Ready;

        tracing::info!(target: TRACING_TARGET, "Started new workflow");
        self.emit(EditorEvent::Loaded { workflow_id: None });
    }

    async fn load_existing(&mut self, id: &str) -> LoadOutcome {
        self.mode = EditorMode::Edit { id: id.to_string() };
        self.state = SessionState::Loading;

        let result = self.gateway.fetch(id).await;

        if !self.session.is_current(self.ticket) {
            tracing::debug!(
                target: TRACING_TARGET,
                workflow_id = id,
                "Session ended before fetch resolved; dropping result"
            );
            self.state = SessionState::Closed;
            return LoadOutcome::Discarded;
        }

        let workflow = match result {
            Ok(workflow) => workflow,
            Err(error) => {
                tracing::error!(target: TRACING_TARGET, workflow_id = id, %error, "Error fetching workflow");
                self.abort();
                return LoadOutcome::Aborted;
            }
        };

        let graph = serializer::deserialize_with_layout(&workflow.steps, self.graph.layout());
        if let Err(error) = self.graph.load(graph) {
            tracing::error!(target: TRACING_TARGET, workflow_id = id, %error, "Fetched workflow is not editable");
            self.abort();
            return LoadOutcome::Aborted;
        }

        self.name = workflow.name;
        self.description = workflow.description;
        self.state = SessionState::Ready;

        tracing::info!(
            target: TRACING_TARGET,
            workflow_id = id,
            steps = workflow.steps.len(),
            "Workflow loaded"
        );
        self.emit(EditorEvent::Loaded {
            workflow_id: Some(id.to_string()),
        });
        LoadOutcome::Ready
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> FlowResult<()> {
        self.ensure_ready()?;
        self.name = name.into();
        Ok(())
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> FlowResult<()> {
        self.ensure_ready()?;
        self.description = description.into();
        Ok(())
    }

    pub fn add_node(&mut self, step_type: StepType) -> FlowResult<WorkflowNode> {
        self.ensure_ready()?;
        Ok(self.graph.add_node(step_type))
    }

    pub fn connect(&mut self, source: &str, target: &str) -> FlowResult<WorkflowEdge> {
        self.ensure_ready()?;
        self.graph.connect(source, target)
    }

    pub fn apply_node_change(&mut self, change: NodeChange) -> FlowResult<()> {
        self.ensure_ready()?;
        self.graph.apply_node_change(change)
    }

    pub fn apply_edge_change(&mut self, change: EdgeChange) -> FlowResult<()> {
        self.ensure_ready()?;
        self.graph.apply_edge_change(change)
    }

    pub fn apply_node_changes(&mut self, changes: Vec<NodeChange>) -> FlowResult<()> {
        self.ensure_ready()?;
        self.graph.apply_node_changes(changes)
    }

    pub fn apply_edge_changes(&mut self, changes: Vec<EdgeChange>) -> FlowResult<()> {
        self.ensure_ready()?;
        self.graph.apply_edge_changes(changes)
    }

    /// What `save` would send right now.
    pub fn payload(&self) -> WorkflowPayload {
        WorkflowPayload {
            name: self.name.clone(),
            description: self.description.clone(),
            steps: serializer::serialize(self.graph.graph()),
        }
    }

    /// Creates or updates the workflow depending on the mode.
    ///
    /// Only a session that is not ready yields `Err`; remote failures come
    /// back as [`SaveOutcome::Failed`].
    pub async fn save(&mut self) -> FlowResult<SaveOutcome> {
        self.ensure_ready()?;
        let payload = self.payload();

        let result = match &self.mode {
            EditorMode::New => self.gateway.create(&payload).await,
            EditorMode::Edit { id } => self.gateway.update(id, &payload).await,
        };

        let workflow = match result {
            Ok(workflow) => workflow,
            Err(error) => {
                tracing::error!(target: TRACING_TARGET, %error, "Error saving workflow");
                return Ok(SaveOutcome::Failed);
            }
        };

        tracing::info!(
            target: TRACING_TARGET,
            workflow_id = %workflow.id,
            steps = payload.steps.len(),
            "Workflow saved"
        );

        if self.session.is_current(self.ticket) {
            self.emit(EditorEvent::Saved {
                workflow_id: workflow.id.clone(),
            });
            self.emit(EditorEvent::NavigateToList);
        }
        self.finish();
        Ok(SaveOutcome::Saved(workflow))
    }

    /// Ends the session without saving, e.g. on navigation away.
    pub fn close(&mut self) {
        if self.state == SessionState::Closed {
            return;
        }
        tracing::debug!(target: TRACING_TARGET, "Editor session closed");
        self.finish();
    }

    fn abort(&mut self) {
        self.finish();
        self.emit(EditorEvent::NavigateToList);
    }

    fn finish(&mut self) {
        self.session.close();
        self.state = SessionState::Closed;
        self.graph.clear();
    }

    fn ensure_ready(&mut self) -> FlowResult<()> {
        if self.state == SessionState::Ready && !self.session.is_current(self.ticket) {
            self.state = SessionState::Closed;
            self.graph.clear();
        }
        if self.state != SessionState::Ready {
            return Err(FlowForgeError::NotReady(self.state.to_string()));
        }
        Ok(())
    }

    fn emit(&mut self, event: EditorEvent) {
        for observer in &mut self.observers {
            observer(&event);
        }
    }
}
