//! In-memory gateway shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use flowforge_rs_lib::editor::{EditorEvent, SessionHandle};
use flowforge_rs_lib::{EditorController, GatewayError, GatewayResult, PersistenceGateway, Step, Workflow, WorkflowPayload};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Fetch(String),
    List,
    Create(WorkflowPayload),
    Update(String, WorkflowPayload),
}

#[derive(Debug, Default)]
pub struct InMemoryGateway {
    workflows: Mutex<HashMap<String, Workflow>>,
    calls: Mutex<Vec<Call>>,
    fail_fetch: bool,
    fail_save: bool,
    close_on_fetch: Mutex<Option<SessionHandle>>,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_fetch() -> Self {
        Self {
            fail_fetch: true,
            ..Self::default()
        }
    }

    pub fn failing_save() -> Self {
        Self {
            fail_save: true,
            ..Self::default()
        }
    }

    pub fn with_workflow(self, workflow: Workflow) -> Self {
        self.workflows.lock().unwrap().insert(workflow.id.clone(), workflow);
        self
    }

    /// Ends `handle`'s session from inside the next fetch, before it resolves.
    pub fn close_during_fetch(&self, handle: SessionHandle) {
        *self.close_on_fetch.lock().unwrap() = Some(handle);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl PersistenceGateway for InMemoryGateway {
    async fn fetch(&self, id: &str) -> GatewayResult<Workflow> {
        self.record(Call::Fetch(id.to_string()));
        if let Some(handle) = self.close_on_fetch.lock().unwrap().take() {
            handle.close();
        }
        if self.fail_fetch {
            return Err(GatewayError::Api {
                status: 503,
                message: "unavailable".to_string(),
            });
        }
        self.workflows
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| GatewayError::NotFound(id.to_string()))
    }

    async fn list(&self) -> GatewayResult<Vec<Workflow>> {
        self.record(Call::List);
        let mut workflows: Vec<Workflow> = self.workflows.lock().unwrap().values().cloned().collect();
        workflows.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(workflows)
    }

    async fn create(&self, payload: &WorkflowPayload) -> GatewayResult<Workflow> {
        self.record(Call::Create(payload.clone()));
        if self.fail_save {
            return Err(GatewayError::Unauthorized("token expired".to_string()));
        }
        let mut workflows = self.workflows.lock().unwrap();
        let workflow = stored(format!("wf-{}", workflows.len() + 1), payload);
        workflows.insert(workflow.id.clone(), workflow.clone());
        Ok(workflow)
    }

    async fn update(&self, id: &str, payload: &WorkflowPayload) -> GatewayResult<Workflow> {
        self.record(Call::Update(id.to_string(), payload.clone()));
        if self.fail_save {
            return Err(GatewayError::Unauthorized("token expired".to_string()));
        }
        let workflow = stored(id.to_string(), payload);
        self.workflows.lock().unwrap().insert(id.to_string(), workflow.clone());
        Ok(workflow)
    }
}

fn stored(id: String, payload: &WorkflowPayload) -> Workflow {
    Workflow {
        id,
        name: payload.name.clone(),
        description: payload.description.clone(),
        steps: payload.steps.clone(),
        last_edited_at: None,
    }
}

pub fn workflow(id: &str, name: &str, types: &[&str]) -> Workflow {
    Workflow {
        id: id.to_string(),
        name: name.to_string(),
        description: format!("{} description", name),
        steps: types.iter().map(|step_type| Step::new(*step_type)).collect(),
        last_edited_at: None,
    }
}

/// Records every editor event for later assertions.
pub fn record_events<G: PersistenceGateway>(editor: &mut EditorController<G>) -> Arc<Mutex<Vec<EditorEvent>>> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    editor.subscribe(move |event| sink.lock().unwrap().push(event.clone()));
    events
}

pub fn navigations(events: &Arc<Mutex<Vec<EditorEvent>>>) -> usize {
    events
        .lock()
        .unwrap()
        .iter()
        .filter(|event| **event == EditorEvent::NavigateToList)
        .count()
}
