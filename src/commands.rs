use crate::editor::{EditorController, SaveOutcome};
use crate::error::FlowResult;
use crate::gateway::{GatewayResult, PersistenceGateway};
use crate::workflow::catalog::{self, StepDescriptor};
use crate::workflow::edge::WorkflowEdge;
use crate::workflow::model::{EdgeChange, NodeChange};
use crate::workflow::node::{StepType, WorkflowNode};
use crate::workflow::step::Workflow;
use serde::{Deserialize, Serialize};

/// A request from the rendering layer, in its JSON form.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum EditorCommand {
    #[serde(rename_all = "camelCase")]
    AddNode { step_type: StepType },
    Connect { source: String, target: String },
    NodeChanges { changes: Vec<NodeChange> },
    EdgeChanges { changes: Vec<EdgeChange> },
    SetName { name: String },
    SetDescription { description: String },
    Save,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "reply", rename_all = "camelCase")]
pub enum CommandReply {
    NodeAdded { node: WorkflowNode },
    EdgeAdded { edge: WorkflowEdge },
    Applied,
    Saved { workflow: Workflow },
    SaveFailed,
}

pub async fn execute<G: PersistenceGateway>(
    editor: &mut EditorController<G>,
    command: EditorCommand,
) -> FlowResult<CommandReply> {
    let reply = match command {
        EditorCommand::AddNode { step_type } => CommandReply::NodeAdded {
            node: editor.add_node(step_type)?,
        },
        EditorCommand::Connect { source, target } => CommandReply::EdgeAdded {
            edge: editor.connect(&source, &target)?,
        },
        EditorCommand::NodeChanges { changes } => {
            editor.apply_node_changes(changes)?;
            CommandReply::Applied
        }
        EditorCommand::EdgeChanges { changes } => {
            editor.apply_edge_changes(changes)?;
            CommandReply::Applied
        }
        EditorCommand::SetName { name } => {
            editor.set_name(name)?;
            CommandReply::Applied
        }
        EditorCommand::SetDescription { description } => {
            editor.set_description(description)?;
            CommandReply::Applied
        }
        EditorCommand::Save => match editor.save().await? {
            SaveOutcome::Saved(workflow) => CommandReply::Saved { workflow },
            SaveOutcome::Failed => CommandReply::SaveFailed,
        },
    };
    Ok(reply)
}

/// Sidebar entries for adding nodes.
pub fn palette() -> Vec<StepDescriptor> {
    catalog::palette()
}

/// Workflows whose name contains `term`, ignoring case. An empty term
/// matches everything.
pub async fn search_workflows<G: PersistenceGateway>(gateway: &G, term: &str) -> GatewayResult<Vec<Workflow>> {
    let needle = term.to_lowercase();
    let workflows = gateway.list().await?;
    Ok(workflows
        .into_iter()
        .filter(|workflow| workflow.name.to_lowercase().contains(&needle))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::node::Position;

    #[test]
    fn test_command_wire_format() {
        let command: EditorCommand = serde_json::from_str(r#"{ "command": "addNode", "stepType": "email" }"#).unwrap();
        assert!(matches!(command, EditorCommand::AddNode { step_type: StepType::Email }));

        let command: EditorCommand = serde_json::from_str(
            r#"{ "command": "nodeChanges", "changes": [
                { "type": "position", "id": "2", "position": { "x": 5.0, "y": 6.0 }, "dragging": true },
                { "type": "remove", "id": "3" }
            ] }"#,
        )
        .unwrap();
        match command {
            EditorCommand::NodeChanges { changes } => {
                assert_eq!(changes.len(), 2);
                assert_eq!(
                    changes[0],
                    NodeChange::Position {
                        id: "2".into(),
                        position: Position::new(5.0, 6.0),
                        dragging: true
                    }
                );
            }
            other => panic!("unexpected command: {:?}", other),
        }

        let command: EditorCommand = serde_json::from_str(r#"{ "command": "save" }"#).unwrap();
        assert!(matches!(command, EditorCommand::Save));
    }

    #[test]
    fn test_palette_lists_builtins() {
        assert_eq!(palette().len(), 4);
    }
}
