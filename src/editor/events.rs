use serde::Serialize;

/// Session-level notifications for the surrounding application.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum EditorEvent {
    Loaded { workflow_id: Option<String> },
    Saved { workflow_id: String },
    /// Leave the editor and show the workflow list.
    NavigateToList,
}
