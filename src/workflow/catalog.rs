use crate::workflow::node::StepType;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeColor {
    Green,
    Red,
    Blue,
    Yellow,
    Gray,
}

impl NodeColor {
    pub fn hex(self) -> &'static str {
        match self {
            NodeColor::Green => "#22c55e",
            NodeColor::Red => "#ef4444",
            NodeColor::Blue => "#3b82f6",
            NodeColor::Yellow => "#eab308",
            NodeColor::Gray => "#6b7280",
        }
    }
}

/// How a step type appears in the sidebar palette and on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepDescriptor {
    pub step_type: StepType,
    pub display_name: String,
    pub color: NodeColor,
}

const BUILTIN: [(&str, &str, NodeColor); 4] = [
    ("start", "Start", NodeColor::Green),
    ("end", "End", NodeColor::Red),
    ("api", "API Call", NodeColor::Blue),
    ("email", "Email", NodeColor::Yellow),
];

/// Built-in step types in sidebar order.
pub fn palette() -> Vec<StepDescriptor> {
    BUILTIN
        .iter()
        .map(|(name, display_name, color)| StepDescriptor {
            step_type: StepType::from(*name),
            display_name: display_name.to_string(),
            color: *color,
        })
        .collect()
}

pub fn descriptor(step_type: &StepType) -> StepDescriptor {
    BUILTIN
        .iter()
        .find(|(name, _, _)| *name == step_type.as_str())
        .map(|(_, display_name, color)| StepDescriptor {
            step_type: step_type.clone(),
            display_name: display_name.to_string(),
            color: *color,
        })
        .unwrap_or_else(|| StepDescriptor {
            step_type: step_type.clone(),
            display_name: step_type.as_str().to_string(),
            color: NodeColor::Gray,
        })
}

/// Labels are not persisted, so a node is always labelled by its type name.
pub fn default_label(step_type: &StepType) -> String {
    step_type.as_str().to_string()
}
