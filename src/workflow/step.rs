use crate::workflow::node::{Position, StepConfig, StepType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// One persisted unit of workflow behavior, stored in execution order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    #[serde(rename = "type")]
    pub step_type: StepType,
    #[serde(default, deserialize_with = "null_as_default")]
    pub config: StepConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

impl Step {
    pub fn new(step_type: impl Into<StepType>) -> Self {
        Self {
            step_type: step_type.into(),
            config: StepConfig::new(),
            position: None,
        }
    }

    pub fn with_config(mut self, config: StepConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub steps: Vec<Step>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_edited_at: Option<DateTime<Utc>>,
}

/// Body of `POST /workflows` and `PATCH /workflows/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowPayload {
    pub name: String,
    pub description: String,
    pub steps: Vec<Step>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_step_wire_shape() {
        let step = Step::new("api").with_position(Position::new(250.0, 100.0));
        let value = serde_json::to_value(&step).unwrap();
        assert_eq!(value, json!({ "type": "api", "config": {}, "position": { "x": 250.0, "y": 100.0 } }));
    }

    #[test]
    fn test_step_null_config_is_empty() {
        let step: Step = serde_json::from_value(json!({ "type": "email", "config": null })).unwrap();
        assert_eq!(step.step_type, StepType::Email);
        assert!(step.config.is_empty());
        assert!(step.position.is_none());
    }

    #[test]
    fn test_workflow_accepts_mongo_id_and_nulls() {
        let workflow: Workflow = serde_json::from_value(json!({
            "_id": "65f0c0ffee",
            "name": "Onboarding",
            "description": null,
            "steps": [{ "type": "start" }],
            "lastEditedAt": "2024-03-01T10:00:00Z"
        }))
        .unwrap();
        assert_eq!(workflow.id, "65f0c0ffee");
        assert_eq!(workflow.description, "");
        assert_eq!(workflow.steps.len(), 1);
        assert!(workflow.last_edited_at.is_some());
    }
}
