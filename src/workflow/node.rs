use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Step-type-specific settings. Opaque to the editor.
pub type StepConfig = Map<String, Value>;

/// Kind of step a node stands for. Unknown names are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StepType {
    Start,
    End,
    Api,
    Email,
    Custom(String),
}

impl StepType {
    pub fn as_str(&self) -> &str {
        match self {
            StepType::Start => "start",
            StepType::End => "end",
            StepType::Api => "api",
            StepType::Email => "email",
            StepType::Custom(name) => name,
        }
    }
}

impl From<String> for StepType {
    fn from(name: String) -> Self {
        match name.as_str() {
            "start" => StepType::Start,
            "end" => StepType::End,
            "api" => StepType::Api,
            "email" => StepType::Email,
            _ => StepType::Custom(name),
        }
    }
}

impl From<&str> for StepType {
    fn from(name: &str) -> Self {
        StepType::from(name.to_string())
    }
}

impl From<StepType> for String {
    fn from(step_type: StepType) -> Self {
        match step_type {
            StepType::Custom(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for StepType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowNode {
    pub id: String,
    pub step_type: StepType,
    pub label: String,
    pub position: Position,
    #[serde(default)]
    pub config: StepConfig,
    #[serde(default)]
    pub selected: bool,
}

impl WorkflowNode {
    pub fn new(id: impl Into<String>, step_type: StepType, label: impl Into<String>, position: Position) -> Self {
        Self {
            id: id.into(),
            step_type,
            label: label.into(),
            position,
            config: StepConfig::new(),
            selected: false,
        }
    }

    pub fn with_config(mut self, config: StepConfig) -> Self {
        self.config = config;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_step_types_parse() {
        assert_eq!(StepType::from("start"), StepType::Start);
        assert_eq!(StepType::from("end"), StepType::End);
        assert_eq!(StepType::from("api"), StepType::Api);
        assert_eq!(StepType::from("email"), StepType::Email);
    }

    #[test]
    fn test_unknown_step_type_is_kept() {
        let step_type: StepType = serde_json::from_str("\"slack\"").unwrap();
        assert_eq!(step_type, StepType::Custom("slack".to_string()));
        assert_eq!(serde_json::to_string(&step_type).unwrap(), "\"slack\"");
    }

    #[test]
    fn test_step_type_serializes_as_plain_string() {
        assert_eq!(serde_json::to_string(&StepType::Api).unwrap(), "\"api\"");
        assert_eq!(StepType::Email.to_string(), "email");
    }
}
