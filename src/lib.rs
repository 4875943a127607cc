pub mod commands;
pub mod config;
pub mod editor;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod workflow;

pub use config::AppConfig;
pub use editor::{EditorController, EditorEvent, EditorMode, LoadOutcome, SaveOutcome, SessionState};
pub use error::{FlowForgeError, FlowResult};
pub use gateway::{CredentialProvider, GatewayError, GatewayResult, HttpWorkflowGateway, PersistenceGateway, StaticToken};
pub use workflow::step::{Step, Workflow, WorkflowPayload};
