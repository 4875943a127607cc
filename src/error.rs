use crate::gateway::GatewayError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlowForgeError {
    #[error("Invalid reference: {0}")]
    InvalidReference(String),
    #[error("Invalid graph: {0}")]
    InvalidGraph(String),
    #[error("Editor session is not ready (state: {0})")]
    NotReady(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),
}

pub type FlowResult<T> = Result<T, FlowForgeError>;
