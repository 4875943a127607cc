//! Authenticated CRUD access to persisted workflows.
//!
//! The editor only depends on the [`PersistenceGateway`] trait;
//! [`HttpWorkflowGateway`] is the REST implementation.

mod error;
mod http;

pub use error::{GatewayError, GatewayResult};
pub use http::HttpWorkflowGateway;

use crate::workflow::step::{Workflow, WorkflowPayload};
use async_trait::async_trait;
use std::sync::Arc;

/// Source of the bearer token attached to every request.
///
/// Called once per request; implementations decide whether to cache.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn bearer_token(&self) -> GatewayResult<String>;
}

/// A fixed token, e.g. from configuration or a test.
#[derive(Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl std::fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("StaticToken(..)")
    }
}

#[async_trait]
impl CredentialProvider for StaticToken {
    async fn bearer_token(&self) -> GatewayResult<String> {
        if self.0.trim().is_empty() {
            return Err(GatewayError::Auth("no credential available".to_string()));
        }
        Ok(self.0.clone())
    }
}

#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    async fn fetch(&self, id: &str) -> GatewayResult<Workflow>;

    async fn list(&self) -> GatewayResult<Vec<Workflow>>;

    async fn create(&self, payload: &WorkflowPayload) -> GatewayResult<Workflow>;

    async fn update(&self, id: &str, payload: &WorkflowPayload) -> GatewayResult<Workflow>;
}

#[async_trait]
impl<G: PersistenceGateway + ?Sized> PersistenceGateway for Arc<G> {
    async fn fetch(&self, id: &str) -> GatewayResult<Workflow> {
        (**self).fetch(id).await
    }

    async fn list(&self) -> GatewayResult<Vec<Workflow>> {
        (**self).list().await
    }

    async fn create(&self, payload: &WorkflowPayload) -> GatewayResult<Workflow> {
        (**self).create(payload).await
    }

    async fn update(&self, id: &str, payload: &WorkflowPayload) -> GatewayResult<Workflow> {
        (**self).update(id, payload).await
    }
}
