use crate::config::ApiConfig;
use crate::gateway::error::{GatewayError, GatewayResult};
use crate::gateway::{CredentialProvider, PersistenceGateway};
use crate::workflow::step::{Workflow, WorkflowPayload};
use async_trait::async_trait;
use reqwest::{Client as HttpClient, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

/// Tracing target for workflow API calls.
pub const TRACING_TARGET: &str = "flowforge::gateway";

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct WorkflowData {
    workflow: Workflow,
}

#[derive(Debug, Deserialize)]
struct WorkflowListData {
    workflows: Vec<Workflow>,
}

/// REST client for the `/workflows` resource.
///
/// Every request asks the credential provider for a fresh bearer token.
#[derive(Debug, Clone)]
pub struct HttpWorkflowGateway<C> {
    base_url: Url,
    http: HttpClient,
    credentials: C,
}

impl<C: CredentialProvider> HttpWorkflowGateway<C> {
    /// # Errors
    ///
    /// Returns an error if the base URL is not an absolute http(s) URL or the
    /// HTTP client cannot be created.
    pub fn new(config: &ApiConfig, credentials: C) -> GatewayResult<Self> {
        let raw = config.base_url.trim();
        if !raw.starts_with("http://") && !raw.starts_with("https://") {
            return Err(GatewayError::InvalidUrl(format!(
                "URL must start with http:// or https://, got: {}",
                raw
            )));
        }

        let base_url = Url::parse(raw).map_err(|error| GatewayError::InvalidUrl(error.to_string()))?;
        let http = HttpClient::builder().timeout(config.timeout()).build()?;

        tracing::debug!(
            target: TRACING_TARGET,
            base_url = %base_url,
            timeout_ms = config.timeout_ms,
            "Workflow gateway created"
        );

        Ok(Self {
            base_url,
            http,
            credentials,
        })
    }

    fn url(&self, segments: &[&str]) -> GatewayResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| GatewayError::InvalidUrl(format!("cannot append a path to {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder) -> GatewayResult<Response> {
        let token = self.credentials.bearer_token().await?;
        request.bearer_auth(token).send().await.map_err(GatewayError::Network)
    }

    async fn handle_response<T: DeserializeOwned>(&self, response: Response, resource: &str) -> GatewayResult<T> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!(
                target: TRACING_TARGET,
                status = status.as_u16(),
                resource,
                "Workflow API returned an error"
            );
            return Err(status_error(status, &body, resource));
        }

        serde_json::from_str::<T>(&body).map_err(|error| GatewayError::InvalidResponse(error.to_string()))
    }
}

#[async_trait]
impl<C: CredentialProvider> PersistenceGateway for HttpWorkflowGateway<C> {
    async fn fetch(&self, id: &str) -> GatewayResult<Workflow> {
        let url = self.url(&["workflows", id])?;
        tracing::debug!(target: TRACING_TARGET, workflow_id = id, "Fetching workflow");

        let response = self.send(self.http.get(url)).await?;
        let envelope: Envelope<WorkflowData> = self.handle_response(response, id).await?;
        Ok(envelope.data.workflow)
    }

    async fn list(&self) -> GatewayResult<Vec<Workflow>> {
        let url = self.url(&["workflows"])?;
        let response = self.send(self.http.get(url)).await?;
        let envelope: Envelope<WorkflowListData> = self.handle_response(response, "workflows").await?;

        tracing::debug!(
            target: TRACING_TARGET,
            count = envelope.data.workflows.len(),
            "Listed workflows"
        );
        Ok(envelope.data.workflows)
    }

    async fn create(&self, payload: &WorkflowPayload) -> GatewayResult<Workflow> {
        let url = self.url(&["workflows"])?;
        tracing::debug!(target: TRACING_TARGET, steps = payload.steps.len(), "Creating workflow");

        let response = self.send(self.http.post(url).json(payload)).await?;
        let body: Value = self.handle_response(response, "workflows").await?;
        unwrap_workflow(body)
    }

    async fn update(&self, id: &str, payload: &WorkflowPayload) -> GatewayResult<Workflow> {
        let url = self.url(&["workflows", id])?;
        tracing::debug!(
            target: TRACING_TARGET,
            workflow_id = id,
            steps = payload.steps.len(),
            "Updating workflow"
        );

        let response = self.send(self.http.patch(url).json(payload)).await?;
        let body: Value = self.handle_response(response, id).await?;
        unwrap_workflow(body)
    }
}

/// Accepts both `{ data: { workflow } }` and a bare workflow object.
fn unwrap_workflow(body: Value) -> GatewayResult<Workflow> {
    let inner = match body.pointer("/data/workflow") {
        Some(workflow) => workflow.clone(),
        None => body,
    };
    serde_json::from_value(inner).map_err(|error| GatewayError::InvalidResponse(error.to_string()))
}

fn status_error(status: StatusCode, body: &str, resource: &str) -> GatewayError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| {
            json["error"]
                .as_str()
                .or_else(|| json["message"].as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.to_string());

    match status {
        StatusCode::NOT_FOUND => GatewayError::NotFound(resource.to_string()),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GatewayError::Unauthorized(message),
        _ => GatewayError::Api {
            status: status.as_u16(),
            message,
        },
    }
}
