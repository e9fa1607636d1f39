//! HTTP client for the remote task service
//!
//! One request per operation against `/resources/tasks/`; no retries, no
//! caching. The service owns every task, this side only displays them.

use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

use crate::config::ServiceConfig;
use crate::models::{RunCommand, RunState, Task, TaskPayload};

/// Errors surfaced by task service operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a response (network error, timeout).
    #[error("request to the task service failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("task service error ({status}): {message}")]
    Service { status: StatusCode, message: String },
}

impl ClientError {
    /// Best-available text for the user-facing alert.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Service { message, .. } => message.clone(),
            ClientError::Http(err) => err.to_string(),
        }
    }
}

/// Thin wrapper around `reqwest::Client` bound to the configured service.
#[derive(Debug, Clone)]
pub struct TaskClient {
    http: reqwest::Client,
    resource_url: String,
}

impl TaskClient {
    pub fn new(config: &ServiceConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            resource_url: format!("{}/resources/tasks", config.url.trim_end_matches('/')),
        })
    }

    /// Fetch all tasks, in the order the service returns them.
    pub async fn list(&self) -> Result<Vec<Task>, ClientError> {
        let resp = self.http.get(format!("{}/", self.resource_url)).send().await?;
        Ok(check(resp).await?.json().await?)
    }

    /// Fetch a single task by id.
    pub async fn get(&self, id: i64) -> Result<Task, ClientError> {
        let resp = self
            .http
            .get(format!("{}/{}/", self.resource_url, id))
            .send()
            .await?;
        Ok(check(resp).await?.json().await?)
    }

    /// Create a task from a fully-assembled payload.
    pub async fn create(&self, payload: &TaskPayload) -> Result<(), ClientError> {
        let resp = self
            .http
            .post(format!("{}/", self.resource_url))
            .json(payload)
            .send()
            .await?;
        check(resp).await?;
        Ok(())
    }

    /// Replace an existing task. Submitting the same payload twice produces
    /// the same end state.
    pub async fn update(&self, id: i64, payload: &TaskPayload) -> Result<(), ClientError> {
        let resp = self
            .http
            .put(format!("{}/{}/", self.resource_url, id))
            .json(payload)
            .send()
            .await?;
        check(resp).await?;
        Ok(())
    }

    /// Remove a task by id.
    pub async fn delete(&self, id: i64) -> Result<(), ClientError> {
        let resp = self
            .http
            .delete(format!("{}/{}/", self.resource_url, id))
            .send()
            .await?;
        check(resp).await?;
        Ok(())
    }

    /// Issue a start/stop/restart command and return the resulting state,
    /// so the caller can update the row without a full refetch.
    pub async fn run(&self, id: i64, command: RunCommand) -> Result<RunState, ClientError> {
        let resp = self
            .http
            .patch(format!("{}/{}/{}/", self.resource_url, id, command.as_str()))
            .send()
            .await?;
        Ok(check(resp).await?.json().await?)
    }
}

/// Turn a non-success response into a `Service` error carrying the service's
/// `message` field, falling back to a generic status line.
async fn check(resp: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let message = resp
        .text()
        .await
        .ok()
        .and_then(|body| serde_json::from_str::<serde_json::Value>(&body).ok())
        .and_then(|value| value.get("message")?.as_str().map(str::to_string))
        .unwrap_or_else(|| format!("The task service returned status {status}."));

    Err(ClientError::Service { status, message })
}
