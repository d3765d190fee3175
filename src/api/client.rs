//! HTTP implementation of [`TimerApi`]

use async_trait::async_trait;
use reqwest::{Method, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use super::{
    responses::{AdjustTimerRequest, CreateTimerRequest, ErrorBody, HealthResponse},
    TimerApi,
};
use crate::{
    error::{PanelError, Result},
    state::Timer,
};

/// Which operation a request belongs to. Decides the generic failure
/// message and how a structured rejection is classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    List,
    Create,
    Adjust,
    Restart,
    Delete,
    Health,
}

impl Operation {
    fn generic_failure(&self) -> &'static str {
        match self {
            Operation::List => "Failed to load timers",
            Operation::Create => "Failed to create timer",
            Operation::Adjust => "Failed to adjust timer",
            Operation::Restart => "Failed to restart timer",
            Operation::Delete => "Failed to delete timer",
            Operation::Health => "Health check failed",
        }
    }

    /// A structured rejection of user input is a validation error; for the
    /// other operations it is still reported as a failed request.
    fn rejection(&self, message: String) -> PanelError {
        match self {
            Operation::Create => PanelError::validation(message),
            _ => PanelError::network(message),
        }
    }
}

/// Client for the timer REST API
#[derive(Debug, Clone)]
pub struct RequestClient {
    http: reqwest::Client,
    base: String,
}

impl RequestClient {
    /// `base` is the API prefix, e.g. `http://host:8000/tools/wos/refill-bot-en/api`
    pub fn new(base: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| PanelError::network(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self::with_client(http, base))
    }

    pub fn with_client(http: reqwest::Client, base: impl Into<String>) -> Self {
        let base = base.into().trim_end_matches('/').to_string();
        Self { http, base }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// Query server health
    pub async fn health(&self) -> Result<HealthResponse> {
        let response = self
            .send(Operation::Health, Method::GET, "/health", None::<&()>)
            .await?;
        Self::decode(Operation::Health, response).await
    }

    async fn send<B: serde::Serialize + ?Sized>(
        &self,
        operation: Operation,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Response> {
        let url = self.url(path);
        debug!("{} {}", method, url);

        let mut request = self.http.request(method, &url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            PanelError::network(format!("{}: {}", operation.generic_failure(), describe(&e)))
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        debug!("{} {} answered {}: {}", operation.generic_failure(), url, status, text);
        match ErrorBody::message_from(&text) {
            Some(message) => Err(operation.rejection(message)),
            None => Err(PanelError::network(format!(
                "{} (HTTP {})",
                operation.generic_failure(),
                status.as_u16()
            ))),
        }
    }

    async fn decode<T: DeserializeOwned>(operation: Operation, response: Response) -> Result<T> {
        response.json::<T>().await.map_err(|e| {
            PanelError::network(format!(
                "{}: unexpected response ({})",
                operation.generic_failure(),
                e
            ))
        })
    }
}

fn describe(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "request timed out".to_string()
    } else if e.is_connect() {
        "server unreachable".to_string()
    } else {
        e.to_string()
    }
}

#[async_trait]
impl TimerApi for RequestClient {
    async fn list(&self) -> Result<Vec<Timer>> {
        let response = self
            .send(Operation::List, Method::GET, "/timers", None::<&()>)
            .await?;
        Self::decode(Operation::List, response).await
    }

    async fn create(&self, name: &str, minutes: u32, seconds: u32) -> Result<Timer> {
        let body = CreateTimerRequest {
            name: name.to_string(),
            minutes,
            seconds,
        };
        let response = self
            .send(Operation::Create, Method::POST, "/timers", Some(&body))
            .await?;
        let timer: Timer = Self::decode(Operation::Create, response).await?;
        info!("Timer created: {} - {}", timer.id, timer.name);
        Ok(timer)
    }

    async fn adjust(&self, id: &str, delta_seconds: i32) -> Result<()> {
        let body = AdjustTimerRequest {
            adjust_seconds: delta_seconds,
        };
        self.send(Operation::Adjust, Method::PATCH, &format!("/timers/{}", id), Some(&body))
            .await?;
        info!("Timer adjusted: {} ({:+}s)", id, delta_seconds);
        Ok(())
    }

    async fn restart(&self, id: &str) -> Result<()> {
        self.send(
            Operation::Restart,
            Method::POST,
            &format!("/timers/{}/restart", id),
            None::<&()>,
        )
        .await?;
        info!("Timer restarted: {}", id);
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.send(Operation::Delete, Method::DELETE, &format!("/timers/{}", id), None::<&()>)
            .await?;
        info!("Timer deleted: {}", id);
        Ok(())
    }
}
