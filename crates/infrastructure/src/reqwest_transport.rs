use std::time::Duration;

use async_trait::async_trait;
use gatehouse_application::Transport;
use gatehouse_core::{AppError, AppResult};
use http::Method;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

/// HTTP transport sending and receiving JSON bodies.
///
/// Requests are never retried; the caller decides whether to try again.
#[derive(Clone)]
pub struct ReqwestTransport {
    http_client: reqwest::Client,
}

impl ReqwestTransport {
    /// Creates a transport whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| AppError::Internal(format!("failed to build HTTP client: {error}")))?;

        Ok(Self { http_client })
    }

    /// Wraps an existing client.
    #[must_use]
    pub fn with_client(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }
}

fn parse_body(method: &Method, url: &Url, body: &str) -> AppResult<Value> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str(body).map_err(|error| {
        AppError::RemoteOperationFailed(format!("{method} {url} returned invalid JSON: {error}"))
    })
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn request(&self, url: &str, method: Method, body: Option<Value>) -> AppResult<Value> {
        let url = Url::parse(url)
            .map_err(|error| AppError::Validation(format!("invalid request url '{url}': {error}")))?;

        let mut builder = self.http_client.request(method.clone(), url.clone());
        if let Some(body) = &body {
            builder = builder.json(body);
        }

        debug!(method = %method, url = %url, "sending request");
        let response = builder.send().await.map_err(|error| {
            warn!(method = %method, url = %url, error = %error, "request failed");
            AppError::RemoteOperationFailed(format!("{method} {url} failed: {error}"))
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "<response body unavailable>".to_owned());

        if !status.is_success() {
            warn!(method = %method, url = %url, status = %status, "request rejected");
            return Err(AppError::RemoteOperationFailed(format!(
                "{method} {url} returned {status}: {text}"
            )));
        }

        parse_body(&method, &url, &text)
    }
}
