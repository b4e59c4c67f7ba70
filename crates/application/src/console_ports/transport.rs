use async_trait::async_trait;
use gatehouse_core::AppResult;
use http::Method;
use serde_json::Value;

/// Port for JSON requests against the console backend.
///
/// Failures are opaque `RemoteOperationFailed` errors and are never retried.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends one request and returns the decoded response body.
    async fn request(&self, url: &str, method: Method, body: Option<Value>) -> AppResult<Value>;
}
