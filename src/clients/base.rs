//! Uniform transport for outbound backend calls.

use std::time::Duration;

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::broadcast;

use crate::error::{ClientError, ConfigError};

use super::deferred::{Deferred, Settlement};

/// Header carrying the correlation id on every outbound call.
pub const CORRELATION_HEADER: &str = "X-Request-Id";

/// Tracing context attached to one outbound call.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub service: &'static str,
    pub description: &'static str,
    pub correlation_id: String,
}

impl RequestContext {
    pub fn new(
        service: &'static str,
        description: &'static str,
        correlation_id: impl Into<String>,
    ) -> Self {
        Self {
            service,
            description,
            correlation_id: correlation_id.into(),
        }
    }
}

/// Which statuses count as success, and whether classified failures are
/// published to the error feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorMode {
    /// Any 2xx is success; failures only reject the call.
    Modern,
    /// Only 200 and 202 are success; failures are also published to the
    /// error feed.
    Legacy,
}

impl ErrorMode {
    fn accepts(&self, status: u16) -> bool {
        match self {
            Self::Modern => (200..300).contains(&status),
            Self::Legacy => status == 200 || status == 202,
        }
    }
}

/// Classified failure delivered to error-feed subscribers.
#[derive(Debug, Clone)]
pub struct ClientErrorEvent {
    pub service: &'static str,
    pub description: &'static str,
    pub correlation_id: String,
    /// Response status, when the backend answered at all.
    pub status: Option<u16>,
    pub detail: String,
}

/// Thin wrapper over the HTTP transport shared by every service client.
///
/// Cheap to clone; clones share the connection pool and the error feed.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    error_feed: broadcast::Sender<ClientErrorEvent>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ConfigError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;
        let (error_feed, _) = broadcast::channel(32);
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
            error_feed,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Subscribe to classified failures from legacy-mode calls.
    pub fn subscribe_errors(&self) -> broadcast::Receiver<ClientErrorEvent> {
        self.error_feed.subscribe()
    }

    pub async fn get(
        &self,
        path: &str,
        ctx: &RequestContext,
        mode: ErrorMode,
    ) -> Result<Value, ClientError> {
        self.dispatch(Method::GET, path, None, ctx, mode).await
    }

    pub async fn post(
        &self,
        path: &str,
        body: &Value,
        ctx: &RequestContext,
        mode: ErrorMode,
    ) -> Result<Value, ClientError> {
        self.dispatch(Method::POST, path, Some(body), ctx, mode).await
    }

    pub async fn patch(
        &self,
        path: &str,
        body: &Value,
        ctx: &RequestContext,
        mode: ErrorMode,
    ) -> Result<Value, ClientError> {
        self.dispatch(Method::PATCH, path, Some(body), ctx, mode).await
    }

    /// Run a legacy-mode call on its own task, settling a
    /// single-resolution deferred. The spawned call always settles; if the
    /// caller has gone away the result is discarded.
    pub fn dispatch_later(
        &self,
        method: Method,
        path: String,
        body: Option<Value>,
        ctx: RequestContext,
    ) -> Settlement<Value> {
        let (mut deferred, settlement) =
            Deferred::new(ctx.service, ctx.description, ctx.correlation_id.clone());
        let client = self.clone();
        tokio::spawn(async move {
            match client
                .dispatch(method, &path, body.as_ref(), &ctx, ErrorMode::Legacy)
                .await
            {
                Ok(value) => deferred.resolve(value),
                Err(error) => deferred.reject(error),
            };
        });
        settlement
    }

    async fn dispatch(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        ctx: &RequestContext,
        mode: ErrorMode,
    ) -> Result<Value, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(
            service = ctx.service,
            method = %method,
            url = %url,
            correlation_id = %ctx.correlation_id,
            "Calling {}",
            ctx.description
        );

        let mut request = self
            .http
            .request(method, &url)
            .header(CORRELATION_HEADER, &ctx.correlation_id);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(
                    service = ctx.service,
                    correlation_id = %ctx.correlation_id,
                    "Calling {} failed: {e}",
                    ctx.description
                );
                if mode == ErrorMode::Legacy {
                    self.publish(ctx, None, e.to_string());
                }
                return Err(ClientError::Transport {
                    service: ctx.service,
                    description: ctx.description,
                    correlation_id: ctx.correlation_id.clone(),
                    reason: e.to_string(),
                });
            }
        };

        let status = response.status().as_u16();
        if !mode.accepts(status) {
            tracing::warn!(
                service = ctx.service,
                status,
                correlation_id = %ctx.correlation_id,
                "{} returned unexpected status",
                ctx.description
            );
            if mode == ErrorMode::Legacy {
                self.publish(ctx, Some(status), format!("status {status}"));
            }
            return Err(ClientError::UnexpectedStatus {
                service: ctx.service,
                description: ctx.description,
                correlation_id: ctx.correlation_id.clone(),
                status,
            });
        }

        let text = response.text().await.map_err(|e| ClientError::Transport {
            service: ctx.service,
            description: ctx.description,
            correlation_id: ctx.correlation_id.clone(),
            reason: e.to_string(),
        })?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| ClientError::MalformedBody {
            service: ctx.service,
            description: ctx.description,
            correlation_id: ctx.correlation_id.clone(),
            reason: e.to_string(),
        })
    }

    fn publish(&self, ctx: &RequestContext, status: Option<u16>, detail: String) {
        // No subscribers is fine; the send result is irrelevant then.
        let _ = self.error_feed.send(ClientErrorEvent {
            service: ctx.service,
            description: ctx.description,
            correlation_id: ctx.correlation_id.clone(),
            status,
            detail,
        });
    }
}

/// JSON-Patch-like envelope for partial account updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchRequest {
    pub op: PatchOp,
    pub path: String,
    pub value: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchOp {
    Replace,
    Add,
}

impl PatchRequest {
    pub fn replace(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            op: PatchOp::Replace,
            path: path.into(),
            value: value.into(),
        }
    }

    pub fn add(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            op: PatchOp::Add,
            path: path.into(),
            value: value.into(),
        }
    }
}
