//! Client for the webhooks service.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::{ClientError, ConfigError};

use super::base::{ApiClient, ErrorMode, RequestContext};

pub const SERVICE_NAME: &str = "webhooks";

/// A webhook registered for a service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Webhook {
    pub external_id: String,
    #[serde(default)]
    pub callback_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub live: bool,
}

pub struct WebhooksClient {
    api: ApiClient,
}

impl WebhooksClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ConfigError> {
        Ok(Self {
            api: ApiClient::new(base_url, timeout)?,
        })
    }

    /// List the webhooks registered for a service.
    pub async fn list_webhooks(
        &self,
        service_id: &str,
        live: bool,
        correlation_id: &str,
    ) -> Result<Vec<Webhook>, ClientError> {
        let ctx = RequestContext::new(SERVICE_NAME, "list webhooks", correlation_id);
        let path = format!("/v1/webhook?service_id={service_id}&live={live}");
        let body = self.api.get(&path, &ctx, ErrorMode::Modern).await?;
        serde_json::from_value(body).map_err(|e| ClientError::MalformedBody {
            service: ctx.service,
            description: ctx.description,
            correlation_id: ctx.correlation_id.clone(),
            reason: e.to_string(),
        })
    }

    /// Register a webhook for a service.
    pub async fn create_webhook(
        &self,
        service_id: &str,
        callback_url: &str,
        description: &str,
        live: bool,
        correlation_id: &str,
    ) -> Result<Value, ClientError> {
        let ctx = RequestContext::new(SERVICE_NAME, "create webhook", correlation_id);
        let body = json!({
            "service_id": service_id,
            "callback_url": callback_url,
            "description": description,
            "live": live,
        });
        self.api.post("/v1/webhook", &body, &ctx, ErrorMode::Modern).await
    }
}
