//! Client for the connector service.

use std::time::Duration;

use reqwest::Method;
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::sync::broadcast;

use crate::error::{ClientError, ConfigError};
use crate::setup::{SetupTask, StripeSetupProgress};

use super::base::{ApiClient, ClientErrorEvent, ErrorMode, PatchRequest, RequestContext};
use super::paths::{ConnectorPath, expand};

pub const SERVICE_NAME: &str = "connector";

/// A gateway account as returned by the connector.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayAccount {
    pub gateway_account_id: u64,
    pub external_id: String,
    pub payment_provider: String,
}

impl GatewayAccount {
    pub fn is_stripe(&self) -> bool {
        self.payment_provider == "stripe"
    }
}

/// The Stripe account linked to a gateway account.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeAccount {
    pub stripe_account_id: String,
}

pub struct ConnectorClient {
    api: ApiClient,
}

impl ConnectorClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ConfigError> {
        Ok(Self {
            api: ApiClient::new(base_url, timeout)?,
        })
    }

    /// Subscribe to classified failures from this client's legacy calls.
    pub fn subscribe_errors(&self) -> broadcast::Receiver<ClientErrorEvent> {
        self.api.subscribe_errors()
    }

    /// Retrieve a gateway account.
    pub async fn get_account(
        &self,
        gateway_account_id: u64,
        correlation_id: &str,
    ) -> Result<GatewayAccount, ClientError> {
        let ctx = RequestContext::new(SERVICE_NAME, "get an account", correlation_id);
        let path = expand(
            ConnectorPath::FrontendAccount.template(),
            &[("accountId", &gateway_account_id.to_string())],
        );
        let body = self.api.get(&path, &ctx, ErrorMode::Modern).await?;
        decode(body, &ctx)
    }

    /// Retrieve a gateway account by its external id.
    pub async fn get_account_by_external_id(
        &self,
        external_id: &str,
        correlation_id: &str,
    ) -> Result<GatewayAccount, ClientError> {
        let ctx = RequestContext::new(SERVICE_NAME, "get an account", correlation_id);
        let path = expand(
            ConnectorPath::AccountByExternalId.template(),
            &[("externalId", external_id)],
        );
        let body = self.api.get(&path, &ctx, ErrorMode::Modern).await?;
        decode(body, &ctx)
    }

    /// Replace the gateway credentials on an account.
    pub async fn patch_account_credentials(
        &self,
        gateway_account_id: u64,
        payload: Value,
        correlation_id: &str,
    ) -> Result<Value, ClientError> {
        let ctx = RequestContext::new(
            SERVICE_NAME,
            "patch gateway account credentials",
            correlation_id,
        );
        let path = expand(
            ConnectorPath::Credentials.template(),
            &[("accountId", &gateway_account_id.to_string())],
        );
        self.api.patch(&path, &payload, &ctx, ErrorMode::Modern).await
    }

    /// Submit a refund for a charge.
    pub async fn post_charge_refund(
        &self,
        gateway_account_id: u64,
        charge_id: &str,
        payload: Value,
        correlation_id: &str,
    ) -> Result<Value, ClientError> {
        let ctx = RequestContext::new(SERVICE_NAME, "submit refund", correlation_id);
        let path = expand(
            ConnectorPath::ChargeRefunds.template(),
            &[
                ("accountId", &gateway_account_id.to_string()),
                ("chargeId", charge_id),
            ],
        );
        self.api.post(&path, &payload, &ctx, ErrorMode::Modern).await
    }

    /// Retrieve the Stripe setup flags for a gateway account.
    pub async fn get_stripe_account_setup(
        &self,
        gateway_account_id: u64,
        correlation_id: &str,
    ) -> Result<StripeSetupProgress, ClientError> {
        let ctx = RequestContext::new(
            SERVICE_NAME,
            "get stripe account setup flags for gateway account",
            correlation_id,
        );
        let path = expand(
            ConnectorPath::StripeSetup.template(),
            &[("accountId", &gateway_account_id.to_string())],
        );
        let body = self
            .api
            .dispatch_later(Method::GET, path, None, ctx.clone())
            .wait()
            .await?;
        decode(body, &ctx)
    }

    /// Mark one setup task complete. Flags are monotonic, so repeating
    /// this call is a no-op for the caller.
    pub async fn set_stripe_account_setup_flag(
        &self,
        gateway_account_id: u64,
        task: SetupTask,
        correlation_id: &str,
    ) -> Result<(), ClientError> {
        let ctx = RequestContext::new(
            SERVICE_NAME,
            "set stripe account setup flag to true for gateway account",
            correlation_id,
        );
        let path = expand(
            ConnectorPath::StripeSetup.template(),
            &[("accountId", &gateway_account_id.to_string())],
        );
        self.api
            .dispatch_later(Method::PATCH, path, Some(flag_patch_body(task)), ctx)
            .wait()
            .await?;
        Ok(())
    }

    /// Retrieve the Stripe account linked to a gateway account.
    pub async fn get_stripe_account(
        &self,
        gateway_account_id: u64,
        correlation_id: &str,
    ) -> Result<StripeAccount, ClientError> {
        let ctx = RequestContext::new(
            SERVICE_NAME,
            "get stripe account for gateway account",
            correlation_id,
        );
        let path = expand(
            ConnectorPath::StripeAccount.template(),
            &[("accountId", &gateway_account_id.to_string())],
        );
        let body = self
            .api
            .dispatch_later(Method::GET, path, None, ctx.clone())
            .wait()
            .await?;
        decode(body, &ctx)
    }

    pub async fn toggle_apple_pay(
        &self,
        gateway_account_id: u64,
        allow: bool,
        correlation_id: &str,
    ) -> Result<(), ClientError> {
        self.patch_account_field(
            gateway_account_id,
            PatchRequest::replace("allow_apple_pay", allow),
            "toggle allow apple pay",
            correlation_id,
        )
        .await
    }

    pub async fn toggle_google_pay(
        &self,
        gateway_account_id: u64,
        allow: bool,
        correlation_id: &str,
    ) -> Result<(), ClientError> {
        self.patch_account_field(
            gateway_account_id,
            PatchRequest::replace("allow_google_pay", allow),
            "toggle allow google pay",
            correlation_id,
        )
        .await
    }

    pub async fn toggle_moto_mask_card_number_input(
        &self,
        gateway_account_id: u64,
        mask: bool,
        correlation_id: &str,
    ) -> Result<(), ClientError> {
        self.patch_account_field(
            gateway_account_id,
            PatchRequest::replace("moto_mask_card_number_input", mask),
            "toggle card number masking",
            correlation_id,
        )
        .await
    }

    pub async fn toggle_moto_mask_security_code_input(
        &self,
        gateway_account_id: u64,
        mask: bool,
        correlation_id: &str,
    ) -> Result<(), ClientError> {
        self.patch_account_field(
            gateway_account_id,
            PatchRequest::replace("moto_mask_card_security_code_input", mask),
            "toggle security code masking",
            correlation_id,
        )
        .await
    }

    pub async fn update_integration_version_3ds(
        &self,
        gateway_account_id: u64,
        version: u8,
        correlation_id: &str,
    ) -> Result<(), ClientError> {
        self.patch_account_field(
            gateway_account_id,
            PatchRequest::replace("integration_version_3ds", version),
            "set 3DS integration version",
            correlation_id,
        )
        .await
    }

    pub async fn set_gateway_merchant_id(
        &self,
        gateway_account_id: u64,
        gateway_merchant_id: &str,
        correlation_id: &str,
    ) -> Result<(), ClientError> {
        self.patch_account_field(
            gateway_account_id,
            PatchRequest::add("credentials/gateway_merchant_id", gateway_merchant_id),
            "set gateway merchant id",
            correlation_id,
        )
        .await
    }

    async fn patch_account_field(
        &self,
        gateway_account_id: u64,
        patch: PatchRequest,
        description: &'static str,
        correlation_id: &str,
    ) -> Result<(), ClientError> {
        let ctx = RequestContext::new(SERVICE_NAME, description, correlation_id);
        let path = expand(
            ConnectorPath::Account.template(),
            &[("accountId", &gateway_account_id.to_string())],
        );
        let body = serde_json::to_value(&patch).map_err(|e| ClientError::InvalidPayload {
            model: "PatchRequest",
            reason: e.to_string(),
        })?;
        self.api.patch(&path, &body, &ctx, ErrorMode::Modern).await?;
        Ok(())
    }
}

/// The stripe-setup PATCH wraps its envelope in a single-element array.
fn flag_patch_body(task: SetupTask) -> Value {
    json!([PatchRequest::replace(task.path(), true)])
}

fn decode<T: serde::de::DeserializeOwned>(
    body: Value,
    ctx: &RequestContext,
) -> Result<T, ClientError> {
    serde_json::from_value(body).map_err(|e| ClientError::MalformedBody {
        service: ctx.service,
        description: ctx.description,
        correlation_id: ctx.correlation_id.clone(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_patch_body_is_a_single_element_array() {
        assert_eq!(
            flag_patch_body(SetupTask::ResponsiblePerson),
            json!([{"op": "replace", "path": "responsible_person", "value": true}])
        );
        assert_eq!(
            flag_patch_body(SetupTask::BankAccount),
            json!([{"op": "replace", "path": "bank_account", "value": true}])
        );
    }

    #[test]
    fn decodes_gateway_account() {
        let ctx = RequestContext::new(SERVICE_NAME, "get an account", "corr-1");
        let account: GatewayAccount = decode(
            json!({
                "gateway_account_id": 42,
                "external_id": "a-valid-external-id",
                "payment_provider": "stripe",
                "type": "live"
            }),
            &ctx,
        )
        .unwrap();
        assert_eq!(account.gateway_account_id, 42);
        assert!(account.is_stripe());
    }

    #[test]
    fn decodes_stripe_account() {
        let ctx = RequestContext::new(SERVICE_NAME, "get stripe account", "corr-1");
        let account: StripeAccount =
            decode(json!({"stripe_account_id": "acct_123example123"}), &ctx).unwrap();
        assert_eq!(account.stripe_account_id, "acct_123example123");
    }

    #[test]
    fn malformed_body_carries_call_context() {
        let ctx = RequestContext::new(SERVICE_NAME, "get stripe account", "corr-7");
        let result: Result<StripeAccount, _> = decode(json!({"unexpected": true}), &ctx);
        let Err(ClientError::MalformedBody { correlation_id, service, .. }) = result else {
            panic!("expected malformed-body error");
        };
        assert_eq!(service, "connector");
        assert_eq!(correlation_id, "corr-7");
    }
}
