//! HTTP surface of the portal.
//!
//! Handlers are deliberately thin: they wire the setup gate, the form
//! aggregators, and the backend clients together and return structured
//! view models `{view, pageData}`. Rendering the named template is the
//! embedding layer's job.

pub mod request_to_go_live;
pub mod stripe_setup;

use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use serde::Serialize;
use serde_json::json;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use crate::clients::{ConnectorClient, GatewayAccount, StripeClient, WebhooksClient};
use crate::error::{ClientError, Error, SetupError};
use crate::setup::StripeSetupProgress;

pub const DASHBOARD_PATH: &str = "/dashboard";

/// Shared state for all portal routes.
#[derive(Clone)]
pub struct AppState {
    pub connector: Arc<ConnectorClient>,
    pub stripe: Arc<StripeClient>,
    pub webhooks: Arc<WebhooksClient>,
}

/// A render decision: the template to render and its data.
#[derive(Debug, Serialize)]
pub struct View<T: Serialize> {
    pub view: &'static str,
    #[serde(rename = "pageData")]
    pub page_data: T,
}

impl<T: Serialize> View<T> {
    pub fn new(view: &'static str, page_data: T) -> Self {
        Self { view, page_data }
    }
}

impl<T: Serialize> IntoResponse for View<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Error wrapper routing the taxonomy through one central handler.
#[derive(Debug)]
pub struct PortalError(pub Error);

impl From<Error> for PortalError {
    fn from(error: Error) -> Self {
        Self(error)
    }
}

impl From<ClientError> for PortalError {
    fn from(error: ClientError) -> Self {
        Self(Error::Client(error))
    }
}

impl From<SetupError> for PortalError {
    fn from(error: SetupError) -> Self {
        Self(Error::Setup(error))
    }
}

impl IntoResponse for PortalError {
    fn into_response(self) -> Response {
        match &self.0 {
            // A finished step renders its own terminal page, not a failure.
            Error::Setup(SetupError::AlreadyProvided { task }) => View::new(
                "error-with-link",
                json!({
                    "message": format!("{task} details have already been provided"),
                    "link": DASHBOARD_PATH,
                    "linkText": "Back to dashboard",
                }),
            )
            .into_response(),
            Error::Setup(SetupError::ProgressNotAvailable) => {
                tracing::error!("{}", self.0);
                generic_error_page()
            }
            Error::Client(error) => {
                tracing::error!(
                    correlation_id = error.correlation_id().unwrap_or("none"),
                    "{error}"
                );
                generic_error_page()
            }
            Error::Config(_) => {
                tracing::error!("{}", self.0);
                generic_error_page()
            }
        }
    }
}

fn generic_error_page() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        View::new(
            "error",
            json!({"message": "There is a problem with the payments platform"}),
        ),
    )
        .into_response()
}

/// A fresh correlation id for one inbound request's outbound calls.
pub fn new_correlation_id() -> String {
    Uuid::new_v4().to_string()
}

/// Resolve the account context for a KYC step: the gateway account plus
/// its setup progress (progress exists only for Stripe accounts).
pub async fn stripe_account_context(
    state: &AppState,
    external_id: &str,
    correlation_id: &str,
) -> Result<(GatewayAccount, Option<StripeSetupProgress>), ClientError> {
    let account = state
        .connector
        .get_account_by_external_id(external_id, correlation_id)
        .await?;
    let progress = if account.is_stripe() {
        Some(
            state
                .connector
                .get_stripe_account_setup(account.gateway_account_id, correlation_id)
                .await?,
        )
    } else {
        None
    };
    Ok((account, progress))
}

async fn get_dashboard() -> impl IntoResponse {
    View::new("dashboard/index", json!({}))
}

/// GET /service/{service_id}/webhooks
async fn list_webhooks(
    State(state): State<AppState>,
    Path(service_id): Path<String>,
) -> Result<Response, PortalError> {
    let correlation_id = new_correlation_id();
    let webhooks = state
        .webhooks
        .list_webhooks(&service_id, false, &correlation_id)
        .await?;
    Ok(View::new("webhooks/list", json!({"webhooks": webhooks})).into_response())
}

/// Build the portal router.
pub fn portal_router(state: AppState) -> Router {
    Router::new()
        .route(DASHBOARD_PATH, get(get_dashboard))
        .route("/service/{service_id}/webhooks", get(list_webhooks))
        .merge(stripe_setup::routes())
        .merge(request_to_go_live::routes())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
