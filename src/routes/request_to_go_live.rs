//! Request-to-go-live flow.
//!
//! The organisation-address page collects the merchant's registered
//! address before the service goes live. Merchant details are owned by an
//! external service; this surface only validates and moves the flow on.

use std::collections::HashMap;

use axum::Form;
use axum::Router;
use axum::extract::Path;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;

use crate::forms::organisation_address::{
    self, AddressOutcome, OrganisationAddressPageData,
};

use super::{AppState, PortalError, View};

const ORGANISATION_ADDRESS_FORM: &str = "request-to-go-live/organisation-address";

pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/service/{service_id}/request-to-go-live/organisation-address",
        get(get_organisation_address).post(post_organisation_address),
    )
}

async fn get_organisation_address(
    Path(_service_id): Path<String>,
) -> Result<Response, PortalError> {
    Ok(View::new(ORGANISATION_ADDRESS_FORM, OrganisationAddressPageData::default()).into_response())
}

async fn post_organisation_address(
    Path(service_id): Path<String>,
    Form(body): Form<HashMap<String, String>>,
) -> Result<Response, PortalError> {
    match organisation_address::handle_submission(&body) {
        AddressOutcome::RedisplayWithErrors(page_data) => {
            Ok(View::new(ORGANISATION_ADDRESS_FORM, page_data).into_response())
        }
        AddressOutcome::Submitted(_) => Ok(Redirect::to(&format!(
            "/service/{service_id}/request-to-go-live/agreement"
        ))
        .into_response()),
    }
}
