//! KYC collection steps for Stripe accounts.
//!
//! Every step follows the same shape: consult the setup gate, run the
//! step's form aggregator, persist through the Stripe and connector
//! clients, and set the monotonic progress flag last.

use std::collections::HashMap;

use axum::Form;
use axum::Router;
use axum::extract::{Multipart, Path, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use chrono::NaiveDate;
use serde_json::json;

use crate::clients::{StripeBankAccount, StripePerson};
use crate::error::ClientError;
use crate::forms::bank_account::{self, BankAccountOutcome};
use crate::forms::organisation_address::{self, AddressOutcome};
use crate::forms::responsible_person::{self, ResponsiblePersonPageData};
use crate::forms::submission::FormOutcome;
use crate::setup::{self, SetupTask};
use crate::validation::ValidationErrors;

use super::{AppState, DASHBOARD_PATH, PortalError, View, new_correlation_id, stripe_account_context};

const RESPONSIBLE_PERSON_FORM: &str = "stripe-setup/responsible-person/index";
const RESPONSIBLE_PERSON_CHECK: &str = "stripe-setup/responsible-person/check-your-answers";
const BANK_DETAILS_FORM: &str = "stripe-setup/bank-details/index";
const ORGANISATION_DETAILS_FORM: &str = "stripe-setup/organisation-details/index";
const GOVERNMENT_ENTITY_DOCUMENT_FORM: &str = "stripe-setup/government-entity-document/index";

/// Largest document upload accepted, in bytes.
const MAX_DOCUMENT_BYTES: usize = 10 * 1024 * 1024;
const DOCUMENT_FIELD: &str = "government-entity-document";
const DOCUMENT_EXTENSIONS: [&str; 4] = ["pdf", "jpg", "jpeg", "png"];

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/account/{external_id}/stripe-setup/responsible-person",
            get(get_responsible_person).post(post_responsible_person),
        )
        .route(
            "/account/{external_id}/stripe-setup/bank-details",
            get(get_bank_details).post(post_bank_details),
        )
        .route(
            "/account/{external_id}/stripe-setup/organisation-details",
            get(get_organisation_details).post(post_organisation_details),
        )
        .route(
            "/account/{external_id}/stripe-setup/government-entity-document",
            get(get_government_entity_document).post(post_government_entity_document),
        )
}

// ── Responsible person ──────────────────────────────────────────────

async fn get_responsible_person(
    State(state): State<AppState>,
    Path(external_id): Path<String>,
) -> Result<Response, PortalError> {
    let correlation_id = new_correlation_id();
    let (_, progress) = stripe_account_context(&state, &external_id, &correlation_id).await?;
    setup::check(progress.as_ref(), SetupTask::ResponsiblePerson)?;
    Ok(View::new(RESPONSIBLE_PERSON_FORM, ResponsiblePersonPageData::default()).into_response())
}

async fn post_responsible_person(
    State(state): State<AppState>,
    Path(external_id): Path<String>,
    Form(body): Form<HashMap<String, String>>,
) -> Result<Response, PortalError> {
    let correlation_id = new_correlation_id();
    let (account, progress) = stripe_account_context(&state, &external_id, &correlation_id).await?;
    setup::check(progress.as_ref(), SetupTask::ResponsiblePerson)?;

    let outcome = responsible_person::handle_submission(&body);
    tracing::debug!(
        account = account.gateway_account_id,
        step_state = %outcome.step_state(),
        "Responsible person submission handled"
    );
    match outcome {
        FormOutcome::RedisplayWithErrors(page_data) | FormOutcome::EditAnswers(page_data) => {
            Ok(View::new(RESPONSIBLE_PERSON_FORM, page_data).into_response())
        }
        FormOutcome::CheckAnswers(page_data) => {
            Ok(View::new(RESPONSIBLE_PERSON_CHECK, page_data).into_response())
        }
        FormOutcome::Confirmed(page_data) => {
            let person = person_from(&page_data)?;
            let stripe_account = state
                .connector
                .get_stripe_account(account.gateway_account_id, &correlation_id)
                .await?;
            state
                .stripe
                .create_person(&stripe_account.stripe_account_id, &person, &correlation_id)
                .await?;
            state
                .connector
                .set_stripe_account_setup_flag(
                    account.gateway_account_id,
                    SetupTask::ResponsiblePerson,
                    &correlation_id,
                )
                .await?;
            Ok(Redirect::to(DASHBOARD_PATH).into_response())
        }
    }
}

/// Build the Stripe person payload from validated page data.
fn person_from(page_data: &ResponsiblePersonPageData) -> Result<StripePerson, ClientError> {
    let date_of_birth = page_data
        .dob_day
        .parse()
        .ok()
        .zip(page_data.dob_month.parse().ok())
        .zip(page_data.dob_year.parse().ok())
        .and_then(|((day, month), year)| NaiveDate::from_ymd_opt(year, month, day))
        .ok_or(ClientError::InvalidPayload {
            model: "StripePerson",
            reason: "date of birth is not a real date".to_string(),
        })?;

    Ok(StripePerson {
        first_name: page_data.first_name.clone(),
        last_name: page_data.last_name.clone(),
        address_line1: page_data.home_address_line1.clone(),
        address_line2: (!page_data.home_address_line2.is_empty())
            .then(|| page_data.home_address_line2.clone()),
        city: page_data.home_address_city.clone(),
        postcode: page_data.home_address_postcode.clone(),
        date_of_birth,
    })
}

// ── Bank details ────────────────────────────────────────────────────

async fn get_bank_details(
    State(state): State<AppState>,
    Path(external_id): Path<String>,
) -> Result<Response, PortalError> {
    let correlation_id = new_correlation_id();
    let (_, progress) = stripe_account_context(&state, &external_id, &correlation_id).await?;
    setup::check(progress.as_ref(), SetupTask::BankAccount)?;
    Ok(View::new(BANK_DETAILS_FORM, bank_account::BankAccountPageData::default()).into_response())
}

async fn post_bank_details(
    State(state): State<AppState>,
    Path(external_id): Path<String>,
    Form(body): Form<HashMap<String, String>>,
) -> Result<Response, PortalError> {
    let correlation_id = new_correlation_id();
    let (account, progress) = stripe_account_context(&state, &external_id, &correlation_id).await?;
    setup::check(progress.as_ref(), SetupTask::BankAccount)?;

    match bank_account::handle_submission(&body) {
        BankAccountOutcome::RedisplayWithErrors(page_data) => {
            Ok(View::new(BANK_DETAILS_FORM, page_data).into_response())
        }
        BankAccountOutcome::Submitted(page_data) => {
            let bank_account =
                StripeBankAccount::new(&page_data.sort_code, &page_data.account_number)?;
            let stripe_account = state
                .connector
                .get_stripe_account(account.gateway_account_id, &correlation_id)
                .await?;
            state
                .stripe
                .update_bank_account(
                    &stripe_account.stripe_account_id,
                    &bank_account,
                    &correlation_id,
                )
                .await?;
            state
                .connector
                .set_stripe_account_setup_flag(
                    account.gateway_account_id,
                    SetupTask::BankAccount,
                    &correlation_id,
                )
                .await?;
            Ok(Redirect::to(DASHBOARD_PATH).into_response())
        }
    }
}

// ── Organisation details ────────────────────────────────────────────

async fn get_organisation_details(
    State(state): State<AppState>,
    Path(external_id): Path<String>,
) -> Result<Response, PortalError> {
    let correlation_id = new_correlation_id();
    let (_, progress) = stripe_account_context(&state, &external_id, &correlation_id).await?;
    setup::check(progress.as_ref(), SetupTask::OrganisationDetails)?;
    Ok(View::new(
        ORGANISATION_DETAILS_FORM,
        organisation_address::OrganisationAddressPageData::default(),
    )
    .into_response())
}

async fn post_organisation_details(
    State(state): State<AppState>,
    Path(external_id): Path<String>,
    Form(body): Form<HashMap<String, String>>,
) -> Result<Response, PortalError> {
    let correlation_id = new_correlation_id();
    let (account, progress) = stripe_account_context(&state, &external_id, &correlation_id).await?;
    setup::check(progress.as_ref(), SetupTask::OrganisationDetails)?;

    match organisation_address::handle_submission(&body) {
        AddressOutcome::RedisplayWithErrors(page_data) => {
            Ok(View::new(ORGANISATION_DETAILS_FORM, page_data).into_response())
        }
        AddressOutcome::Submitted(_) => {
            state
                .connector
                .set_stripe_account_setup_flag(
                    account.gateway_account_id,
                    SetupTask::OrganisationDetails,
                    &correlation_id,
                )
                .await?;
            Ok(Redirect::to(DASHBOARD_PATH).into_response())
        }
    }
}

// ── Government entity document ──────────────────────────────────────

async fn get_government_entity_document(
    State(state): State<AppState>,
    Path(external_id): Path<String>,
) -> Result<Response, PortalError> {
    let correlation_id = new_correlation_id();
    let (_, progress) = stripe_account_context(&state, &external_id, &correlation_id).await?;
    setup::check(progress.as_ref(), SetupTask::GovernmentEntityDocument)?;
    Ok(View::new(GOVERNMENT_ENTITY_DOCUMENT_FORM, json!({})).into_response())
}

async fn post_government_entity_document(
    State(state): State<AppState>,
    Path(external_id): Path<String>,
    mut multipart: Multipart,
) -> Result<Response, PortalError> {
    let correlation_id = new_correlation_id();
    let (account, progress) = stripe_account_context(&state, &external_id, &correlation_id).await?;
    setup::check(progress.as_ref(), SetupTask::GovernmentEntityDocument)?;

    let mut upload: Option<(String, Vec<u8>)> = None;
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() == Some(DOCUMENT_FIELD) {
            let file_name = field.file_name().unwrap_or("document").to_string();
            let bytes = field.bytes().await.unwrap_or_default().to_vec();
            upload = Some((file_name, bytes));
            break;
        }
    }

    let (file_name, bytes) = match validated_document(upload) {
        Ok(document) => document,
        Err(errors) => {
            return Ok(
                View::new(GOVERNMENT_ENTITY_DOCUMENT_FORM, json!({"errors": errors}))
                    .into_response(),
            );
        }
    };

    state
        .stripe
        .upload_document(&file_name, bytes, &correlation_id)
        .await?;
    state
        .connector
        .set_stripe_account_setup_flag(
            account.gateway_account_id,
            SetupTask::GovernmentEntityDocument,
            &correlation_id,
        )
        .await?;
    Ok(Redirect::to(DASHBOARD_PATH).into_response())
}

/// File-level validation for the document upload.
fn validated_document(
    upload: Option<(String, Vec<u8>)>,
) -> Result<(String, Vec<u8>), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let Some((file_name, bytes)) = upload else {
        errors.add(DOCUMENT_FIELD, "Select a file to upload");
        return Err(errors);
    };

    if bytes.is_empty() {
        errors.add(DOCUMENT_FIELD, "Select a file to upload");
    } else if bytes.len() > MAX_DOCUMENT_BYTES {
        errors.add(DOCUMENT_FIELD, "File size must be less than 10MB");
    } else if !has_allowed_extension(&file_name) {
        errors.add(DOCUMENT_FIELD, "File must be a PDF, JPG or PNG");
    }

    if errors.is_empty() {
        Ok((file_name, bytes))
    } else {
        Err(errors)
    }
}

fn has_allowed_extension(file_name: &str) -> bool {
    file_name
        .rsplit_once('.')
        .is_some_and(|(_, ext)| DOCUMENT_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}
