//! End-to-end tests for the responsible-person KYC step.
//!
//! The portal runs on a random port with stub connector and Stripe
//! backends; a real HTTP client drives the form flow the way a browser
//! would.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

use merchant_portal::clients::{ConnectorClient, StripeClient, WebhooksClient};
use merchant_portal::routes::{AppState, portal_router};

/// What the stub backends observed.
#[derive(Default)]
struct Observed {
    persons_created: Vec<Value>,
    flag_patches: Vec<Value>,
}

type Stub = Arc<Mutex<Observed>>;

// ── Stub connector ──────────────────────────────────────────────────

async fn account_by_external_id(Path(external_id): Path<String>) -> impl IntoResponse {
    let payment_provider = if external_id == "sandbox-account" {
        "sandbox"
    } else {
        "stripe"
    };
    // The "done" account maps to a gateway account whose step is complete.
    let gateway_account_id = if external_id == "done-account" { 43 } else { 42 };
    axum::Json(json!({
        "gateway_account_id": gateway_account_id,
        "external_id": external_id,
        "payment_provider": payment_provider,
    }))
}

async fn stripe_setup(Path(account_id): Path<String>) -> impl IntoResponse {
    axum::Json(json!({"responsible_person": account_id == "43"}))
}

async fn patch_stripe_setup(
    State(stub): State<Stub>,
    axum::Json(body): axum::Json<Value>,
) -> impl IntoResponse {
    stub.lock().await.flag_patches.push(body);
    axum::Json(json!({}))
}

async fn stripe_account(Path(_account_id): Path<String>) -> impl IntoResponse {
    axum::Json(json!({"stripe_account_id": "acct_123example123"}))
}

// ── Stub Stripe API ─────────────────────────────────────────────────

async fn create_person(
    State(stub): State<Stub>,
    Path(_account_id): Path<String>,
    axum::Json(body): axum::Json<Value>,
) -> impl IntoResponse {
    stub.lock().await.persons_created.push(body);
    (StatusCode::OK, axum::Json(json!({"id": "person_123"})))
}

async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://127.0.0.1:{port}")
}

/// Boot stub backends plus the portal. Returns the portal base URL and
/// the stub observation handle.
async fn start_portal() -> (String, Stub) {
    let stub: Stub = Arc::default();

    let connector_app = Router::new()
        .route("/v1/api/accounts/external-id/{external_id}", get(account_by_external_id))
        .route(
            "/v1/api/accounts/{account_id}/stripe-setup",
            get(stripe_setup).patch(patch_stripe_setup),
        )
        .route("/v1/api/accounts/{account_id}/stripe-account", get(stripe_account))
        .with_state(Arc::clone(&stub));
    let connector_url = serve(connector_app).await;

    let stripe_app = Router::new()
        .route("/v1/accounts/{account_id}/persons", post(create_person))
        .with_state(Arc::clone(&stub));
    let stripe_url = serve(stripe_app).await;

    let timeout = Duration::from_secs(2);
    let state = AppState {
        connector: Arc::new(ConnectorClient::new(connector_url.as_str(), timeout).unwrap()),
        stripe: Arc::new(
            StripeClient::new(
                stripe_url.as_str(),
                secrecy::SecretString::from("sk_test_x".to_string()),
                timeout,
            )
            .unwrap(),
        ),
        webhooks: Arc::new(WebhooksClient::new(connector_url.as_str(), timeout).unwrap()),
    };
    let portal_url = serve(portal_router(state)).await;

    tokio::time::sleep(Duration::from_millis(50)).await;
    (portal_url, stub)
}

fn http() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

fn valid_form() -> Vec<(&'static str, &'static str)> {
    vec![
        ("first-name", "Jane"),
        ("last-name", "Doe"),
        ("home-address-line-1", "1 Street Lane"),
        ("home-address-city", "London"),
        ("home-address-postcode", "E8 4ER"),
        ("dob-day", "15"),
        ("dob-month", "6"),
        ("dob-year", "1990"),
    ]
}

const STEP_URL: &str = "/account/fresh-account/stripe-setup/responsible-person";

#[tokio::test]
async fn first_pass_renders_check_your_answers() {
    let (portal_url, _stub) = start_portal().await;

    let response = http()
        .post(format!("{portal_url}{STEP_URL}"))
        .form(&valid_form())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["view"], "stripe-setup/responsible-person/check-your-answers");
    assert_eq!(body["pageData"]["firstName"], "Jane");
    assert_eq!(body["pageData"]["friendlyDateOfBirth"], "15 June 1990");
    assert_eq!(body["pageData"].get("errors"), None);
}

#[tokio::test]
async fn confirmed_submission_persists_and_redirects_to_dashboard() {
    let (portal_url, stub) = start_portal().await;

    let mut form = valid_form();
    form.push(("answers-checked", "true"));
    let response = http()
        .post(format!("{portal_url}{STEP_URL}"))
        .form(&form)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = response.headers().get("location").unwrap().to_str().unwrap();
    assert_eq!(location, "/dashboard");

    let observed = stub.lock().await;
    assert_eq!(observed.persons_created.len(), 1);
    assert_eq!(observed.persons_created[0]["first_name"], "Jane");
    assert_eq!(
        observed.persons_created[0]["dob"],
        json!({"day": 15, "month": 6, "year": 1990})
    );
    assert_eq!(
        observed.flag_patches,
        vec![json!([{"op": "replace", "path": "responsible_person", "value": true}])]
    );
}

#[tokio::test]
async fn resubmitting_a_confirmed_form_redirects_both_times() {
    let (portal_url, stub) = start_portal().await;

    let mut form = valid_form();
    form.push(("answers-checked", "true"));
    for _ in 0..2 {
        let response = http()
            .post(format!("{portal_url}{STEP_URL}"))
            .form(&form)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    // The flag set is monotonic; repeating it is the only side effect.
    let observed = stub.lock().await;
    assert_eq!(observed.flag_patches.len(), 2);
    assert_eq!(observed.flag_patches[0], observed.flag_patches[1]);
}

#[tokio::test]
async fn validation_failure_round_trips_input_and_errors() {
    let (portal_url, stub) = start_portal().await;

    let form: Vec<(&str, &str)> = valid_form()
        .into_iter()
        .filter(|(name, _)| *name != "first-name")
        .map(|(name, value)| {
            if name == "home-address-postcode" {
                (name, "123")
            } else {
                (name, value)
            }
        })
        .collect();

    let response = http()
        .post(format!("{portal_url}{STEP_URL}"))
        .form(&form)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["view"], "stripe-setup/responsible-person/index");
    let errors = &body["pageData"]["errors"];
    assert_eq!(errors["first-name"], "This field cannot be blank");
    assert_eq!(errors["home-address-postcode"], "Please enter a real postcode");
    assert_eq!(errors.as_object().unwrap().len(), 2);
    // Submitted values reappear verbatim after trimming.
    assert_eq!(body["pageData"]["lastName"], "Doe");
    assert_eq!(body["pageData"]["homeAddressPostcode"], "123");

    // Nothing was persisted.
    let observed = stub.lock().await;
    assert!(observed.persons_created.is_empty());
    assert!(observed.flag_patches.is_empty());
}

#[tokio::test]
async fn non_stripe_account_has_no_progress_and_fails_safely() {
    let (portal_url, _stub) = start_portal().await;

    let response = http()
        .get(format!(
            "{portal_url}/account/sandbox-account/stripe-setup/responsible-person"
        ))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["view"], "error");
}

#[tokio::test]
async fn completed_step_renders_already_provided_page() {
    let (portal_url, stub) = start_portal().await;

    let response = http()
        .get(format!(
            "{portal_url}/account/done-account/stripe-setup/responsible-person"
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["view"], "error-with-link");
    assert_eq!(body["pageData"]["link"], "/dashboard");

    // A completed step is not re-submittable either.
    let mut form = valid_form();
    form.push(("answers-checked", "true"));
    let response = http()
        .post(format!(
            "{portal_url}/account/done-account/stripe-setup/responsible-person"
        ))
        .form(&form)
        .send()
        .await
        .unwrap();
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["view"], "error-with-link");
    assert!(stub.lock().await.persons_created.is_empty());
}

#[tokio::test]
async fn collection_form_renders_when_step_is_outstanding() {
    let (portal_url, _stub) = start_portal().await;

    let response = http()
        .get(format!("{portal_url}{STEP_URL}"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["view"], "stripe-setup/responsible-person/index");
}
