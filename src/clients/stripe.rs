//! Client for the Stripe API and its typed payload models.
//!
//! Payloads are validated at construction: a model either holds
//! normalised, well-formed values or it does not exist.

use std::time::Duration;

use chrono::{Datelike, NaiveDate};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};

use crate::error::{ClientError, ConfigError};
use crate::validation::field::strip_separators;

use super::base::{CORRELATION_HEADER, RequestContext};

pub const SERVICE_NAME: &str = "stripe";

/// A bank account payload for a Stripe connected account.
///
/// Sort code and account number are normalised on construction: spaces and
/// dashes removed, then checked for shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StripeBankAccount {
    sort_code: String,
    account_number: String,
}

impl StripeBankAccount {
    pub fn new(sort_code: &str, account_number: &str) -> Result<Self, ClientError> {
        let sort_code = strip_separators(sort_code.trim());
        let account_number = strip_separators(account_number.trim());

        if sort_code.is_empty() {
            return Err(invalid("StripeBankAccount", "sort code is not allowed to be empty"));
        }
        if account_number.is_empty() {
            return Err(invalid(
                "StripeBankAccount",
                "account number is not allowed to be empty",
            ));
        }
        if sort_code.len() != 6 || !sort_code.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("StripeBankAccount", "sort code must be 6 digits"));
        }
        if !(6..=8).contains(&account_number.len())
            || !account_number.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid(
                "StripeBankAccount",
                "account number must be 6 to 8 digits",
            ));
        }

        Ok(Self {
            sort_code,
            account_number,
        })
    }

    pub fn sort_code(&self) -> &str {
        &self.sort_code
    }

    pub fn account_number(&self) -> &str {
        &self.account_number
    }

    /// The request body for attaching this account to a Stripe account.
    pub fn to_payload(&self) -> Value {
        json!({
            "external_account": {
                "object": "bank_account",
                "country": "GB",
                "currency": "GBP",
                "account_holder_type": "company",
                "routing_number": self.sort_code,
                "account_number": self.account_number,
            }
        })
    }
}

/// A responsible-person payload for a Stripe connected account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StripePerson {
    pub first_name: String,
    pub last_name: String,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub postcode: String,
    pub date_of_birth: NaiveDate,
}

impl StripePerson {
    /// The request body for creating this person on a Stripe account.
    pub fn to_payload(&self) -> Value {
        let mut address = json!({
            "line1": self.address_line1,
            "city": self.city,
            "postal_code": self.postcode,
            "country": "GB",
        });
        if let Some(line2) = &self.address_line2 {
            address["line2"] = json!(line2);
        }
        json!({
            "first_name": self.first_name,
            "last_name": self.last_name,
            "address": address,
            "dob": {
                "day": self.date_of_birth.day(),
                "month": self.date_of_birth.month(),
                "year": self.date_of_birth.year(),
            },
            "relationship": { "representative": true },
        })
    }
}

/// Thin client for the Stripe API, authenticated with the platform's
/// secret key.
pub struct StripeClient {
    http: reqwest::Client,
    base_url: String,
    api_key: SecretString,
}

impl StripeClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: SecretString,
        timeout: Duration,
    ) -> Result<Self, ConfigError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Attach a bank account to a connected Stripe account.
    pub async fn update_bank_account(
        &self,
        stripe_account_id: &str,
        bank_account: &StripeBankAccount,
        correlation_id: &str,
    ) -> Result<(), ClientError> {
        let ctx = RequestContext::new(SERVICE_NAME, "update bank account", correlation_id);
        let path = format!("/v1/accounts/{stripe_account_id}");
        self.post(&path, &bank_account.to_payload(), &ctx).await?;
        Ok(())
    }

    /// Create the responsible person on a connected Stripe account.
    pub async fn create_person(
        &self,
        stripe_account_id: &str,
        person: &StripePerson,
        correlation_id: &str,
    ) -> Result<(), ClientError> {
        let ctx = RequestContext::new(SERVICE_NAME, "create person", correlation_id);
        let path = format!("/v1/accounts/{stripe_account_id}/persons");
        self.post(&path, &person.to_payload(), &ctx).await?;
        Ok(())
    }

    /// Upload a government entity document. Returns the Stripe file id.
    pub async fn upload_document(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        correlation_id: &str,
    ) -> Result<String, ClientError> {
        let ctx = RequestContext::new(SERVICE_NAME, "upload file", correlation_id);
        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new()
            .text("purpose", "identity_document")
            .part("file", part);

        let url = format!("{}/v1/files", self.base_url);
        let response = self
            .http
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .header(CORRELATION_HEADER, &ctx.correlation_id)
            .multipart(form)
            .send()
            .await
            .map_err(|e| transport(&ctx, e.to_string()))?;

        let body = self.check(response, &ctx).await?;
        body.get("id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| ClientError::MalformedBody {
                service: ctx.service,
                description: ctx.description,
                correlation_id: ctx.correlation_id.clone(),
                reason: "file response has no id".to_string(),
            })
    }

    async fn post(
        &self,
        path: &str,
        body: &Value,
        ctx: &RequestContext,
    ) -> Result<Value, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(
            service = ctx.service,
            url = %url,
            correlation_id = %ctx.correlation_id,
            "Calling {}",
            ctx.description
        );
        let response = self
            .http
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .header(CORRELATION_HEADER, &ctx.correlation_id)
            .json(body)
            .send()
            .await
            .map_err(|e| transport(ctx, e.to_string()))?;
        self.check(response, ctx).await
    }

    async fn check(
        &self,
        response: reqwest::Response,
        ctx: &RequestContext,
    ) -> Result<Value, ClientError> {
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                service = ctx.service,
                status = status.as_u16(),
                correlation_id = %ctx.correlation_id,
                "{} returned unexpected status",
                ctx.description
            );
            return Err(ClientError::UnexpectedStatus {
                service: ctx.service,
                description: ctx.description,
                correlation_id: ctx.correlation_id.clone(),
                status: status.as_u16(),
            });
        }
        response
            .json()
            .await
            .map_err(|e| transport(ctx, e.to_string()))
    }
}

fn invalid(model: &'static str, reason: &str) -> ClientError {
    ClientError::InvalidPayload {
        model,
        reason: reason.to_string(),
    }
}

fn transport(ctx: &RequestContext, reason: String) -> ClientError {
    tracing::error!(
        service = ctx.service,
        correlation_id = %ctx.correlation_id,
        "Calling {} failed: {reason}",
        ctx.description
    );
    ClientError::Transport {
        service: ctx.service,
        description: ctx.description,
        correlation_id: ctx.correlation_id.clone(),
        reason,
    }
}
