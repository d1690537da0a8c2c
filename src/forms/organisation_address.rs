//! Organisation-address step of the request-to-go-live flow.

use std::collections::HashMap;

use serde::Serialize;

use crate::validation::ValidationErrors;

use super::submission::{FieldRule, FormSubmission, Rule};

pub const ADDRESS_LINE1_FIELD: &str = "address-line1";
pub const ADDRESS_LINE2_FIELD: &str = "address-line2";
pub const ADDRESS_CITY_FIELD: &str = "address-city";
pub const ADDRESS_COUNTRY_FIELD: &str = "address-country";
pub const ADDRESS_POSTCODE_FIELD: &str = "address-postcode";
pub const TELEPHONE_NUMBER_FIELD: &str = "telephone-number";

const DECLARED_FIELDS: [&str; 6] = [
    ADDRESS_LINE1_FIELD,
    ADDRESS_LINE2_FIELD,
    ADDRESS_CITY_FIELD,
    ADDRESS_COUNTRY_FIELD,
    ADDRESS_POSTCODE_FIELD,
    TELEPHONE_NUMBER_FIELD,
];

const VALIDATION_RULES: [FieldRule; 6] = [
    FieldRule { name: ADDRESS_LINE1_FIELD, rule: Rule::Mandatory { max_length: 255 } },
    FieldRule { name: ADDRESS_LINE2_FIELD, rule: Rule::Optional { max_length: 255 } },
    FieldRule { name: ADDRESS_CITY_FIELD, rule: Rule::Mandatory { max_length: 255 } },
    FieldRule { name: ADDRESS_COUNTRY_FIELD, rule: Rule::Country },
    FieldRule { name: ADDRESS_POSTCODE_FIELD, rule: Rule::Postcode },
    FieldRule { name: TELEPHONE_NUMBER_FIELD, rule: Rule::PhoneNumber },
];

/// Values rendered back into the organisation-address template.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganisationAddressPageData {
    pub address_line1: String,
    pub address_line2: String,
    pub address_city: String,
    pub address_country: String,
    pub address_postcode: String,
    pub telephone_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<ValidationErrors>,
}

/// Render decision for the address step: there is no review page, a valid
/// submission moves straight on.
#[derive(Debug, Clone, PartialEq)]
pub enum AddressOutcome {
    RedisplayWithErrors(OrganisationAddressPageData),
    Submitted(OrganisationAddressPageData),
}

/// Run the organisation-address aggregator over a submitted body.
pub fn handle_submission(body: &HashMap<String, String>) -> AddressOutcome {
    let submission = FormSubmission::normalise(&DECLARED_FIELDS, body);
    let errors = submission.validate(&VALIDATION_RULES);

    let mut page_data = OrganisationAddressPageData {
        address_line1: submission.get(ADDRESS_LINE1_FIELD).to_string(),
        address_line2: submission.get(ADDRESS_LINE2_FIELD).to_string(),
        address_city: submission.get(ADDRESS_CITY_FIELD).to_string(),
        address_country: submission.get(ADDRESS_COUNTRY_FIELD).to_string(),
        address_postcode: submission.get(ADDRESS_POSTCODE_FIELD).to_string(),
        telephone_number: submission.get(TELEPHONE_NUMBER_FIELD).to_string(),
        errors: None,
    };

    if errors.is_empty() {
        AddressOutcome::Submitted(page_data)
    } else {
        page_data.errors = Some(errors);
        AddressOutcome::RedisplayWithErrors(page_data)
    }
}
