//! Responsible-person onboarding step.

use std::collections::HashMap;

use serde::Serialize;

use crate::validation::{ValidationErrors, format_date_of_birth, validate_date_of_birth};

use super::submission::{FieldRule, FormOutcome, FormSubmission, Rule, SubmissionIntent};

pub const FIRST_NAME_FIELD: &str = "first-name";
pub const LAST_NAME_FIELD: &str = "last-name";
pub const HOME_ADDRESS_LINE1_FIELD: &str = "home-address-line-1";
pub const HOME_ADDRESS_LINE2_FIELD: &str = "home-address-line-2";
pub const HOME_ADDRESS_CITY_FIELD: &str = "home-address-city";
pub const HOME_ADDRESS_POSTCODE_FIELD: &str = "home-address-postcode";
pub const DOB_DAY_FIELD: &str = "dob-day";
pub const DOB_MONTH_FIELD: &str = "dob-month";
pub const DOB_YEAR_FIELD: &str = "dob-year";

/// Error-summary key for the cross-field date-of-birth rule.
pub const DOB_ERROR_KEY: &str = "dob";

const DECLARED_FIELDS: [&str; 9] = [
    FIRST_NAME_FIELD,
    LAST_NAME_FIELD,
    HOME_ADDRESS_LINE1_FIELD,
    HOME_ADDRESS_LINE2_FIELD,
    HOME_ADDRESS_CITY_FIELD,
    HOME_ADDRESS_POSTCODE_FIELD,
    DOB_DAY_FIELD,
    DOB_MONTH_FIELD,
    DOB_YEAR_FIELD,
];

const VALIDATION_RULES: [FieldRule; 6] = [
    FieldRule { name: FIRST_NAME_FIELD, rule: Rule::Mandatory { max_length: 100 } },
    FieldRule { name: LAST_NAME_FIELD, rule: Rule::Mandatory { max_length: 100 } },
    FieldRule { name: HOME_ADDRESS_LINE1_FIELD, rule: Rule::Mandatory { max_length: 200 } },
    FieldRule { name: HOME_ADDRESS_LINE2_FIELD, rule: Rule::Optional { max_length: 200 } },
    FieldRule { name: HOME_ADDRESS_CITY_FIELD, rule: Rule::Mandatory { max_length: 100 } },
    FieldRule { name: HOME_ADDRESS_POSTCODE_FIELD, rule: Rule::Postcode },
];

/// Values rendered back into the responsible-person templates.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsiblePersonPageData {
    pub first_name: String,
    pub last_name: String,
    pub home_address_line1: String,
    pub home_address_line2: String,
    pub home_address_city: String,
    pub home_address_postcode: String,
    pub dob_day: String,
    pub dob_month: String,
    pub dob_year: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub friendly_date_of_birth: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<ValidationErrors>,
}

impl ResponsiblePersonPageData {
    fn from_submission(submission: &FormSubmission) -> Self {
        Self {
            first_name: submission.get(FIRST_NAME_FIELD).to_string(),
            last_name: submission.get(LAST_NAME_FIELD).to_string(),
            home_address_line1: submission.get(HOME_ADDRESS_LINE1_FIELD).to_string(),
            home_address_line2: submission.get(HOME_ADDRESS_LINE2_FIELD).to_string(),
            home_address_city: submission.get(HOME_ADDRESS_CITY_FIELD).to_string(),
            home_address_postcode: submission.get(HOME_ADDRESS_POSTCODE_FIELD).to_string(),
            dob_day: submission.get(DOB_DAY_FIELD).to_string(),
            dob_month: submission.get(DOB_MONTH_FIELD).to_string(),
            dob_year: submission.get(DOB_YEAR_FIELD).to_string(),
            friendly_date_of_birth: None,
            errors: None,
        }
    }
}

/// Run the responsible-person aggregator over a submitted body.
pub fn handle_submission(
    body: &HashMap<String, String>,
) -> FormOutcome<ResponsiblePersonPageData> {
    let submission = FormSubmission::normalise(&DECLARED_FIELDS, body);

    let mut errors = submission.validate(&VALIDATION_RULES);
    let dob = validate_date_of_birth(
        submission.get(DOB_DAY_FIELD),
        submission.get(DOB_MONTH_FIELD),
        submission.get(DOB_YEAR_FIELD),
    );
    if let Some(message) = dob.message {
        errors.add(DOB_ERROR_KEY, message);
    }

    let mut page_data = ResponsiblePersonPageData::from_submission(&submission);

    if !errors.is_empty() {
        page_data.errors = Some(errors);
        return FormOutcome::RedisplayWithErrors(page_data);
    }

    match SubmissionIntent::from_body(body) {
        SubmissionIntent::AnswersChecked => FormOutcome::Confirmed(page_data),
        SubmissionIntent::AnswersNeedChanging => FormOutcome::EditAnswers(page_data),
        SubmissionIntent::FirstPass => {
            page_data.friendly_date_of_birth = friendly_date_of_birth(&submission);
            FormOutcome::CheckAnswers(page_data)
        }
    }
}

fn friendly_date_of_birth(submission: &FormSubmission) -> Option<String> {
    let day = submission.get(DOB_DAY_FIELD).parse().ok()?;
    let month = submission.get(DOB_MONTH_FIELD).parse().ok()?;
    let year = submission.get(DOB_YEAR_FIELD).parse().ok()?;
    format_date_of_birth(day, month, year)
}
