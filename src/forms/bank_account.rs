//! Bank-account details step of the Stripe KYC flow.

use std::collections::HashMap;

use serde::Serialize;

use crate::validation::ValidationErrors;

use super::submission::{FieldRule, FormSubmission, Rule};

pub const SORT_CODE_FIELD: &str = "sort-code";
pub const ACCOUNT_NUMBER_FIELD: &str = "account-number";

const DECLARED_FIELDS: [&str; 2] = [SORT_CODE_FIELD, ACCOUNT_NUMBER_FIELD];

const VALIDATION_RULES: [FieldRule; 2] = [
    FieldRule { name: SORT_CODE_FIELD, rule: Rule::SortCode },
    FieldRule { name: ACCOUNT_NUMBER_FIELD, rule: Rule::AccountNumber },
];

/// Values rendered back into the bank-details template.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BankAccountPageData {
    pub sort_code: String,
    pub account_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<ValidationErrors>,
}

/// Render decision for the bank-details step.
#[derive(Debug, Clone, PartialEq)]
pub enum BankAccountOutcome {
    RedisplayWithErrors(BankAccountPageData),
    Submitted(BankAccountPageData),
}

/// Run the bank-details aggregator over a submitted body.
pub fn handle_submission(body: &HashMap<String, String>) -> BankAccountOutcome {
    let submission = FormSubmission::normalise(&DECLARED_FIELDS, body);
    let errors = submission.validate(&VALIDATION_RULES);

    let mut page_data = BankAccountPageData {
        sort_code: submission.get(SORT_CODE_FIELD).to_string(),
        account_number: submission.get(ACCOUNT_NUMBER_FIELD).to_string(),
        errors: None,
    };

    if errors.is_empty() {
        BankAccountOutcome::Submitted(page_data)
    } else {
        page_data.errors = Some(errors);
        BankAccountOutcome::RedisplayWithErrors(page_data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn valid_details_pass() {
        let outcome = handle_submission(&body(&[
            ("sort-code", "10-88-00"),
            ("account-number", "00012345"),
        ]));
        let BankAccountOutcome::Submitted(page_data) = outcome else {
            panic!("expected submitted outcome");
        };
        assert_eq!(page_data.sort_code, "10-88-00");
    }

    #[test]
    fn blank_details_rejected_field_by_field() {
        let BankAccountOutcome::RedisplayWithErrors(page_data) = handle_submission(&body(&[]))
        else {
            panic!("expected redisplay outcome");
        };
        let errors = page_data.errors.as_ref().unwrap();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("sort-code"), Some("This field cannot be blank"));
        assert_eq!(errors.get("account-number"), Some("This field cannot be blank"));
    }

    #[test]
    fn malformed_sort_code_keeps_submitted_value() {
        let BankAccountOutcome::RedisplayWithErrors(page_data) = handle_submission(&body(&[
            ("sort-code", "10-88"),
            ("account-number", "00012345"),
        ])) else {
            panic!("expected redisplay outcome");
        };
        assert_eq!(page_data.sort_code, "10-88");
        assert_eq!(
            page_data.errors.as_ref().unwrap().get("sort-code"),
            Some("Enter a valid sort code like 309430")
        );
    }
}
