//! Submission normalisation and field-rule aggregation.

use std::collections::HashMap;

use crate::validation::{
    ValidationErrors, ValidationResult, validate_account_number, validate_mandatory_field,
    validate_optional_field, validate_phone_number, validate_postcode, validate_sort_code,
};

use super::state::StepState;

/// The authoritative validator for one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Mandatory { max_length: usize },
    Optional { max_length: usize },
    Postcode,
    PhoneNumber,
    SortCode,
    AccountNumber,
    /// A two-letter country code from the supported set.
    Country,
}

/// Countries merchants can register addresses in.
pub const SUPPORTED_COUNTRIES: [&str; 2] = ["GB", "IE"];

pub const INVALID_COUNTRY_MESSAGE: &str = "Select a country";

impl Rule {
    pub fn apply(&self, value: &str) -> ValidationResult {
        match self {
            Rule::Mandatory { max_length } => validate_mandatory_field(value, Some(*max_length)),
            Rule::Optional { max_length } => validate_optional_field(value, Some(*max_length)),
            Rule::Postcode => validate_postcode(value),
            Rule::PhoneNumber => validate_phone_number(value),
            Rule::SortCode => validate_sort_code(value),
            Rule::AccountNumber => validate_account_number(value),
            Rule::Country => {
                if value.is_empty() {
                    ValidationResult::error(crate::validation::field::BLANK_MESSAGE)
                } else if SUPPORTED_COUNTRIES.contains(&value) {
                    ValidationResult::ok()
                } else {
                    ValidationResult::error(INVALID_COUNTRY_MESSAGE)
                }
            }
        }
    }
}

/// One field of a step: its form name and its rule.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub name: &'static str,
    pub rule: Rule,
}

/// A normalised submission: every declared field read from the body and
/// trimmed, in declaration order. Missing fields become empty strings, so
/// downstream code never distinguishes absent from blank.
#[derive(Debug, Clone)]
pub struct FormSubmission {
    fields: Vec<(&'static str, String)>,
}

impl FormSubmission {
    /// Read and trim `declared` fields out of a submitted body.
    pub fn normalise(declared: &[&'static str], body: &HashMap<String, String>) -> Self {
        let fields = declared
            .iter()
            .map(|name| {
                let value = body.get(*name).map(|v| v.trim().to_string()).unwrap_or_default();
                (*name, value)
            })
            .collect();
        Self { fields }
    }

    /// The trimmed value of a declared field (empty if it was missing).
    pub fn get(&self, name: &str) -> &str {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value.as_str())
            .unwrap_or("")
    }

    /// Run every rule and collect failures in declaration order.
    pub fn validate(&self, rules: &[FieldRule]) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        for rule in rules {
            let result = rule.rule.apply(self.get(rule.name));
            if let Some(message) = result.message {
                errors.add(rule.name, message);
            }
        }
        errors
    }
}

/// What the user meant by this submission, read from the control flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionIntent {
    /// No flag set: first submission of the filled-in form.
    FirstPass,
    /// `answers-checked=true`: the user confirmed the review page.
    AnswersChecked,
    /// `answers-need-changing=true`: back to the editable form.
    AnswersNeedChanging,
}

pub const ANSWERS_CHECKED_FIELD: &str = "answers-checked";
pub const ANSWERS_NEED_CHANGING_FIELD: &str = "answers-need-changing";

impl SubmissionIntent {
    pub fn from_body(body: &HashMap<String, String>) -> Self {
        let flagged = |name: &str| body.get(name).is_some_and(|v| v == "true");
        if flagged(ANSWERS_CHECKED_FIELD) {
            Self::AnswersChecked
        } else if flagged(ANSWERS_NEED_CHANGING_FIELD) {
            Self::AnswersNeedChanging
        } else {
            Self::FirstPass
        }
    }
}

/// Render decision produced by a step's aggregator.
#[derive(Debug, Clone, PartialEq)]
pub enum FormOutcome<P> {
    /// Validation failed: re-render the form with errors and the
    /// submitted values.
    RedisplayWithErrors(P),
    /// The user asked to change their answers: re-render the editable
    /// form with current values.
    EditAnswers(P),
    /// Valid first pass: render the check-your-answers page.
    CheckAnswers(P),
    /// The user confirmed: persist the validated values and redirect to
    /// the dashboard.
    Confirmed(P),
}

impl<P> FormOutcome<P> {
    /// The step state this outcome leaves the user in.
    pub fn step_state(&self) -> StepState {
        match self {
            Self::RedisplayWithErrors(_) | Self::EditAnswers(_) => StepState::Editing,
            Self::CheckAnswers(_) => StepState::Reviewing,
            Self::Confirmed(_) => StepState::Complete,
        }
    }
}
