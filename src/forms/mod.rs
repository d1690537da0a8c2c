//! Onboarding form steps.
//!
//! Each step declares its fields as a rule table, normalises the submitted
//! body (every declared field read, trimmed, missing fields become empty
//! strings), aggregates validator failures, and decides what the caller
//! should render next. Submitted values always round-trip back into the
//! page data — a failed validation never loses the user's input.

pub mod bank_account;
pub mod organisation_address;
pub mod responsible_person;
pub mod state;
pub mod submission;

pub use state::StepState;
pub use submission::{FieldRule, FormOutcome, FormSubmission, Rule, SubmissionIntent};
