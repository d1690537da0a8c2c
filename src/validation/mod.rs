//! Field and cross-field validators for onboarding forms.
//!
//! Validators are pure functions over trimmed input: they never touch the
//! request, the clock is injected where needed, and each produces a single
//! [`ValidationResult`]. Aggregated failures live in [`ValidationErrors`],
//! which preserves field declaration order for the error summary.

pub mod date_of_birth;
pub mod errors;
pub mod field;

pub use date_of_birth::{format_date_of_birth, validate_date_of_birth};
pub use errors::ValidationErrors;
pub use field::{
    ValidationResult, validate_account_number, validate_mandatory_field, validate_optional_field,
    validate_phone_number, validate_postcode, validate_sort_code,
};
