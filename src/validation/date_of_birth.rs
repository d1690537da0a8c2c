//! Cross-field date-of-birth validation and display formatting.
//!
//! Months are 1-indexed everywhere in this module, matching what the user
//! types into the form (1 = January, 12 = December).

use chrono::{Datelike, NaiveDate, Utc};

use super::field::ValidationResult;

/// The youngest a responsible person can be.
pub const MIN_AGE_YEARS: i32 = 13;
/// Dates before this year are treated as typos.
pub const MIN_YEAR: i32 = 1900;

pub const DOB_BLANK_MESSAGE: &str = "Enter the date of birth";
pub const DOB_INVALID_MESSAGE: &str = "Enter a real date of birth";
pub const DOB_NOT_IN_PAST_MESSAGE: &str = "Enter a date of birth in the past";
pub const DOB_TOO_OLD_MESSAGE: &str = "Year must be 1900 or later";
pub const DOB_TOO_YOUNG_MESSAGE: &str = "The responsible person must be at least 13 years old";

/// Validate a day/month/year combination as submitted on the form.
pub fn validate_date_of_birth(day: &str, month: &str, year: &str) -> ValidationResult {
    validate_date_of_birth_at(day, month, year, Utc::now().date_naive())
}

/// Clock-injected form of [`validate_date_of_birth`].
pub fn validate_date_of_birth_at(
    day: &str,
    month: &str,
    year: &str,
    today: NaiveDate,
) -> ValidationResult {
    let (day, month, year) = (day.trim(), month.trim(), year.trim());
    if day.is_empty() || month.is_empty() || year.is_empty() {
        return ValidationResult::error(DOB_BLANK_MESSAGE);
    }

    let (Ok(day), Ok(month), Ok(year)) = (
        day.parse::<u32>(),
        month.parse::<u32>(),
        year.parse::<i32>(),
    ) else {
        return ValidationResult::error(DOB_INVALID_MESSAGE);
    };

    let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
        return ValidationResult::error(DOB_INVALID_MESSAGE);
    };

    if date >= today {
        return ValidationResult::error(DOB_NOT_IN_PAST_MESSAGE);
    }
    if year < MIN_YEAR {
        return ValidationResult::error(DOB_TOO_OLD_MESSAGE);
    }
    if age_on(date, today) < MIN_AGE_YEARS {
        return ValidationResult::error(DOB_TOO_YOUNG_MESSAGE);
    }

    ValidationResult::ok()
}

/// Whole years between a birth date and `today`.
fn age_on(born: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - born.year();
    if (today.month(), today.day()) < (born.month(), born.day()) {
        age -= 1;
    }
    age
}

/// Format a validated date of birth for the check-your-answers page,
/// e.g. `15 June 1990`. Returns `None` if the components do not form a
/// real date.
pub fn format_date_of_birth(day: u32, month: u32, year: i32) -> Option<String> {
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    Some(date.format("%-d %B %Y").to_string())
}
