//! Single-field validators.

use std::sync::LazyLock;

use regex::Regex;

/// Outcome of validating one field (or one cross-field group).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub valid: bool,
    pub message: Option<String>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            valid: true,
            message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: Some(message.into()),
        }
    }
}

pub const BLANK_MESSAGE: &str = "This field cannot be blank";
pub const TOO_LONG_MESSAGE: &str = "The text is too long";
pub const INVALID_POSTCODE_MESSAGE: &str = "Please enter a real postcode";
pub const INVALID_PHONE_MESSAGE: &str = "Invalid telephone number";
pub const INVALID_SORT_CODE_MESSAGE: &str = "Enter a valid sort code like 309430";
pub const INVALID_ACCOUNT_NUMBER_MESSAGE: &str = "Enter a valid account number like 00733445";

// UK postcodes (e.g. E8 4ER, SW1A 1AA) and Irish Eircodes (e.g. D01 F5P2).
static UK_POSTCODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[A-Z]{1,2}[0-9][0-9A-Z]?\s?[0-9][A-Z]{2}$").unwrap());
static EIRCODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[AC-FHKNPRTV-Y][0-9W][0-9]\s?[0-9AC-FHKNPRTV-YW]{4}$").unwrap());
static PHONE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9\s().-]+$").unwrap());

/// A mandatory field must be non-empty after trimming and within
/// `max_length` characters.
pub fn validate_mandatory_field(value: &str, max_length: Option<usize>) -> ValidationResult {
    if value.trim().is_empty() {
        return ValidationResult::error(BLANK_MESSAGE);
    }
    check_length(value, max_length)
}

/// An optional field may be empty; a non-empty value is length-checked.
pub fn validate_optional_field(value: &str, max_length: Option<usize>) -> ValidationResult {
    if value.trim().is_empty() {
        return ValidationResult::ok();
    }
    check_length(value, max_length)
}

fn check_length(value: &str, max_length: Option<usize>) -> ValidationResult {
    match max_length {
        Some(max) if value.chars().count() > max => ValidationResult::error(TOO_LONG_MESSAGE),
        _ => ValidationResult::ok(),
    }
}

/// Postcodes are accepted for the supported countries: United Kingdom and
/// Ireland.
pub fn validate_postcode(value: &str) -> ValidationResult {
    let value = value.trim();
    if value.is_empty() {
        return ValidationResult::error(BLANK_MESSAGE);
    }
    if UK_POSTCODE.is_match(value) || EIRCODE.is_match(value) {
        ValidationResult::ok()
    } else {
        ValidationResult::error(INVALID_POSTCODE_MESSAGE)
    }
}

/// A telephone number may use spaces, parentheses, dots and dashes, with an
/// optional leading `+`, and must carry 9 to 15 digits.
pub fn validate_phone_number(value: &str) -> ValidationResult {
    let value = value.trim();
    if value.is_empty() {
        return ValidationResult::error(BLANK_MESSAGE);
    }
    let digits = value.chars().filter(char::is_ascii_digit).count();
    if PHONE_CHARS.is_match(value) && (9..=15).contains(&digits) {
        ValidationResult::ok()
    } else {
        ValidationResult::error(INVALID_PHONE_MESSAGE)
    }
}

/// A sort code must be exactly six digits once spaces and dashes are
/// removed.
pub fn validate_sort_code(value: &str) -> ValidationResult {
    let value = value.trim();
    if value.is_empty() {
        return ValidationResult::error(BLANK_MESSAGE);
    }
    let normalised = strip_separators(value);
    if normalised.len() == 6 && normalised.chars().all(|c| c.is_ascii_digit()) {
        ValidationResult::ok()
    } else {
        ValidationResult::error(INVALID_SORT_CODE_MESSAGE)
    }
}

/// An account number must be six to eight digits once spaces and dashes are
/// removed.
pub fn validate_account_number(value: &str) -> ValidationResult {
    let value = value.trim();
    if value.is_empty() {
        return ValidationResult::error(BLANK_MESSAGE);
    }
    let normalised = strip_separators(value);
    if (6..=8).contains(&normalised.len()) && normalised.chars().all(|c| c.is_ascii_digit()) {
        ValidationResult::ok()
    } else {
        ValidationResult::error(INVALID_ACCOUNT_NUMBER_MESSAGE)
    }
}

/// Remove the separators users commonly type into bank details.
pub fn strip_separators(value: &str) -> String {
    value.chars().filter(|c| *c != ' ' && *c != '-').collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Mandatory fields ────────────────────────────────────────────

    #[test]
    fn mandatory_rejects_blank() {
        let result = validate_mandatory_field("", Some(100));
        assert!(!result.valid);
        assert_eq!(result.message.as_deref(), Some(BLANK_MESSAGE));
    }

    #[test]
    fn mandatory_rejects_whitespace_only() {
        let result = validate_mandatory_field("   \t ", Some(100));
        assert!(!result.valid);
        assert_eq!(result.message.as_deref(), Some(BLANK_MESSAGE));
    }

    #[test]
    fn mandatory_rejects_too_long() {
        let result = validate_mandatory_field(&"a".repeat(101), Some(100));
        assert!(!result.valid);
        assert_eq!(result.message.as_deref(), Some(TOO_LONG_MESSAGE));
    }

    #[test]
    fn mandatory_accepts_value_at_limit() {
        let result = validate_mandatory_field(&"a".repeat(100), Some(100));
        assert!(result.valid);
        assert!(result.message.is_none());
    }

    #[test]
    fn mandatory_accepts_any_length_without_limit() {
        assert!(validate_mandatory_field(&"a".repeat(10_000), None).valid);
    }

    // ── Optional fields ─────────────────────────────────────────────

    #[test]
    fn optional_accepts_blank() {
        assert!(validate_optional_field("", Some(5)).valid);
        assert!(validate_optional_field("   ", Some(5)).valid);
    }

    #[test]
    fn optional_rejects_too_long() {
        let result = validate_optional_field("abcdef", Some(5));
        assert!(!result.valid);
        assert_eq!(result.message.as_deref(), Some(TOO_LONG_MESSAGE));
    }

    #[test]
    fn optional_accepts_value_within_limit() {
        assert!(validate_optional_field("abc", Some(5)).valid);
    }

    // ── Postcodes ───────────────────────────────────────────────────

    #[test]
    fn postcode_accepts_uk_formats() {
        for postcode in ["E8 4ER", "SW1A 1AA", "N1 7UX", "m25dh"] {
            assert!(validate_postcode(postcode).valid, "{postcode} should be valid");
        }
    }

    #[test]
    fn postcode_accepts_eircode() {
        assert!(validate_postcode("D01 F5P2").valid);
        assert!(validate_postcode("T12X5P2").valid);
    }

    #[test]
    fn postcode_rejects_garbage() {
        for postcode in ["123", "not a postcode", "1A 2BC"] {
            let result = validate_postcode(postcode);
            assert!(!result.valid, "{postcode} should be invalid");
            assert_eq!(result.message.as_deref(), Some(INVALID_POSTCODE_MESSAGE));
        }
    }

    #[test]
    fn postcode_rejects_blank() {
        let result = validate_postcode(" ");
        assert_eq!(result.message.as_deref(), Some(BLANK_MESSAGE));
    }

    // ── Telephone numbers ───────────────────────────────────────────

    #[test]
    fn phone_accepts_common_formats() {
        for number in ["01632 960 001", "07700 900 982", "+44 0808 157 0192", "(020) 7946-0958"] {
            assert!(validate_phone_number(number).valid, "{number} should be valid");
        }
    }

    #[test]
    fn phone_rejects_letters_and_short_numbers() {
        for number in ["abd", "12345", "0800 call me"] {
            let result = validate_phone_number(number);
            assert!(!result.valid, "{number} should be invalid");
            assert_eq!(result.message.as_deref(), Some(INVALID_PHONE_MESSAGE));
        }
    }

    #[test]
    fn phone_rejects_blank() {
        let result = validate_phone_number("");
        assert_eq!(result.message.as_deref(), Some(BLANK_MESSAGE));
    }

    // ── Bank details ────────────────────────────────────────────────

    #[test]
    fn sort_code_accepts_six_digits_with_separators() {
        assert!(validate_sort_code("108800").valid);
        assert!(validate_sort_code("10-88-00").valid);
        assert!(validate_sort_code(" 00 - 00 00 ").valid);
    }

    #[test]
    fn sort_code_rejects_wrong_length_or_letters() {
        assert!(!validate_sort_code("10880").valid);
        assert!(!validate_sort_code("1088000").valid);
        assert!(!validate_sort_code("10a800").valid);
    }

    #[test]
    fn account_number_accepts_six_to_eight_digits() {
        assert!(validate_account_number("00012345").valid);
        assert!(validate_account_number("123456").valid);
        assert!(validate_account_number(" 000 123 45 ").valid);
    }

    #[test]
    fn account_number_rejects_out_of_range() {
        assert!(!validate_account_number("12345").valid);
        assert!(!validate_account_number("123456789").valid);
        assert!(!validate_account_number("0001234x").valid);
    }

    #[test]
    fn strip_separators_removes_spaces_and_dashes() {
        assert_eq!(strip_separators(" 00 - 00 00 "), "000000");
        assert_eq!(strip_separators("108800"), "108800");
    }
}
