//! Regex patterns and placeholder tokens for PII masking
//!
//! Placeholders are upper-case, digit-free and contain no `@`, so none of the
//! patterns below can match them.

use lazy_static::lazy_static;
use regex::Regex;

pub const EMAIL_PLACEHOLDER: &str = "[REDACTED_EMAIL]";
pub const NUMBER_PLACEHOLDER: &str = "[REDACTED_NUMBER]";
pub const PHONE_PLACEHOLDER: &str = "[REDACTED_PHONE]";
pub const NAME_PLACEHOLDER: &str = "[REDACTED_NAME]";

/// Phone-like matches with fewer digits than this are left alone
pub const MIN_PHONE_DIGITS: usize = 9;

lazy_static! {
    /// local-part@domain.tld with a 2+ letter suffix
    pub static ref EMAIL_PATTERN: Regex =
        Regex::new(r"(?i)\b[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}\b").unwrap();

    /// Account numbers, IDs and other long digit runs
    pub static ref LONG_DIGITS_PATTERN: Regex = Regex::new(r"\b\d{9,}\b").unwrap();

    /// Optional country code, optional (area) code, then two digit blocks
    pub static ref PHONE_PATTERN: Regex = Regex::new(
        r"\b(?:\+?\d{1,3}[\s-]?)?(?:\(?\d{2,4}\)?[\s-]?)?\d{3,4}[\s-]?\d{3,4}\b"
    )
    .unwrap();

    /// Two or three capitalised words, e.g. "Jane Citizen"
    pub static ref NAME_PATTERN: Regex =
        Regex::new(r"\b[A-Z][a-z]{2,}(?:\s+[A-Z][a-z]{2,}){1,2}\b").unwrap();
}

/// Count the digits in a phone-like match after stripping separators
pub fn digit_count(s: &str) -> usize {
    s.chars().filter(|c| c.is_numeric()).count()
}
