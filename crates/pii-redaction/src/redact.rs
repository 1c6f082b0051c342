use regex::Captures;
use serde_json::Value;
use tracing::debug;

use crate::patterns::{
    digit_count, EMAIL_PATTERN, EMAIL_PLACEHOLDER, LONG_DIGITS_PATTERN, MIN_PHONE_DIGITS,
    NAME_PATTERN, NAME_PLACEHOLDER, NUMBER_PLACEHOLDER, PHONE_PATTERN, PHONE_PLACEHOLDER,
};

/// How many substrings of each category a redaction replaced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RedactionCounts {
    pub emails: usize,
    pub numbers: usize,
    pub phones: usize,
    pub names: usize,
}

impl RedactionCounts {
    pub fn total(&self) -> usize {
        self.emails + self.numbers + self.phones + self.names
    }
}

/// Mask PII in free text. Never fails; empty input comes back empty.
///
/// `redact(&redact(s)) == redact(s)` holds for every `s`.
pub fn redact(text: &str) -> String {
    let (redacted, counts) = redact_with_counts(text);
    if counts.total() > 0 {
        debug!(
            emails = counts.emails,
            numbers = counts.numbers,
            phones = counts.phones,
            names = counts.names,
            "redacted text"
        );
    }
    redacted
}

/// Like [`redact`], also reporting what was replaced
pub fn redact_with_counts(text: &str) -> (String, RedactionCounts) {
    let mut counts = RedactionCounts::default();
    if text.is_empty() {
        return (String::new(), counts);
    }

    // Every pass that changes the text removes '@', digits or lowercase
    // letters without adding any, so this reaches a fixed point.
    let mut current = scrub_pass(text, &mut counts);
    loop {
        let next = scrub_pass(&current, &mut counts);
        if next == current {
            return (current, counts);
        }
        current = next;
    }
}

/// One pass over the four categories, in order: email, number, phone, name
fn scrub_pass(text: &str, counts: &mut RedactionCounts) -> String {
    let mut emails = 0;
    let text = EMAIL_PATTERN.replace_all(text, |_: &Captures<'_>| {
        emails += 1;
        EMAIL_PLACEHOLDER
    });

    let mut numbers = 0;
    let text = LONG_DIGITS_PATTERN.replace_all(&text, |_: &Captures<'_>| {
        numbers += 1;
        NUMBER_PLACEHOLDER
    });

    // Short numeric terms (rates, counts, years) stay as they are
    let mut phones = 0;
    let text = PHONE_PATTERN.replace_all(&text, |caps: &Captures<'_>| {
        let matched = &caps[0];
        if digit_count(matched) < MIN_PHONE_DIGITS {
            matched.to_string()
        } else {
            phones += 1;
            PHONE_PLACEHOLDER.to_string()
        }
    });

    let mut names = 0;
    let text = NAME_PATTERN.replace_all(&text, |_: &Captures<'_>| {
        names += 1;
        NAME_PLACEHOLDER
    });

    counts.emails += emails;
    counts.numbers += numbers;
    counts.phones += phones;
    counts.names += names;

    text.into_owned()
}

/// Redact every string leaf of a JSON value, keeping keys, order and nesting.
/// Keys themselves are not redacted.
pub fn redact_value(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(redact(s)),
        Value::Array(items) => Value::Array(items.iter().map(redact_value).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, v)| (key.clone(), redact_value(v)))
                .collect(),
        ),
        Value::Null | Value::Bool(_) | Value::Number(_) => value.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_masks_email_number_and_phone() {
        let text = "Contact ops@lender.com.au, account 123456789012, phone 0412 345 678.";
        let (redacted, counts) = redact_with_counts(text);

        assert_eq!(
            redacted,
            "Contact [REDACTED_EMAIL], account [REDACTED_NUMBER], phone [REDACTED_PHONE]."
        );
        assert_eq!(counts.emails, 1);
        assert_eq!(counts.numbers, 1);
        assert_eq!(counts.phones, 1);
        assert_eq!(counts.names, 0);
        assert_eq!(redact(&redacted), redacted);
    }

    #[test]
    fn test_email_runs_before_digits() {
        let redacted = redact("send to 123456789@bank.com");
        assert_eq!(redacted, "send to [REDACTED_EMAIL]");
    }

    #[test]
    fn test_short_numbers_survive() {
        let text = "Interest 8.5% over 24 months, LVR 65%, fee 1.25%, 2 tranches in 2024";
        assert_eq!(redact(text), text);
    }

    #[test]
    fn test_short_grouped_numbers_are_not_phones() {
        let text = "Facility amount $500 000 for 12 345 units";
        assert_eq!(redact(text), text);
    }

    #[test]
    fn test_masks_names() {
        let redacted = redact("Guarantee provided by Jane Citizen and Robert Allan Smith.");
        assert_eq!(
            redacted,
            "Guarantee provided by [REDACTED_NAME] and [REDACTED_NAME]."
        );
    }

    #[test]
    fn test_single_capitalised_word_kept() {
        let text = "Borrower is a Sydney developer.";
        assert_eq!(redact(text), text);
    }

    #[test]
    fn test_long_name_run_fully_masked() {
        let redacted = redact("Alpha Bravo Charlie Delta Echo");
        assert_eq!(redacted, "[REDACTED_NAME] [REDACTED_NAME]");
        assert_eq!(redact(&redacted), redacted);
    }

    #[test]
    fn test_empty_passes_through() {
        assert_eq!(redact(""), "");
        assert_eq!(redact_with_counts("").1, RedactionCounts::default());
    }

    #[test]
    fn test_redact_value_preserves_shape() {
        let input = json!({
            "loan_amount": 500000.0,
            "lien_position": "first",
            "confirmed": true,
            "notes": null,
            "contacts": ["Jane Citizen", "ops@lender.com"],
            "citations": { "loan_amount": ["Call 0412 345 678 re facility"] }
        });

        let output = redact_value(&input);

        assert_eq!(
            output,
            json!({
                "loan_amount": 500000.0,
                "lien_position": "first",
                "confirmed": true,
                "notes": null,
                "contacts": ["[REDACTED_NAME]", "[REDACTED_EMAIL]"],
                "citations": { "loan_amount": ["Call [REDACTED_PHONE] re facility"] }
            })
        );
    }

    #[test]
    fn test_redact_value_leaves_keys_alone() {
        let input = json!({ "Jane Citizen": "ok" });
        let output = redact_value(&input);
        assert_eq!(output, input);
    }
}
