//! PII redaction for deal text
//!
//! Masks emails, long digit runs, phone numbers and capitalised name-like
//! sequences. Applied to document text before it is stored, to prompts before
//! they leave the process, and to generated output before it is persisted.
//!
//! This is heuristic masking, not a privacy guarantee.

pub mod patterns;
pub mod redact;
pub mod sanitize;
pub mod scrub;

pub use patterns::{EMAIL_PLACEHOLDER, NAME_PLACEHOLDER, NUMBER_PLACEHOLDER, PHONE_PLACEHOLDER};
pub use redact::{redact, redact_value, redact_with_counts, RedactionCounts};
pub use sanitize::sanitize_text;
pub use scrub::Scrub;
