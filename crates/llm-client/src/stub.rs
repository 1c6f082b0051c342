//! Deterministic local stand-in for the generative-text backend
//!
//! Pulls a few obvious fields out of the prompt with regex heuristics so the
//! whole pipeline can run without network access.

use async_trait::async_trait;
use lazy_static::lazy_static;
use pii_redaction::sanitize_text;
use regex::{Match, Regex};
use serde_json::{json, Value};

use crate::client::{LlmClient, Schema};
use crate::config::LlmConfig;
use crate::error::LlmError;
use deal_types::{DEFAULT_BANNER, MAX_CITATION_CHARS};

/// Characters of context kept either side of a match
const SNIPPET_CONTEXT: usize = 80;

lazy_static! {
    static ref LABELLED_AMOUNT: Regex = Regex::new(
        r"(?i)(?:loan amount|facility amount|principal)[^\n\r]*?(\$?\s*[0-9][0-9,.]*)(?:\s*(?:AUD|USD|NZD))?"
    )
    .unwrap();
    static ref DOLLAR_AMOUNT: Regex = Regex::new(r"\$\s*([0-9][0-9,.]+)").unwrap();
    static ref INTEREST: Regex =
        Regex::new(r"(?i)\b(?:interest|coupon)\s*[:=]?\s*([0-9]+(?:\.[0-9]+)?)\s*%").unwrap();
    static ref TERM: Regex =
        Regex::new(r"(?i)\bterm\s*[:=]?\s*([0-9]{1,3})\s*(?:months|month|mos|mo)\b").unwrap();
    static ref COLLATERAL: Regex =
        Regex::new(r"\bcollateral\s*[:=]?\s*([A-Za-z /-]{3,60})").unwrap();
}

#[derive(Debug, Clone, PartialEq)]
pub struct StubLlmClient {
    model: String,
    temperature: f64,
}

impl Default for StubLlmClient {
    fn default() -> Self {
        Self {
            model: "stub".to_string(),
            temperature: 0.0,
        }
    }
}

impl StubLlmClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report the configured model and temperature in run records
    pub fn from_config(config: &LlmConfig) -> Self {
        Self {
            model: config.model.clone(),
            temperature: config.temperature,
        }
    }
}

#[async_trait]
impl LlmClient for StubLlmClient {
    async fn complete_json(&self, prompt: &str, schema: Schema) -> Result<Value, LlmError> {
        tracing::debug!(schema = %schema, prompt_len = prompt.len(), "stub completion");
        Ok(match schema {
            Schema::ExtractedTerms => extract_terms(&sanitize_text(prompt)),
            Schema::IcDraft => placeholder_draft(),
        })
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn temperature(&self) -> f64 {
        self.temperature
    }
}

struct Found<T> {
    value: T,
    snippet: String,
}

fn extract_terms(text: &str) -> Value {
    let loan = find_amount(text);
    let interest = find_captured(text, &INTEREST, |raw| raw.parse::<f64>().ok());
    let term = find_captured(text, &TERM, |raw| raw.parse::<u32>().ok());
    let collateral = find_captured(text, &COLLATERAL, |raw| Some(raw.trim().to_string()));

    json!({
        "loan_amount": loan.as_ref().and_then(|f| f.value),
        "currency": "AUD",
        "term_months": term.as_ref().map(|f| f.value),
        "interest_rate_pct": interest.as_ref().map(|f| f.value),
        "fees": [],
        "collateral_type": collateral
            .as_ref()
            .map_or("unknown", |f| f.value.as_str()),
        "collateral_value_appraised": null,
        "collateral_value_as_is": null,
        "collateral_value_stressed": null,
        "lien_position": "unknown",
        "jurisdiction": null,
        "enforcement_timeline_months": null,
        "repayment_source": null,
        "repayment_timeline_months": null,
        "key_conditions": [],
        "notes": null,
        "citations": {
            "loan_amount": citation(&loan),
            "interest_rate_pct": citation(&interest),
            "term_months": citation(&term),
            "collateral_type": citation(&collateral),
        },
    })
}

fn citation<T>(found: &Option<Found<T>>) -> Value {
    found.as_ref().map_or(Value::Null, |f| json!([f.snippet]))
}

/// Amount after a loan label, else the first dollar figure
fn find_amount(text: &str) -> Option<Found<Option<f64>>> {
    let captures = LABELLED_AMOUNT
        .captures(text)
        .or_else(|| DOLLAR_AMOUNT.captures(text))?;
    let whole = captures.get(0)?;
    Some(Found {
        value: captures.get(1).and_then(|raw| parse_amount(raw.as_str())),
        snippet: snippet(text, whole),
    })
}

fn find_captured<T>(
    text: &str,
    pattern: &Regex,
    parse: impl Fn(&str) -> Option<T>,
) -> Option<Found<T>> {
    let captures = pattern.captures(text)?;
    let whole = captures.get(0)?;
    let value = parse(captures.get(1)?.as_str())?;
    Some(Found {
        value,
        snippet: snippet(text, whole),
    })
}

/// "$ 1,500,000." -> 1500000.0
fn parse_amount(raw: &str) -> Option<f64> {
    let digits: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    digits.trim_end_matches('.').parse().ok()
}

/// Context around a match: whitespace collapsed, capped at the citation limit
fn snippet(text: &str, found: Match<'_>) -> String {
    let start = text[..found.start()]
        .char_indices()
        .rev()
        .take(SNIPPET_CONTEXT)
        .last()
        .map_or(found.start(), |(i, _)| i);
    let end = text[found.end()..]
        .char_indices()
        .nth(SNIPPET_CONTEXT)
        .map_or(text.len(), |(i, _)| found.end() + i);

    text[start..end]
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(MAX_CITATION_CHARS)
        .collect()
}

fn placeholder_draft() -> Value {
    json!({
        "banner": DEFAULT_BANNER,
        "ic_summary_3_lines": "Stub summary (no external LLM configured).",
        "top_risks_ranked": ["Insufficient confirmed repayment source."],
        "mitigants_or_conditions": ["Confirm repayment source and timing."],
        "diligence_questions": ["What is the verified repayment source for this facility?"],
        "what_changes_my_mind": "Provide independent collateral valuation and clear exit evidence.",
    })
}
