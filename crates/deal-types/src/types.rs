//! Deal terms and human confirmation state

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Longest citation snippet accepted on a Terms value
pub const MAX_CITATION_CHARS: usize = 200;

/// Position of the lender's security interest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LienPosition {
    First,
    Second,
    Unsecured,
    #[default]
    Unknown,
}

impl LienPosition {
    pub fn as_str(&self) -> &'static str {
        match self {
            LienPosition::First => "first",
            LienPosition::Second => "second",
            LienPosition::Unsecured => "unsecured",
            LienPosition::Unknown => "unknown",
        }
    }
}

impl fmt::Display for LienPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Fee {
    #[serde(rename = "type")]
    pub fee_type: String,
    #[serde(alias = "pct_or_amount")]
    pub amount_or_pct: String, // e.g. "1.5%" or "$12,000"
}

/// The current extracted (or manually edited) description of a deal.
///
/// A deal holds exactly one of these at a time. Re-extraction and manual
/// edits replace it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Terms {
    pub loan_amount: Option<f64>,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub term_months: Option<u32>,
    pub interest_rate_pct: Option<f64>,

    #[serde(default)]
    pub fees: Vec<Fee>,

    pub collateral_type: String,
    pub collateral_value_appraised: Option<f64>,
    pub collateral_value_as_is: Option<f64>,
    pub collateral_value_stressed: Option<f64>,

    #[serde(default)]
    pub lien_position: LienPosition,

    pub jurisdiction: Option<String>,
    pub enforcement_timeline_months: Option<u32>,

    pub repayment_source: Option<String>,
    pub repayment_timeline_months: Option<u32>,

    #[serde(default)]
    pub key_conditions: Vec<String>,
    pub notes: Option<String>,

    /// Field name -> supporting snippets, `None` when the value is unsupported
    #[serde(default)]
    pub citations: BTreeMap<String, Option<Vec<String>>>,
}

fn default_currency() -> String {
    "AUD".to_string()
}

impl Default for Terms {
    fn default() -> Self {
        Self {
            loan_amount: None,
            currency: default_currency(),
            term_months: None,
            interest_rate_pct: None,
            fees: Vec::new(),
            collateral_type: "unknown".to_string(),
            collateral_value_appraised: None,
            collateral_value_as_is: None,
            collateral_value_stressed: None,
            lien_position: LienPosition::Unknown,
            jurisdiction: None,
            enforcement_timeline_months: None,
            repayment_source: None,
            repayment_timeline_months: None,
            key_conditions: Vec::new(),
            notes: None,
            citations: BTreeMap::new(),
        }
    }
}

/// Semantic problems with a Terms value, caught before analysis
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TermsError {
    #[error("Citation key '{0}' is not a Terms field")]
    UnknownCitationField(String),

    #[error("Citation for '{field}' is {length} characters (max {max})", max = MAX_CITATION_CHARS)]
    CitationTooLong { field: String, length: usize },

    #[error("Field '{field}' must be a finite, non-negative amount (found {value})")]
    InvalidAmount { field: &'static str, value: f64 },
}

impl Terms {
    /// Every field name a citation or confirmation may refer to
    pub const FIELD_NAMES: [&'static str; 17] = [
        "loan_amount",
        "currency",
        "term_months",
        "interest_rate_pct",
        "fees",
        "collateral_type",
        "collateral_value_appraised",
        "collateral_value_as_is",
        "collateral_value_stressed",
        "lien_position",
        "jurisdiction",
        "enforcement_timeline_months",
        "repayment_source",
        "repayment_timeline_months",
        "key_conditions",
        "notes",
        "citations",
    ];

    pub fn is_field(name: &str) -> bool {
        Self::FIELD_NAMES.contains(&name)
    }

    /// Check the invariants the risk engine relies on but does not verify itself
    pub fn validate(&self) -> Result<(), TermsError> {
        let amounts = [
            ("loan_amount", self.loan_amount),
            ("interest_rate_pct", self.interest_rate_pct),
            ("collateral_value_appraised", self.collateral_value_appraised),
            ("collateral_value_as_is", self.collateral_value_as_is),
            ("collateral_value_stressed", self.collateral_value_stressed),
        ];
        for (field, value) in amounts {
            if let Some(value) = value {
                if !value.is_finite() || value < 0.0 {
                    return Err(TermsError::InvalidAmount { field, value });
                }
            }
        }

        for (field, snippets) in &self.citations {
            if field == "citations" || !Self::is_field(field) {
                return Err(TermsError::UnknownCitationField(field.clone()));
            }
            for snippet in snippets.iter().flatten() {
                let length = snippet.chars().count();
                if length > MAX_CITATION_CHARS {
                    return Err(TermsError::CitationTooLong {
                        field: field.clone(),
                        length,
                    });
                }
            }
        }

        Ok(())
    }
}

/// Human sign-off per Terms field. Absent keys read as unconfirmed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfirmedFields(BTreeMap<String, bool>);

impl ConfirmedFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_confirmed(&self, field: &str) -> bool {
        self.0.get(field).copied().unwrap_or(false)
    }

    pub fn confirm(&mut self, field: impl Into<String>) {
        self.0.insert(field.into(), true);
    }

    pub fn set(&mut self, field: impl Into<String>, confirmed: bool) {
        self.0.insert(field.into(), confirmed);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Number of fields currently marked true
    pub fn confirmed_count(&self) -> usize {
        self.0.values().filter(|v| **v).count()
    }

    /// Names of the fields marked true, in name order
    pub fn confirmed_names(&self) -> Vec<String> {
        self.0
            .iter()
            .filter(|(_, confirmed)| **confirmed)
            .map(|(field, _)| field.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, bool)> for ConfirmedFields {
    fn from_iter<I: IntoIterator<Item = (S, bool)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// A manual edit: replacement Terms plus the analyst's confirmations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TermsUpdate {
    pub terms: Terms,
    #[serde(default)]
    pub confirmed_fields: ConfirmedFields,
}
