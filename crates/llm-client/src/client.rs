use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::LlmError;

/// Output shape requested from the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Schema {
    ExtractedTerms,
    IcDraft,
}

impl Schema {
    pub fn name(&self) -> &'static str {
        match self {
            Schema::ExtractedTerms => "ExtractedTerms",
            Schema::IcDraft => "ICDraft",
        }
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Generative-text capability.
///
/// Used only for extraction and drafting. Metrics, rules, triage and the
/// draft gate never go through a model.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Return a JSON object shaped like `schema`. The prompt is expected to
    /// be redacted already.
    async fn complete_json(&self, prompt: &str, schema: Schema) -> Result<Value, LlmError>;

    /// Model identifier recorded with each run
    fn model(&self) -> &str;

    /// Sampling temperature recorded with each run
    fn temperature(&self) -> f64;
}
