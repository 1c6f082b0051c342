use deal_types::{DraftError, TermsError};
use llm_client::LlmError;

/// Deal workflow errors
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("Deal not found: {0}")]
    DealNotFound(String),

    #[error("Unsupported file type: {0} (only .txt and .md are accepted)")]
    UnsupportedFileType(String),

    #[error("Document too large: {size} bytes (max {max})")]
    DocumentTooLarge { size: u64, max: u64 },

    #[error("Upload at least one document before extraction")]
    NoDocuments,

    #[error("No extracted or confirmed terms")]
    NoTerms,

    #[error("Run analysis first")]
    NoAnalysis,

    #[error("Analysis is stale: terms changed since revision {analyzed}, now {current}")]
    StaleAnalysis { analyzed: u64, current: u64 },

    #[error("Drafting blocked: {0}")]
    DraftBlocked(String),

    #[error("Invalid terms: {0}")]
    InvalidTerms(#[from] TermsError),

    #[error("Invalid draft: {0}")]
    InvalidDraft(#[from] DraftError),

    #[error("LLM call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("LLM output does not match schema: {0}")]
    Schema(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = WorkflowError::DraftBlocked(
            "Field 'lien_position' must be confirmed before drafting".to_string(),
        );
        assert_eq!(
            err.to_string(),
            "Drafting blocked: Field 'lien_position' must be confirmed before drafting"
        );

        let err = WorkflowError::StaleAnalysis {
            analyzed: 1,
            current: 2,
        };
        assert!(err.to_string().contains("revision 1, now 2"));
    }

    #[test]
    fn test_from_llm_error() {
        let err: WorkflowError = LlmError::Config("missing key".to_string()).into();
        assert!(matches!(err, WorkflowError::Llm(_)));
    }
}
