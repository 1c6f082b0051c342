/// Generative-text call errors
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("LLM backend returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed LLM response: {0}")]
    MalformedResponse(String),

    #[error("LLM output is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = LlmError::Config("Azure OpenAI API key missing".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: Azure OpenAI API key missing"
        );

        let err = LlmError::Status {
            status: 429,
            body: "rate limited".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "LLM backend returned status 429: rate limited"
        );
    }

    #[test]
    fn test_json_error_converts() {
        let parse = serde_json::from_str::<serde_json::Value>("not json");
        let err: LlmError = parse.unwrap_err().into();
        assert!(matches!(err, LlmError::InvalidJson(_)));
    }
}
