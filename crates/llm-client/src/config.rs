use std::fmt;

use serde::{Deserialize, Serialize};

/// Which generative-text backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    Stub,
    Azure,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Stub => "stub",
            Provider::Azure => "azure",
        }
    }

    /// Parse a provider name, case-insensitively
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "stub" => Some(Provider::Stub),
            "azure" => Some(Provider::Azure),
            _ => None,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Generative-text settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub provider: Provider,
    pub model: String,
    pub temperature: f64,
    pub timeout_secs: u64,
    pub azure: AzureConfig,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: Provider::Stub,
            model: "gpt-4o-mini".to_string(),
            temperature: 0.2,
            timeout_secs: 60,
            azure: AzureConfig::default(),
        }
    }
}

/// Azure OpenAI deployment settings
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AzureConfig {
    pub endpoint: Option<String>,
    pub deployment: Option<String>,
    pub api_version: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

impl Default for AzureConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            deployment: None,
            api_version: "2024-02-15-preview".to_string(),
            api_key: None,
        }
    }
}

impl fmt::Debug for AzureConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AzureConfig")
            .field("endpoint", &self.endpoint)
            .field("deployment", &self.deployment)
            .field("api_version", &self.api_version)
            .field("api_key", &self.api_key.as_ref().map(|_| "<set>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LlmConfig::default();
        assert_eq!(config.provider, Provider::Stub);
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.temperature, 0.2);
        assert_eq!(config.timeout_secs, 60);
        assert_eq!(config.azure.api_version, "2024-02-15-preview");
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: LlmConfig =
            serde_json::from_str(r#"{"provider": "azure", "azure": {"deployment": "triage"}}"#)
                .unwrap();
        assert_eq!(config.provider, Provider::Azure);
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.azure.deployment.as_deref(), Some("triage"));
        assert_eq!(config.azure.api_version, "2024-02-15-preview");
    }

    #[test]
    fn test_provider_parse() {
        assert_eq!(Provider::parse("Azure"), Some(Provider::Azure));
        assert_eq!(Provider::parse(" stub "), Some(Provider::Stub));
        assert_eq!(Provider::parse("openai"), None);
    }

    #[test]
    fn test_api_key_hidden() {
        let azure = AzureConfig {
            api_key: Some("secret-key".to_string()),
            ..AzureConfig::default()
        };
        let debug = format!("{:?}", azure);
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("<set>"));

        let json = serde_json::to_string(&azure).unwrap();
        assert!(!json.contains("secret-key"));
    }
}
