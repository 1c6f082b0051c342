//! Azure OpenAI chat-completions adapter
//!
//! Raw prompts are never logged; only lengths and the deployment name.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::client::{LlmClient, Schema};
use crate::config::LlmConfig;
use crate::error::LlmError;

const SYSTEM_PROMPT: &str = "Return only strict JSON. No prose.";

/// Longest error body kept in `LlmError::Status`
const MAX_ERROR_BODY: usize = 320;

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

pub struct AzureOpenAiClient {
    http: Client,
    endpoint: String,
    deployment: String,
    api_version: String,
    api_key: String,
    model: String,
    temperature: f64,
}

impl fmt::Debug for AzureOpenAiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AzureOpenAiClient")
            .field("endpoint", &self.endpoint)
            .field("deployment", &self.deployment)
            .field("api_version", &self.api_version)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl AzureOpenAiClient {
    /// Fails when endpoint, deployment or API key is missing
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        let azure = &config.azure;
        let (endpoint, deployment) = match (non_blank(&azure.endpoint), non_blank(&azure.deployment)) {
            (Some(endpoint), Some(deployment)) => (endpoint, deployment),
            _ => {
                return Err(LlmError::Config(
                    "Azure OpenAI endpoint/deployment not configured".to_string(),
                ))
            }
        };
        let api_key = non_blank(&azure.api_key)
            .ok_or_else(|| LlmError::Config("Azure OpenAI API key missing".to_string()))?;

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            deployment: deployment.to_string(),
            api_version: azure.api_version.clone(),
            api_key: api_key.to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }

    pub fn chat_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint, self.deployment, self.api_version
        )
    }

    pub fn request_body(&self, prompt: &str) -> Value {
        json!({
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": prompt},
            ],
            "temperature": self.temperature,
            "response_format": {"type": "json_object"},
        })
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Pull the JSON object out of a chat-completions response body
fn parse_completion(body: ChatResponse) -> Result<Value, LlmError> {
    let content = body
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| LlmError::MalformedResponse("no message content in response".to_string()))?;

    let value: Value = serde_json::from_str(&content)?;
    if !value.is_object() {
        return Err(LlmError::MalformedResponse(
            "expected a JSON object".to_string(),
        ));
    }
    Ok(value)
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[async_trait]
impl LlmClient for AzureOpenAiClient {
    async fn complete_json(&self, prompt: &str, schema: Schema) -> Result<Value, LlmError> {
        tracing::info!(
            deployment = %self.deployment,
            schema = %schema,
            prompt_len = prompt.len(),
            "calling Azure OpenAI"
        );

        let response = self
            .http
            .post(self.chat_url())
            .header("api-key", &self.api_key)
            .json(&self.request_body(prompt))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "Azure OpenAI request failed");
            return Err(LlmError::Status {
                status: status.as_u16(),
                body: truncate(&body, MAX_ERROR_BODY),
            });
        }

        parse_completion(response.json::<ChatResponse>().await?)
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn temperature(&self) -> f64 {
        self.temperature
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AzureConfig, Provider};
    use pretty_assertions::assert_eq;

    fn configured() -> LlmConfig {
        LlmConfig {
            provider: Provider::Azure,
            azure: AzureConfig {
                endpoint: Some("https://triage.openai.azure.com/".to_string()),
                deployment: Some("gpt-4o-mini".to_string()),
                api_key: Some("test-key".to_string()),
                ..AzureConfig::default()
            },
            ..LlmConfig::default()
        }
    }

    #[test]
    fn test_missing_endpoint_is_config_error() {
        let mut config = configured();
        config.azure.endpoint = None;
        let err = AzureOpenAiClient::from_config(&config).unwrap_err();
        assert!(matches!(err, LlmError::Config(_)));
    }

    #[test]
    fn test_blank_key_is_config_error() {
        let mut config = configured();
        config.azure.api_key = Some("  ".to_string());
        let err = AzureOpenAiClient::from_config(&config).unwrap_err();
        assert_eq!(err.to_string(), "Configuration error: Azure OpenAI API key missing");
    }

    #[test]
    fn test_chat_url_trims_trailing_slash() {
        let client = AzureOpenAiClient::from_config(&configured()).unwrap();
        assert_eq!(
            client.chat_url(),
            "https://triage.openai.azure.com/openai/deployments/gpt-4o-mini/chat/completions?api-version=2024-02-15-preview"
        );
    }

    #[test]
    fn test_request_body_shape() {
        let client = AzureOpenAiClient::from_config(&configured()).unwrap();
        let body = client.request_body("extract please");
        assert_eq!(body["messages"][0]["role"], json!("system"));
        assert_eq!(body["messages"][0]["content"], json!(SYSTEM_PROMPT));
        assert_eq!(body["messages"][1]["content"], json!("extract please"));
        assert_eq!(body["temperature"], json!(0.2));
        assert_eq!(body["response_format"]["type"], json!("json_object"));
    }

    #[test]
    fn test_debug_hides_key() {
        let client = AzureOpenAiClient::from_config(&configured()).unwrap();
        assert!(!format!("{:?}", client).contains("test-key"));
    }

    #[test]
    fn test_parse_completion() {
        let body: ChatResponse = serde_json::from_value(json!({
            "choices": [{"message": {"content": "{\"loan_amount\": 1000000}"}}]
        }))
        .unwrap();
        assert_eq!(parse_completion(body).unwrap(), json!({"loan_amount": 1000000}));

        let empty: ChatResponse = serde_json::from_value(json!({"choices": []})).unwrap();
        assert!(matches!(
            parse_completion(empty),
            Err(LlmError::MalformedResponse(_))
        ));

        let prose: ChatResponse = serde_json::from_value(json!({
            "choices": [{"message": {"content": "Sure! Here you go"}}]
        }))
        .unwrap();
        assert!(matches!(parse_completion(prose), Err(LlmError::InvalidJson(_))));

        let array: ChatResponse = serde_json::from_value(json!({
            "choices": [{"message": {"content": "[1, 2]"}}]
        }))
        .unwrap();
        assert!(matches!(
            parse_completion(array),
            Err(LlmError::MalformedResponse(_))
        ));
    }
}
