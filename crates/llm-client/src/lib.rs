//! Generative-text capability for deal triage
//!
//! Two variants behind one trait: a deterministic stub that runs offline and
//! an Azure OpenAI adapter. Callers pick one with [`build_client`].

pub mod azure;
pub mod client;
pub mod config;
pub mod error;
pub mod prompts;
pub mod stub;

pub use azure::AzureOpenAiClient;
pub use client::{LlmClient, Schema};
pub use config::{AzureConfig, LlmConfig, Provider};
pub use error::LlmError;
pub use prompts::{get_template, PromptTemplate, EXTRACT_TERMS_V1, IC_DRAFT_V1};
pub use stub::StubLlmClient;

/// Build the configured client
pub fn build_client(config: &LlmConfig) -> Result<Box<dyn LlmClient>, LlmError> {
    tracing::debug!(provider = %config.provider, model = %config.model, "building LLM client");
    match config.provider {
        Provider::Stub => Ok(Box::new(StubLlmClient::from_config(config))),
        Provider::Azure => Ok(Box::new(AzureOpenAiClient::from_config(config)?)),
    }
}
