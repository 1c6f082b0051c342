//! Configuration for the triage workflow
//!
//! Loaded from a TOML file where every section is optional, then adjusted by
//! environment overrides for the generative-text backend.

use anyhow::{bail, Context};
use llm_client::{LlmConfig, Provider};
use risk_engine::EngineConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriageConfig {
    /// Rule thresholds
    #[serde(default)]
    pub engine: EngineConfig,
    /// Generative-text backend
    #[serde(default)]
    pub llm: LlmConfig,
    /// Document limits and defaults
    #[serde(default)]
    pub workflow: WorkflowConfig,
}

impl TriageConfig {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the TOML is malformed
    ///
    /// # Example
    ///
    /// ```no_run
    /// use deal_workflow::config::TriageConfig;
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let config = TriageConfig::from_file("deal-triage.toml")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string
    ///
    /// ```
    /// use deal_workflow::config::TriageConfig;
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let config = TriageConfig::from_str("[engine]\nmax_stressed_lvr = 0.65\n")?;
    /// assert_eq!(config.engine.max_stressed_lvr, 0.65);
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_str(s: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(s).context("Failed to parse TOML configuration")?;
        config.check()?;
        Ok(config)
    }

    /// File (or defaults when `path` is `None`) plus environment overrides
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply `DEAL_TRIAGE_LLM_PROVIDER` and the `AZURE_OPENAI_*` variables
    pub fn apply_env_overrides(&mut self) -> anyhow::Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup; empty values are ignored
    pub fn apply_overrides<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(name) = get("DEAL_TRIAGE_LLM_PROVIDER") {
            self.llm.provider = Provider::parse(&name)
                .with_context(|| format!("Unknown LLM provider in DEAL_TRIAGE_LLM_PROVIDER: {}", name))?;
        }
        if let Some(endpoint) = get("AZURE_OPENAI_ENDPOINT") {
            self.llm.azure.endpoint = Some(endpoint);
        }
        if let Some(deployment) = get("AZURE_OPENAI_DEPLOYMENT") {
            self.llm.azure.deployment = Some(deployment);
        }
        if let Some(key) = get("AZURE_OPENAI_API_KEY") {
            self.llm.azure.api_key = Some(key);
        }
        Ok(())
    }

    fn check(&self) -> anyhow::Result<()> {
        let lvr = self.engine.max_stressed_lvr;
        if !lvr.is_finite() || lvr <= 0.0 {
            bail!("engine.max_stressed_lvr must be a positive number, got {}", lvr);
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            bail!("llm.temperature must be between 0 and 2, got {}", self.llm.temperature);
        }
        if self.workflow.max_document_bytes == 0 {
            bail!("workflow.max_document_bytes must be greater than zero");
        }
        Ok(())
    }
}

/// Workflow limits and defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowConfig {
    /// Largest accepted upload (default: 100 MiB)
    #[serde(default = "default_max_document_bytes")]
    pub max_document_bytes: u64,
    /// Actor recorded when the caller supplies none
    #[serde(default = "default_actor")]
    pub default_actor: String,
}

fn default_max_document_bytes() -> u64 {
    100 * 1024 * 1024
}

fn default_actor() -> String {
    "dev.user@local".to_string()
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            max_document_bytes: default_max_document_bytes(),
            default_actor: default_actor(),
        }
    }
}
