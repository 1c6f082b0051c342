//! Subcommand implementations. Each returns the JSON printed on stdout.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use deal_types::{Terms, TermsUpdate};
use deal_workflow::{DealWorkflow, TriageConfig};
use pii_redaction::{redact, redact_value};
use risk_engine::RiskEngine;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Validate and analyze a Terms file
pub fn analyze(path: &Path, config: &TriageConfig) -> anyhow::Result<Value> {
    let terms: Terms = read_json(path)?;
    terms
        .validate()
        .with_context(|| format!("Invalid terms in {}", path.display()))?;
    let result = RiskEngine::new(config.engine).analyze(&terms);
    Ok(serde_json::to_value(result)?)
}

/// Evaluate the draft gate over a TermsUpdate file
pub fn gate(path: &Path) -> anyhow::Result<Value> {
    let update: TermsUpdate = read_json(path)?;
    let decision = risk_engine::can_draft(&update.terms, &update.confirmed_fields);
    Ok(serde_json::to_value(decision)?)
}

/// Redact text, or every string leaf of a JSON document
pub fn redact_input(input: &str, as_json: bool) -> anyhow::Result<String> {
    if as_json {
        let value: Value = serde_json::from_str(input).context("Input is not valid JSON")?;
        Ok(serde_json::to_string_pretty(&redact_value(&value))?)
    } else {
        Ok(redact(input))
    }
}

/// Read a file, or stdin when no path is given
pub fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            Ok(buf)
        }
    }
}

pub struct RunOptions {
    pub name: String,
    pub docs: Vec<PathBuf>,
    pub update: Option<PathBuf>,
    pub confirm: Vec<String>,
    pub actor: Option<String>,
}

/// Full pipeline: upload, extract, optional edit, analyze, draft, export.
/// Returns the export bundle, or the gate decision when drafting is blocked.
pub async fn run(options: RunOptions, config: &TriageConfig) -> anyhow::Result<Value> {
    if options.docs.is_empty() {
        bail!("At least one --doc is required");
    }

    let mut workflow =
        DealWorkflow::from_config(config).context("Failed to initialise workflow")?;
    let actor = options
        .actor
        .clone()
        .unwrap_or_else(|| config.workflow.default_actor.clone());

    let deal = workflow.create_deal(&options.name, &actor);
    for path in &options.docs {
        let bytes =
            fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .with_context(|| format!("Invalid document path: {}", path.display()))?;
        workflow.upload_document(&deal.id, &actor, filename, &bytes)?;
    }

    let extracted = workflow.extract_terms(&deal.id, &actor).await?.clone();

    let mut update = match &options.update {
        Some(path) => Some(read_json::<TermsUpdate>(path)?),
        None if !options.confirm.is_empty() => Some(TermsUpdate {
            terms: extracted,
            confirmed_fields: Default::default(),
        }),
        None => None,
    };
    if let Some(update) = update.as_mut() {
        for field in &options.confirm {
            if !Terms::is_field(field) {
                bail!("Unknown field for --confirm: {}", field);
            }
            update.confirmed_fields.confirm(field.as_str());
        }
    }
    if let Some(update) = update {
        workflow.update_terms(&deal.id, &actor, update)?;
    }

    let analysis = workflow.analyze(&deal.id, &actor)?.clone();
    let decision = workflow.draft_gate(&deal.id)?;
    if !decision.allowed {
        tracing::warn!(deal_id = %deal.id, "drafting blocked; returning gate decision");
        return Ok(json!({
            "deal": workflow.deal(&deal.id)?.summary(workflow.stage(&deal.id)?),
            "analysis": analysis,
            "gate": decision,
        }));
    }

    workflow.draft(&deal.id, &actor).await?;
    let export = workflow.export(&deal.id, &actor)?;
    Ok(serde_json::to_value(export)?)
}
