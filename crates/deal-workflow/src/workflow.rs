//! Deal lifecycle orchestration
//!
//! Sequencing rules enforced here:
//! - extraction requires at least one uploaded document
//! - analysis requires current terms
//! - drafting requires an analysis of the current terms revision and an
//!   open draft gate
//!
//! Document text is redacted before it is stored, prompts are redacted before
//! they are sent, and model output is validated and redacted before it is
//! kept. Every mutating operation appends to the deal's audit chain.

use std::collections::HashMap;
use std::path::Path;

use deal_types::{
    hash_bytes, hash_text, AnalysisResult, AuditAction, GateDecision, IcDraft, Terms, TermsUpdate,
};
use llm_client::{build_client, LlmClient, PromptTemplate, Schema, EXTRACT_TERMS_V1, IC_DRAFT_V1};
use pii_redaction::{redact, sanitize_text, Scrub};
use risk_engine::RiskEngine;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::config::{TriageConfig, WorkflowConfig};
use crate::error::WorkflowError;
use crate::record::{
    now, AnalysisRecord, DealExport, DealRecord, DealStage, DealSummary, DocumentRecord,
    DraftRecord, LlmRun, TermsSource,
};

pub struct DealWorkflow {
    engine: RiskEngine,
    llm: Box<dyn LlmClient>,
    config: WorkflowConfig,
    deals: HashMap<String, DealRecord>,
    next_seq: u64,
}

impl DealWorkflow {
    pub fn new(engine: RiskEngine, llm: Box<dyn LlmClient>, config: WorkflowConfig) -> Self {
        Self {
            engine,
            llm,
            config,
            deals: HashMap::new(),
            next_seq: 0,
        }
    }

    /// Build the engine and the configured LLM client
    pub fn from_config(config: &TriageConfig) -> Result<Self, WorkflowError> {
        let llm = build_client(&config.llm)?;
        Ok(Self::new(
            RiskEngine::new(config.engine),
            llm,
            config.workflow.clone(),
        ))
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    pub fn create_deal(&mut self, name: &str, actor: &str) -> DealSummary {
        let mut record = DealRecord::new(name, self.next_seq);
        self.next_seq += 1;
        record.audit.append(
            AuditAction::CreateDeal {
                name: name.to_string(),
            },
            actor,
            None,
        );
        tracing::info!(deal_id = %record.id, actor, "deal created");

        let summary = record.summary(DealStage::NoDocuments);
        self.deals.insert(record.id.clone(), record);
        summary
    }

    pub fn deal(&self, id: &str) -> Result<&DealRecord, WorkflowError> {
        self.deals
            .get(id)
            .ok_or_else(|| WorkflowError::DealNotFound(id.to_string()))
    }

    fn deal_mut(&mut self, id: &str) -> Result<&mut DealRecord, WorkflowError> {
        self.deals
            .get_mut(id)
            .ok_or_else(|| WorkflowError::DealNotFound(id.to_string()))
    }

    /// All deals, newest first
    pub fn list_deals(&self) -> Vec<DealSummary> {
        let mut records: Vec<&DealRecord> = self.deals.values().collect();
        records.sort_by(|a, b| b.seq.cmp(&a.seq));
        records
            .into_iter()
            .map(|record| record.summary(self.stage_of(record)))
            .collect()
    }

    pub fn delete_deal(&mut self, id: &str) -> Result<DealRecord, WorkflowError> {
        let record = self
            .deals
            .remove(id)
            .ok_or_else(|| WorkflowError::DealNotFound(id.to_string()))?;
        tracing::info!(deal_id = %id, "deal deleted");
        Ok(record)
    }

    /// Store a plain-text document. Only the sanitised, redacted text is kept.
    pub fn upload_document(
        &mut self,
        id: &str,
        actor: &str,
        filename: &str,
        bytes: &[u8],
    ) -> Result<&DocumentRecord, WorkflowError> {
        self.deal(id)?;
        let content_type = content_type_for(filename)
            .ok_or_else(|| WorkflowError::UnsupportedFileType(filename.to_string()))?;

        let size = bytes.len() as u64;
        let max = self.config.max_document_bytes;
        if size > max {
            tracing::warn!(deal_id = %id, size, max, "document rejected: too large");
            return Err(WorkflowError::DocumentTooLarge { size, max });
        }

        let record = self.deal_mut(id)?;
        let sha256 = hash_bytes(bytes);
        let text = redact(&sanitize_text(&decode_text(bytes)));

        record.audit.append(
            AuditAction::UploadDocument {
                filename: filename.to_string(),
                sha256: sha256.clone(),
            },
            actor,
            None,
        );
        tracing::info!(deal_id = %id, actor, size, "document uploaded");

        record.documents.push(DocumentRecord {
            id: Uuid::new_v4().to_string(),
            filename: filename.to_string(),
            content_type: content_type.to_string(),
            size_bytes: size,
            sha256,
            text,
            uploaded_at: now(),
        });
        Ok(&record.documents[record.documents.len() - 1])
    }

    /// Extract terms from all uploaded documents, replacing the current terms.
    /// Confirmations are kept.
    pub async fn extract_terms(&mut self, id: &str, actor: &str) -> Result<&Terms, WorkflowError> {
        let record = self.deal(id)?;
        if record.documents.is_empty() {
            return Err(WorkflowError::NoDocuments);
        }

        let combined = record
            .documents
            .iter()
            .map(|doc| format!("--- {} ---\n{}", doc.filename, doc.text))
            .collect::<Vec<_>>()
            .join("\n\n");
        let deal_text = sanitize_text(&combined);
        let prompt = redact(&EXTRACT_TERMS_V1.render(&[("deal_text", deal_text.as_str())]));

        let output = self.llm.complete_json(&prompt, Schema::ExtractedTerms).await?;
        let terms: Terms = serde_json::from_value(output)?;
        terms.validate()?;
        let terms = terms.scrub();

        let run = self.llm_run(&EXTRACT_TERMS_V1, &prompt, serde_json::to_value(&terms)?);
        let record = self.deal_mut(id)?;
        record.terms_source = Some(TermsSource::Extracted);
        record.terms_revision += 1;
        record.llm_runs.push(run);
        record.audit.append(
            AuditAction::Extract {
                prompt: EXTRACT_TERMS_V1.id(),
            },
            actor,
            None,
        );
        tracing::info!(
            deal_id = %id,
            actor,
            revision = record.terms_revision,
            "terms extracted"
        );

        Ok(record.terms.insert(terms))
    }

    /// Replace terms and confirmations wholesale with an analyst's edit
    pub fn update_terms(
        &mut self,
        id: &str,
        actor: &str,
        update: TermsUpdate,
    ) -> Result<&Terms, WorkflowError> {
        update.terms.validate()?;
        let record = self.deal_mut(id)?;

        let confirmed = update.confirmed_fields.confirmed_count();
        let confirmed_names = update.confirmed_fields.confirmed_names();
        record.confirmed_fields = update.confirmed_fields;
        record.terms_source = Some(TermsSource::Edited);
        record.terms_revision += 1;
        record.audit.append(
            AuditAction::EditTerms {
                confirmed_fields: confirmed_names,
            },
            actor,
            None,
        );
        tracing::info!(
            deal_id = %id,
            actor,
            revision = record.terms_revision,
            confirmed,
            "terms updated"
        );

        Ok(record.terms.insert(update.terms.scrub()))
    }

    /// Recompute the analysis from the current terms, replacing any prior one
    pub fn analyze(&mut self, id: &str, actor: &str) -> Result<&AnalysisResult, WorkflowError> {
        let engine = self.engine;
        let record = self.deal_mut(id)?;
        let terms = record.terms.as_ref().ok_or(WorkflowError::NoTerms)?;

        let result = engine.analyze(terms).scrub();
        record.audit.append(
            AuditAction::Analyze {
                overall_triage: result.overall_triage.to_string(),
            },
            actor,
            Some(format!("{} risk flags", result.risk_flags.len())),
        );
        tracing::info!(
            deal_id = %id,
            actor,
            triage = %result.overall_triage,
            flags = result.risk_flags.len(),
            "deal analyzed"
        );

        record.exported_revision = None;
        let analysis = record.analysis.insert(AnalysisRecord {
            result,
            terms_revision: record.terms_revision,
            created_at: now(),
        });
        Ok(&analysis.result)
    }

    /// Gate decision over the current terms and confirmations
    pub fn draft_gate(&self, id: &str) -> Result<GateDecision, WorkflowError> {
        let record = self.deal(id)?;
        let terms = record.terms.as_ref().ok_or(WorkflowError::NoTerms)?;
        Ok(self.engine.can_draft(terms, &record.confirmed_fields))
    }

    /// Generate the IC draft. Needs current terms, a non-stale analysis and
    /// an open gate.
    pub async fn draft(&mut self, id: &str, actor: &str) -> Result<&IcDraft, WorkflowError> {
        let record = self.deal(id)?;
        let terms = record.terms.as_ref().ok_or(WorkflowError::NoTerms)?;
        let analysis = record.analysis.as_ref().ok_or(WorkflowError::NoAnalysis)?;
        if analysis.terms_revision != record.terms_revision {
            tracing::warn!(deal_id = %id, actor, "draft blocked: analysis is stale");
            return Err(WorkflowError::StaleAnalysis {
                analyzed: analysis.terms_revision,
                current: record.terms_revision,
            });
        }

        let decision = self.engine.can_draft(terms, &record.confirmed_fields);
        if !decision.allowed {
            let reason = decision.reason.unwrap_or_default();
            tracing::warn!(deal_id = %id, actor, reason = %reason, "draft blocked by gate");
            return Err(WorkflowError::DraftBlocked(reason));
        }

        let input = json!({
            "terms": terms,
            "analysis": analysis.result,
        });
        let input_json = serde_json::to_string_pretty(&input)?;
        let prompt = redact(&IC_DRAFT_V1.render(&[("input_json", input_json.as_str())]));

        let output = self.llm.complete_json(&prompt, Schema::IcDraft).await?;
        let draft: IcDraft = serde_json::from_value(output)?;
        draft.validate()?;
        let draft = draft.scrub();

        let run = self.llm_run(&IC_DRAFT_V1, &prompt, serde_json::to_value(&draft)?);
        let record = self.deal_mut(id)?;
        record.llm_runs.push(run);
        record.audit.append(
            AuditAction::Draft {
                prompt: IC_DRAFT_V1.id(),
            },
            actor,
            None,
        );
        tracing::info!(deal_id = %id, actor, "IC draft generated");

        record.exported_revision = None;
        let saved = record.draft.insert(DraftRecord {
            draft,
            terms_revision: record.terms_revision,
            prompt_name: IC_DRAFT_V1.name.to_string(),
            prompt_version: IC_DRAFT_V1.version.to_string(),
            created_at: now(),
        });
        Ok(&saved.draft)
    }

    /// Bundle the deal for an external renderer. Partial bundles are allowed;
    /// the deal only moves to Exported when a draft of the current terms exists.
    pub fn export(&mut self, id: &str, actor: &str) -> Result<DealExport, WorkflowError> {
        let record = self.deal_mut(id)?;
        record.audit.append(AuditAction::Export, actor, None);
        let complete = record.current_draft().is_some();
        if complete {
            record.exported_revision = Some(record.terms_revision);
        }
        tracing::info!(deal_id = %id, actor, complete, "deal exported");

        let record = self.deal(id)?;
        Ok(DealExport {
            deal: record.summary(self.stage_of(record)),
            terms: record.terms.clone(),
            confirmed_fields: record.confirmed_fields.clone(),
            analysis: record.analysis.as_ref().map(|a| a.result.clone()),
            draft: record.draft.as_ref().map(|d| d.draft.clone()),
            audit_trail: record.audit.summary(),
            exported_at: now(),
        })
    }

    pub fn stage(&self, id: &str) -> Result<DealStage, WorkflowError> {
        Ok(self.stage_of(self.deal(id)?))
    }

    fn stage_of(&self, record: &DealRecord) -> DealStage {
        if record.exported_revision == Some(record.terms_revision) {
            return DealStage::Exported;
        }
        if record.current_draft().is_some() {
            return DealStage::Drafted;
        }
        if let (Some(terms), Some(_)) = (&record.terms, record.current_analysis()) {
            let decision = self.engine.can_draft(terms, &record.confirmed_fields);
            return DealStage::Analyzed {
                draft_allowed: decision.allowed,
            };
        }
        match record.terms_source {
            Some(TermsSource::Edited) => DealStage::TermsEdited,
            Some(TermsSource::Extracted) => DealStage::TermsExtracted,
            None if !record.documents.is_empty() => DealStage::DocumentsUploaded,
            None => DealStage::NoDocuments,
        }
    }

    fn llm_run(&self, template: &PromptTemplate, prompt: &str, output: Value) -> LlmRun {
        LlmRun {
            prompt_name: template.name.to_string(),
            prompt_version: template.version.to_string(),
            prompt_hash: template.content_hash(),
            model: self.llm.model().to_string(),
            temperature: self.llm.temperature(),
            input_hash: hash_text(prompt),
            output,
            created_at: now(),
        }
    }
}

/// Only plain-text formats are decoded here
fn content_type_for(filename: &str) -> Option<&'static str> {
    let extension = Path::new(filename)
        .extension()?
        .to_str()?
        .to_ascii_lowercase();
    match extension.as_str() {
        "txt" => Some("text/plain"),
        "md" => Some("text/markdown"),
        _ => None,
    }
}

/// UTF-8 decode, dropping invalid sequences. Valid U+FFFD in the input is kept.
fn decode_text(bytes: &[u8]) -> String {
    bytes.utf8_chunks().map(|chunk| chunk.valid()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_types() {
        assert_eq!(content_type_for("memo.txt"), Some("text/plain"));
        assert_eq!(content_type_for("NOTES.MD"), Some("text/markdown"));
        assert_eq!(content_type_for("term_sheet.pdf"), None);
        assert_eq!(content_type_for("README"), None);
    }

    #[test]
    fn test_decode_drops_invalid_bytes() {
        assert_eq!(decode_text(b"loan \xff\xfeamount"), "loan amount");
        assert_eq!(decode_text("Zürich".as_bytes()), "Zürich");
    }

    #[test]
    fn test_decode_keeps_literal_replacement_character() {
        assert_eq!(decode_text("bad \u{FFFD} glyph".as_bytes()), "bad \u{FFFD} glyph");
        assert_eq!(decode_text(b"a\xffb\xe2\x82"), "ab");
    }
}
