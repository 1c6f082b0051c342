//! In-memory deal records and the values the workflow hands out

use chrono::Utc;
use deal_types::{AnalysisResult, AuditChain, ConfirmedFields, IcDraft, Terms};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Where a deal sits in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DealStage {
    NoDocuments,
    DocumentsUploaded,
    TermsExtracted,
    TermsEdited,
    /// Analysis matches the current terms; `draft_allowed` is the gate outcome
    Analyzed { draft_allowed: bool },
    Drafted,
    Exported,
}

/// How the current Terms were last written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TermsSource {
    Extracted,
    Edited,
}

/// An uploaded document. Only redacted text is kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: String,
    pub filename: String,
    pub content_type: String,
    pub size_bytes: u64,
    /// SHA-256 of the raw upload
    pub sha256: String,
    pub text: String,
    pub uploaded_at: String,
}

/// One generative-text call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmRun {
    pub prompt_name: String,
    pub prompt_version: String,
    pub prompt_hash: String,
    pub model: String,
    pub temperature: f64,
    /// SHA-256 of the redacted prompt actually sent
    pub input_hash: String,
    /// Redacted, validated output
    pub output: Value,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub result: AnalysisResult,
    /// Terms revision the analysis was computed from
    pub terms_revision: u64,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftRecord {
    pub draft: IcDraft,
    pub terms_revision: u64,
    pub prompt_name: String,
    pub prompt_version: String,
    pub created_at: String,
}

/// Everything the workflow knows about one deal
#[derive(Debug, Clone)]
pub struct DealRecord {
    pub id: String,
    pub name: String,
    pub created_at: String,
    pub documents: Vec<DocumentRecord>,
    pub terms: Option<Terms>,
    pub terms_source: Option<TermsSource>,
    /// Bumped on every extraction or edit
    pub terms_revision: u64,
    pub confirmed_fields: ConfirmedFields,
    pub analysis: Option<AnalysisRecord>,
    pub draft: Option<DraftRecord>,
    pub llm_runs: Vec<LlmRun>,
    pub audit: AuditChain,
    pub(crate) exported_revision: Option<u64>,
    pub(crate) seq: u64,
}

impl DealRecord {
    pub(crate) fn new(name: &str, seq: u64) -> Self {
        let id = Uuid::new_v4().to_string();
        Self {
            audit: AuditChain::new(&id),
            id,
            name: name.to_string(),
            created_at: now(),
            documents: Vec::new(),
            terms: None,
            terms_source: None,
            terms_revision: 0,
            confirmed_fields: ConfirmedFields::new(),
            analysis: None,
            draft: None,
            llm_runs: Vec::new(),
            exported_revision: None,
            seq,
        }
    }

    /// Analysis computed from the current terms, if any
    pub fn current_analysis(&self) -> Option<&AnalysisRecord> {
        self.analysis
            .as_ref()
            .filter(|a| self.terms.is_some() && a.terms_revision == self.terms_revision)
    }

    /// Draft produced against the current terms, if any
    pub fn current_draft(&self) -> Option<&DraftRecord> {
        self.draft
            .as_ref()
            .filter(|d| d.terms_revision == self.terms_revision)
    }

    pub fn summary(&self, stage: DealStage) -> DealSummary {
        DealSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            created_at: self.created_at.clone(),
            stage,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealSummary {
    pub id: String,
    pub name: String,
    pub created_at: String,
    pub stage: DealStage,
}

/// Export bundle handed to an external renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealExport {
    pub deal: DealSummary,
    pub terms: Option<Terms>,
    pub confirmed_fields: ConfirmedFields,
    pub analysis: Option<AnalysisResult>,
    pub draft: Option<IcDraft>,
    /// One line per audit event
    pub audit_trail: Vec<String>,
    pub exported_at: String,
}

pub(crate) fn now() -> String {
    Utc::now().to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;
    use deal_types::Metrics;
    use deal_types::Triage;
    use serde_json::json;

    fn analysis_at(revision: u64) -> AnalysisRecord {
        AnalysisRecord {
            result: AnalysisResult {
                metrics: Metrics::default(),
                risk_flags: Vec::new(),
                overall_triage: Triage::Strong,
                diligence_questions: Vec::new(),
            },
            terms_revision: revision,
            created_at: now(),
        }
    }

    #[test]
    fn test_new_record_is_empty() {
        let record = DealRecord::new("Harbour St", 0);
        assert_eq!(record.audit.deal_id, record.id);
        assert!(record.terms.is_none());
        assert_eq!(record.terms_revision, 0);
    }

    #[test]
    fn test_current_analysis_tracks_revision() {
        let mut record = DealRecord::new("Harbour St", 0);
        record.terms = Some(Terms::default());
        record.terms_revision = 1;
        record.analysis = Some(analysis_at(1));
        assert!(record.current_analysis().is_some());

        record.terms_revision = 2;
        assert!(record.current_analysis().is_none());
    }

    #[test]
    fn test_stage_serializes_snake_case() {
        assert_eq!(
            serde_json::to_value(DealStage::DocumentsUploaded).unwrap(),
            json!("documents_uploaded")
        );
        assert_eq!(
            serde_json::to_value(DealStage::Analyzed {
                draft_allowed: true
            })
            .unwrap(),
            json!({"analyzed": {"draft_allowed": true}})
        );
    }
}
