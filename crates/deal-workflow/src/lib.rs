//! Deal triage workflow
//!
//! Orchestrates a deal from uploaded documents to an exported IC bundle:
//! redacted document intake, model-assisted term extraction, analyst edits
//! and confirmations, deterministic analysis, gated drafting and export.
//!
//! The core crates stay pure; this layer owns sequencing, the audit trail
//! and the only calls that leave the process.

pub mod config;
pub mod error;
pub mod record;
pub mod workflow;

pub use config::{TriageConfig, WorkflowConfig};
pub use error::WorkflowError;
pub use record::{
    AnalysisRecord, DealExport, DealRecord, DealStage, DealSummary, DocumentRecord, DraftRecord,
    LlmRun, TermsSource,
};
pub use workflow::DealWorkflow;
