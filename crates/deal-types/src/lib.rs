//! Shared data model for loan deal triage

pub mod analysis;
pub mod audit;
pub mod draft;
pub mod types;

pub use analysis::{AnalysisResult, GateDecision, Metrics, RiskFlag, RuleId, Severity, Triage};
pub use audit::{hash_bytes, hash_text, AuditAction, AuditChain, AuditError, AuditEvent};
pub use draft::{DraftError, IcDraft, DEFAULT_BANNER};
pub use types::{
    ConfirmedFields, Fee, LienPosition, Terms, TermsError, TermsUpdate, MAX_CITATION_CHARS,
};
