//! Risk analysis for loan deals
//!
//! Given a single [`Terms`] snapshot the engine computes leverage metrics,
//! evaluates an ordered rule table, classifies the deal and derives the
//! diligence questions. Everything here is pure: no I/O, no hidden state,
//! identical output for identical input.
//!
//! ```
//! use deal_types::{LienPosition, Terms, Triage};
//! use risk_engine::RiskEngine;
//!
//! let terms = Terms {
//!     loan_amount: Some(500_000.0),
//!     collateral_value_appraised: Some(1_000_000.0),
//!     lien_position: LienPosition::First,
//!     ..Terms::default()
//! };
//! let result = RiskEngine::default().analyze(&terms);
//! assert_eq!(result.overall_triage, Triage::Weak);
//! ```

pub mod config;
pub mod gate;
pub mod metrics;
pub mod questions;
pub mod rules;
pub mod triage;

pub use config::EngineConfig;
pub use gate::{can_draft, COLLATERAL_CONFIRMATIONS, REQUIRED_CONFIRMATIONS};
pub use metrics::compute_metrics;
pub use questions::{derive_diligence_questions, question_for};
pub use rules::{run_rules, Rule, RuleInput, RULES};
pub use triage::overall_triage;

use deal_types::{AnalysisResult, ConfirmedFields, GateDecision, Terms};

/// Analysis engine bound to one immutable configuration
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RiskEngine {
    config: EngineConfig,
}

impl RiskEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Recompute the whole analysis from `terms`
    pub fn analyze(&self, terms: &Terms) -> AnalysisResult {
        let metrics = compute_metrics(terms);
        let risk_flags = run_rules(terms, &metrics, &self.config);
        let overall_triage = overall_triage(&risk_flags);
        let diligence_questions = derive_diligence_questions(&risk_flags);

        tracing::debug!(
            flags = risk_flags.len(),
            triage = %overall_triage,
            "analysis complete"
        );

        AnalysisResult {
            metrics,
            risk_flags,
            overall_triage,
            diligence_questions,
        }
    }

    pub fn can_draft(&self, terms: &Terms, confirmed: &ConfirmedFields) -> GateDecision {
        can_draft(terms, confirmed)
    }
}

/// Analyze with the default thresholds
pub fn analyze(terms: &Terms) -> AnalysisResult {
    RiskEngine::default().analyze(terms)
}
