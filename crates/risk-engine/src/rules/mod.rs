//! Risk rules
//!
//! Rules are an ordered table of (predicate, flag-constructor) pairs. The
//! table order is the order flags are emitted in, which in turn fixes the
//! order of diligence questions. Rules are independent: any subset may fire.

pub mod repayment;
pub mod security;

use deal_types::{Metrics, RiskFlag, RuleId, Severity, Terms};

use crate::config::EngineConfig;

/// Everything a rule may look at
pub struct RuleInput<'a> {
    pub terms: &'a Terms,
    pub metrics: &'a Metrics,
    pub config: &'a EngineConfig,
}

pub struct Rule {
    pub id: RuleId,
    pub severity: Severity,
    fires: fn(&RuleInput<'_>) -> bool,
    message: fn(&RuleInput<'_>) -> String,
}

impl Rule {
    pub fn evaluate(&self, input: &RuleInput<'_>) -> Option<RiskFlag> {
        (self.fires)(input).then(|| RiskFlag {
            rule_id: self.id,
            severity: self.severity,
            message: (self.message)(input),
        })
    }
}

pub static RULES: [Rule; 6] = [
    Rule {
        id: RuleId::RepaymentSourceMissing,
        severity: Severity::HardStop,
        fires: repayment::source_missing,
        message: repayment::source_missing_message,
    },
    Rule {
        id: RuleId::LvrStressedGt70,
        severity: Severity::High,
        fires: security::stressed_lvr_too_high,
        message: security::stressed_lvr_message,
    },
    Rule {
        id: RuleId::LienNotFirst,
        severity: Severity::High,
        fires: security::lien_not_first,
        message: security::lien_not_first_message,
    },
    Rule {
        id: RuleId::EnforcementTimelineMissing,
        severity: Severity::Med,
        fires: security::enforcement_timeline_missing,
        message: security::enforcement_timeline_message,
    },
    Rule {
        id: RuleId::RepaymentAfterTerm,
        severity: Severity::High,
        fires: repayment::after_term,
        message: repayment::after_term_message,
    },
    Rule {
        id: RuleId::MissingStressValue,
        severity: Severity::Med,
        fires: security::stress_value_missing,
        message: security::stress_value_message,
    },
];

/// Evaluate every rule in table order
pub fn run_rules(terms: &Terms, metrics: &Metrics, config: &EngineConfig) -> Vec<RiskFlag> {
    let input = RuleInput {
        terms,
        metrics,
        config,
    };
    RULES
        .iter()
        .filter_map(|rule| rule.evaluate(&input))
        .collect()
}
