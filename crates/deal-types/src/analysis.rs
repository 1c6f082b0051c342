//! Risk analysis output and draft gate decision types

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    HardStop,
    High,
    Med,
    Low,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::HardStop => "HARD_STOP",
            Severity::High => "HIGH",
            Severity::Med => "MED",
            Severity::Low => "LOW",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier of a risk rule, in evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleId {
    RepaymentSourceMissing,
    LvrStressedGt70,
    LienNotFirst,
    EnforcementTimelineMissing,
    RepaymentAfterTerm,
    MissingStressValue,
}

impl RuleId {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleId::RepaymentSourceMissing => "repayment_source_missing",
            RuleId::LvrStressedGt70 => "lvr_stressed_gt_70",
            RuleId::LienNotFirst => "lien_not_first",
            RuleId::EnforcementTimelineMissing => "enforcement_timeline_missing",
            RuleId::RepaymentAfterTerm => "repayment_after_term",
            RuleId::MissingStressValue => "missing_stress_value",
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFlag {
    pub rule_id: RuleId,
    pub severity: Severity,
    pub message: String,
}

/// Leverage metrics. Each is `None` when an operand is missing or the
/// denominator is zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    #[serde(rename = "LVR_appraised")]
    pub lvr_appraised: Option<f64>,
    #[serde(rename = "LVR_stressed")]
    pub lvr_stressed: Option<f64>,
    pub equity_buffer: Option<f64>,
}

impl Metrics {
    pub const NAMES: [&'static str; 3] = ["LVR_appraised", "LVR_stressed", "equity_buffer"];

    /// Look up a metric by its serialized name
    pub fn get(&self, name: &str) -> Option<f64> {
        match name {
            "LVR_appraised" => self.lvr_appraised,
            "LVR_stressed" => self.lvr_stressed,
            "equity_buffer" => self.equity_buffer,
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, Option<f64>)> + '_ {
        Self::NAMES.into_iter().map(move |name| (name, self.get(name)))
    }
}

/// Overall strength classification of a deal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Triage {
    Strong,
    Borderline,
    Weak,
}

impl Triage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Triage::Strong => "Strong",
            Triage::Borderline => "Borderline",
            Triage::Weak => "Weak",
        }
    }
}

impl fmt::Display for Triage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything one analysis run derives from a single Terms snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub metrics: Metrics,
    pub risk_flags: Vec<RiskFlag>,
    pub overall_triage: Triage,
    pub diligence_questions: Vec<String>,
}

impl AnalysisResult {
    pub fn count(&self, severity: Severity) -> usize {
        self.risk_flags
            .iter()
            .filter(|f| f.severity == severity)
            .count()
    }

    pub fn has_flag(&self, rule_id: RuleId) -> bool {
        self.risk_flags.iter().any(|f| f.rule_id == rule_id)
    }
}

/// Outcome of the draft gate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateDecision {
    pub allowed: bool,
    pub reason: Option<String>,
}

impl GateDecision {
    pub fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    pub fn deny(reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            reason: Some(reason.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_severity_wire_names() {
        assert_eq!(
            serde_json::to_value(Severity::HardStop).unwrap(),
            json!("HARD_STOP")
        );
        assert_eq!(serde_json::to_value(Severity::Med).unwrap(), json!("MED"));
        assert_eq!(Severity::High.to_string(), "HIGH");
    }

    #[test]
    fn test_rule_id_wire_names_match_as_str() {
        let rules = [
            RuleId::RepaymentSourceMissing,
            RuleId::LvrStressedGt70,
            RuleId::LienNotFirst,
            RuleId::EnforcementTimelineMissing,
            RuleId::RepaymentAfterTerm,
            RuleId::MissingStressValue,
        ];
        for rule in rules {
            assert_eq!(serde_json::to_value(rule).unwrap(), json!(rule.as_str()));
        }
    }

    #[test]
    fn test_metrics_serialize_as_named_map() {
        let metrics = Metrics {
            lvr_appraised: Some(0.5),
            lvr_stressed: None,
            equity_buffer: Some(0.5),
        };
        assert_eq!(
            serde_json::to_value(metrics).unwrap(),
            json!({ "LVR_appraised": 0.5, "LVR_stressed": null, "equity_buffer": 0.5 })
        );
        assert_eq!(metrics.get("LVR_stressed"), None);
        assert_eq!(metrics.iter().count(), 3);
    }

    #[test]
    fn test_gate_decision_constructors() {
        assert_eq!(
            GateDecision::allow(),
            GateDecision {
                allowed: true,
                reason: None
            }
        );
        let denied = GateDecision::deny("no");
        assert!(!denied.allowed);
        assert_eq!(denied.reason.as_deref(), Some("no"));
    }

    #[test]
    fn test_triage_wire_names() {
        assert_eq!(serde_json::to_value(Triage::Borderline).unwrap(), json!("Borderline"));
    }
}
