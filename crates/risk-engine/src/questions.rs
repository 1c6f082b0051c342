// Canonical diligence questions, one per rule
use std::collections::HashSet;

use deal_types::{RiskFlag, RuleId};

pub fn question_for(rule_id: RuleId) -> &'static str {
    match rule_id {
        RuleId::RepaymentSourceMissing => {
            "What is the verified repayment source and supporting evidence (contracts, refinance take-out, sale plan)?"
        }
        RuleId::LvrStressedGt70 => {
            "Provide independent valuation and sensitivity showing stressed value support for requested leverage."
        }
        RuleId::LienNotFirst => {
            "Confirm intercreditor/subordination terms and assess enforcement control given non-first position."
        }
        RuleId::EnforcementTimelineMissing => {
            "What is the expected enforcement timeline and key legal steps in the stated jurisdiction?"
        }
        RuleId::RepaymentAfterTerm => {
            "Align repayment timeline with term (or structure extension options/conditions)."
        }
        RuleId::MissingStressValue => {
            "Provide a stressed collateral value or defined stress methodology for downside case."
        }
    }
}

/// Questions in flag order, first occurrence kept
pub fn derive_diligence_questions(flags: &[RiskFlag]) -> Vec<String> {
    let mut seen = HashSet::new();
    flags
        .iter()
        .map(|flag| question_for(flag.rule_id))
        .filter(|question| seen.insert(*question))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use deal_types::Severity;
    use pretty_assertions::assert_eq;

    fn flag(rule_id: RuleId) -> RiskFlag {
        RiskFlag {
            rule_id,
            severity: Severity::Med,
            message: String::new(),
        }
    }

    #[test]
    fn test_questions_follow_flag_order() {
        let flags = [
            flag(RuleId::MissingStressValue),
            flag(RuleId::RepaymentSourceMissing),
        ];
        assert_eq!(
            derive_diligence_questions(&flags),
            vec![
                question_for(RuleId::MissingStressValue).to_string(),
                question_for(RuleId::RepaymentSourceMissing).to_string(),
            ]
        );
    }

    #[test]
    fn test_duplicates_keep_first_occurrence() {
        let flags = [
            flag(RuleId::LienNotFirst),
            flag(RuleId::EnforcementTimelineMissing),
            flag(RuleId::LienNotFirst),
        ];
        let questions = derive_diligence_questions(&flags);
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0], question_for(RuleId::LienNotFirst));
    }

    #[test]
    fn test_every_rule_has_distinct_question() {
        let all = [
            RuleId::RepaymentSourceMissing,
            RuleId::LvrStressedGt70,
            RuleId::LienNotFirst,
            RuleId::EnforcementTimelineMissing,
            RuleId::RepaymentAfterTerm,
            RuleId::MissingStressValue,
        ];
        let distinct: HashSet<&str> = all.iter().map(|id| question_for(*id)).collect();
        assert_eq!(distinct.len(), all.len());
    }

    #[test]
    fn test_no_flags_no_questions() {
        assert!(derive_diligence_questions(&[]).is_empty());
    }
}
