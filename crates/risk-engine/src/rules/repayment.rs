// Repayment rules: source of repayment and timeline against the loan term
use super::RuleInput;

/// Blank or absent repayment source
pub fn source_missing(input: &RuleInput<'_>) -> bool {
    input
        .terms
        .repayment_source
        .as_deref()
        .map_or(true, |source| source.trim().is_empty())
}

pub fn source_missing_message(_: &RuleInput<'_>) -> String {
    "Repayment source is missing.".to_string()
}

/// Repayment expected after the loan matures
pub fn after_term(input: &RuleInput<'_>) -> bool {
    matches!(
        (input.terms.repayment_timeline_months, input.terms.term_months),
        (Some(repayment), Some(term)) if repayment > term
    )
}

pub fn after_term_message(input: &RuleInput<'_>) -> String {
    match (input.terms.repayment_timeline_months, input.terms.term_months) {
        (Some(repayment), Some(term)) => format!(
            "Repayment timeline ({} months) exceeds stated loan term ({} months).",
            repayment, term
        ),
        _ => "Repayment timeline exceeds stated loan term.".to_string(),
    }
}
