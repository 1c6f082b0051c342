// Security rules: leverage, lien ranking, enforcement and stress coverage
use deal_types::LienPosition;

use super::RuleInput;

/// Stressed LVR strictly above the configured maximum
pub fn stressed_lvr_too_high(input: &RuleInput<'_>) -> bool {
    input
        .metrics
        .lvr_stressed
        .is_some_and(|lvr| lvr > input.config.max_stressed_lvr)
}

pub fn stressed_lvr_message(input: &RuleInput<'_>) -> String {
    let lvr = input.metrics.lvr_stressed.unwrap_or_default();
    format!(
        "Stressed LVR is {:.2}%, above {}%.",
        lvr * 100.0,
        percent_label(input.config.max_stressed_lvr)
    )
}

/// Threshold as a short percentage label: 0.7 -> "70", 0.725 -> "72.5"
fn percent_label(fraction: f64) -> String {
    let pct = (fraction * 10_000.0).round() / 100.0;
    format!("{}", pct)
}

pub fn lien_not_first(input: &RuleInput<'_>) -> bool {
    input.terms.lien_position != LienPosition::First
}

pub fn lien_not_first_message(input: &RuleInput<'_>) -> String {
    format!("Lien position is {} (not first).", input.terms.lien_position)
}

pub fn enforcement_timeline_missing(input: &RuleInput<'_>) -> bool {
    input.terms.enforcement_timeline_months.is_none()
}

pub fn enforcement_timeline_message(_: &RuleInput<'_>) -> String {
    "Enforcement timeline is not provided.".to_string()
}

pub fn stress_value_missing(input: &RuleInput<'_>) -> bool {
    input.terms.collateral_value_stressed.is_none()
}

pub fn stress_value_message(_: &RuleInput<'_>) -> String {
    "No stressed collateral value provided (stress missing).".to_string()
}
