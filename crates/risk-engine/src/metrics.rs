// Leverage metrics: loan-to-value ratios and the equity buffer
use deal_types::{Metrics, Terms};

/// Compute LVRs and the equity buffer.
///
/// A missing operand, a zero denominator or a non-finite quotient yields
/// `None`. The equity buffer is taken from the stressed LVR whenever that is
/// available and falls back to the appraised LVR otherwise.
pub fn compute_metrics(terms: &Terms) -> Metrics {
    let lvr_appraised = ratio(terms.loan_amount, terms.collateral_value_appraised);
    let lvr_stressed = ratio(terms.loan_amount, terms.collateral_value_stressed);
    let equity_buffer = lvr_stressed.or(lvr_appraised).map(|lvr| 1.0 - lvr);

    Metrics {
        lvr_appraised,
        lvr_stressed,
        equity_buffer,
    }
}

fn ratio(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    let (numerator, denominator) = (numerator?, denominator?);
    if denominator == 0.0 {
        return None;
    }
    let value = numerator / denominator;
    value.is_finite().then_some(value)
}
