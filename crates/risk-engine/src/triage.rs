use deal_types::{RiskFlag, Severity, Triage};

/// Classify a deal from its flags.
///
/// Precedence, top-down: any HARD_STOP is Weak, two or more HIGH is Weak,
/// one HIGH or two or more MED is Borderline, anything else is Strong.
pub fn overall_triage(flags: &[RiskFlag]) -> Triage {
    let count = |severity: Severity| flags.iter().filter(|f| f.severity == severity).count();

    if count(Severity::HardStop) > 0 {
        return Triage::Weak;
    }

    let high = count(Severity::High);
    if high >= 2 {
        Triage::Weak
    } else if high == 1 || count(Severity::Med) >= 2 {
        Triage::Borderline
    } else {
        Triage::Strong
    }
}
