//! Draft gate
//!
//! Drafting an IC memo is only allowed once a human has confirmed the fields
//! the memo leans on. The gate is a pure predicate over the confirmation map.

use deal_types::{ConfirmedFields, GateDecision, Terms};

/// Fields that must each be confirmed, checked in this order
pub const REQUIRED_CONFIRMATIONS: [&str; 3] = ["loan_amount", "lien_position", "repayment_source"];

/// At least one of these must be confirmed
pub const COLLATERAL_CONFIRMATIONS: [&str; 2] =
    ["collateral_value_stressed", "collateral_value_appraised"];

pub fn can_draft(_terms: &Terms, confirmed: &ConfirmedFields) -> GateDecision {
    if let Some(field) = REQUIRED_CONFIRMATIONS
        .iter()
        .find(|field| !confirmed.is_confirmed(field))
    {
        return GateDecision::deny(format!(
            "Field '{}' must be confirmed before drafting",
            field
        ));
    }

    if !COLLATERAL_CONFIRMATIONS
        .iter()
        .any(|field| confirmed.is_confirmed(field))
    {
        return GateDecision::deny(
            "Collateral value (stressed or appraised) must be confirmed before drafting",
        );
    }

    GateDecision::allow()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn confirmed(fields: &[(&str, bool)]) -> ConfirmedFields {
        fields
            .iter()
            .map(|(name, value)| (name.to_string(), *value))
            .collect()
    }

    #[test]
    fn test_missing_lien_confirmation_names_lien() {
        let decision = can_draft(
            &Terms::default(),
            &confirmed(&[("loan_amount", true), ("repayment_source", true)]),
        );
        assert!(!decision.allowed);
        assert!(decision.reason.unwrap().contains("lien_position"));
    }

    #[test]
    fn test_all_confirmed_allows() {
        let decision = can_draft(
            &Terms::default(),
            &confirmed(&[
                ("loan_amount", true),
                ("lien_position", true),
                ("repayment_source", true),
                ("collateral_value_appraised", true),
            ]),
        );
        assert_eq!(decision, GateDecision::allow());
    }

    #[test]
    fn test_first_missing_field_wins() {
        let decision = can_draft(&Terms::default(), &ConfirmedFields::new());
        assert_eq!(
            decision.reason.as_deref(),
            Some("Field 'loan_amount' must be confirmed before drafting")
        );

        let decision = can_draft(
            &Terms::default(),
            &confirmed(&[("loan_amount", true), ("lien_position", false)]),
        );
        assert!(decision.reason.unwrap().contains("'lien_position'"));
    }

    #[test]
    fn test_collateral_confirmation_required() {
        let decision = can_draft(
            &Terms::default(),
            &confirmed(&[
                ("loan_amount", true),
                ("lien_position", true),
                ("repayment_source", true),
                ("collateral_value_appraised", false),
            ]),
        );
        assert!(!decision.allowed);
        assert_eq!(
            decision.reason.as_deref(),
            Some("Collateral value (stressed or appraised) must be confirmed before drafting")
        );
    }

    #[test]
    fn test_stressed_value_alone_satisfies_collateral() {
        let decision = can_draft(
            &Terms::default(),
            &confirmed(&[
                ("loan_amount", true),
                ("lien_position", true),
                ("repayment_source", true),
                ("collateral_value_stressed", true),
            ]),
        );
        assert!(decision.allowed);
        assert!(decision.reason.is_none());
    }

    #[test]
    fn test_gate_does_not_mutate_inputs() {
        let terms = Terms::default();
        let map = confirmed(&[("loan_amount", true)]);
        let before = (terms.clone(), map.clone());
        let _ = can_draft(&terms, &map);
        assert_eq!((terms, map), before);
    }
}
