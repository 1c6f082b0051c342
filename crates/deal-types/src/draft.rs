use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_BANNER: &str = "Decision support only. Not investment advice.";

/// Investment-committee draft returned by the draft-generation capability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IcDraft {
    #[serde(default = "default_banner")]
    pub banner: String,
    pub ic_summary_3_lines: String,
    #[serde(default)]
    pub top_risks_ranked: Vec<String>,
    #[serde(default)]
    pub mitigants_or_conditions: Vec<String>,
    #[serde(default)]
    pub diligence_questions: Vec<String>,
    pub what_changes_my_mind: String,
}

fn default_banner() -> String {
    DEFAULT_BANNER.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("Draft lists {0} ranked risks (max {max})", max = IcDraft::MAX_RISKS)]
    TooManyRisks(usize),

    #[error("Draft lists {0} mitigants or conditions (max {max})", max = IcDraft::MAX_MITIGANTS)]
    TooManyMitigants(usize),
}

impl IcDraft {
    pub const MAX_RISKS: usize = 5;
    pub const MAX_MITIGANTS: usize = 8;

    pub fn validate(&self) -> Result<(), DraftError> {
        if self.top_risks_ranked.len() > Self::MAX_RISKS {
            return Err(DraftError::TooManyRisks(self.top_risks_ranked.len()));
        }
        if self.mitigants_or_conditions.len() > Self::MAX_MITIGANTS {
            return Err(DraftError::TooManyMitigants(
                self.mitigants_or_conditions.len(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn draft_json() -> serde_json::Value {
        json!({
            "ic_summary_3_lines": "Senior secured facility.\nModerate leverage.\nExit via sale.",
            "top_risks_ranked": ["Valuation risk"],
            "what_changes_my_mind": "Independent valuation"
        })
    }

    #[test]
    fn test_banner_defaults() {
        let draft: IcDraft = serde_json::from_value(draft_json()).unwrap();
        assert_eq!(draft.banner, DEFAULT_BANNER);
        assert!(draft.mitigants_or_conditions.is_empty());
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let mut value = draft_json();
        value["confidence"] = json!("high");
        assert!(serde_json::from_value::<IcDraft>(value).is_err());
    }

    #[test]
    fn test_too_many_risks_rejected() {
        let mut draft: IcDraft = serde_json::from_value(draft_json()).unwrap();
        draft.top_risks_ranked = (0..6).map(|i| format!("risk {}", i)).collect();
        assert_eq!(draft.validate(), Err(DraftError::TooManyRisks(6)));
    }

    #[test]
    fn test_too_many_mitigants_rejected() {
        let mut draft: IcDraft = serde_json::from_value(draft_json()).unwrap();
        draft.mitigants_or_conditions = vec!["condition".to_string(); 9];
        assert_eq!(draft.validate(), Err(DraftError::TooManyMitigants(9)));
    }
}
