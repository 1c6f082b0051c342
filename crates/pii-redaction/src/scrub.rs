//! Typed redaction for deal records
//!
//! `Scrub` redacts every string a record carries and leaves numbers and enums
//! alone, giving the same result as serializing the record, running
//! [`redact_value`](crate::redact_value) and deserializing it again.

use std::collections::BTreeMap;

use deal_types::{AnalysisResult, Fee, IcDraft, RiskFlag, Terms};

use crate::redact::redact;

pub trait Scrub {
    /// A copy with every string redacted
    fn scrub(&self) -> Self;
}

impl Scrub for String {
    fn scrub(&self) -> Self {
        redact(self)
    }
}

impl<T: Scrub> Scrub for Option<T> {
    fn scrub(&self) -> Self {
        self.as_ref().map(Scrub::scrub)
    }
}

impl<T: Scrub> Scrub for Vec<T> {
    fn scrub(&self) -> Self {
        self.iter().map(Scrub::scrub).collect()
    }
}

impl<K: Ord + Clone, V: Scrub> Scrub for BTreeMap<K, V> {
    fn scrub(&self) -> Self {
        self.iter().map(|(k, v)| (k.clone(), v.scrub())).collect()
    }
}

impl Scrub for Fee {
    fn scrub(&self) -> Self {
        Fee {
            fee_type: self.fee_type.scrub(),
            amount_or_pct: self.amount_or_pct.scrub(),
        }
    }
}

impl Scrub for Terms {
    fn scrub(&self) -> Self {
        Terms {
            currency: self.currency.scrub(),
            fees: self.fees.scrub(),
            collateral_type: self.collateral_type.scrub(),
            jurisdiction: self.jurisdiction.scrub(),
            repayment_source: self.repayment_source.scrub(),
            key_conditions: self.key_conditions.scrub(),
            notes: self.notes.scrub(),
            citations: self.citations.scrub(),
            ..self.clone()
        }
    }
}

impl Scrub for RiskFlag {
    fn scrub(&self) -> Self {
        RiskFlag {
            message: self.message.scrub(),
            ..self.clone()
        }
    }
}

impl Scrub for AnalysisResult {
    fn scrub(&self) -> Self {
        AnalysisResult {
            metrics: self.metrics,
            risk_flags: self.risk_flags.scrub(),
            overall_triage: self.overall_triage,
            diligence_questions: self.diligence_questions.scrub(),
        }
    }
}

impl Scrub for IcDraft {
    fn scrub(&self) -> Self {
        IcDraft {
            banner: self.banner.scrub(),
            ic_summary_3_lines: self.ic_summary_3_lines.scrub(),
            top_risks_ranked: self.top_risks_ranked.scrub(),
            mitigants_or_conditions: self.mitigants_or_conditions.scrub(),
            diligence_questions: self.diligence_questions.scrub(),
            what_changes_my_mind: self.what_changes_my_mind.scrub(),
        }
    }
}
