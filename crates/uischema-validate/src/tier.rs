use serde::{Deserialize, Serialize};
use uischema_core::ValidationReport;

use crate::types::RuleCategory;
use crate::Validator;

/// Confidence bucket for a validated data point.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Every check passed and no mismatch had to be filtered.
    High,
    /// Every check passed, some safe mismatches were ignored.
    Medium,
    /// Interface text is well-formed but disagrees with the schema.
    Low,
    /// A structural check failed.
    Rejected,
}

impl Tier {
    pub fn label(self) -> &'static str {
        match self {
            Tier::High => "high",
            Tier::Medium => "medium",
            Tier::Low => "low",
            Tier::Rejected => "rejected",
        }
    }
}

impl Validator {
    /// Buckets a report produced by this validator. A failed check counts as
    /// structural only if the rule that produced it says so.
    pub fn tier(&self, report: &ValidationReport) -> Tier {
        if report
            .failures()
            .any(|r| self.category_of(&r.check_name) == Some(RuleCategory::Structural))
        {
            return Tier::Rejected;
        }
        if !report.all_passed {
            return Tier::Low;
        }
        if report.mismatch_totals().total_safe_mismatches > 0 {
            Tier::Medium
        } else {
            Tier::High
        }
    }
}
