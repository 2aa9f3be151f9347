use serde::{Deserialize, Serialize};

/// Why a mismatch may be filtered instead of flagged.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SafeReason {
    Optional,
    ArrayType,
    RecordType,
    NotRequired,
}

/// A prop declared on an interface but absent from its matched schema.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Mismatch {
    pub component: String,
    pub prop: String,
    pub type_text: String,
    pub optional: bool,
    /// Every escape condition that applies. Empty means the mismatch must be flagged.
    pub safe_reasons: Vec<SafeReason>,
}

impl Mismatch {
    pub fn is_safe(&self) -> bool {
        !self.safe_reasons.is_empty()
    }

    pub fn describe(&self) -> String {
        format!("{}.{}: In interface but not in schema", self.component, self.prop)
    }
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MismatchCounts {
    pub total_safe_mismatches: usize,
    pub total_unsafe_mismatches: usize,
}

/// Outcome of one check.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub check_name: String,
    pub passed: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MismatchCounts>,
}

impl ValidationResult {
    pub fn pass(check_name: &str, message: impl Into<String>) -> Self {
        Self {
            check_name: check_name.to_string(),
            passed: true,
            message: message.into(),
            details: vec![],
            metadata: None,
        }
    }

    pub fn fail(check_name: &str, message: impl Into<String>, details: Vec<String>) -> Self {
        Self {
            check_name: check_name.to_string(),
            passed: false,
            message: message.into(),
            details,
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, counts: MismatchCounts) -> Self {
        self.metadata = Some(counts);
        self
    }
}

/// Ordered results of every check run against one data point.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub results: Vec<ValidationResult>,
    pub all_passed: bool,
}

impl ValidationReport {
    pub fn from_results(results: Vec<ValidationResult>) -> Self {
        let all_passed = results.iter().all(|r| r.passed);
        Self { results, all_passed }
    }

    pub fn result(&self, check_name: &str) -> Option<&ValidationResult> {
        self.results.iter().find(|r| r.check_name == check_name)
    }

    pub fn failures(&self) -> impl Iterator<Item = &ValidationResult> {
        self.results.iter().filter(|r| !r.passed)
    }

    /// Sum of the mismatch counters carried by any result.
    pub fn mismatch_totals(&self) -> MismatchCounts {
        self.results
            .iter()
            .filter_map(|r| r.metadata)
            .fold(MismatchCounts::default(), |acc, m| MismatchCounts {
                total_safe_mismatches: acc.total_safe_mismatches + m.total_safe_mismatches,
                total_unsafe_mismatches: acc.total_unsafe_mismatches + m.total_unsafe_mismatches,
            })
    }
}
