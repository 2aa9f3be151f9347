use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A prop whose value could not be traced to upstream tool output.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ViolationDetail {
    /// 0-based index into the conversation.
    pub message_index: usize,
    pub component: String,
    pub prop: String,
    #[serde(default)]
    pub value: Value,
}

impl ViolationDetail {
    /// Human reference, with a 1-based message number.
    pub fn reference(&self) -> String {
        format!(
            "Message {}, {}.{}",
            self.message_index + 1,
            self.component,
            self.prop
        )
    }
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// A UI constant written by the model, not claimed to come from data.
    Hardcoded,
    /// Formatting or unit conversion of a tool value.
    Transformation,
    /// Computed from tool values (sums, counts, picks).
    Derived,
    #[default]
    Unclear,
}

impl Category {
    /// Unknown labels map to `Unclear`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "hardcoded" => Self::Hardcoded,
            "transformation" => Self::Transformation,
            "derived" => Self::Derived,
            _ => Self::Unclear,
        }
    }
}

/// The model's verdict on one violation.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LlmEvaluation {
    pub approved: bool,
    pub reasoning: String,
    pub category: Category,
}

impl LlmEvaluation {
    pub fn rejected(reasoning: impl Into<String>) -> Self {
        Self {
            approved: false,
            reasoning: reasoning.into(),
            category: Category::Unclear,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdjudicationRecord {
    pub violation: String,
    pub approved: bool,
    pub reasoning: String,
    pub category: Category,
}

/// Batch outcome; `details` follows input order.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdjudicationSummary {
    pub approved: usize,
    pub rejected: usize,
    pub details: Vec<AdjudicationRecord>,
}

impl AdjudicationSummary {
    pub fn push(&mut self, violation: &ViolationDetail, eval: LlmEvaluation) {
        if eval.approved {
            self.approved += 1;
        } else {
            self.rejected += 1;
        }
        self.details.push(AdjudicationRecord {
            violation: violation.reference(),
            approved: eval.approved,
            reasoning: eval.reasoning,
            category: eval.category,
        });
    }
}
