//! Checks run against one data point.
//!
//! All checks are synchronous and pure. Each one always yields a
//! [`ValidationResult`]; degenerate inputs (no schema, no components) pass.

pub mod reconcile;
pub mod rule;
pub mod tier;
pub mod types;
pub mod usage;

pub use reconcile::*;
pub use rule::*;
pub use tier::*;
pub use types::*;
pub use usage::*;

use uischema_core::{DataPoint, ParsedComponent, ValidationReport, ValidationResult};

/// Ordered set of rules applied to every data point.
pub struct Validator {
    rules: Vec<Box<dyn Rule>>,
}

impl Default for Validator {
    fn default() -> Self {
        Self::with_rules(vec![
            Box::new(NoExportInterfaceRule),
            Box::new(NoReactNodeRule),
            Box::new(SchemaReconciliationRule),
            Box::new(ConversationPropUsageRule),
        ])
    }
}

impl Validator {
    pub fn with_rules(rules: Vec<Box<dyn Rule>>) -> Self {
        Self { rules }
    }

    /// Category of the rule that produced `check_name`, if it is one of ours.
    pub fn category_of(&self, check_name: &str) -> Option<RuleCategory> {
        self.rules
            .iter()
            .find(|r| r.id() == check_name)
            .map(|r| r.category())
    }

    pub fn run(&self, input: &ValidateInput<'_>) -> ValidationReport {
        let results: Vec<ValidationResult> = self
            .rules
            .iter()
            .map(|rule| {
                let result = rule.eval(input);
                tracing::debug!(
                    data_point = %input.data_point.id,
                    check = rule.id(),
                    passed = result.passed,
                    "check evaluated"
                );
                result
            })
            .collect();
        ValidationReport::from_results(results)
    }
}

/// Runs the default rule set.
pub fn validate(
    data_point: &DataPoint,
    components: &[ParsedComponent],
    raw_text: &str,
) -> ValidationReport {
    Validator::default().run(&ValidateInput {
        data_point,
        components,
        raw_text,
    })
}
