use uischema_core::{find_schema, ConversationDocument, ValidationResult};

use crate::rule::Rule;
use crate::types::{RuleCategory, ValidateInput, CONVERSATION_PROP_USAGE};

/// Violations of runtime prop usage, in transcript order.
///
/// Message numbers in the returned strings are 1-based.
pub fn usage_violations(doc: &ConversationDocument) -> (usize, Vec<String>) {
    let Some(defs) = doc.schema_defs() else {
        return (0, vec![]);
    };
    let mut instances = 0;
    let mut violations = Vec::new();
    for (idx, message) in doc.conversation.iter().enumerate() {
        let n = idx + 1;
        for instance in message.component_instances() {
            instances += 1;
            let Some((_, def)) = find_schema(defs, &instance.name) else {
                violations.push(format!("Message {n}, Component {}: No schema found", instance.name));
                continue;
            };
            if def.allows_additional_props() {
                continue;
            }
            violations.extend(
                instance
                    .prop_keys()
                    .into_iter()
                    .filter(|key| !def.declares(key))
                    .map(|key| format!("Message {n}, {}.{key}: Not in schema params", instance.name)),
            );
        }
    }
    (instances, violations)
}

/// Props a component was actually emitted with must be allowed by its schema.
pub struct ConversationPropUsageRule;

impl Rule for ConversationPropUsageRule {
    fn id(&self) -> &str {
        CONVERSATION_PROP_USAGE
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Schema
    }

    fn eval(&self, input: &ValidateInput<'_>) -> ValidationResult {
        let doc = &input.data_point.document;
        if doc.schema_defs().is_none() {
            return ValidationResult::pass(self.id(), "No componentsSchema to validate against");
        }
        let (instances, violations) = usage_violations(doc);
        if instances == 0 {
            return ValidationResult::pass(self.id(), "No component instances in conversation");
        }
        if violations.is_empty() {
            return ValidationResult::pass(
                self.id(),
                format!("All {instances} component instance(s) use schema-declared props"),
            );
        }
        ValidationResult::fail(
            self.id(),
            format!("Found {} prop usage violation(s) in conversation", violations.len()),
            violations,
        )
    }
}
