use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;
use uischema_core::{
    find_schema, Mismatch, MismatchCounts, ParsedComponent, ParsedProp, SafeReason, SchemaDef,
    ValidationResult,
};

use crate::rule::Rule;
use crate::types::{RuleCategory, ValidateInput, SCHEMA_RECONCILIATION};

fn array_type_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\[\]|array").expect("array type regex must compile"))
}

fn record_type_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"Record<|[oO]bject|Dictionary|Map<").expect("record type regex must compile")
    })
}

pub fn is_array_type(type_text: &str) -> bool {
    array_type_re().is_match(type_text)
}

pub fn is_record_type(type_text: &str) -> bool {
    record_type_re().is_match(type_text)
}

/// Escape conditions that make a missing-from-schema prop safe to filter.
pub fn safe_reasons(prop: &ParsedProp, def: &SchemaDef) -> Vec<SafeReason> {
    let mut reasons = Vec::new();
    if prop.optional {
        reasons.push(SafeReason::Optional);
    }
    if is_array_type(&prop.type_text) {
        reasons.push(SafeReason::ArrayType);
    }
    if is_record_type(&prop.type_text) {
        reasons.push(SafeReason::RecordType);
    }
    if !def.requires(&prop.name) {
        reasons.push(SafeReason::NotRequired);
    }
    reasons
}

/// What the interfaces disagree with the schema on.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Reconciliation {
    pub mismatches: Vec<Mismatch>,
    /// Components no schema key is equivalent to.
    pub unmatched_components: Vec<String>,
    /// Unsafe findings in component order, formatted for `details`.
    pub unsafe_details: Vec<String>,
}

impl Reconciliation {
    pub fn counts(&self) -> MismatchCounts {
        let safe = self.mismatches.iter().filter(|m| m.is_safe()).count();
        MismatchCounts {
            total_safe_mismatches: safe,
            total_unsafe_mismatches: self.mismatches.len() - safe + self.unmatched_components.len(),
        }
    }
}

pub fn reconcile_components(
    defs: &BTreeMap<String, SchemaDef>,
    components: &[ParsedComponent],
) -> Reconciliation {
    let mut out = Reconciliation::default();
    for component in components {
        let Some((key, def)) = find_schema(defs, &component.name) else {
            out.unmatched_components.push(component.name.clone());
            out.unsafe_details
                .push(format!("{}: No matching schema found", component.name));
            continue;
        };
        for prop in component.props.iter().filter(|p| !def.declares(&p.name)) {
            let mismatch = Mismatch {
                component: component.name.clone(),
                prop: prop.name.clone(),
                type_text: prop.type_text.clone(),
                optional: prop.optional,
                safe_reasons: safe_reasons(prop, def),
            };
            if mismatch.is_safe() {
                debug!(
                    schema = key,
                    prop = %prop.name,
                    reasons = ?mismatch.safe_reasons,
                    "filtered safe mismatch"
                );
            } else {
                out.unsafe_details.push(mismatch.describe());
            }
            out.mismatches.push(mismatch);
        }
    }
    out
}

/// Every interface prop must be declared by the matched schema unless a
/// safe-to-filter condition applies.
pub struct SchemaReconciliationRule;

impl Rule for SchemaReconciliationRule {
    fn id(&self) -> &str {
        SCHEMA_RECONCILIATION
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Schema
    }

    fn eval(&self, input: &ValidateInput<'_>) -> ValidationResult {
        let Some(defs) = input.data_point.document.schema_defs() else {
            return ValidationResult::pass(self.id(), "No componentsSchema to validate against");
        };
        if input.components.is_empty() {
            return ValidationResult::pass(self.id(), "No parsed components; nothing to validate");
        }

        let rec = reconcile_components(defs, input.components);
        let counts = rec.counts();
        if counts.total_unsafe_mismatches > 0 {
            return ValidationResult::fail(
                self.id(),
                format!(
                    "Found {} unsafe mismatch(es) between interfaces and componentsSchema",
                    counts.total_unsafe_mismatches
                ),
                rec.unsafe_details,
            )
            .with_metadata(counts);
        }
        let message = match counts.total_safe_mismatches {
            0 => "All interface props match componentsSchema".to_string(),
            n => format!("All interface props match componentsSchema ({n} safe mismatch(es) ignored)"),
        };
        ValidationResult::pass(self.id(), message).with_metadata(counts)
    }
}
