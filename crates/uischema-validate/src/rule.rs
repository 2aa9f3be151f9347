use std::sync::OnceLock;

use regex::Regex;
use uischema_core::ValidationResult;

use crate::types::{RuleCategory, ValidateInput, NO_EXPORT_INTERFACE, NO_REACT_NODE};

pub trait Rule: Send + Sync {
    fn id(&self) -> &str;
    fn category(&self) -> RuleCategory;
    /// Always produces a result; "nothing to check" is a pass.
    fn eval(&self, input: &ValidateInput<'_>) -> ValidationResult;
}

fn export_interface_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\bexport\s+interface\b").expect("export interface regex must compile")
    })
}

fn react_node_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\breactnode\b|\bjsx\.element\b|\breactelement\b")
            .expect("react node regex must compile")
    })
}

/// Interfaces are consumed as plain text; an `export` modifier is a style violation.
pub struct NoExportInterfaceRule;

impl Rule for NoExportInterfaceRule {
    fn id(&self) -> &str {
        NO_EXPORT_INTERFACE
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Structural
    }

    fn eval(&self, input: &ValidateInput<'_>) -> ValidationResult {
        let count = export_interface_re().find_iter(input.raw_text).count();
        if count == 0 {
            return ValidationResult::pass(self.id(), "No exported interfaces");
        }
        ValidationResult::fail(
            self.id(),
            format!("Found {count} exported interface(s); component interfaces must not be exported"),
            (1..=count).map(|i| format!("export interface #{i}")).collect(),
        )
    }
}

/// Props must be serializable data, so a live UI subtree type is rejected.
pub struct NoReactNodeRule;

impl Rule for NoReactNodeRule {
    fn id(&self) -> &str {
        NO_REACT_NODE
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Structural
    }

    fn eval(&self, input: &ValidateInput<'_>) -> ValidationResult {
        let offenders: Vec<String> = input
            .components
            .iter()
            .flat_map(|c| {
                c.props
                    .iter()
                    .filter(|p| react_node_re().is_match(&p.type_text))
                    .map(move |p| format!("{}.{}: {}", c.name, p.name, p.type_text))
            })
            .collect();
        if offenders.is_empty() {
            return ValidationResult::pass(self.id(), "No ReactNode props");
        }
        ValidationResult::fail(
            self.id(),
            format!(
                "Found {} prop(s) typed as ReactNode; props must be serializable data",
                offenders.len()
            ),
            offenders,
        )
    }
}
