use serde::{Deserialize, Serialize};
use uischema_core::{DataPoint, ParsedComponent};

pub const NO_EXPORT_INTERFACE: &str = "no_export_interface";
pub const NO_REACT_NODE: &str = "no_react_node";
pub const SCHEMA_RECONCILIATION: &str = "schema_reconciliation";
pub const CONVERSATION_PROP_USAGE: &str = "conversation_prop_usage";

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RuleCategory {
    /// Style of the interface text itself.
    Structural,
    /// Agreement between interfaces, transcript and `componentsSchema`.
    Schema,
}

#[derive(Clone, Copy, Debug)]
pub struct ValidateInput<'a> {
    pub data_point: &'a DataPoint,
    pub components: &'a [ParsedComponent],
    /// The components text exactly as loaded.
    pub raw_text: &'a str,
}
