use serde::{Deserialize, Serialize};

/// One field of a `<Name>Props` interface, as written in the source text.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ParsedProp {
    pub name: String,
    /// Raw type text after the colon. Never interpreted beyond pattern checks.
    pub type_text: String,
    /// True iff a `?` follows the field name.
    pub optional: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ParsedProp {
    pub fn new(name: impl Into<String>, type_text: impl Into<String>, optional: bool) -> Self {
        Self {
            name: name.into(),
            type_text: type_text.into(),
            optional,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A component recovered from an `interface <Name>Props { ... }` block.
///
/// `name` has the `Props` suffix stripped. `props` keep declaration order.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ParsedComponent {
    pub name: String,
    pub props: Vec<ParsedProp>,
    /// The interface block exactly as it was matched.
    pub raw_definition_text: String,
}

impl ParsedComponent {
    pub fn prop_names(&self) -> impl Iterator<Item = &str> {
        self.props.iter().map(|p| p.name.as_str())
    }
}

/// A data point: its folder id plus the conversation/schema document.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DataPoint {
    pub id: String,
    pub document: crate::ConversationDocument,
}
