use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::LoadError;
use crate::schema::{ComponentsSchema, SchemaDef};

/// The conversation/schema JSON document of a data point.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ConversationDocument {
    #[serde(rename = "componentsSchema", default, deserialize_with = "null_as_default")]
    pub components_schema: ComponentsSchema,
    #[serde(default)]
    pub conversation: Vec<Message>,
}

impl ConversationDocument {
    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    pub fn load_from(path: &Path) -> Result<Self, LoadError> {
        let s = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&s).map_err(|source| LoadError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// `componentsSchema.$defs`, if present.
    pub fn schema_defs(&self) -> Option<&BTreeMap<String, SchemaDef>> {
        self.components_schema.defs.as_ref()
    }
}

fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

/// One transcript entry.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<MessageContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grading_guidance: Option<Value>,
    #[serde(rename = "toolCalls", default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Value>,
    /// Fields this model does not name (`tool_call_id`, `name`, ...), kept so
    /// the message can be replayed verbatim as LLM context.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Message {
    pub fn is_tool_result(&self) -> bool {
        self.role == "tool"
    }

    pub fn parts(&self) -> &[ContentPart] {
        match &self.content {
            Some(MessageContent::Parts(parts)) => parts,
            _ => &[],
        }
    }

    /// Component instances emitted in this message, in content order.
    pub fn component_instances(&self) -> impl Iterator<Item = &ComponentInstance> {
        self.parts()
            .iter()
            .filter(|p| p.kind == "component")
            .filter_map(|p| p.component.as_ref())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ContentPart {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<ComponentInstance>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// A component emitted at runtime, with the props it was given.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ComponentInstance {
    pub name: String,
    #[serde(default)]
    pub props: Value,
}

impl ComponentInstance {
    /// Keys of the runtime `props` object; empty when props is not an object.
    pub fn prop_keys(&self) -> Vec<&str> {
        self.props
            .as_object()
            .map(|m| m.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"{
        "componentsSchema": { "$defs": { "Card": { "properties": { "props": { "properties": { "title": {} } } } } } },
        "conversation": [
            { "role": "user", "content": "show me a card" },
            { "role": "tool", "content": "{\"rows\": []}", "tool_call_id": "call_1" },
            { "role": "assistant", "content": [
                { "type": "text", "text": "Here you go" },
                { "type": "component", "component": { "name": "Card", "props": { "title": "Hi", "extra": 1 } } }
            ], "grading_guidance": "check the title" }
        ]
    }"#;

    #[test]
    fn parses_mixed_content_shapes() {
        let doc = ConversationDocument::from_json_str(DOC).unwrap();
        assert_eq!(doc.conversation.len(), 3);
        assert!(doc.schema_defs().unwrap().contains_key("Card"));

        assert!(matches!(doc.conversation[0].content, Some(MessageContent::Text(_))));
        assert!(doc.conversation[1].is_tool_result());
        assert_eq!(
            doc.conversation[1].extra.get("tool_call_id"),
            Some(&Value::String("call_1".into()))
        );

        let instances: Vec<_> = doc.conversation[2].component_instances().collect();
        assert_eq!(instances.len(), 1);
        assert_eq!(instances[0].name, "Card");
        let mut keys = instances[0].prop_keys();
        keys.sort_unstable();
        assert_eq!(keys, vec!["extra", "title"]);
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let doc = ConversationDocument::from_json_str("{}").unwrap();
        assert!(doc.schema_defs().is_none());
        assert!(doc.conversation.is_empty());
    }

    #[test]
    fn null_schema_sections_mean_absent() {
        let doc = ConversationDocument::from_json_str(r#"{"componentsSchema": null, "conversation": []}"#)
            .unwrap();
        assert!(doc.schema_defs().is_none());
        let doc = ConversationDocument::from_json_str(r#"{"componentsSchema": {"$defs": null}}"#).unwrap();
        assert!(doc.schema_defs().is_none());
    }

    #[test]
    fn null_content_is_accepted() {
        let doc =
            ConversationDocument::from_json_str(r#"{"conversation":[{"role":"assistant","content":null}]}"#)
                .unwrap();
        assert!(doc.conversation[0].parts().is_empty());
    }
}
