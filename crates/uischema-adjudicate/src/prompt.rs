use serde::{Deserialize, Serialize};

use crate::context::EvaluationContext;
use crate::error::AdjudicationError;

pub const SYSTEM_PROMPT: &str = "You audit generated UI components for data provenance. \
Every prop value shown to a user must either come from tool output in the conversation \
or be a plain UI constant. Answer with a single JSON object and nothing else.";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Body of one chat-completion POST.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f64,
    pub max_tokens: u32,
}

/// Renders the user prompt for one violation.
pub fn build_prompt(ctx: &EvaluationContext) -> Result<String, AdjudicationError> {
    let value = serde_json::to_string_pretty(&ctx.prop_value)?;
    let preceding = serde_json::to_string_pretty(&ctx.preceding_messages)?;
    let tools = serde_json::to_string_pretty(&ctx.tool_results)?;

    Ok(format!(
        r#"A checker flagged the prop `{prop}` of component `{component}` because its value could not be traced to tool output.

Prop value:
{value}

Recent conversation messages (oldest first, the last one emitted the component):
{preceding}

Recent tool results (oldest first):
{tools}

Decide whether the flag is a false positive.
- "hardcoded": a UI constant (label, placeholder, color, unit) that does not claim to be data. Approve.
- "transformation": a tool value reformatted, rounded, or converted. Approve.
- "derived": computed from tool values (sum, count, selection). Approve.
- "unclear": the value presents data that is not present in any tool result. Reject.

The prop is judged as a whole. If any field or element inside the value cannot be traced, reject the entire prop.

Respond with strict JSON only, no prose and no code fence:
{{"approved": true|false, "reasoning": "<one or two sentences>", "category": "hardcoded"|"transformation"|"derived"|"unclear"}}"#,
        prop = ctx.prop,
        component = ctx.component,
    ))
}
