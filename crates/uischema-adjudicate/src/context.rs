use serde::Serialize;
use serde_json::Value;
use uischema_core::Message;

use crate::error::AdjudicationError;
use crate::truncate::TruncationPolicy;
use crate::violation::ViolationDetail;

const TOOL_WINDOW: usize = 3;
const MESSAGE_WINDOW: usize = 2;

/// Bounded slice of the transcript sent along with one violation.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct EvaluationContext {
    pub component: String,
    pub prop: String,
    pub prop_value: Value,
    pub preceding_messages: Vec<Value>,
    pub tool_results: Vec<Value>,
}

/// Collects the last three tool results and the last two other messages up to
/// and including `violation.message_index`, oldest first, truncated.
pub fn build_context(
    conversation: &[Message],
    violation: &ViolationDetail,
    policy: &TruncationPolicy,
) -> Result<EvaluationContext, AdjudicationError> {
    if violation.message_index >= conversation.len() {
        return Err(AdjudicationError::MessageOutOfRange {
            index: violation.message_index,
            len: conversation.len(),
        });
    }
    let window = &conversation[..=violation.message_index];

    let tool_results = last_n(window.iter().filter(|m| m.is_tool_result()), TOOL_WINDOW);
    let preceding = last_n(window.iter().filter(|m| !m.is_tool_result()), MESSAGE_WINDOW);

    let encode = |msgs: Vec<&Message>| -> Result<Vec<Value>, AdjudicationError> {
        msgs.into_iter()
            .map(|m| -> Result<Value, AdjudicationError> {
                Ok(policy.truncate(&serde_json::to_value(m)?, policy.max_string_chars))
            })
            .collect()
    };

    Ok(EvaluationContext {
        component: violation.component.clone(),
        prop: violation.prop.clone(),
        prop_value: policy.truncate(&violation.value, policy.prop_value_chars),
        preceding_messages: encode(preceding)?,
        tool_results: encode(tool_results)?,
    })
}

fn last_n<'a>(iter: impl DoubleEndedIterator<Item = &'a Message>, n: usize) -> Vec<&'a Message> {
    let mut picked: Vec<&Message> = iter.rev().take(n).collect();
    picked.reverse();
    picked
}
