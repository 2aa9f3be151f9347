use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use crate::error::ResponseError;
use crate::violation::{Category, LlmEvaluation};

fn fence_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)```(?i:json\w*)?\s*(.*?)```").expect("fence regex must compile"))
}

/// Pulls the JSON object out of a model reply.
///
/// A fenced code block wins when present; within it (or in the whole text
/// when there is no fence) the first balanced `{ ... }` span is taken,
/// ignoring braces inside string literals.
pub fn extract_json(text: &str) -> Option<&str> {
    if let Some(body) = fence_re()
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
    {
        return balanced_object(body).or(Some(body));
    }
    balanced_object(text)
}

fn balanced_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

pub fn parse_evaluation(text: &str) -> Result<LlmEvaluation, ResponseError> {
    let json = extract_json(text).ok_or(ResponseError::NoJson)?;
    let value: Value = serde_json::from_str(json)?;
    let obj = value.as_object().ok_or(ResponseError::NotAnObject)?;
    let approved = obj
        .get("approved")
        .and_then(Value::as_bool)
        .ok_or(ResponseError::MissingApproved)?;
    let reasoning = obj
        .get("reasoning")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let category = obj
        .get("category")
        .and_then(Value::as_str)
        .map(Category::from_label)
        .unwrap_or_default();
    Ok(LlmEvaluation {
        approved,
        reasoning,
        category,
    })
}

/// Like [`parse_evaluation`] but never fails: unreadable replies are rejections.
pub fn evaluate_text(text: &str) -> LlmEvaluation {
    parse_evaluation(text)
        .unwrap_or_else(|err| LlmEvaluation::rejected(format!("Failed to parse LLM response: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fenced_json_block_is_parsed() {
        let text = "```json\n{\"approved\": true, \"reasoning\": \"ok\", \"category\":\"hardcoded\"}\n```";
        let eval = evaluate_text(text);
        assert_eq!(
            eval,
            LlmEvaluation {
                approved: true,
                reasoning: "ok".into(),
                category: Category::Hardcoded,
            }
        );
    }

    #[test]
    fn missing_approved_fails_closed() {
        let eval = evaluate_text(r#"{"reasoning": "looks fine", "category": "derived"}"#);
        assert!(!eval.approved);
        assert_eq!(eval.category, Category::Unclear);
        assert!(eval.reasoning.contains("approved"));
    }

    #[test]
    fn non_boolean_approved_fails_closed() {
        let eval = evaluate_text(r#"{"approved": "yes", "reasoning": "", "category": "derived"}"#);
        assert!(!eval.approved);
        assert_eq!(eval.category, Category::Unclear);
    }

    #[test]
    fn raw_json_surrounded_by_prose() {
        let text = r#"Sure. {"approved": false, "reasoning": "value {not} in tools", "category": "unclear"} Hope that helps."#;
        let eval = parse_evaluation(text).unwrap();
        assert!(!eval.approved);
        assert_eq!(eval.reasoning, "value {not} in tools");
    }

    #[test]
    fn unfenced_bare_code_block() {
        let text = "```\n{\"approved\": true, \"reasoning\": \"sum of rows\", \"category\": \"derived\"}\n```";
        let eval = parse_evaluation(text).unwrap();
        assert_eq!(eval.category, Category::Derived);
    }

    #[test]
    fn fence_tag_is_case_insensitive_and_may_carry_a_suffix() {
        for tag in ["JSON", "Json", "jsonc", "json5"] {
            let text = format!(
                "```{tag}\n{{\"approved\": true, \"reasoning\": \"label\", \"category\": \"hardcoded\"}}\n```"
            );
            let eval = parse_evaluation(&text).unwrap_or_else(|e| panic!("{tag}: {e}"));
            assert!(eval.approved, "{tag}");
            assert_eq!(eval.category, Category::Hardcoded);
        }
    }

    #[test]
    fn prose_inside_the_fence_is_skipped() {
        let text = "```json\nHere it is: {\"approved\": false, \"reasoning\": \"made up\", \"category\": \"unclear\"}\n```";
        assert_eq!(
            extract_json(text),
            Some(r#"{"approved": false, "reasoning": "made up", "category": "unclear"}"#)
        );
        let eval = parse_evaluation(text).unwrap();
        assert!(!eval.approved);
        assert_eq!(eval.reasoning, "made up");
    }

    #[test]
    fn unknown_category_maps_to_unclear() {
        let eval = parse_evaluation(r#"{"approved": true, "category": "vibes"}"#).unwrap();
        assert!(eval.approved);
        assert_eq!(eval.category, Category::Unclear);
        assert_eq!(eval.reasoning, "");
    }

    #[test]
    fn garbage_is_rejected_with_diagnostic() {
        assert!(matches!(parse_evaluation("no json here"), Err(ResponseError::NoJson)));
        assert!(matches!(
            parse_evaluation("{\"approved\": tru"),
            Err(ResponseError::NoJson)
        ));
        assert!(matches!(
            parse_evaluation("{approved: true}"),
            Err(ResponseError::InvalidJson(_))
        ));
        let eval = evaluate_text("no json here");
        assert!(eval.reasoning.starts_with("Failed to parse LLM response"));
    }
}
