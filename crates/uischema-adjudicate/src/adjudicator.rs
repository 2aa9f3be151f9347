use std::time::Duration;

use uischema_core::Message;

use crate::client::{CompletionClient, OpenAiClient};
use crate::config::{ApiKey, LlmConfig};
use crate::context::build_context;
use crate::error::AdjudicationError;
use crate::prompt::{build_prompt, ChatMessage, CompletionRequest, SYSTEM_PROMPT};
use crate::response::parse_evaluation;
use crate::truncate::TruncationPolicy;
use crate::violation::{AdjudicationSummary, LlmEvaluation, ViolationDetail};

/// Runs violations through a completion client one at a time.
pub struct Adjudicator<C> {
    client: C,
    model: String,
    temperature: f64,
    max_tokens: u32,
    timeout: Duration,
    policy: TruncationPolicy,
}

impl<C: CompletionClient> Adjudicator<C> {
    pub fn new(client: C, config: &LlmConfig) -> Self {
        Self {
            client,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            timeout: config.timeout(),
            policy: config.truncation,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn request_for(
        &self,
        conversation: &[Message],
        violation: &ViolationDetail,
    ) -> Result<CompletionRequest, AdjudicationError> {
        let ctx = build_context(conversation, violation, &self.policy)?;
        Ok(CompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(SYSTEM_PROMPT),
                ChatMessage::user(build_prompt(&ctx)?),
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        })
    }

    /// One round trip. The in-flight request is dropped when the timeout fires.
    pub async fn evaluate_one(
        &self,
        conversation: &[Message],
        violation: &ViolationDetail,
    ) -> Result<LlmEvaluation, AdjudicationError> {
        let request = self.request_for(conversation, violation)?;
        let text = tokio::time::timeout(self.timeout, self.client.complete(&request))
            .await
            .map_err(|_| AdjudicationError::Timeout(self.timeout))??;
        Ok(parse_evaluation(&text)?)
    }

    /// Evaluates in input order. Any error becomes a rejection for that item.
    pub async fn evaluate_all(
        &self,
        conversation: &[Message],
        violations: &[ViolationDetail],
    ) -> AdjudicationSummary {
        let mut summary = AdjudicationSummary::default();
        for violation in violations {
            let eval = match self.evaluate_one(conversation, violation).await {
                Ok(eval) => {
                    tracing::debug!(
                        violation = %violation.reference(),
                        approved = eval.approved,
                        "violation adjudicated"
                    );
                    eval
                }
                Err(err) => {
                    tracing::warn!(violation = %violation.reference(), error = %err, "adjudication failed; rejecting");
                    LlmEvaluation::rejected(format!("Adjudication failed: {err}"))
                }
            };
            summary.push(violation, eval);
        }
        tracing::info!(
            approved = summary.approved,
            rejected = summary.rejected,
            "adjudication finished"
        );
        summary
    }
}

/// Adjudicates against the configured endpoint with an explicit key.
pub async fn adjudicate(
    config: &LlmConfig,
    api_key: ApiKey,
    conversation: &[Message],
    violations: &[ViolationDetail],
) -> AdjudicationSummary {
    Adjudicator::new(OpenAiClient::new(config, api_key), config)
        .evaluate_all(conversation, violations)
        .await
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use serde_json::json;
    use uischema_core::MessageContent;

    use super::*;
    use crate::violation::Category;

    enum Reply {
        Text(&'static str),
        Fail,
        Hang,
    }

    struct ScriptedClient {
        replies: Mutex<VecDeque<Reply>>,
        seen: Mutex<Vec<String>>,
    }

    impl ScriptedClient {
        fn new(replies: Vec<Reply>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl CompletionClient for ScriptedClient {
        async fn complete(&self, request: &CompletionRequest) -> Result<String, AdjudicationError> {
            self.seen
                .lock()
                .unwrap()
                .push(request.messages[1].content.clone());
            let reply = self.replies.lock().unwrap().pop_front();
            match reply {
                Some(Reply::Text(t)) => Ok(t.to_string()),
                Some(Reply::Fail) | None => Err(AdjudicationError::EmptyCompletion),
                Some(Reply::Hang) => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Err(AdjudicationError::EmptyCompletion)
                }
            }
        }
    }

    fn conversation() -> Vec<Message> {
        vec![
            Message {
                role: "tool".into(),
                content: Some(MessageContent::Text("{\"total\": 42}".into())),
                ..Message::default()
            },
            Message {
                role: "assistant".into(),
                content: Some(MessageContent::Text("rendered".into())),
                ..Message::default()
            },
        ]
    }

    fn violation(prop: &str) -> ViolationDetail {
        ViolationDetail {
            message_index: 1,
            component: "Stat".into(),
            prop: prop.into(),
            value: json!(42),
        }
    }

    const APPROVE: &str = r#"{"approved": true, "reasoning": "matches total", "category": "derived"}"#;
    const REJECT: &str = r#"{"approved": false, "reasoning": "not in tools", "category": "unclear"}"#;

    #[tokio::test]
    async fn results_follow_input_order() {
        let client = ScriptedClient::new(vec![Reply::Text(APPROVE), Reply::Text(REJECT)]);
        let adj = Adjudicator::new(client, &LlmConfig::default());
        let summary = adj
            .evaluate_all(&conversation(), &[violation("a"), violation("b")])
            .await;

        assert_eq!(summary.approved, 1);
        assert_eq!(summary.rejected, 1);
        assert_eq!(summary.details[0].violation, "Message 2, Stat.a");
        assert!(summary.details[0].approved);
        assert_eq!(summary.details[0].category, Category::Derived);
        assert_eq!(summary.details[1].violation, "Message 2, Stat.b");
        assert!(!summary.details[1].approved);

        let seen = adj.client.seen.lock().unwrap();
        assert!(seen[0].contains("`a` of component `Stat`"));
        assert!(seen[1].contains("`b` of component `Stat`"));
    }

    #[tokio::test]
    async fn one_failure_does_not_abort_the_batch() {
        let client = ScriptedClient::new(vec![Reply::Text(APPROVE), Reply::Fail, Reply::Text(APPROVE)]);
        let adj = Adjudicator::new(client, &LlmConfig::default());
        let summary = adj
            .evaluate_all(&conversation(), &[violation("a"), violation("b"), violation("c")])
            .await;

        assert_eq!(summary.approved, 2);
        assert_eq!(summary.rejected, 1);
        let failed = &summary.details[1];
        assert!(!failed.approved);
        assert_eq!(failed.category, Category::Unclear);
        assert!(failed.reasoning.starts_with("Adjudication failed"));
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_is_a_rejection() {
        let client = ScriptedClient::new(vec![Reply::Hang, Reply::Text(APPROVE)]);
        let adj = Adjudicator::new(client, &LlmConfig::default()).with_timeout(Duration::from_secs(5));
        let summary = adj
            .evaluate_all(&conversation(), &[violation("slow"), violation("fast")])
            .await;

        assert!(!summary.details[0].approved);
        assert!(summary.details[0].reasoning.contains("timed out"));
        assert!(summary.details[1].approved);
    }

    #[tokio::test]
    async fn unparseable_reply_is_a_rejection() {
        let client = ScriptedClient::new(vec![Reply::Text("I think it is fine.")]);
        let adj = Adjudicator::new(client, &LlmConfig::default());
        let summary = adj.evaluate_all(&conversation(), &[violation("a")]).await;
        assert_eq!(summary.rejected, 1);
        assert!(summary.details[0].reasoning.contains("no JSON object"));
    }

    #[tokio::test]
    async fn truncation_limits_come_from_config() {
        let mut config = LlmConfig::default();
        config.truncation.prop_value_chars = 5;
        let adj = Adjudicator::new(ScriptedClient::new(vec![]), &config);
        let mut v = violation("a");
        v.value = json!("abcdefghij");
        let request = adj.request_for(&conversation(), &v).unwrap();
        assert!(request.messages[1].content.contains("abcde... [truncated 5 chars]"));
        assert_eq!(request.temperature, 0.1);
    }

    #[tokio::test]
    async fn bad_index_is_rejected_without_a_request() {
        let client = ScriptedClient::new(vec![Reply::Text(APPROVE)]);
        let adj = Adjudicator::new(client, &LlmConfig::default());
        let mut v = violation("a");
        v.message_index = 9;
        let summary = adj.evaluate_all(&conversation(), &[v]).await;
        assert_eq!(summary.rejected, 1);
        assert!(adj.client.seen.lock().unwrap().is_empty());
    }
}
