use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::truncate::TruncationPolicy;

/// Chat-completion settings for the adjudicator.
///
/// The credential itself is never part of this struct; only the name of the
/// environment variable it is read from.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LlmConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Size limits for the transcript slice sent with each violation.
    #[serde(default)]
    pub truncation: TruncationPolicy,
}

fn default_endpoint() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_temperature() -> f64 {
    0.1
}

fn default_max_tokens() -> u32 {
    500
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
            api_key_env: default_api_key_env(),
            truncation: TruncationPolicy::default(),
        }
    }
}

impl LlmConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Reads the key from `api_key_env`. `None` means adjudication is off.
    pub fn api_key(&self) -> Option<ApiKey> {
        ApiKey::from_env(&self.api_key_env)
    }
}

/// Bearer credential. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn from_env(var: &str) -> Option<Self> {
        std::env::var(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(Self)
    }

    pub(crate) fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_redacts_the_key() {
        let key = ApiKey::new("sk-very-secret");
        let printed = format!("{key:?}");
        assert!(!printed.contains("sk-very-secret"));
    }

    #[test]
    fn partial_section_fills_defaults() {
        let cfg: LlmConfig = serde_json::from_str(r#"{"model": "gpt-4.1"}"#).unwrap();
        assert_eq!(cfg.model, "gpt-4.1");
        assert_eq!(cfg.timeout(), Duration::from_secs(30));
        assert_eq!(cfg.api_key_env, "OPENAI_API_KEY");
    }

    #[test]
    fn truncation_limits_are_configurable() {
        let cfg: LlmConfig =
            serde_json::from_str(r#"{"truncation": {"max_array_items": 6}}"#).unwrap();
        assert_eq!(cfg.truncation.max_array_items, 6);
        assert_eq!(cfg.truncation.max_string_chars, 2000);
    }

    #[test]
    fn blank_env_value_means_no_key() {
        let var = "UISCHEMA_TEST_BLANK_KEY";
        std::env::set_var(var, "   ");
        assert!(ApiKey::from_env(var).is_none());
        std::env::remove_var(var);
        assert!(ApiKey::from_env(var).is_none());
    }
}
