use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Size limits for JSON embedded in a prompt.
///
/// The string budget halves at every nesting level, never below
/// `min_string_chars`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TruncationPolicy {
    pub max_string_chars: usize,
    pub prop_value_chars: usize,
    pub max_array_items: usize,
    pub max_object_keys: usize,
    pub min_string_chars: usize,
}

impl Default for TruncationPolicy {
    fn default() -> Self {
        Self {
            max_string_chars: 2000,
            prop_value_chars: 1000,
            max_array_items: 4,
            max_object_keys: 10,
            min_string_chars: 100,
        }
    }
}

impl TruncationPolicy {
    fn child_budget(&self, budget: usize) -> usize {
        (budget / 2).max(self.min_string_chars)
    }

    pub fn truncate(&self, value: &Value, budget: usize) -> Value {
        match value {
            Value::String(s) => Value::String(truncate_str(s, budget)),
            Value::Array(items) => {
                let child = self.child_budget(budget);
                let max = self.max_array_items.max(2);
                if items.len() <= max {
                    return Value::Array(items.iter().map(|v| self.truncate(v, child)).collect());
                }
                let omitted = items.len() - max;
                let mut out: Vec<Value> = items[..max - 1]
                    .iter()
                    .map(|v| self.truncate(v, child))
                    .collect();
                out.push(Value::String(format!("[... {omitted} items omitted ...]")));
                if let Some(last) = items.last() {
                    out.push(self.truncate(last, child));
                }
                Value::Array(out)
            }
            Value::Object(map) => {
                let child = self.child_budget(budget);
                let mut out: Map<String, Value> = map
                    .iter()
                    .take(self.max_object_keys)
                    .map(|(k, v)| (k.clone(), self.truncate(v, child)))
                    .collect();
                if map.len() > self.max_object_keys {
                    out.insert(
                        "_truncated".to_string(),
                        Value::String(format!(
                            "{} more keys omitted",
                            map.len() - self.max_object_keys
                        )),
                    );
                }
                Value::Object(out)
            }
            other => other.clone(),
        }
    }
}

fn truncate_str(s: &str, budget: usize) -> String {
    let total = s.chars().count();
    if total <= budget {
        return s.to_string();
    }
    let kept: String = s.chars().take(budget).collect();
    format!("{kept}... [truncated {} chars]", total - budget)
}
