// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use crate::constants::{STATUS_FAILURE, STATUS_SUCCESS};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Serialize)]
pub(crate) struct SubmitRequest<'a> {
  pub prompt: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChangeRequest {
  pub content: String,
}

/// Envelope returned by `/submit/imagine` and `/submit/simple-change`.
#[derive(Debug, Deserialize, Clone)]
pub struct SubmitResponse {
  pub code: i64,
  #[serde(default)]
  pub result: Option<Value>,
  #[serde(default)]
  pub properties: Option<Map<String, Value>>,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub time: Option<i64>,
}

impl SubmitResponse {
  /// Task ids are usually strings, but some proxies send them as numbers.
  pub fn task_id(&self) -> Option<String> {
    self.result.as_ref().and_then(scalar_to_string)
  }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct TaskSnapshot {
  pub action: Option<String>,
  #[serde(default, deserialize_with = "lenient_string")]
  pub id: Option<String>,
  pub properties: Option<Map<String, Value>>,
  pub description: Option<String>,
  pub status: Option<String>,
  pub image_url: Option<String>,
  #[serde(default, deserialize_with = "lenient_string")]
  pub progress: Option<String>,
  pub prompt: Option<String>,
  pub prompt_en: Option<String>,
  pub start_time: Option<i64>,
  pub finish_time: Option<i64>,
  pub submit_time: Option<i64>,
  pub fail_reason: Option<String>,
}

impl TaskSnapshot {
  pub fn status(&self) -> &str {
    self.status.as_deref().unwrap_or_default()
  }

  pub fn is_failure(&self) -> bool {
    self.status() == STATUS_FAILURE
  }

  pub fn is_finished(&self) -> bool {
    matches!(self.status(), STATUS_SUCCESS | STATUS_FAILURE)
  }

  pub fn submitted_at(&self) -> Option<DateTime<Utc>> {
    self.submit_time.and_then(from_millis)
  }

  pub fn started_at(&self) -> Option<DateTime<Utc>> {
    self.start_time.and_then(from_millis)
  }

  pub fn finished_at(&self) -> Option<DateTime<Utc>> {
    self.finish_time.and_then(from_millis)
  }

  pub fn summary(&self) -> TaskSummary {
    TaskSummary {
      status: self.status().to_string(),
      image_url: self.image_url.clone().unwrap_or_default(),
      fail_reason: self.fail_reason.clone().unwrap_or_default(),
    }
  }
}

/// The three fields callers poll for; absent upstream values become "".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSummary {
  pub status: String,
  pub image_url: String,
  pub fail_reason: String,
}

fn scalar_to_string(value: &Value) -> Option<String> {
  match value {
    Value::String(text) if !text.is_empty() => Some(text.clone()),
    Value::Number(number) => Some(number.to_string()),
    _ => None,
  }
}

/// Accepts a string or a number where proxies disagree on the type.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
  D: Deserializer<'de>,
{
  let value = Option::<Value>::deserialize(deserializer)?;
  Ok(value.as_ref().and_then(scalar_to_string))
}

fn from_millis(millis: i64) -> Option<DateTime<Utc>> {
  Utc.timestamp_millis_opt(millis).single()
}
