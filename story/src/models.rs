// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize, Clone)]
pub struct StoryResponse {
  pub code: i64,
  #[serde(default)]
  pub msg: Option<String>,
  #[serde(default)]
  pub data: Option<Map<String, Value>>,
}
