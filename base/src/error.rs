// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum Error {
  #[error("API error: {0}")]
  ApiError(String),
  #[error("Configuration error: {0}")]
  ConfigError(String),
  #[error("IO error: {0}")]
  IoError(#[from] std::io::Error),
  #[error("YAML error: {0}")]
  YamlError(#[from] serde_yaml::Error),
  #[error("HTTP error: {0}")]
  HttpError(#[from] reqwest::Error),
  #[error("Failed to parse response: {0}")]
  ParseError(String),
  #[error("Invalid URL: {0}")]
  InvalidUrl(#[from] url::ParseError),
  #[error("Invalid input: {0}")]
  InvalidInput(String),
  #[error("Upstream rejected request (code {code}): {msg}")]
  UpstreamRejected { code: i64, msg: String },
  #[error("Rate limit exceeded")]
  RateLimitExceeded,
  #[error("Timeout error")]
  TimeoutError,
}
