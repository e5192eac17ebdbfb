// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use crate::Error;
use serde::Deserialize;
use std::{fs, path::Path};
use tracing::{debug, instrument};
use url::Url;

pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Endpoints and credentials for every upstream service.
///
/// Loaded once at startup and never mutated afterwards; share it by cloning
/// or behind an `Arc`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
  pub api_url: String,
  pub api_key: String,
  #[serde(default)]
  pub check_url: String,
  pub tianqi_api: String,
  #[serde(rename = "tianqi_appCode")]
  pub tianqi_app_code: String,
  pub story_api: String,
  #[serde(rename = "story_appCode", default)]
  pub story_app_code: Option<String>,
}

impl ApiConfig {
  #[instrument(skip(path))]
  pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
    let content = fs::read_to_string(path.as_ref())?;
    let config = Self::from_yaml(&content)?;
    debug!("Loaded configuration successfully");
    Ok(config)
  }

  pub fn from_yaml(content: &str) -> Result<Self, Error> {
    let config: Self = serde_yaml::from_str(content)?;
    config.validate()?;
    Ok(config)
  }

  pub fn validate(&self) -> Result<(), Error> {
    if self.api_key.trim().is_empty() {
      return Err(Error::ConfigError("api_key cannot be empty".into()));
    }

    for (key, value) in [
      ("api_url", &self.api_url),
      ("tianqi_api", &self.tianqi_api),
      ("story_api", &self.story_api),
    ] {
      Url::parse(value)
        .map_err(|e| Error::ConfigError(format!("{} is not a valid URL ({}): {}", key, value, e)))?;
    }

    Ok(())
  }

  pub fn create_url(&self) -> Result<Url, Error> {
    self.api_endpoint(&["submit", "imagine"])
  }

  pub fn task_url(&self, task_id: &str) -> Result<Url, Error> {
    self.api_endpoint(&["task", task_id, "fetch"])
  }

  pub fn change_url(&self) -> Result<Url, Error> {
    self.api_endpoint(&["submit", "simple-change"])
  }

  pub fn weather_url(&self) -> Result<Url, Error> {
    Ok(Url::parse(&self.tianqi_api)?)
  }

  pub fn story_url(&self) -> Result<Url, Error> {
    Ok(Url::parse(&self.story_api)?)
  }

  pub fn weather_app_code(&self) -> &str {
    &self.tianqi_app_code
  }

  /// Falls back to the weather AppCode when no story-specific one is set.
  pub fn story_app_code(&self) -> &str {
    self
      .story_app_code
      .as_deref()
      .filter(|code| !code.trim().is_empty())
      .unwrap_or(&self.tianqi_app_code)
  }

  fn api_endpoint(&self, segments: &[&str]) -> Result<Url, Error> {
    let mut url = Url::parse(&self.api_url)?;
    url
      .path_segments_mut()
      .map_err(|_| Error::ConfigError(format!("api_url cannot be a base URL: {}", self.api_url)))?
      .pop_if_empty()
      .extend(segments);
    Ok(url)
  }
}
