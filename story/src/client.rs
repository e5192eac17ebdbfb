// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use crate::{models::StoryResponse, STORY_SUCCESS_CODE, TITLE_PARAM};
use async_trait::async_trait;
use base::{app_code_headers, transport::decode, with_query_param, ApiConfig, Error, HttpTransport};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{info, instrument};

#[async_trait]
pub trait StoryProvider: Send + Sync {
  async fn fetch_story(&self, title: &str) -> Result<Map<String, Value>, Error>;
}

#[derive(Debug, Clone)]
pub struct StoryClient {
  config: Arc<ApiConfig>,
  transport: HttpTransport,
}

impl StoryClient {
  pub fn new(config: Arc<ApiConfig>, transport: HttpTransport) -> Self {
    Self { config, transport }
  }
}

#[async_trait]
impl StoryProvider for StoryClient {
  #[instrument(skip(self))]
  async fn fetch_story(&self, title: &str) -> Result<Map<String, Value>, Error> {
    let url = with_query_param(self.config.story_url()?, TITLE_PARAM, title.trim());
    let headers = app_code_headers(self.config.story_app_code())?;

    let body = self.transport.get(url, Some(headers)).await?;
    info!("Story {} returned {}", title, body);

    let response: StoryResponse = decode(&body)?;
    if response.code != STORY_SUCCESS_CODE {
      return Err(Error::UpstreamRejected {
        code: response.code,
        msg: response.msg.unwrap_or_default(),
      });
    }

    Ok(response.data.unwrap_or_default())
  }
}
