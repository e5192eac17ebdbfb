// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use crate::{
  constants::SUBMIT_SUCCESS_CODE,
  models::{ChangeRequest, SubmitRequest, SubmitResponse, TaskSnapshot},
};
use async_trait::async_trait;
use base::{transport::decode, ApiConfig, Error, HttpTransport};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

#[async_trait]
pub trait TaskApi: Send + Sync {
  async fn submit(&self, prompt: &str) -> Result<String, Error>;
  async fn fetch(&self, task_id: &str) -> Result<TaskSnapshot, Error>;
  async fn change(&self, task_id: &str, action: &str) -> Result<String, Error>;
}

#[derive(Debug, Clone)]
pub struct MidjourneyClient {
  config: Arc<ApiConfig>,
  transport: HttpTransport,
}

impl MidjourneyClient {
  pub fn new(config: Arc<ApiConfig>, transport: HttpTransport) -> Self {
    Self { config, transport }
  }

  fn accept_submission(body: &str) -> Result<String, Error> {
    let response: SubmitResponse = decode(body)?;

    if response.code != SUBMIT_SUCCESS_CODE {
      return Err(Error::UpstreamRejected {
        code: response.code,
        msg: response.description.unwrap_or_default(),
      });
    }

    response
      .task_id()
      .ok_or_else(|| Error::ParseError("Submission accepted without a task id".into()))
  }
}

fn require(value: &str, what: &str) -> Result<(), Error> {
  if value.trim().is_empty() {
    return Err(Error::InvalidInput(format!("{} cannot be empty", what)));
  }
  Ok(())
}

#[async_trait]
impl TaskApi for MidjourneyClient {
  #[instrument(skip(self))]
  async fn submit(&self, prompt: &str) -> Result<String, Error> {
    require(prompt, "Prompt")?;
    let url = self.config.create_url()?;

    let body = self
      .transport
      .post_json(url, &SubmitRequest { prompt })
      .await?;

    let task_id = Self::accept_submission(&body)?;
    debug!("Task {} submitted", task_id);
    Ok(task_id)
  }

  #[instrument(skip(self))]
  async fn fetch(&self, task_id: &str) -> Result<TaskSnapshot, Error> {
    require(task_id, "Task id")?;
    let url = self.config.task_url(task_id)?;

    let body = self.transport.get(url, None).await?;
    info!("Task {} returned {}", task_id, body);

    let snapshot: TaskSnapshot = decode(&body)?;
    if snapshot.is_failure() {
      warn!(
        "Task {} failed upstream: {}",
        task_id,
        snapshot.fail_reason.as_deref().unwrap_or("unknown reason")
      );
    }

    Ok(snapshot)
  }

  #[instrument(skip(self))]
  async fn change(&self, task_id: &str, action: &str) -> Result<String, Error> {
    require(task_id, "Task id")?;
    require(action, "Action")?;
    let url = self.config.change_url()?;
    debug!("Requesting {} on task {} via {}", action, task_id, url);

    let request = ChangeRequest {
      content: format!("{} {}", task_id, action),
    };
    let body = self.transport.post_json(url, &request).await?;

    Self::accept_submission(&body)
  }
}
