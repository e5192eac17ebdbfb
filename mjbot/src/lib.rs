// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use base::{Error, HttpTransport};
use midjourney::{MidjourneyClient, TaskApi};
use serde_json::{Map, Value};
use std::sync::Arc;
use story::{StoryClient, StoryProvider};
use tracing::{error, instrument, warn};
use weather::{WeatherProvider, WeatherService};

pub use base::{ApiConfig, DEFAULT_CONFIG_PATH, REQUEST_TIMEOUT};
pub use midjourney::{TaskSnapshot, TaskSummary};

/// Single entry point for every upstream call.
///
/// Each operation performs one round trip and reports failure as `None`;
/// the reason only reaches the log.
pub struct Gateway {
  tasks: Box<dyn TaskApi>,
  weather: Box<dyn WeatherProvider>,
  story: Box<dyn StoryProvider>,
}

impl Gateway {
  pub fn new(config: ApiConfig) -> Result<Self, Error> {
    let transport = HttpTransport::new(config.api_key.clone())?;
    let config = Arc::new(config);

    Ok(Self::with_providers(
      Box::new(MidjourneyClient::new(config.clone(), transport.clone())),
      Box::new(WeatherService::new(config.clone(), transport.clone())),
      Box::new(StoryClient::new(config, transport)),
    ))
  }

  pub fn with_providers(
    tasks: Box<dyn TaskApi>,
    weather: Box<dyn WeatherProvider>,
    story: Box<dyn StoryProvider>,
  ) -> Self {
    Self {
      tasks,
      weather,
      story,
    }
  }

  #[instrument(skip(self))]
  pub async fn submit_task(&self, prompt: &str) -> Option<String> {
    settle("submit task", self.tasks.submit(prompt).await)
  }

  /// An upstream `FAILURE` is returned as data, not as `None`.
  #[instrument(skip(self))]
  pub async fn query_task_status(&self, task_id: &str) -> Option<TaskSummary> {
    let result = self.tasks.fetch(task_id).await;
    settle("query task status", result).map(|snapshot| snapshot.summary())
  }

  #[instrument(skip(self))]
  pub async fn update_task(&self, task_id: &str, action: &str) -> Option<String> {
    settle("update task", self.tasks.change(task_id, action).await)
  }

  #[instrument(skip(self))]
  pub async fn query_weather(&self, city: &str) -> Option<Map<String, Value>> {
    settle("query weather", self.weather.fetch_weather(city).await)
  }

  #[instrument(skip(self))]
  pub async fn query_story(&self, title: &str) -> Option<Map<String, Value>> {
    settle("query story", self.story.fetch_story(title).await)
  }
}

fn settle<T>(operation: &str, result: Result<T, Error>) -> Option<T> {
  match result {
    Ok(value) => Some(value),
    Err(e @ (Error::UpstreamRejected { .. } | Error::InvalidInput(_))) => {
      warn!("Failed to {}: {}", operation, e);
      None
    }
    Err(e) => {
      error!("Failed to {}: {}", operation, e);
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use async_trait::async_trait;
  use serde_json::json;
  use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
  };

  fn config(base: &str) -> ApiConfig {
    ApiConfig {
      api_url: base.to_string(),
      api_key: "secret".into(),
      check_url: String::new(),
      tianqi_api: format!("{}/weather", base),
      tianqi_app_code: "weather-code".into(),
      story_api: format!("{}/story", base),
      story_app_code: Some("story-code".into()),
    }
  }

  async fn respond(server: &MockServer, verb: &str, route: &str, body: Value) {
    Mock::given(method(verb))
      .and(path(route))
      .respond_with(ResponseTemplate::new(200).set_body_json(body))
      .mount(server)
      .await;
  }

  #[tokio::test]
  async fn submit_task_success_and_rejection() {
    let server = MockServer::start().await;
    respond(
      &server,
      "POST",
      "/submit/imagine",
      json!({
        "code": 1,
        "result": "T123",
        "description": "Submitted",
        "properties": {},
        "time": 0
      }),
    )
    .await;
    let gateway = Gateway::new(config(&server.uri())).unwrap();
    assert_eq!(gateway.submit_task("a cat").await.as_deref(), Some("T123"));

    let server = MockServer::start().await;
    respond(&server, "POST", "/submit/imagine", json!({ "code": 0, "description": "busy" })).await;
    let gateway = Gateway::new(config(&server.uri())).unwrap();
    assert_eq!(gateway.submit_task("a cat").await, None);
  }

  #[tokio::test]
  async fn task_status_summary() {
    let server = MockServer::start().await;
    respond(
      &server,
      "GET",
      "/task/T123/fetch",
      json!({ "id": "T123", "status": "SUCCESS", "imageUrl": "http://x", "progress": "100%" }),
    )
    .await;

    let gateway = Gateway::new(config(&server.uri())).unwrap();
    let summary = gateway.query_task_status("T123").await.unwrap();
    assert_eq!(
      serde_json::to_value(summary).unwrap(),
      json!({ "status": "SUCCESS", "image_url": "http://x", "fail_reason": "" })
    );
  }

  #[tokio::test]
  async fn update_task_returns_new_id() {
    let server = MockServer::start().await;
    respond(&server, "POST", "/submit/simple-change", json!({ "code": 1, "result": "T124" })).await;

    let gateway = Gateway::new(config(&server.uri())).unwrap();
    assert_eq!(gateway.update_task("T123", "U1").await.as_deref(), Some("T124"));
  }

  #[tokio::test]
  async fn weather_sentinel_is_zero() {
    let server = MockServer::start().await;
    respond(&server, "GET", "/weather", json!({ "status": 0, "result": { "temp": "20C" } })).await;
    let gateway = Gateway::new(config(&server.uri())).unwrap();
    let weather = gateway.query_weather("Hangzhou").await.unwrap();
    assert_eq!(Value::Object(weather), json!({ "temp": "20C" }));

    let server = MockServer::start().await;
    respond(&server, "GET", "/weather", json!({ "status": 1, "msg": "bad city" })).await;
    let gateway = Gateway::new(config(&server.uri())).unwrap();
    assert_eq!(gateway.query_weather("Hangzhou").await, None);
  }

  #[tokio::test]
  async fn story_sentinel_is_one() {
    let server = MockServer::start().await;
    respond(&server, "GET", "/story", json!({ "code": 1, "data": { "title": "X" } })).await;
    let gateway = Gateway::new(config(&server.uri())).unwrap();
    let story = gateway.query_story("X").await.unwrap();
    assert_eq!(Value::Object(story), json!({ "title": "X" }));
  }

  #[tokio::test]
  async fn unreachable_upstream_yields_none() {
    let addr = {
      let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
      listener.local_addr().unwrap()
    };
    let gateway = Gateway::new(config(&format!("http://{}", addr))).unwrap();

    assert_eq!(gateway.submit_task("a cat").await, None);
    assert_eq!(gateway.query_task_status("T1").await, None);
    assert_eq!(gateway.update_task("T1", "V2").await, None);
    assert_eq!(gateway.query_weather("Hangzhou").await, None);
    assert_eq!(gateway.query_story("X").await, None);
  }

  #[tokio::test]
  async fn malformed_json_yields_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
      .mount(&server)
      .await;
    Mock::given(method("POST"))
      .respond_with(ResponseTemplate::new(200).set_body_string("{\"code\":"))
      .mount(&server)
      .await;

    let gateway = Gateway::new(config(&server.uri())).unwrap();
    assert_eq!(gateway.submit_task("a cat").await, None);
    assert_eq!(gateway.query_task_status("T1").await, None);
    assert_eq!(gateway.update_task("T1", "V2").await, None);
    assert_eq!(gateway.query_weather("Hangzhou").await, None);
    assert_eq!(gateway.query_story("X").await, None);
  }

  struct FailedTask;

  #[async_trait]
  impl TaskApi for FailedTask {
    async fn submit(&self, _prompt: &str) -> Result<String, Error> {
      Err(Error::TimeoutError)
    }

    async fn fetch(&self, task_id: &str) -> Result<TaskSnapshot, Error> {
      Ok(TaskSnapshot {
        id: Some(task_id.to_string()),
        status: Some("FAILURE".into()),
        fail_reason: Some("banned prompt".into()),
        ..Default::default()
      })
    }

    async fn change(&self, _task_id: &str, _action: &str) -> Result<String, Error> {
      Err(Error::RateLimitExceeded)
    }
  }

  #[tokio::test]
  async fn failure_status_is_surfaced_as_data() {
    let config = Arc::new(config("http://127.0.0.1:9"));
    let transport = HttpTransport::new("secret").unwrap();
    let gateway = Gateway::with_providers(
      Box::new(FailedTask),
      Box::new(WeatherService::new(config.clone(), transport.clone())),
      Box::new(StoryClient::new(config, transport)),
    );

    let summary = gateway.query_task_status("T1").await.unwrap();
    assert_eq!(summary.status, "FAILURE");
    assert_eq!(summary.fail_reason, "banned prompt");
    assert_eq!(summary.image_url, "");
    assert_eq!(gateway.submit_task("a cat").await, None);
    assert_eq!(gateway.update_task("T1", "U1").await, None);
  }
}
