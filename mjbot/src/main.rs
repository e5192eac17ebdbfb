// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use anyhow::{bail, Result};
use mjbot::{ApiConfig, Gateway, DEFAULT_CONFIG_PATH};
use serde_json::{json, Value};
use std::{env, path::PathBuf};
use tracing::error;
use tracing_subscriber::EnvFilter;

const CONFIG_PATH_ENV: &str = "MJBOT_CONFIG";
const USAGE: &str = "usage: mjbot <imagine PROMPT.. | status TASK_ID | change TASK_ID ACTION | weather CITY | story [TITLE..]>";

#[derive(Debug, PartialEq)]
enum Command {
  Imagine(String),
  Status(String),
  Change(String, String),
  Weather(String),
  Story(String),
}

impl Command {
  fn parse(args: &[String]) -> Result<Self> {
    let Some((name, rest)) = args.split_first() else {
      bail!(USAGE);
    };

    let command = match (name.as_str(), rest) {
      ("imagine", words) if !words.is_empty() => Command::Imagine(words.join(" ")),
      ("status", [task_id]) => Command::Status(task_id.clone()),
      ("change", [task_id, action]) => Command::Change(task_id.clone(), action.clone()),
      ("weather", [city]) => Command::Weather(city.clone()),
      ("story", words) => Command::Story(words.join(" ")),
      _ => bail!(USAGE),
    };
    Ok(command)
  }

  async fn run(&self, gateway: &Gateway) -> Option<Value> {
    match self {
      Command::Imagine(prompt) => gateway
        .submit_task(prompt)
        .await
        .map(|task_id| json!({ "task_id": task_id })),
      Command::Status(task_id) => gateway
        .query_task_status(task_id)
        .await
        .and_then(|summary| serde_json::to_value(summary).ok()),
      Command::Change(task_id, action) => gateway
        .update_task(task_id, action)
        .await
        .map(|task_id| json!({ "task_id": task_id })),
      Command::Weather(city) => gateway.query_weather(city).await.map(Value::Object),
      Command::Story(title) => gateway.query_story(title).await.map(Value::Object),
    }
  }
}

#[cfg(debug_assertions)]
fn setup_logging() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .with_file(true)
    .with_line_number(true)
    .with_thread_ids(true)
    .init();
}

#[cfg(not(debug_assertions))]
fn setup_logging() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .init();
}

#[tokio::main]
async fn main() -> Result<()> {
  setup_logging();

  let config_path = env::var(CONFIG_PATH_ENV)
    .map(PathBuf::from)
    .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

  let config = match ApiConfig::from_file(&config_path) {
    Ok(config) => config,
    Err(e) => {
      error!("Failed to load {}: {}", config_path.display(), e);
      std::process::exit(1);
    }
  };

  let args: Vec<String> = env::args().skip(1).collect();
  let command = Command::parse(&args)?;
  let gateway = Gateway::new(config)?;

  match command.run(&gateway).await {
    Some(output) => println!("{}", serde_json::to_string_pretty(&output)?),
    None => {
      error!("Command {:?} failed", command);
      std::process::exit(1);
    }
  }

  Ok(())
}
