// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use crate::{
  constants::{CITY_PARAM, WEATHER_SUCCESS_STATUS},
  models::WeatherResponse,
};
use async_trait::async_trait;
use base::{app_code_headers, transport::decode, with_query_param, ApiConfig, Error, HttpTransport};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{info, instrument};
use url::Url;

#[async_trait]
pub trait WeatherProvider: Send + Sync {
  async fn fetch_weather(&self, city: &str) -> Result<Map<String, Value>, Error>;
}

#[derive(Debug, Clone)]
pub struct WeatherService {
  config: Arc<ApiConfig>,
  transport: HttpTransport,
}

impl WeatherService {
  pub fn new(config: Arc<ApiConfig>, transport: HttpTransport) -> Self {
    Self { config, transport }
  }

  fn build_api_url(&self, city: &str) -> Result<Url, Error> {
    Ok(with_query_param(self.config.weather_url()?, CITY_PARAM, city))
  }
}

#[async_trait]
impl WeatherProvider for WeatherService {
  #[instrument(skip(self))]
  async fn fetch_weather(&self, city: &str) -> Result<Map<String, Value>, Error> {
    let city = city.trim();
    if city.is_empty() {
      return Err(Error::InvalidInput("City name cannot be empty".into()));
    }

    let url = self.build_api_url(city)?;
    let headers = app_code_headers(self.config.weather_app_code())?;
    let body = self.transport.get(url, Some(headers)).await?;
    info!("Weather for {} returned {}", city, body);

    let response: WeatherResponse = decode(&body)?;
    if response.status != WEATHER_SUCCESS_STATUS {
      return Err(Error::UpstreamRejected {
        code: response.status,
        msg: response.msg.unwrap_or_default(),
      });
    }

    Ok(response.result.unwrap_or_default())
  }
}
