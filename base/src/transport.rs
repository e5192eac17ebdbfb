// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use crate::Error;
use reqwest::{
  header::{HeaderMap, HeaderValue, AUTHORIZATION},
  Client, Response, StatusCode,
};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
pub const API_SECRET_HEADER: &str = "mj-api-secret";

/// GET/POST helpers shared by every upstream client.
///
/// Requests without explicit headers carry the image-service secret.
#[derive(Debug, Clone)]
pub struct HttpTransport {
  client: Client,
  api_key: String,
}

impl HttpTransport {
  pub fn new(api_key: impl Into<String>) -> Result<Self, Error> {
    Self::build(api_key.into(), REQUEST_TIMEOUT)
  }

  #[cfg(test)]
  pub(crate) fn with_timeout(api_key: &str, timeout: Duration) -> Result<Self, Error> {
    Self::build(api_key.to_string(), timeout)
  }

  fn build(api_key: String, timeout: Duration) -> Result<Self, Error> {
    let client = Client::builder()
      .timeout(timeout)
      .build()
      .map_err(Error::HttpError)?;

    Ok(Self { client, api_key })
  }

  fn secret_headers(&self) -> Result<HeaderMap, Error> {
    let mut headers = HeaderMap::new();
    headers.insert(
      API_SECRET_HEADER,
      HeaderValue::from_str(&self.api_key)
        .map_err(|e| Error::ConfigError(format!("Invalid API key: {}", e)))?,
    );
    Ok(headers)
  }

  #[instrument(skip(self, url, headers), fields(url = %url))]
  pub async fn get(&self, url: Url, headers: Option<HeaderMap>) -> Result<String, Error> {
    let headers = match headers {
      Some(headers) => headers,
      None => self.secret_headers()?,
    };

    let response = self
      .client
      .get(url)
      .headers(headers)
      .send()
      .await
      .map_err(map_send_error)?;

    read_body(response).await
  }

  #[instrument(skip(self, url, body), fields(url = %url))]
  pub async fn post_json<T: Serialize + ?Sized>(
    &self,
    url: Url,
    body: &T,
  ) -> Result<String, Error> {
    let response = self
      .client
      .post(url)
      .headers(self.secret_headers()?)
      .json(body)
      .send()
      .await
      .map_err(map_send_error)?;

    read_body(response).await
  }
}

/// `Authorization: APPCODE <code>` as used by the weather and story services.
pub fn app_code_headers(app_code: &str) -> Result<HeaderMap, Error> {
  let mut headers = HeaderMap::new();
  headers.insert(
    AUTHORIZATION,
    HeaderValue::from_str(&format!("APPCODE {}", app_code))
      .map_err(|e| Error::ConfigError(format!("Invalid AppCode: {}", e)))?,
  );
  Ok(headers)
}

/// Sets `key` on the URL, replacing any value already present.
pub fn with_query_param(mut url: Url, key: &str, value: &str) -> Url {
  let retained: Vec<(String, String)> = url
    .query_pairs()
    .filter(|(k, _)| k != key)
    .map(|(k, v)| (k.into_owned(), v.into_owned()))
    .collect();

  url
    .query_pairs_mut()
    .clear()
    .extend_pairs(retained)
    .append_pair(key, value);
  url
}

pub fn decode<T: DeserializeOwned>(body: &str) -> Result<T, Error> {
  serde_json::from_str(body).map_err(|e| Error::ParseError(e.to_string()))
}

fn map_send_error(e: reqwest::Error) -> Error {
  if e.is_timeout() {
    Error::TimeoutError
  } else {
    Error::HttpError(e)
  }
}

async fn read_body(response: Response) -> Result<String, Error> {
  let status = response.status();
  let body = response.text().await.map_err(map_send_error)?;
  debug!("Response {} -> {}", status, body);

  match status {
    StatusCode::TOO_MANY_REQUESTS => Err(Error::RateLimitExceeded),
    status if !status.is_success() => Err(Error::ApiError(format!(
      "API request failed with status: {}: {}",
      status,
      body.trim()
    ))),
    _ => Ok(body),
  }
}
