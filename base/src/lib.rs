// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
pub mod config;
pub mod error;
pub mod transport;

pub use config::{ApiConfig, DEFAULT_CONFIG_PATH};
pub use error::Error;
pub use transport::{
  app_code_headers, with_query_param, HttpTransport, API_SECRET_HEADER, REQUEST_TIMEOUT,
};
