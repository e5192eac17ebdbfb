// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
pub mod models;
pub mod service;

pub use models::WeatherResponse;
pub use service::{WeatherProvider, WeatherService};

pub mod constants {
  /// Envelope `status` the weather service reports on success.
  pub const WEATHER_SUCCESS_STATUS: i64 = 0;
  pub(crate) const CITY_PARAM: &str = "city";
}
