// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
pub mod client;
pub mod models;

pub use client::{MidjourneyClient, TaskApi};
pub use models::{TaskSnapshot, TaskSummary};

pub mod constants {
  /// Envelope `code` of an accepted submit or change request.
  pub const SUBMIT_SUCCESS_CODE: i64 = 1;
  pub const STATUS_SUCCESS: &str = "SUCCESS";
  pub const STATUS_FAILURE: &str = "FAILURE";
}
