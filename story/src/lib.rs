// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
mod client;
mod models;

pub use client::{StoryClient, StoryProvider};
pub use models::StoryResponse;

/// Envelope `code` the story service reports on success.
pub const STORY_SUCCESS_CODE: i64 = 1;
pub(crate) const TITLE_PARAM: &str = "title";
