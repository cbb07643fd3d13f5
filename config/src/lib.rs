// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
mod config;

pub use crate::config::{AnimationConfig, Config, Language};

pub const DEFAULT_BASE_URL: &str = "https://ims.gov.il";
pub const DEFAULT_CACHE_EXPIRATION_SECS: u64 = 30;
pub const DEFAULT_LOOKUP_RETRY_SECS: u64 = 60;
pub const DEFAULT_FRAME_DELAY_MS: u32 = 100;
