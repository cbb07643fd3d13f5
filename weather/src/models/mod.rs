// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
pub mod forecast;
pub mod warning;
pub mod weather;

pub use forecast::{Daily, Forecast, Hourly};
pub use warning::Warning;
pub use weather::Weather;
