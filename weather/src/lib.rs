// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
pub mod cache;
pub mod extract;
pub mod fallback;
pub mod fetch;
pub mod lookup;
pub mod models;
pub mod service;
mod utils;

#[cfg(test)]
pub(crate) mod testing;

pub use cache::CachedResource;
pub use fetch::{Fetcher, HttpFetcher};
pub use lookup::{Lookups, Resolver};
pub use models::{Daily, Forecast, Hourly, Warning, Weather};
pub use service::{WeatherProvider, WeatherService};

use config::Language;

pub mod constants {
  use chrono_tz::Tz;

  pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
  pub const DATE_FORMAT: &str = "%Y-%m-%d";
  pub const TIMEZONE: Tz = chrono_tz::Asia::Jerusalem;

  pub const NOW_ANALYSIS_PATH: &str = "now_analysis";
  pub const FORECAST_PATH: &str = "full_forecast_data";
  pub const RADAR_PATH: &str = "radar_satellite";
  pub const WARNINGS_PATH: &str = "warnings";
  pub const WEATHER_CODES_PATH: &str = "weather_codes";
  pub const LOCATIONS_PATH: &str = "locations_info";
  pub const WIND_DIRECTIONS_PATH: &str = "wind_directions";
  pub const REGIONS_PATH: &str = "regions";
  pub const WARNINGS_METADATA_PATH: &str = "warnings_metadata";

  pub(crate) const DAILY_KEY: &str = "daily";
  pub(crate) const HOURLY_KEY: &str = "hourly";

  /// "No data" markers used by the service.
  pub(crate) const EMPTY_VALUE: i32 = -999;
  pub(crate) const EMPTY_VALUE_F: f64 = -999.0;
  pub(crate) const EMPTY_UV_INDEX: i32 = -8991;
}

/// `{base}/{language}/{path}`, tolerating a trailing slash on the base.
pub fn endpoint(base: &str, language: Language, path: &str) -> String {
  format!("{}/{}/{}", base.trim_end_matches('/'), language, path)
}
