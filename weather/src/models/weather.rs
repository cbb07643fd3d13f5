// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use crate::{
  constants::{EMPTY_VALUE, EMPTY_VALUE_F},
  extract::{get_optional, get_value},
  lookup::Resolver,
  utils::time::parse_datetime,
};
use chrono::DateTime;
use chrono_tz::Tz;
use config::Language;
use serde::Serialize;
use serde_json::Value;

/// Current conditions at a location, from the "now analysis" endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Weather {
  pub language: Language,
  pub lid: String,
  pub humidity: i32,
  pub rain: f64,
  pub rain_chance: i32,
  pub temperature: f64,
  pub dew_point_temp: i32,
  pub wind_speed: i32,
  pub wind_chill: i32,
  pub wind_direction_id: u32,
  pub feels_like: f64,
  pub heat_stress_level: i32,
  pub u_v_index: i32,
  pub u_v_level: Option<String>,
  pub u_v_i_max: Option<i32>,
  pub u_v_i_factor: Option<f64>,
  pub wave_height: f64,
  pub max_temp: Option<i32>,
  pub min_temp: Option<i32>,
  pub pm10: i32,
  pub weather_code: Option<u32>,
  pub gust_speed: Option<i32>,
  pub forecast_time: Option<DateTime<Tz>>,
  pub modified_at: Option<DateTime<Tz>>,
  pub json: Value,

  pub location: String,
  pub description: String,
  pub wind_direction: i32,
}

impl Weather {
  pub fn build(language: Language, data: &Value, resolver: &Resolver) -> Self {
    let field = |key: &str| -> Option<String> { get_optional(data, key, None, None) };

    let lid = field("lid").unwrap_or_default();
    let weather_code = get_optional(data, "weather_code", None, None);
    let wind_direction_id = get_value(data, "wind_direction_id", None, 0, None);

    Self {
      language,
      humidity: get_value(data, "relative_humidity", None, 0, None),
      rain: get_value(data, "rain", None, 0.0, Some(EMPTY_VALUE_F)),
      rain_chance: get_value(data, "rain_chance", None, 0, None),
      temperature: get_value(data, "temperature", None, 0.0, None),
      // The service spells it this way.
      dew_point_temp: get_value(data, "due_point_Temp", None, 0, None),
      wind_speed: get_value(data, "wind_speed", None, 0, None),
      wind_chill: get_value(data, "wind_chill", None, 0, None),
      wind_direction_id,
      feels_like: get_value(data, "feels_like", None, 0.0, None),
      heat_stress_level: get_value(data, "heat_stress_level", None, 0, None),
      u_v_index: get_value(data, "u_v_index", None, 0, None),
      u_v_level: field("u_v_level"),
      u_v_i_max: get_optional(data, "u_v_i_max", None, None),
      u_v_i_factor: get_optional(data, "u_v_i_factor", None, None),
      wave_height: get_value(data, "wave_height", None, 0.0, None),
      max_temp: get_optional(data, "max_temp", None, None),
      min_temp: get_optional(data, "min_temp", None, None),
      pm10: get_value(data, "pm10", None, 0, None),
      weather_code,
      gust_speed: get_optional(data, "gust_speed", None, Some(EMPTY_VALUE)),
      forecast_time: field("forecast_time").as_deref().and_then(parse_datetime),
      modified_at: field("modified").as_deref().and_then(parse_datetime),
      json: data.clone(),

      location: resolver.location_name(&lid),
      description: resolver.weather_description(weather_code),
      wind_direction: resolver.wind_direction(Some(wind_direction_id)),
      lid,
    }
  }
}
