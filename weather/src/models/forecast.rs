// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use crate::{
  constants::{DAILY_KEY, EMPTY_UV_INDEX, EMPTY_VALUE, EMPTY_VALUE_F, HOURLY_KEY},
  extract::{extract, get_optional, get_value},
  lookup::{Resolver, NOTHING},
  utils::time::{day_of_week, parse_date, parse_datetime},
};
use chrono::DateTime;
use chrono_tz::Tz;
use config::Language;
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Forecast {
  pub days: Vec<Daily>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Daily {
  pub language: Language,
  pub date: Option<DateTime<Tz>>,
  pub lid: String,
  pub weather_code: Option<u32>,
  pub minimum_temperature: Option<i32>,
  pub maximum_temperature: Option<i32>,
  pub maximum_uvi: Option<i32>,
  pub u_v_i_factor: Option<f64>,
  pub description: String,
  pub hours: Vec<Hourly>,

  pub day: String,
  pub location: String,
  pub weather: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hourly {
  pub language: Language,
  pub hour: String,
  pub forecast_time: Option<DateTime<Tz>>,
  pub created: Option<DateTime<Tz>>,
  pub weather_code: Option<u32>,
  pub temperature: Option<i32>,
  pub precise_temperature: Option<f64>,
  pub heat_stress: Option<f64>,
  pub heat_stress_level: Option<i32>,
  pub pm10: Option<i32>,
  pub relative_humidity: Option<i32>,
  pub rain: Option<f64>,
  pub rain_chance: Option<i32>,
  pub wind_speed: Option<i32>,
  pub gust_speed: Option<i32>,
  pub wind_direction_id: Option<u32>,
  pub wave_height: Option<f64>,
  pub wind_chill: Option<i32>,
  pub u_v_index: Option<i32>,
  pub u_v_i_max: Option<i32>,

  pub weather: String,
  pub wind_direction: i32,
}

impl Forecast {
  /// Builds one `Daily` per date key of the forecast payload, in payload order.
  pub fn build(language: Language, data: &Value, resolver: &Resolver) -> Self {
    let days = data
      .as_object()
      .map(|days| {
        days
          .iter()
          .map(|(date, day)| Daily::build(language, date, day, resolver))
          .collect()
      })
      .unwrap_or_default();

    Self { days }
  }
}

impl Daily {
  pub fn build(language: Language, date_key: &str, data: &Value, resolver: &Resolver) -> Self {
    let date = parse_date(date_key);
    let lid: String = get_value(data, DAILY_KEY, Some("lid"), "0".to_string(), None);
    let weather_code = get_optional(data, DAILY_KEY, Some("weather_code"), None);
    let hourly = extract::<Map<String, Value>>(data, HOURLY_KEY, None).unwrap_or_default();
    let description: String = get_value(data, "country", Some("description"), String::new(), None);

    Self {
      language,
      minimum_temperature: get_optional(data, DAILY_KEY, Some("minimum_temperature"), None),
      maximum_temperature: get_optional(data, DAILY_KEY, Some("maximum_temperature"), None),
      maximum_uvi: get_optional(data, DAILY_KEY, Some("maximum_uvi"), None),
      u_v_i_factor: get_optional(data, DAILY_KEY, Some("u_v_i_factor"), None),
      description: description.trim_end().to_string(),
      hours: Hourly::build_all(language, &Value::Object(hourly), resolver),

      day: date
        .as_ref()
        .map(|date| day_of_week(language, date))
        .unwrap_or_else(|| NOTHING.to_string()),
      location: resolver.location_name(&lid),
      weather: resolver.weather_description(weather_code),
      date,
      lid,
      weather_code,
    }
  }
}

impl Hourly {
  pub fn build_all(language: Language, hourly: &Value, resolver: &Resolver) -> Vec<Self> {
    hourly
      .as_object()
      .map(|hours| {
        hours
          .keys()
          .map(|hour| Hourly::build(language, hour, hourly, resolver))
          .collect()
      })
      .unwrap_or_default()
  }

  /// `hourly` is the whole hour map of a day; `hour` selects the entry.
  pub fn build(language: Language, hour: &str, hourly: &Value, resolver: &Resolver) -> Self {
    let field = |name: &str| -> Option<String> { get_optional(hourly, hour, Some(name), None) };
    let weather_code = get_optional(hourly, hour, Some("weather_code"), None);
    let wind_direction_id = get_optional(hourly, hour, Some("wind_direction_id"), None);

    Self {
      language,
      hour: hour.to_string(),
      forecast_time: field("forecast_time").as_deref().and_then(parse_datetime),
      created: field("created").as_deref().and_then(parse_datetime),
      weather_code,
      temperature: get_optional(hourly, hour, Some("temperature"), None),
      precise_temperature: get_optional(hourly, hour, Some("precise_temperature"), None),
      heat_stress: get_optional(hourly, hour, Some("heat_stress"), None),
      heat_stress_level: get_optional(hourly, hour, Some("heat_stress_level"), None),
      pm10: get_optional(hourly, hour, Some("pm10"), None),
      relative_humidity: get_optional(hourly, hour, Some("relative_humidity"), None),
      rain: get_optional(hourly, hour, Some("rain"), Some(EMPTY_VALUE_F)),
      rain_chance: get_optional(hourly, hour, Some("rain_chance"), None),
      wind_speed: get_optional(hourly, hour, Some("wind_speed"), None),
      gust_speed: get_optional(hourly, hour, Some("gust_speed"), Some(EMPTY_VALUE)),
      wind_direction_id,
      wave_height: get_optional(hourly, hour, Some("wave_height"), None),
      wind_chill: get_optional(hourly, hour, Some("wind_chill"), None),
      u_v_index: get_optional(hourly, hour, Some("u_v_index"), Some(EMPTY_UV_INDEX)),
      u_v_i_max: get_optional(hourly, hour, Some("u_v_i_max"), None),

      weather: resolver.weather_description(weather_code),
      wind_direction: resolver.wind_direction(wind_direction_id),
    }
  }
}
