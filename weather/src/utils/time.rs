// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use crate::constants::{DATETIME_FORMAT, DATE_FORMAT, TIMEZONE};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone, Weekday};
use chrono_tz::Tz;
use config::Language;
use tracing::debug;

/// Interprets a wall-clock time as Israel local time. Times skipped by a DST
/// transition have no local meaning and yield `None`.
pub fn localize(naive: NaiveDateTime) -> Option<DateTime<Tz>> {
  TIMEZONE.from_local_datetime(&naive).earliest()
}

pub fn parse_datetime(value: &str) -> Option<DateTime<Tz>> {
  NaiveDateTime::parse_from_str(value.trim(), DATETIME_FORMAT)
    .map_err(|e| debug!("Failed to parse datetime '{}': {}", value, e))
    .ok()
    .and_then(localize)
}

pub fn parse_date(value: &str) -> Option<DateTime<Tz>> {
  NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
    .map_err(|e| debug!("Failed to parse date '{}': {}", value, e))
    .ok()
    .and_then(|date| date.and_hms_opt(0, 0, 0))
    .and_then(localize)
}

pub fn day_of_week(language: Language, date: &DateTime<Tz>) -> String {
  let weekday = date.weekday();
  match language {
    Language::En => english_weekday(weekday).to_string(),
    Language::He => hebrew_weekday(weekday).to_string(),
  }
}

fn english_weekday(weekday: Weekday) -> &'static str {
  match weekday {
    Weekday::Sun => "Sunday",
    Weekday::Mon => "Monday",
    Weekday::Tue => "Tuesday",
    Weekday::Wed => "Wednesday",
    Weekday::Thu => "Thursday",
    Weekday::Fri => "Friday",
    Weekday::Sat => "Saturday",
  }
}

fn hebrew_weekday(weekday: Weekday) -> &'static str {
  match weekday {
    Weekday::Sun => "ראשון",
    Weekday::Mon => "שני",
    Weekday::Tue => "שלישי",
    Weekday::Wed => "רביעי",
    Weekday::Thu => "חמישי",
    Weekday::Fri => "שישי",
    Weekday::Sat => "שבת",
  }
}
