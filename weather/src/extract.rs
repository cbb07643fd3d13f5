// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.

//! Field access for untyped IMS payloads.
//!
//! Every record field is read through [`extract`] or one of its folding
//! helpers. The service is loose with types (numbers arrive as strings,
//! "no data" is encoded as magic numbers such as `-999`), so values are
//! coerced to the requested primitive and anything unreadable is reported as
//! an [`ExtractError`] or folded into a default.
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExtractError {
  #[error("field '{0}' is missing")]
  Missing(String),
  #[error("field '{0}' is null")]
  Null(String),
  #[error("field '{path}' cannot be read as {expected}")]
  Invalid { path: String, expected: &'static str },
}

/// Lenient conversion from a JSON scalar.
pub trait Coerce: Sized {
  const EXPECTED: &'static str;

  fn coerce(value: &Value) -> Option<Self>;
}

impl Coerce for i64 {
  const EXPECTED: &'static str = "integer";

  fn coerce(value: &Value) -> Option<Self> {
    match value {
      Value::Number(n) => n.as_i64().or_else(|| {
        n.as_f64()
          .filter(|f| f.is_finite() && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
          .map(|f| f.trunc() as i64)
      }),
      Value::String(s) => s.trim().parse().ok(),
      Value::Bool(b) => Some(i64::from(*b)),
      _ => None,
    }
  }
}

impl Coerce for i32 {
  const EXPECTED: &'static str = "integer";

  fn coerce(value: &Value) -> Option<Self> {
    i64::coerce(value).and_then(|v| i32::try_from(v).ok())
  }
}

impl Coerce for u32 {
  const EXPECTED: &'static str = "non-negative integer";

  fn coerce(value: &Value) -> Option<Self> {
    i64::coerce(value).and_then(|v| u32::try_from(v).ok())
  }
}

impl Coerce for f64 {
  const EXPECTED: &'static str = "number";

  fn coerce(value: &Value) -> Option<Self> {
    match value {
      Value::Number(n) => n.as_f64(),
      Value::String(s) => s.trim().parse().ok(),
      Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
      _ => None,
    }
  }
}

impl Coerce for String {
  const EXPECTED: &'static str = "string";

  fn coerce(value: &Value) -> Option<Self> {
    match value {
      Value::String(s) => Some(s.clone()),
      Value::Null => None,
      other => Some(other.to_string()),
    }
  }
}

/// Id lists arrive either as JSON arrays or as comma separated strings.
impl Coerce for Vec<String> {
  const EXPECTED: &'static str = "list";

  fn coerce(value: &Value) -> Option<Self> {
    match value {
      Value::Array(items) => items.iter().map(String::coerce).collect(),
      Value::String(s) => Some(
        s.split(',')
          .map(str::trim)
          .filter(|part| !part.is_empty())
          .map(String::from)
          .collect(),
      ),
      Value::Number(_) => String::coerce(value).map(|s| vec![s]),
      _ => None,
    }
  }
}

impl Coerce for Map<String, Value> {
  const EXPECTED: &'static str = "object";

  fn coerce(value: &Value) -> Option<Self> {
    value.as_object().cloned()
  }
}

/// Returns `data[key][inner]`, or `data[key]` when `inner` is `None`.
pub fn lookup<'a>(data: &'a Value, key: &str, inner: Option<&str>) -> Option<&'a Value> {
  let outer = data.get(key)?;
  match inner {
    None => Some(outer),
    Some(inner) => outer.as_object()?.get(inner),
  }
}

pub fn extract<T: Coerce>(data: &Value, key: &str, inner: Option<&str>) -> Result<T, ExtractError> {
  let path = || match inner {
    Some(inner) => format!("{}.{}", key, inner),
    None => key.to_string(),
  };

  match lookup(data, key, inner) {
    None => Err(ExtractError::Missing(path())),
    Some(Value::Null) => Err(ExtractError::Null(path())),
    Some(value) => T::coerce(value).ok_or_else(|| ExtractError::Invalid {
      path: path(),
      expected: T::EXPECTED,
    }),
  }
}

/// Reads a field, substituting `default` when it is absent, null, unreadable
/// or equal to the `empty` sentinel.
pub fn get_value<T: Coerce + PartialEq>(
  data: &Value,
  key: &str,
  inner: Option<&str>,
  default: T,
  empty: Option<T>,
) -> T {
  get_optional(data, key, inner, empty).unwrap_or(default)
}

/// Like [`get_value`] with `None` as the default.
pub fn get_optional<T: Coerce + PartialEq>(
  data: &Value,
  key: &str,
  inner: Option<&str>,
  empty: Option<T>,
) -> Option<T> {
  let value = extract::<T>(data, key, inner).ok()?;
  match empty {
    Some(sentinel) if sentinel == value => None,
    _ => Some(value),
  }
}
