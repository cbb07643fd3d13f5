// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use crate::extract::{extract, lookup, Coerce, ExtractError};
use error::Error;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
  pub lid: u32,
  pub name: String,
  /// Region the location belongs to, when the remote dictionary provides it.
  pub rid: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Region {
  pub rid: String,
  pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WarningType {
  pub id: u32,
  pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WarningGroup {
  pub id: String,
  pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WarningSeverity {
  pub id: u32,
  pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WarningMetadata {
  pub types: HashMap<u32, WarningType>,
  /// Keyed by `g-<id>`.
  pub groups: HashMap<String, WarningGroup>,
  pub severities: HashMap<u32, WarningSeverity>,
}

/// Regions are keyed `r-<rid>` by the service.
pub fn region_key(rid: &str) -> String {
  prefixed("r-", rid)
}

/// Warning groups are keyed `g-<id>` by the service.
pub fn group_key(id: &str) -> String {
  prefixed("g-", id)
}

fn prefixed(prefix: &str, id: &str) -> String {
  let id = id.trim();
  if id.starts_with(prefix) {
    id.to_string()
  } else {
    format!("{}{}", prefix, id)
  }
}

fn entries(data: &Value) -> Vec<&Value> {
  match data {
    Value::Object(map) => map.values().collect(),
    Value::Array(items) => items.iter().collect(),
    _ => Vec::new(),
  }
}

fn skip<T>(table: &str, result: Result<T, ExtractError>) -> Option<T> {
  result
    .map_err(|e| debug!("Skipping malformed {} entry: {}", table, e))
    .ok()
}

fn non_empty<K, V>(table: &str, map: HashMap<K, V>) -> Result<HashMap<K, V>, Error> {
  if map.is_empty() {
    return Err(Error::EmptyPayload(table.to_string()));
  }
  Ok(map)
}

pub fn parse_weather_codes(data: &Value) -> Result<HashMap<u32, String>, Error> {
  let table = entries(data)
    .into_iter()
    .filter_map(|entry| {
      let code = skip("weather code", extract::<u32>(entry, "id", None))?;
      let desc = skip("weather code", extract::<String>(entry, "desc", None))?;
      Some((code, desc))
    })
    .collect();
  non_empty("weather codes", table)
}

pub fn parse_locations(data: &Value) -> Result<HashMap<u32, Location>, Error> {
  let table = entries(data)
    .into_iter()
    .filter_map(|entry| {
      let lid = skip("location", extract::<u32>(entry, "lid", None))?;
      let name = skip("location", extract::<String>(entry, "name", None))?;
      let rid = extract::<u32>(entry, "rid", None).ok();
      Some((lid, Location { lid, name, rid }))
    })
    .collect();
  non_empty("locations", table)
}

/// Values are either a bare azimuth or an object carrying it in `direction`.
pub fn parse_wind_directions(data: &Value) -> Result<HashMap<u32, i32>, Error> {
  let Some(map) = data.as_object() else {
    return Err(Error::EmptyPayload("wind directions".into()));
  };

  let table = map
    .iter()
    .filter_map(|(key, value)| {
      let id = key.trim().parse::<u32>().ok()?;
      let azimuth = if value.is_object() {
        skip("wind direction", extract::<i32>(value, "direction", None))?
      } else {
        i32::coerce(value)?
      };
      Some((id, azimuth))
    })
    .collect();
  non_empty("wind directions", table)
}

pub fn parse_regions(data: &Value) -> Result<HashMap<String, Region>, Error> {
  let table = entries(data)
    .into_iter()
    .filter_map(|entry| {
      let rid = region_key(&skip("region", extract::<String>(entry, "rid", None))?);
      let name = skip("region", extract::<String>(entry, "name", None))?;
      Some((rid.clone(), Region { rid, name }))
    })
    .collect();
  non_empty("regions", table)
}

pub fn parse_warning_metadata(data: &Value) -> Result<WarningMetadata, Error> {
  let section = |key: &str| lookup(data, key, None).map(entries).unwrap_or_default();

  let types = section("ims_warning_type")
    .into_iter()
    .filter_map(|entry| {
      let id = skip("warning type", extract::<u32>(entry, "warning_type_id", None))?;
      let name = skip("warning type", extract::<String>(entry, "name", None))?;
      Some((id, WarningType { id, name }))
    })
    .collect::<HashMap<_, _>>();

  let groups = lookup(data, "warning_groups", None)
    .and_then(Value::as_object)
    .map(|map| {
      map
        .iter()
        .filter_map(|(key, entry)| {
          let id = group_key(key);
          let name = skip("warning group", extract::<String>(entry, "name", None))?;
          Some((id.clone(), WarningGroup { id, name }))
        })
        .collect::<HashMap<_, _>>()
    })
    .unwrap_or_default();

  let severities = section("warning_severity")
    .into_iter()
    .filter_map(|entry| {
      let id = skip("warning severity", extract::<u32>(entry, "severity_id", None))?;
      let name = skip("warning severity", extract::<String>(entry, "severity_name", None))?;
      Some((id, WarningSeverity { id, name }))
    })
    .collect::<HashMap<_, _>>();

  if types.is_empty() && groups.is_empty() && severities.is_empty() {
    return Err(Error::EmptyPayload("warning metadata".into()));
  }

  Ok(WarningMetadata {
    types,
    groups,
    severities,
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn weather_codes_skip_malformed_entries() {
    let table = parse_weather_codes(&json!({
      "1": { "id": "1250", "desc": "Clear" },
      "2": { "id": "oops", "desc": "Broken" },
      "3": { "id": 1230, "desc": "Cloudy" },
    }))
    .unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table[&1250], "Clear");
    assert_eq!(table[&1230], "Cloudy");
  }

  #[test]
  fn empty_tables_are_errors() {
    assert!(parse_weather_codes(&json!({})).is_err());
    assert!(parse_locations(&json!([])).is_err());
    assert!(parse_wind_directions(&json!("x")).is_err());
    assert!(parse_warning_metadata(&json!({})).is_err());
  }

  #[test]
  fn locations_carry_region_ids() {
    let table = parse_locations(&json!({
      "1": { "lid": "1", "name": "Jerusalem", "rid": "3" },
      "2": { "lid": "2", "name": "Tel Aviv - Yafo" },
    }))
    .unwrap();
    assert_eq!(table[&1].rid, Some(3));
    assert_eq!(table[&2].rid, None);
  }

  #[test]
  fn wind_directions_accept_both_shapes() {
    let table = parse_wind_directions(&json!({
      "1": 0,
      "2": { "direction": "45" },
      "x": 90,
    }))
    .unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table[&1], 0);
    assert_eq!(table[&2], 45);
  }

  #[test]
  fn regions_are_keyed_with_prefix() {
    let table = parse_regions(&json!([
      { "rid": "r-3", "name": "Judean Mountains" },
      { "rid": 4, "name": "Coastal Plain" },
    ]))
    .unwrap();
    assert_eq!(table["r-3"].name, "Judean Mountains");
    assert_eq!(table["r-4"].name, "Coastal Plain");
  }

  #[test]
  fn warning_metadata_sections() {
    let metadata = parse_warning_metadata(&json!({
      "ims_warning_type": { "1": { "warning_type_id": "1", "name": "Heavy rain" } },
      "warning_groups": { "g-2": { "name": "Flood" } },
      "warning_severity": { "3": { "severity_id": "3", "severity_name": "Orange" } },
    }))
    .unwrap();
    assert_eq!(metadata.types[&1].name, "Heavy rain");
    assert_eq!(metadata.groups["g-2"].name, "Flood");
    assert_eq!(metadata.severities[&3].name, "Orange");
  }
}
