// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use super::tables::{group_key, region_key, Location, Region, WarningMetadata};
use crate::fallback;
use config::Language;
use std::{collections::HashMap, sync::Arc};

/// Description returned for codes no table knows about.
pub const NOTHING: &str = "Nothing";
/// Azimuth returned for unknown wind direction ids.
pub const NO_DIRECTION: i32 = -1;

/// Read-only snapshot of the loaded dictionaries handed to the record
/// builders. Tables that were not loaded are simply empty.
#[derive(Debug, Clone, Default)]
pub struct Resolver {
  pub language: Language,
  pub weather_codes: Arc<HashMap<u32, String>>,
  pub locations: Arc<HashMap<u32, Location>>,
  pub wind_directions: Arc<HashMap<u32, i32>>,
  pub regions: Arc<HashMap<String, Region>>,
  pub warning_metadata: Arc<WarningMetadata>,
}

impl Resolver {
  pub fn new(language: Language) -> Self {
    Self {
      language,
      ..Default::default()
    }
  }

  /// Resolver over the static tables only.
  pub fn fallback(language: Language) -> Self {
    Self {
      language,
      weather_codes: Arc::new(fallback::weather_codes(language)),
      locations: Arc::new(fallback::locations(language)),
      wind_directions: Arc::new(fallback::wind_directions(language)),
      ..Default::default()
    }
  }

  pub fn weather_description(&self, code: Option<u32>) -> String {
    code
      .filter(|code| *code != 0)
      .and_then(|code| self.weather_codes.get(&code))
      .cloned()
      .unwrap_or_else(|| NOTHING.to_string())
  }

  pub fn location(&self, lid: &str) -> Option<&Location> {
    let lid = lid.trim().parse::<u32>().ok()?;
    self.locations.get(&lid)
  }

  pub fn location_name(&self, lid: &str) -> String {
    self
      .location(lid)
      .map(|location| location.name.clone())
      .unwrap_or_else(|| NOTHING.to_string())
  }

  pub fn wind_direction(&self, id: Option<u32>) -> i32 {
    id.and_then(|id| self.wind_directions.get(&id))
      .copied()
      .unwrap_or(NO_DIRECTION)
  }

  pub fn region_name(&self, rid: &str) -> String {
    self
      .regions
      .get(&region_key(rid))
      .map(|region| region.name.clone())
      .unwrap_or_default()
  }

  pub fn warning_type_name(&self, id: u32) -> String {
    self
      .warning_metadata
      .types
      .get(&id)
      .map(|t| t.name.clone())
      .unwrap_or_default()
  }

  pub fn warning_group_name(&self, id: &str) -> String {
    self
      .warning_metadata
      .groups
      .get(&group_key(id))
      .map(|g| g.name.clone())
      .unwrap_or_default()
  }

  pub fn warning_severity_name(&self, id: u32) -> String {
    self
      .warning_metadata
      .severities
      .get(&id)
      .map(|s| s.name.clone())
      .unwrap_or_default()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn unknown_codes_resolve_to_sentinels() {
    let resolver = Resolver::fallback(Language::En);
    assert_eq!(resolver.weather_description(Some(1250)), "Clear");
    assert_eq!(resolver.weather_description(Some(9999)), NOTHING);
    assert_eq!(resolver.weather_description(Some(0)), NOTHING);
    assert_eq!(resolver.weather_description(None), NOTHING);
    assert_eq!(resolver.location_name("1"), "Jerusalem");
    assert_eq!(resolver.location_name("abc"), NOTHING);
    assert_eq!(resolver.location_name("4242"), NOTHING);
    assert_eq!(resolver.wind_direction(Some(3)), 90);
    assert_eq!(resolver.wind_direction(Some(99)), NO_DIRECTION);
    assert_eq!(resolver.wind_direction(None), NO_DIRECTION);
  }

  #[test]
  fn empty_resolver_never_fails() {
    let resolver = Resolver::new(Language::He);
    assert_eq!(resolver.location_name("1"), NOTHING);
    assert_eq!(resolver.region_name("3"), "");
    assert_eq!(resolver.warning_type_name(1), "");
    assert_eq!(resolver.warning_group_name("2"), "");
    assert_eq!(resolver.warning_severity_name(3), "");
  }
}
