// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use crate::{
  extract::{get_value, lookup},
  lookup::Resolver,
  utils::time::parse_datetime,
};
use chrono::DateTime;
use chrono_tz::Tz;
use config::Language;
use error::Error;
use serde::Serialize;
use serde_json::Value;

/// An active IMS warning as seen from one location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Warning {
  pub language: Language,
  pub location_id: u32,
  pub wid: u32,
  pub alert_id: u32,
  pub severity_id: u32,
  pub warning_type_id: u32,
  pub sent: Option<DateTime<Tz>>,
  pub valid_from: Option<DateTime<Tz>>,
  pub valid_to: Option<DateTime<Tz>>,
  pub full_en: String,
  pub full_he: String,
  pub text: String,
  pub text_full: String,
  pub valid_from_unix: i64,
  pub group_ids: Vec<String>,
  pub region_ids: Vec<String>,

  pub region_name: String,
  pub severity: String,
  pub warning_type: String,
  pub groups: Vec<String>,
  pub regions: Vec<String>,
}

impl Warning {
  /// Fails with [`Error::UnknownLocation`] when `location_id` is not in the
  /// location dictionary, since the region of the warning cannot be derived.
  pub fn build(
    language: Language,
    location_id: u32,
    data: &Value,
    resolver: &Resolver,
  ) -> Result<Self, Error> {
    let location = resolver
      .location(&location_id.to_string())
      .ok_or_else(|| Error::UnknownLocation(location_id.to_string()))?;
    let region_name = location
      .rid
      .map(|rid| resolver.region_name(&rid.to_string()))
      .unwrap_or_default();

    let text = |key: &str| get_value(data, key, None, String::new(), None);
    let time = |key: &str| parse_datetime(&text(key));
    let ids = |key: &str| get_value::<Vec<String>>(data, key, None, Vec::new(), None);

    let severity_id = get_value(data, "severity_id", None, 0, None);
    let warning_type_id = get_value(data, "warning_type_id", None, 0, None);
    let group_ids = ids("groups");
    let region_ids = ids("regions");
    let full_en = text("full_en");
    let full_he = text("full_he");

    let mut text_full = text("text_full");
    if text_full.is_empty() {
      text_full = match language {
        Language::En => full_en.trim(),
        Language::He => full_he.trim(),
      }
      .to_string();
    }

    Ok(Self {
      language,
      location_id,
      wid: get_value(data, "wid", None, 0, None),
      alert_id: get_value(data, "alert_id", None, 0, None),
      severity_id,
      warning_type_id,
      sent: time("sent"),
      valid_from: time("valid_from"),
      valid_to: time("valid_to"),
      text: text("text"),
      text_full,
      valid_from_unix: get_value(data, "valid_from_unix", None, 0, None),

      region_name,
      severity: resolver.warning_severity_name(severity_id),
      warning_type: resolver.warning_type_name(warning_type_id),
      groups: group_ids
        .iter()
        .map(|id| resolver.warning_group_name(id))
        .collect(),
      regions: region_ids.iter().map(|id| resolver.region_name(id)).collect(),
      full_en,
      full_he,
      group_ids,
      region_ids,
    })
  }

  /// Builds every warning of a payload, which is either a list or an object
  /// keyed by warning id. One unresolvable warning fails the whole batch.
  pub fn build_all(
    language: Language,
    location_id: u32,
    data: &Value,
    resolver: &Resolver,
  ) -> Result<Vec<Self>, Error> {
    let entries: Vec<&Value> = match data {
      Value::Array(items) => items.iter().collect(),
      Value::Object(_) if lookup(data, "wid", None).is_some() => vec![data],
      Value::Object(map) => map.values().collect(),
      _ => Vec::new(),
    };

    entries
      .into_iter()
      .map(|entry| Warning::build(language, location_id, entry, resolver))
      .collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::lookup::{
    Location, Region, WarningGroup, WarningMetadata, WarningSeverity, WarningType,
  };
  use serde_json::json;
  use std::{collections::HashMap, sync::Arc};

  fn resolver(language: Language) -> Resolver {
    let locations = HashMap::from([(
      1,
      Location {
        lid: 1,
        name: "Jerusalem".into(),
        rid: Some(3),
      },
    )]);
    let regions = HashMap::from([
      (
        "r-3".to_string(),
        Region {
          rid: "r-3".into(),
          name: "Judean Mountains".into(),
        },
      ),
      (
        "r-7".to_string(),
        Region {
          rid: "r-7".into(),
          name: "Dead Sea".into(),
        },
      ),
    ]);
    let metadata = WarningMetadata {
      types: HashMap::from([(
        4,
        WarningType {
          id: 4,
          name: "Flash floods".into(),
        },
      )]),
      groups: HashMap::from([(
        "g-2".to_string(),
        WarningGroup {
          id: "g-2".into(),
          name: "Hikers".into(),
        },
      )]),
      severities: HashMap::from([(
        2,
        WarningSeverity {
          id: 2,
          name: "Yellow".into(),
        },
      )]),
    };

    Resolver {
      language,
      locations: Arc::new(locations),
      regions: Arc::new(regions),
      warning_metadata: Arc::new(metadata),
      ..Resolver::new(language)
    }
  }

  fn sample() -> Value {
    json!({
      "wid": "81",
      "alert_id": "9001",
      "severity_id": "2",
      "warning_type_id": "4",
      "sent": "2024-02-10 06:00:00",
      "valid_from": "2024-02-10 08:00:00",
      "valid_to": "2024-02-10 20:00:00",
      "full_en": "  Flash floods expected in the eastern streams.  ",
      "full_he": " צפויים שיטפונות בנחלים המזרחיים. ",
      "text": "Flash floods",
      "text_full": "",
      "valid_from_unix": 1707544800,
      "groups": ["2", "5"],
      "regions": "3,7"
    })
  }

  #[test]
  fn resolves_descriptors() {
    let warning = Warning::build(Language::En, 1, &sample(), &resolver(Language::En)).unwrap();

    assert_eq!(warning.wid, 81);
    assert_eq!(warning.region_name, "Judean Mountains");
    assert_eq!(warning.severity, "Yellow");
    assert_eq!(warning.warning_type, "Flash floods");
    assert_eq!(warning.groups, vec!["Hikers".to_string(), String::new()]);
    assert_eq!(warning.regions, vec!["Judean Mountains", "Dead Sea"]);
    assert_eq!(warning.region_ids, vec!["3", "7"]);
    assert_eq!(warning.valid_from_unix, 1707544800);
    assert!(warning.valid_to > warning.valid_from);
  }

  #[test]
  fn empty_full_text_falls_back_to_language_text() {
    let en = Warning::build(Language::En, 1, &sample(), &resolver(Language::En)).unwrap();
    assert_eq!(en.text_full, "Flash floods expected in the eastern streams.");

    let he = Warning::build(Language::He, 1, &sample(), &resolver(Language::He)).unwrap();
    assert_eq!(he.text_full, "צפויים שיטפונות בנחלים המזרחיים.");

    let mut explicit = sample();
    explicit["text_full"] = json!("Stay away from streams");
    let warning = Warning::build(Language::En, 1, &explicit, &resolver(Language::En)).unwrap();
    assert_eq!(warning.text_full, "Stay away from streams");
  }

  #[test]
  fn unknown_location_fails() {
    let err = Warning::build(Language::En, 99, &sample(), &resolver(Language::En)).unwrap_err();
    assert!(matches!(err, Error::UnknownLocation(ref lid) if lid == "99"));
  }

  #[test]
  fn missing_descriptors_are_empty() {
    let warning = Warning::build(
      Language::En,
      1,
      &json!({ "severity_id": 9, "warning_type_id": 9 }),
      &resolver(Language::En),
    )
    .unwrap();
    assert_eq!(warning.severity, "");
    assert_eq!(warning.warning_type, "");
    assert!(warning.groups.is_empty());
    assert_eq!(warning.sent, None);
  }

  #[test]
  fn batch_accepts_lists_and_keyed_objects() {
    let resolver = resolver(Language::En);
    let list = json!([sample(), sample()]);
    assert_eq!(Warning::build_all(Language::En, 1, &list, &resolver).unwrap().len(), 2);

    let keyed = json!({ "81": sample() });
    assert_eq!(Warning::build_all(Language::En, 1, &keyed, &resolver).unwrap().len(), 1);

    assert!(Warning::build_all(Language::En, 1, &json!([]), &resolver).unwrap().is_empty());
    assert!(Warning::build_all(Language::En, 2, &list, &resolver).is_err());
  }
}
