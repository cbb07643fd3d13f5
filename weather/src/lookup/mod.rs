// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
mod resolver;
mod tables;

pub use resolver::{Resolver, NOTHING, NO_DIRECTION};
pub use tables::{
  group_key, region_key, Location, Region, WarningGroup, WarningMetadata, WarningSeverity,
  WarningType,
};

use crate::{cache::unwrap_envelope, constants::*, endpoint, fallback, fetch::Fetcher};
use config::{Config, Language};
use error::Error;
use std::{
  collections::HashMap,
  sync::Arc,
  time::{Duration, Instant},
};
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableSource {
  Unloaded,
  Remote,
  Fallback,
}

#[derive(Debug)]
enum TableState<T> {
  Unloaded,
  Remote(Arc<T>),
  Fallback { table: Arc<T>, loaded_at: Instant },
}

/// A remotely sourced dictionary with a static fallback.
///
/// The first `load` fetches the whole table. A successful load is kept for
/// the lifetime of the table. A failed one installs the fallback, and the
/// remote fetch is attempted again once `retry_after` has passed.
#[derive(Debug)]
pub struct LookupTable<T> {
  name: &'static str,
  url: String,
  language: Language,
  retry_after: Duration,
  parse: fn(&serde_json::Value) -> Result<T, Error>,
  fallback: fn(Language) -> T,
  state: RwLock<TableState<T>>,
}

impl<T: Send + Sync> LookupTable<T> {
  pub fn new(
    name: &'static str,
    url: impl Into<String>,
    language: Language,
    retry_after: Duration,
    parse: fn(&serde_json::Value) -> Result<T, Error>,
    fallback: fn(Language) -> T,
  ) -> Self {
    Self {
      name,
      url: url.into(),
      language,
      retry_after,
      parse,
      fallback,
      state: RwLock::new(TableState::Unloaded),
    }
  }

  pub async fn source(&self) -> TableSource {
    match &*self.state.read().await {
      TableState::Unloaded => TableSource::Unloaded,
      TableState::Remote(_) => TableSource::Remote,
      TableState::Fallback { .. } => TableSource::Fallback,
    }
  }

  fn settled(&self, state: &TableState<T>) -> Option<Arc<T>> {
    match state {
      TableState::Remote(table) => Some(table.clone()),
      TableState::Fallback { table, loaded_at } if loaded_at.elapsed() < self.retry_after => {
        Some(table.clone())
      }
      _ => None,
    }
  }

  #[instrument(skip(self, fetcher), fields(table = self.name))]
  pub async fn load(&self, fetcher: &dyn Fetcher) -> Arc<T> {
    if let Some(table) = self.settled(&*self.state.read().await) {
      return table;
    }

    let mut state = self.state.write().await;
    if let Some(table) = self.settled(&state) {
      return table;
    }

    match self.fetch(fetcher).await {
      Ok(table) => {
        info!("Loaded {} ({}) from {}", self.name, self.language, self.url);
        let table = Arc::new(table);
        *state = TableState::Remote(table.clone());
        table
      }
      Err(e) => {
        warn!("Error getting {} ({}): {}. Using static table", self.name, self.language, e);
        let table = Arc::new((self.fallback)(self.language));
        *state = TableState::Fallback {
          table: table.clone(),
          loaded_at: Instant::now(),
        };
        table
      }
    }
  }

  async fn fetch(&self, fetcher: &dyn Fetcher) -> Result<T, Error> {
    debug!("Getting {} from {}", self.name, self.url);
    let data = unwrap_envelope(&self.url, fetcher.fetch_json(&self.url).await?)?;
    (self.parse)(&data)
  }
}

/// The dictionaries of one language, owned by a client or shared between
/// clients through an `Arc`.
#[derive(Debug)]
pub struct Lookups {
  language: Language,
  weather_codes: LookupTable<HashMap<u32, String>>,
  locations: LookupTable<HashMap<u32, Location>>,
  wind_directions: LookupTable<HashMap<u32, i32>>,
  regions: LookupTable<HashMap<String, Region>>,
  warning_metadata: LookupTable<WarningMetadata>,
}

impl Lookups {
  pub fn new(base_url: &str, language: Language, retry_after: Duration) -> Self {
    let url = |path: &str| endpoint(base_url, language, path);
    Self {
      language,
      weather_codes: LookupTable::new(
        "weather codes",
        url(WEATHER_CODES_PATH),
        language,
        retry_after,
        tables::parse_weather_codes,
        fallback::weather_codes,
      ),
      locations: LookupTable::new(
        "locations",
        url(LOCATIONS_PATH),
        language,
        retry_after,
        tables::parse_locations,
        fallback::locations,
      ),
      wind_directions: LookupTable::new(
        "wind directions",
        url(WIND_DIRECTIONS_PATH),
        language,
        retry_after,
        tables::parse_wind_directions,
        fallback::wind_directions,
      ),
      regions: LookupTable::new(
        "regions",
        url(REGIONS_PATH),
        language,
        retry_after,
        tables::parse_regions,
        |_| HashMap::new(),
      ),
      warning_metadata: LookupTable::new(
        "warning metadata",
        url(WARNINGS_METADATA_PATH),
        language,
        retry_after,
        tables::parse_warning_metadata,
        |_| WarningMetadata::default(),
      ),
    }
  }

  pub fn from_config(config: &Config) -> Self {
    Self::new(config.base_url(), config.language, config.lookup_retry())
  }

  pub fn language(&self) -> Language {
    self.language
  }

  pub async fn weather_codes(&self, fetcher: &dyn Fetcher) -> Arc<HashMap<u32, String>> {
    self.weather_codes.load(fetcher).await
  }

  pub async fn locations(&self, fetcher: &dyn Fetcher) -> Arc<HashMap<u32, Location>> {
    self.locations.load(fetcher).await
  }

  pub async fn wind_directions(&self, fetcher: &dyn Fetcher) -> Arc<HashMap<u32, i32>> {
    self.wind_directions.load(fetcher).await
  }

  pub async fn regions(&self, fetcher: &dyn Fetcher) -> Arc<HashMap<String, Region>> {
    self.regions.load(fetcher).await
  }

  pub async fn warning_metadata(&self, fetcher: &dyn Fetcher) -> Arc<WarningMetadata> {
    self.warning_metadata.load(fetcher).await
  }

  /// Snapshot for the weather records: weather codes, locations and wind
  /// directions. Region and warning tables are left empty.
  pub async fn weather_resolver(&self, fetcher: &dyn Fetcher) -> Resolver {
    Resolver {
      language: self.language,
      weather_codes: self.weather_codes(fetcher).await,
      locations: self.locations(fetcher).await,
      wind_directions: self.wind_directions(fetcher).await,
      ..Resolver::new(self.language)
    }
  }

  /// Snapshot for warnings: locations, regions and warning metadata.
  pub async fn warning_resolver(&self, fetcher: &dyn Fetcher) -> Resolver {
    Resolver {
      language: self.language,
      locations: self.locations(fetcher).await,
      regions: self.regions(fetcher).await,
      warning_metadata: self.warning_metadata(fetcher).await,
      ..Resolver::new(self.language)
    }
  }

  pub async fn weather_codes_source(&self) -> TableSource {
    self.weather_codes.source().await
  }

  pub async fn locations_source(&self) -> TableSource {
    self.locations.source().await
  }
}
