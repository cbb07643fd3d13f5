// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use crate::{
  cache::CachedResource,
  constants::*,
  endpoint,
  fetch::{Fetcher, HttpFetcher},
  lookup::Lookups,
  models::{Forecast, Warning, Weather},
};
use async_trait::async_trait;
use config::Config;
use error::Error;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// The operations a caller polls. `None` means the data is unavailable right
/// now; the cause has already been logged.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
  async fn current_analysis(&self) -> Option<Weather>;

  async fn forecast(&self) -> Option<Forecast>;

  async fn warnings(&self) -> Option<Vec<Warning>>;
}

pub struct WeatherService {
  config: Config,
  fetcher: Arc<dyn Fetcher>,
  lookups: Arc<Lookups>,
  analysis: CachedResource,
  forecast: CachedResource,
  warnings: CachedResource,
}

impl WeatherService {
  pub fn new(config: Config) -> Result<Self, Error> {
    config.validate()?;
    let fetcher = Arc::new(HttpFetcher::new(config.request_timeout())?);
    Ok(Self::with_fetcher(config, fetcher))
  }

  pub fn with_fetcher(config: Config, fetcher: Arc<dyn Fetcher>) -> Self {
    let lookups = Arc::new(Lookups::from_config(&config));
    Self::with_lookups(config, fetcher, lookups)
  }

  /// Shares `lookups` with other clients of the same language.
  pub fn with_lookups(config: Config, fetcher: Arc<dyn Fetcher>, lookups: Arc<Lookups>) -> Self {
    if lookups.language() != config.language {
      warn!(
        "Lookups are in {} but the client is configured for {}",
        lookups.language(),
        config.language
      );
    }
    let base = config.base_url();
    let language = config.language;
    let ttl = config.cache_expiration();
    let lid = config.location;

    let analysis = CachedResource::new(endpoint(base, language, NOW_ANALYSIS_PATH), ttl);
    let forecast = CachedResource::new(
      endpoint(base, language, &format!("{}/{}", FORECAST_PATH, lid)),
      ttl,
    );
    let warnings = CachedResource::new(
      endpoint(base, language, &format!("{}/{}", WARNINGS_PATH, lid)),
      ttl,
    );

    Self {
      config,
      fetcher,
      lookups,
      analysis,
      forecast,
      warnings,
    }
  }

  pub fn config(&self) -> &Config {
    &self.config
  }

  pub fn fetcher(&self) -> Arc<dyn Fetcher> {
    self.fetcher.clone()
  }

  pub fn lookups(&self) -> Arc<Lookups> {
    self.lookups.clone()
  }

  #[instrument(skip(self), fields(location = self.config.location))]
  pub async fn try_current_analysis(&self) -> Result<Weather, Error> {
    let payload = self.analysis.get(self.fetcher.as_ref()).await?;
    let lid = self.config.location.to_string();
    let entry = payload
      .get(&lid)
      .ok_or_else(|| Error::MissingLocation(lid.clone()))?;

    let resolver = self.lookups.weather_resolver(self.fetcher.as_ref()).await;
    Ok(Weather::build(self.config.language, entry, &resolver))
  }

  #[instrument(skip(self), fields(location = self.config.location))]
  pub async fn try_forecast(&self) -> Result<Forecast, Error> {
    let payload = self.forecast.get(self.fetcher.as_ref()).await?;
    let resolver = self.lookups.weather_resolver(self.fetcher.as_ref()).await;
    let forecast = Forecast::build(self.config.language, &payload, &resolver);
    debug!("Built forecast with {} days", forecast.days.len());
    Ok(forecast)
  }

  #[instrument(skip(self), fields(location = self.config.location))]
  pub async fn try_warnings(&self) -> Result<Vec<Warning>, Error> {
    let payload = self.warnings.get(self.fetcher.as_ref()).await?;
    let resolver = self.lookups.warning_resolver(self.fetcher.as_ref()).await;
    Warning::build_all(
      self.config.language,
      self.config.location,
      &payload,
      &resolver,
    )
  }
}

fn fold<T>(operation: &str, result: Result<T, Error>) -> Option<T> {
  result
    .map_err(|e| {
      if e.is_transport() {
        warn!("IMS unreachable while getting {}: {}", operation, e);
      } else {
        error!("Error getting {}: {}", operation, e);
      }
    })
    .ok()
}

#[async_trait]
impl WeatherProvider for WeatherService {
  async fn current_analysis(&self) -> Option<Weather> {
    fold("current analysis", self.try_current_analysis().await)
  }

  async fn forecast(&self) -> Option<Forecast> {
    fold("forecast", self.try_forecast().await)
  }

  async fn warnings(&self) -> Option<Vec<Warning>> {
    if !self.config.warnings {
      info!("Warnings are disabled for location {}", self.config.location);
      return None;
    }
    fold("warnings", self.try_warnings().await)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::testing::StubFetcher;
  use config::Language;
  use serde_json::json;

  const ANALYSIS_URL: &str = "https://ims.gov.il/en/now_analysis";

  fn service(fetcher: Arc<StubFetcher>) -> WeatherService {
    WeatherService::with_fetcher(Config::new(5, Language::En), fetcher)
  }

  fn analysis() -> serde_json::Value {
    json!({
      "data": {
        "5": {
          "lid": "5",
          "relative_humidity": "40",
          "rain": "0",
          "temperature": "21",
          "weather_code": "1250",
          "forecast_time": "2024-01-01 10:00:00"
        }
      }
    })
  }

  #[tokio::test]
  async fn analysis_is_cached_within_ttl() {
    let fetcher = Arc::new(StubFetcher::new().with_json(ANALYSIS_URL, analysis()));
    let service = service(fetcher.clone());

    let first = service.current_analysis().await.unwrap();
    let second = service.current_analysis().await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.description, "Clear");
    assert_eq!(fetcher.calls(ANALYSIS_URL), 1);
  }

  #[tokio::test]
  async fn missing_location_entry_folds_to_none() {
    let fetcher = Arc::new(
      StubFetcher::new().with_json(ANALYSIS_URL, json!({ "data": { "1": { "lid": "1" } } })),
    );
    let service = service(fetcher);

    assert!(matches!(
      service.try_current_analysis().await,
      Err(Error::MissingLocation(ref lid)) if lid == "5"
    ));
    assert_eq!(service.current_analysis().await, None);
  }

  #[tokio::test]
  async fn disabled_warnings_skip_the_network() {
    let fetcher = Arc::new(StubFetcher::new());
    let mut config = Config::new(5, Language::En);
    config.warnings = false;
    let service = WeatherService::with_fetcher(config, fetcher.clone());

    assert_eq!(service.warnings().await, None);
    assert_eq!(fetcher.calls("https://ims.gov.il/en/warnings/5"), 0);
  }

  #[tokio::test]
  async fn shared_lookups_are_loaded_once() {
    let fetcher = Arc::new(StubFetcher::new().with_json(ANALYSIS_URL, analysis()));
    let lookups = Arc::new(Lookups::from_config(&Config::new(5, Language::En)));
    let mut config = Config::new(5, Language::En);
    config.cache_expiration_secs = 0;

    let a = WeatherService::with_lookups(config.clone(), fetcher.clone(), lookups.clone());
    let b = WeatherService::with_lookups(config, fetcher.clone(), lookups);

    a.current_analysis().await.unwrap();
    b.current_analysis().await.unwrap();

    assert_eq!(fetcher.calls(ANALYSIS_URL), 2);
    assert_eq!(fetcher.calls("https://ims.gov.il/en/weather_codes"), 1);
  }

  #[tokio::test]
  async fn analysis_never_touches_warning_tables() {
    let fetcher = Arc::new(StubFetcher::new().with_json(ANALYSIS_URL, analysis()));
    let mut config = Config::new(5, Language::En);
    config.warnings = false;
    config.lookup_retry_secs = 0;
    let service = WeatherService::with_fetcher(config, fetcher.clone());

    service.current_analysis().await.unwrap();
    service.current_analysis().await.unwrap();

    assert_eq!(fetcher.calls(ANALYSIS_URL), 1);
    assert_eq!(fetcher.calls("https://ims.gov.il/en/regions"), 0);
    assert_eq!(fetcher.calls("https://ims.gov.il/en/warnings_metadata"), 0);
  }

  #[tokio::test]
  async fn injected_lookups_keep_their_own_language() {
    let fetcher = Arc::new(StubFetcher::new().with_json(ANALYSIS_URL, analysis()));
    let lookups = Arc::new(Lookups::from_config(&Config::new(5, Language::He)));
    let service = WeatherService::with_lookups(Config::new(5, Language::En), fetcher.clone(), lookups);

    let weather = service.current_analysis().await.unwrap();

    assert_eq!(weather.description, "בהיר");
    assert_eq!(fetcher.calls("https://ims.gov.il/he/weather_codes"), 1);
  }
}
