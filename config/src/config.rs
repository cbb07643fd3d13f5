// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use crate::{
  DEFAULT_BASE_URL, DEFAULT_CACHE_EXPIRATION_SECS, DEFAULT_FRAME_DELAY_MS,
  DEFAULT_LOOKUP_RETRY_SECS,
};
use error::Error;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf, str::FromStr, time::Duration};
use tracing::instrument;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
  /// IMS location id (`lid`).
  pub location: u32,
  #[serde(default)]
  pub language: Language,
  #[serde(default = "default_base_url")]
  pub base_url: String,
  #[serde(default = "default_cache_expiration")]
  pub cache_expiration_secs: u64,
  #[serde(default = "default_lookup_retry")]
  pub lookup_retry_secs: u64,
  /// Leave unset to keep the HTTP client's own default.
  #[serde(default)]
  pub request_timeout_secs: Option<u64>,
  #[serde(default = "default_warnings")]
  pub warnings: bool,
  #[serde(default)]
  pub animation: AnimationConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnimationConfig {
  #[serde(default = "default_frame_delay")]
  pub frame_delay_ms: u32,
  #[serde(default)]
  pub output_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
  #[default]
  He,
  En,
}

fn default_base_url() -> String {
  DEFAULT_BASE_URL.to_string()
}

const fn default_cache_expiration() -> u64 {
  DEFAULT_CACHE_EXPIRATION_SECS
}

const fn default_lookup_retry() -> u64 {
  DEFAULT_LOOKUP_RETRY_SECS
}

const fn default_warnings() -> bool {
  true
}

const fn default_frame_delay() -> u32 {
  DEFAULT_FRAME_DELAY_MS
}

impl Default for AnimationConfig {
  fn default() -> Self {
    Self {
      frame_delay_ms: DEFAULT_FRAME_DELAY_MS,
      output_dir: None,
    }
  }
}

impl Config {
  pub fn new(location: u32, language: Language) -> Self {
    Self {
      location,
      language,
      base_url: default_base_url(),
      cache_expiration_secs: DEFAULT_CACHE_EXPIRATION_SECS,
      lookup_retry_secs: DEFAULT_LOOKUP_RETRY_SECS,
      request_timeout_secs: None,
      warnings: true,
      animation: AnimationConfig::default(),
    }
  }

  #[instrument(skip(path))]
  pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
    let content = fs::read_to_string(path)?;
    let config = Self::from_toml(&content)?;
    tracing::debug!("Loaded configuration successfully");
    Ok(config)
  }

  pub fn from_toml(content: &str) -> Result<Self, Error> {
    let config: Self = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
  }

  pub fn validate(&self) -> Result<(), Error> {
    url::Url::parse(&self.base_url)
      .map_err(|e| Error::ConfigError(format!("Invalid base_url '{}': {}", self.base_url, e)))?;
    if self.animation.frame_delay_ms == 0 {
      return Err(Error::ConfigError("frame_delay_ms must be positive".into()));
    }
    Ok(())
  }

  /// Base URL without a trailing slash, ready for path concatenation.
  pub fn base_url(&self) -> &str {
    self.base_url.trim_end_matches('/')
  }

  pub fn cache_expiration(&self) -> Duration {
    Duration::from_secs(self.cache_expiration_secs)
  }

  pub fn lookup_retry(&self) -> Duration {
    Duration::from_secs(self.lookup_retry_secs)
  }

  pub fn request_timeout(&self) -> Option<Duration> {
    self.request_timeout_secs.map(Duration::from_secs)
  }
}

impl Language {
  pub fn as_str(&self) -> &'static str {
    match self {
      Language::He => "he",
      Language::En => "en",
    }
  }
}

impl std::fmt::Display for Language {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for Language {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "he" => Ok(Language::He),
      "en" => Ok(Language::En),
      other => Err(Error::ConfigError(format!("Unsupported language: {}", other))),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn minimal_config_uses_defaults() {
    let config = Config::from_toml("location = 5").unwrap();
    assert_eq!(config.location, 5);
    assert_eq!(config.language, Language::He);
    assert_eq!(config.base_url(), "https://ims.gov.il");
    assert_eq!(config.cache_expiration(), Duration::from_secs(30));
    assert_eq!(config.lookup_retry(), Duration::from_secs(60));
    assert_eq!(config.request_timeout(), None);
    assert!(config.warnings);
    assert_eq!(config.animation.frame_delay_ms, 100);
  }

  #[test]
  fn full_config_overrides_defaults() {
    let config = Config::from_toml(
      r#"
        location = 1
        language = "en"
        base_url = "http://localhost:8080/"
        cache_expiration_secs = 5
        request_timeout_secs = 3
        warnings = false

        [animation]
        frame_delay_ms = 250
        output_dir = "/tmp/radar"
      "#,
    )
    .unwrap();

    assert_eq!(config.language, Language::En);
    assert_eq!(config.base_url(), "http://localhost:8080");
    assert_eq!(config.cache_expiration(), Duration::from_secs(5));
    assert_eq!(config.request_timeout(), Some(Duration::from_secs(3)));
    assert!(!config.warnings);
    assert_eq!(config.animation.output_dir, Some(PathBuf::from("/tmp/radar")));
  }

  #[test]
  fn rejects_invalid_base_url() {
    let err = Config::from_toml("location = 1\nbase_url = \"not a url\"").unwrap_err();
    assert!(matches!(err, Error::ConfigError(_)));
  }

  #[test]
  fn rejects_unknown_language() {
    assert!(Config::from_toml("location = 1\nlanguage = \"fr\"").is_err());
    assert!("fr".parse::<Language>().is_err());
    assert_eq!(" EN ".parse::<Language>().unwrap(), Language::En);
  }
}
