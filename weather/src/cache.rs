// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use crate::fetch::Fetcher;
use error::Error;
use serde_json::Value;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

#[derive(Debug, Clone)]
pub struct CacheEntry {
  pub payload: Value,
  pub fetched_at: Instant,
}

impl CacheEntry {
  pub fn is_fresh(&self, ttl: Duration, now: Instant) -> bool {
    !is_empty(&self.payload) && now.saturating_duration_since(self.fetched_at) < ttl
  }
}

/// A payload behind a TTL.
///
/// The entry is only replaced by a non-empty fetch. A failed or empty refetch
/// keeps the expired timestamp, so the next call goes back to the network
/// immediately instead of waiting out another TTL.
#[derive(Debug)]
pub struct CachedResource {
  url: String,
  ttl: Duration,
  entry: RwLock<Option<CacheEntry>>,
}

impl CachedResource {
  pub fn new(url: impl Into<String>, ttl: Duration) -> Self {
    Self {
      url: url.into(),
      ttl,
      entry: RwLock::new(None),
    }
  }

  pub async fn last_fetch(&self) -> Option<Instant> {
    self.entry.read().await.as_ref().map(|entry| entry.fetched_at)
  }

  #[instrument(skip(self, fetcher), fields(url = %self.url))]
  pub async fn get(&self, fetcher: &dyn Fetcher) -> Result<Value, Error> {
    if let Some(entry) = self.entry.read().await.as_ref() {
      if entry.is_fresh(self.ttl, Instant::now()) {
        debug!("Returning cached data for {}", self.url);
        return Ok(entry.payload.clone());
      }
    }

    let payload = unwrap_envelope(&self.url, fetcher.fetch_json(&self.url).await?)?;
    if is_empty(&payload) {
      warn!("Empty payload from {}; keeping previous fetch time", self.url);
      return Ok(payload);
    }

    *self.entry.write().await = Some(CacheEntry {
      payload: payload.clone(),
      fetched_at: Instant::now(),
    });
    Ok(payload)
  }
}

/// Strips the `{"data": ...}` envelope every IMS endpoint wraps its payload in.
pub fn unwrap_envelope(url: &str, mut response: Value) -> Result<Value, Error> {
  response
    .get_mut("data")
    .map(Value::take)
    .ok_or_else(|| Error::MissingEnvelope(url.to_string()))
}

pub(crate) fn is_empty(value: &Value) -> bool {
  match value {
    Value::Null => true,
    Value::Object(map) => map.is_empty(),
    Value::Array(items) => items.is_empty(),
    Value::String(s) => s.is_empty(),
    _ => false,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::testing::StubFetcher;
  use serde_json::json;

  const URL: &str = "https://ims.gov.il/en/now_analysis";

  #[tokio::test]
  async fn serves_from_cache_within_ttl() {
    let fetcher = StubFetcher::new().with_json(URL, json!({ "data": { "5": { "lid": "5" } } }));
    let resource = CachedResource::new(URL, Duration::from_secs(30));

    let first = resource.get(&fetcher).await.unwrap();
    let second = resource.get(&fetcher).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(fetcher.calls(URL), 1);
  }

  #[tokio::test]
  async fn refetches_exactly_once_after_ttl() {
    let fetcher = StubFetcher::new().with_json(URL, json!({ "data": { "5": {} } }));
    let resource = CachedResource::new(URL, Duration::from_millis(20));

    resource.get(&fetcher).await.unwrap();
    tokio::time::sleep(Duration::from_millis(40)).await;
    resource.get(&fetcher).await.unwrap();
    resource.get(&fetcher).await.unwrap();

    assert_eq!(fetcher.calls(URL), 2);
  }

  #[tokio::test]
  async fn failed_fetch_leaves_timestamp_stale() {
    let fetcher = StubFetcher::new();
    let resource = CachedResource::new(URL, Duration::from_secs(30));

    assert!(resource.get(&fetcher).await.is_err());
    assert!(resource.get(&fetcher).await.is_err());

    assert_eq!(fetcher.calls(URL), 2);
    assert_eq!(resource.last_fetch().await, None);
  }

  #[tokio::test]
  async fn empty_payload_is_not_cached() {
    let fetcher = StubFetcher::new().with_json(URL, json!({ "data": {} }));
    let resource = CachedResource::new(URL, Duration::from_secs(30));

    assert_eq!(resource.get(&fetcher).await.unwrap(), json!({}));
    resource.get(&fetcher).await.unwrap();

    assert_eq!(fetcher.calls(URL), 2);
  }

  #[test]
  fn missing_envelope_is_an_error() {
    let err = unwrap_envelope(URL, json!({ "status": "ok" })).unwrap_err();
    assert!(matches!(err, Error::MissingEnvelope(_)));
    assert_eq!(unwrap_envelope(URL, json!({ "data": [1] })).unwrap(), json!([1]));
  }

  #[test]
  fn entry_freshness_respects_ttl() {
    let now = Instant::now();
    let entry = CacheEntry {
      payload: json!({ "a": 1 }),
      fetched_at: now,
    };
    assert!(entry.is_fresh(Duration::from_secs(30), now));
    assert!(!entry.is_fresh(Duration::ZERO, now));
  }
}
