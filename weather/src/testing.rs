// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use crate::fetch::Fetcher;
use async_trait::async_trait;
use error::Error;
use serde_json::Value;
use std::{collections::HashMap, sync::Mutex};

/// In-memory fetcher that counts calls per URL. Unknown URLs answer 404.
#[derive(Default)]
pub(crate) struct StubFetcher {
  responses: Mutex<HashMap<String, Value>>,
  calls: Mutex<HashMap<String, usize>>,
}

impl StubFetcher {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_json(self, url: &str, body: Value) -> Self {
    self.set_json(url, body);
    self
  }

  pub fn set_json(&self, url: &str, body: Value) {
    self.responses.lock().unwrap().insert(url.to_string(), body);
  }

  pub fn calls(&self, url: &str) -> usize {
    self.calls.lock().unwrap().get(url).copied().unwrap_or(0)
  }

  fn record(&self, url: &str) {
    *self.calls.lock().unwrap().entry(url.to_string()).or_default() += 1;
  }
}

#[async_trait]
impl Fetcher for StubFetcher {
  async fn fetch_json(&self, url: &str) -> Result<Value, Error> {
    self.record(url);
    self
      .responses
      .lock()
      .unwrap()
      .get(url)
      .cloned()
      .ok_or_else(|| Error::StatusError {
        url: url.to_string(),
        status: 404,
      })
  }

  async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, Error> {
    self.record(url);
    Err(Error::StatusError {
      url: url.to_string(),
      status: 404,
    })
  }
}
