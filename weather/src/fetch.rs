// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use async_trait::async_trait;
use error::Error;
use reqwest::Client;
use serde_json::Value;
use std::{
  net::{IpAddr, Ipv4Addr},
  time::Duration,
};
use tracing::{debug, error, instrument};

#[async_trait]
pub trait Fetcher: Send + Sync {
  async fn fetch_json(&self, url: &str) -> Result<Value, Error>;

  async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, Error>;
}

/// Single-shot GET client: no retries and no caching at this layer.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
  client: Client,
}

impl HttpFetcher {
  pub fn new(timeout: Option<Duration>) -> Result<Self, Error> {
    // ims.gov.il has no IPv6 endpoint; binding to IPv4 avoids waiting out
    // the v6 connect attempt on dual-stack hosts.
    let mut builder = Client::builder().local_address(IpAddr::V4(Ipv4Addr::UNSPECIFIED));
    if let Some(timeout) = timeout {
      builder = builder.timeout(timeout);
    }

    Ok(Self {
      client: builder.build()?,
    })
  }

  async fn send(&self, url: &str) -> Result<reqwest::Response, Error> {
    debug!("Getting data from {}", url);
    let response = self.client.get(url).send().await.map_err(|e| {
      error!("Error getting data from {}: {}", url, e);
      Error::HttpError(e)
    })?;

    let status = response.status();
    if !status.is_success() {
      error!("Request to {} failed with status: {}", url, status);
      return Err(Error::StatusError {
        url: url.to_string(),
        status: status.as_u16(),
      });
    }

    Ok(response)
  }
}

#[async_trait]
impl Fetcher for HttpFetcher {
  #[instrument(skip(self))]
  async fn fetch_json(&self, url: &str) -> Result<Value, Error> {
    let body = self.send(url).await?.text().await.map_err(|e| {
      error!("Error reading response body from {}: {}", url, e);
      Error::HttpError(e)
    })?;

    serde_json::from_str(&body).map_err(|e| {
      error!("Failed to parse response from {}: {}", url, e);
      Error::ParseError(e)
    })
  }

  #[instrument(skip(self))]
  async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, Error> {
    let bytes = self.send(url).await?.bytes().await.map_err(|e| {
      error!("Error downloading {}: {}", url, e);
      Error::HttpError(e)
    })?;
    Ok(bytes.to_vec())
  }
}
