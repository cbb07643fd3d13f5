// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum Error {
  #[error("HTTP error: {0}")]
  HttpError(#[from] reqwest::Error),
  #[error("Request to {url} failed with status {status}")]
  StatusError { url: String, status: u16 },
  #[error("Failed to parse response: {0}")]
  ParseError(#[from] serde_json::Error),
  #[error("Response from {0} has no \"data\" envelope")]
  MissingEnvelope(String),
  #[error("Response from {0} is empty")]
  EmptyPayload(String),
  #[error("No entry for location {0} in response")]
  MissingLocation(String),
  #[error("Location not found for id: {0}")]
  UnknownLocation(String),
  #[error("IO error: {0}")]
  IoError(#[from] std::io::Error),
  #[error("No frames to animate")]
  NoFrames,
  #[error("Image error: {0}")]
  ImageError(#[from] image::ImageError),
  #[error("Configuration error: {0}")]
  ConfigError(String),
  #[error("Failed to parse configuration: {0}")]
  TomlError(#[from] toml::de::Error),
}

impl Error {
  /// Whether the failure came from the network rather than from the payload.
  pub fn is_transport(&self) -> bool {
    matches!(self, Error::HttpError(_) | Error::StatusError { .. })
  }
}
