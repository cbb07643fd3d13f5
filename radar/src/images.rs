// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use config::Config;
use error::Error;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, instrument};
use weather::{
  cache::unwrap_envelope,
  constants::RADAR_PATH,
  endpoint,
  extract::{extract, lookup},
  Fetcher,
};

/// The image series published on the radar/satellite page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageGroup {
  ImsRadar,
  Radar,
  MiddleEast,
  Europe,
}

impl ImageGroup {
  pub const ALL: [ImageGroup; 4] = [
    ImageGroup::ImsRadar,
    ImageGroup::Radar,
    ImageGroup::MiddleEast,
    ImageGroup::Europe,
  ];

  /// Key of the series under `types` in the manifest.
  pub fn manifest_key(&self) -> &'static str {
    match self {
      ImageGroup::ImsRadar => "IMSRadar",
      ImageGroup::Radar => "radar",
      ImageGroup::MiddleEast => "MIDDLE-EAST",
      ImageGroup::Europe => "EUROPE",
    }
  }

  /// Name of the animation generated for the series.
  pub fn file_name(&self) -> &'static str {
    match self {
      ImageGroup::ImsRadar => "imsradar.gif",
      ImageGroup::Radar => "radar.gif",
      ImageGroup::MiddleEast => "middle_east.gif",
      ImageGroup::Europe => "europe.gif",
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RadarSatellite {
  pub imsradar_images: Vec<String>,
  pub radar_images: Vec<String>,
  pub middle_east_satellite_images: Vec<String>,
  pub europe_satellite_images: Vec<String>,
}

impl RadarSatellite {
  /// Reads `types.<group>[].file_name` from an unwrapped manifest. Missing
  /// groups and entries without a file name are skipped.
  pub fn from_manifest(base_url: &str, data: &Value) -> Self {
    let base = base_url.trim_end_matches('/');
    let urls = |group: ImageGroup| -> Vec<String> {
      lookup(data, "types", Some(group.manifest_key()))
        .and_then(Value::as_array)
        .map(|entries| {
          entries
            .iter()
            .filter_map(|entry| extract::<String>(entry, "file_name", None).ok())
            .map(|file| format!("{}{}", base, file))
            .collect()
        })
        .unwrap_or_default()
    };

    Self {
      imsradar_images: urls(ImageGroup::ImsRadar),
      radar_images: urls(ImageGroup::Radar),
      middle_east_satellite_images: urls(ImageGroup::MiddleEast),
      europe_satellite_images: urls(ImageGroup::Europe),
    }
  }

  pub fn images(&self, group: ImageGroup) -> &[String] {
    match group {
      ImageGroup::ImsRadar => &self.imsradar_images,
      ImageGroup::Radar => &self.radar_images,
      ImageGroup::MiddleEast => &self.middle_east_satellite_images,
      ImageGroup::Europe => &self.europe_satellite_images,
    }
  }

  pub fn is_empty(&self) -> bool {
    ImageGroup::ALL.iter().all(|group| self.images(*group).is_empty())
  }
}

pub struct RadarService {
  url: String,
  base_url: String,
  fetcher: Arc<dyn Fetcher>,
}

impl RadarService {
  pub fn new(config: &Config, fetcher: Arc<dyn Fetcher>) -> Self {
    Self {
      url: endpoint(config.base_url(), config.language, RADAR_PATH),
      base_url: config.base_url().to_string(),
      fetcher,
    }
  }

  #[instrument(skip(self), fields(url = %self.url))]
  pub async fn try_images(&self) -> Result<RadarSatellite, Error> {
    debug!("Getting radar images");
    let data = unwrap_envelope(&self.url, self.fetcher.fetch_json(&self.url).await?)?;
    let images = RadarSatellite::from_manifest(&self.base_url, &data);
    debug!(
      "Got: {} IMS Radar Images; {} Radar Images; {} Middle East Satellite Images; {} European Satellite Images",
      images.imsradar_images.len(),
      images.radar_images.len(),
      images.middle_east_satellite_images.len(),
      images.europe_satellite_images.len()
    );
    Ok(images)
  }

  /// Never fails: a failed fetch yields empty lists.
  pub async fn images(&self) -> RadarSatellite {
    self.try_images().await.unwrap_or_else(|e| {
      error!("Error getting images: {}", e);
      RadarSatellite::default()
    })
  }
}
