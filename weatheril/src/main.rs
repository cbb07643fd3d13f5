// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use anyhow::{Context, Result};
use config::Config;
use radar::{Animator, RadarService};
use std::{env, path::PathBuf};
use tracing::{info, instrument, warn};
use weather::{WeatherProvider, WeatherService};

const CONFIG_ENV: &str = "WEATHERIL_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "weatheril.toml";

pub struct ServiceRunner {
  weather_service: WeatherService,
  radar_service: RadarService,
  animator: Animator,
  output_dir: Option<PathBuf>,
}

#[cfg(debug_assertions)]
fn setup_logging() {
  tracing_subscriber::fmt()
    .with_file(true)
    .with_line_number(true)
    .with_thread_ids(true)
    .init();
}

#[cfg(not(debug_assertions))]
fn setup_logging() {
  tracing_subscriber::fmt().init();
}

#[tokio::main]
async fn main() -> Result<()> {
  setup_logging();

  let config_path = env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
  let config = Config::from_file(&config_path)
    .with_context(|| format!("Failed to load configuration from {}", config_path))?;

  ServiceRunner::new(config)?.run().await
}

impl ServiceRunner {
  #[instrument(skip(config), fields(location = config.location))]
  pub fn new(config: Config) -> Result<Self> {
    let output_dir = config.animation.output_dir.clone();
    let weather_service =
      WeatherService::new(config.clone()).context("Failed to create weather client")?;
    let fetcher = weather_service.fetcher();

    Ok(Self {
      radar_service: RadarService::new(&config, fetcher.clone()),
      animator: Animator::from_config(&config, fetcher),
      weather_service,
      output_dir,
    })
  }

  #[instrument(skip(self))]
  pub async fn run(&self) -> Result<()> {
    match self.weather_service.current_analysis().await {
      Some(weather) => info!(
        "{}: {} {}°C (feels like {}°C), humidity {}%, wind {} km/h from {}°",
        weather.location,
        weather.description,
        weather.temperature,
        weather.feels_like,
        weather.humidity,
        weather.wind_speed,
        weather.wind_direction
      ),
      None => warn!("Current analysis is unavailable"),
    }

    match self.weather_service.forecast().await {
      Some(forecast) => {
        for day in &forecast.days {
          info!(
            "{} {}: {} ({:?}..{:?}°C), {} hourly entries",
            day.day,
            day.date.map_or("N/A".to_string(), |dt| dt.format("%Y-%m-%d").to_string()),
            day.weather,
            day.minimum_temperature,
            day.maximum_temperature,
            day.hours.len()
          );
        }
      }
      None => warn!("Forecast is unavailable"),
    }

    if let Some(warnings) = self.weather_service.warnings().await {
      info!("{} active warnings", warnings.len());
      for warning in &warnings {
        info!(
          "[{}] {} in {}: {}",
          warning.severity, warning.warning_type, warning.region_name, warning.text_full
        );
      }
    }

    let images = self.radar_service.images().await;
    info!(
      "Radar images: {} IMS radar, {} radar, {} Middle East, {} Europe",
      images.imsradar_images.len(),
      images.radar_images.len(),
      images.middle_east_satellite_images.len(),
      images.europe_satellite_images.len()
    );

    if let Some(dir) = &self.output_dir {
      tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("Failed to create {}", dir.display()))?;
      let created = self.animator.generate_images(&images, dir).await;
      info!("Created {} animations in {}", created.len(), dir.display());
    }

    Ok(())
  }
}
