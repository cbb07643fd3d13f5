// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use crate::images::{ImageGroup, RadarSatellite};
use config::Config;
use error::Error;
use image::{
  codecs::gif::{GifEncoder, Repeat},
  io::Reader,
  Delay, Frame,
};
use std::{
  fs::File,
  io::{self, BufWriter, Write},
  path::{Path, PathBuf},
  sync::Arc,
  time::Duration,
};
use tempfile::TempDir;
use tracing::{debug, error, info, instrument};
use url::Url;
use weather::Fetcher;

/// Turns an image series into a looping GIF.
pub struct Animator {
  fetcher: Arc<dyn Fetcher>,
  frame_delay: Duration,
  temp_root: Option<PathBuf>,
}

impl Animator {
  pub fn new(fetcher: Arc<dyn Fetcher>, frame_delay: Duration) -> Self {
    Self {
      fetcher,
      frame_delay,
      temp_root: None,
    }
  }

  /// Creates the per-animation working directories under `dir` instead of
  /// the system temporary directory.
  pub fn with_temp_root(mut self, dir: impl Into<PathBuf>) -> Self {
    self.temp_root = Some(dir.into());
    self
  }

  pub fn from_config(config: &Config, fetcher: Arc<dyn Fetcher>) -> Self {
    Self::new(
      fetcher,
      Duration::from_millis(u64::from(config.animation.frame_delay_ms)),
    )
  }

  /// Logs and swallows any failure; see [`Animator::try_create_animation`].
  pub async fn create_animation(&self, images: &[String], output: &Path) -> Option<PathBuf> {
    self
      .try_create_animation(images, output)
      .await
      .map_err(|e| error!("Error creating {} animation: {}", output.display(), e))
      .ok()
  }

  /// Downloads `images` in order into a temporary directory and encodes them
  /// as frames of `output`. The temporary directory is removed on return,
  /// whether or not encoding succeeded.
  #[instrument(skip(self, images), fields(frames = images.len()))]
  pub async fn try_create_animation(
    &self,
    images: &[String],
    output: &Path,
  ) -> Result<PathBuf, Error> {
    if images.is_empty() {
      return Err(Error::NoFrames);
    }
    debug!("Creating animation at: {}", output.display());

    let mut builder = tempfile::Builder::new();
    builder.prefix("weatheril-");
    let workdir = match &self.temp_root {
      Some(root) => builder.tempdir_in(root)?,
      None => builder.tempdir()?,
    };
    let mut frames = Vec::with_capacity(images.len());
    for (idx, url) in images.iter().enumerate() {
      let bytes = self.fetcher.fetch_bytes(url).await?;
      let path = workdir.path().join(frame_file_name(idx, url));
      tokio::fs::write(&path, bytes).await?;
      frames.push(path);
    }

    let delay_ms = u32::try_from(self.frame_delay.as_millis()).unwrap_or(u32::MAX);
    let target = output.to_path_buf();
    let written = tokio::task::spawn_blocking(move || encode_gif(workdir, &frames, &target, delay_ms))
      .await
      .map_err(io::Error::other)??;

    info!("Created animation {}", written.display());
    Ok(written)
  }

  /// Writes one animation per group into `dir`, returning those that were
  /// created.
  pub async fn generate_images(&self, images: &RadarSatellite, dir: &Path) -> Vec<PathBuf> {
    let mut created = Vec::new();
    for group in ImageGroup::ALL {
      let output = dir.join(group.file_name());
      if let Some(path) = self.create_animation(images.images(group), &output).await {
        created.push(path);
      }
    }
    created
  }
}

/// Index-prefixed so that repeated basenames cannot overwrite each other.
fn frame_file_name(idx: usize, url: &str) -> String {
  let basename = Url::parse(url)
    .ok()
    .and_then(|url| {
      url
        .path_segments()
        .and_then(|segments| segments.last().map(str::to_string))
    })
    .filter(|name| !name.is_empty())
    .unwrap_or_else(|| "frame".to_string());
  format!("{:04}-{}", idx, basename)
}

fn encode_gif(
  workdir: TempDir,
  frames: &[PathBuf],
  output: &Path,
  delay_ms: u32,
) -> Result<PathBuf, Error> {
  let delay = Delay::from_numer_denom_ms(delay_ms, 1);
  let decoded = frames
    .iter()
    .map(|path| -> Result<Frame, Error> {
      // Frames are sniffed by content since file names may lack an extension.
      let image = Reader::open(path)?.with_guessed_format()?.decode()?;
      Ok(Frame::from_parts(image.to_rgba8(), 0, 0, delay))
    })
    .collect::<Result<Vec<_>, Error>>()?;

  let mut writer = BufWriter::new(File::create(output)?);
  let mut encoder = GifEncoder::new(&mut writer);
  encoder.set_repeat(Repeat::Infinite)?;
  encoder.encode_frames(decoded)?;
  drop(encoder);
  writer.flush()?;

  workdir.close()?;
  Ok(output.to_path_buf())
}
