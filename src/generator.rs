use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::engine::{Engine, FsRemover, Remover, ScreenshotRequest, TranscodeRequest};
use crate::error::Error;
use crate::ffmpeg::FfmpegEngine;
use crate::options::{PaletteOptions, PreviewOptions, ScreenshotOptions};
use crate::utils::unique_token;

const DEFAULT_PERCENT: f64 = 90.0;
const DEFAULT_SIZE: &str = "320x240";
const DEFAULT_COUNT: u32 = 10;
const DEFAULT_FILE_NAME_FORMAT: &str = "%b-thumbnail-%r-%000i";
const DEFAULT_PALETTE_FILTERS: &str = "fps=10,scale=320:-1:flags=lanczos,palettegen";
const DEFAULT_GIF_FPS: f64 = 0.75;
const DEFAULT_GIF_SCALE: u32 = 180;
const DEFAULT_GIF_SPEED: u32 = 4;

/// Immutable configuration shared by every operation of a [`Generator`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Path to the source video.
    pub source_path: PathBuf,
    /// Directory screenshot and preview outputs are written to.
    pub thumbnail_path: PathBuf,
    /// Default seek percent for single-screenshot requests.
    pub percent: f64,
    /// Default frame size as `"WIDTHxHEIGHT"`.
    pub size: String,
    /// Directory for transient palette artifacts.
    pub tmp_dir: PathBuf,
    /// Screenshot filename template, see [`ScreenshotOptions`].
    pub file_name_format: String,
}

impl GeneratorConfig {
    pub fn new(source_path: impl Into<PathBuf>, thumbnail_path: impl Into<PathBuf>) -> Self {
        Self {
            source_path: source_path.into(),
            thumbnail_path: thumbnail_path.into(),
            percent: DEFAULT_PERCENT,
            size: DEFAULT_SIZE.to_string(),
            tmp_dir: std::env::temp_dir(),
            file_name_format: DEFAULT_FILE_NAME_FORMAT.to_string(),
        }
    }
}

/// Observer for best-effort palette cleanup failures. A failed removal never
/// fails the preview pipeline; this hook is the only place it surfaces.
pub type CleanupHook = Arc<dyn Fn(&Path, &std::io::Error) + Send + Sync>;

struct Inner {
    config: GeneratorConfig,
    engine: Arc<dyn Engine>,
    remover: Arc<dyn Remover>,
    cleanup_hook: Option<CleanupHook>,
}

/// Derives still thumbnails and animated GIF previews from a single source
/// video by driving an external engine.
///
/// Cloning is cheap; clones share the same configuration and collaborators.
/// Every operation has an async form returning a [`Result`] and a `_cb` twin
/// that delivers the same result to a callback on the tokio runtime.
#[derive(Clone)]
pub struct Generator {
    inner: Arc<Inner>,
}

impl Generator {
    /// Generator backed by the `ffmpeg`/`ffprobe` CLIs and `tokio::fs` removal.
    pub fn new(config: GeneratorConfig) -> Self {
        Self::with_collaborators(config, Arc::new(FfmpegEngine), Arc::new(FsRemover))
    }

    /// Generator with injected engine and remover, for tests or alternative
    /// backends.
    pub fn with_collaborators(
        config: GeneratorConfig,
        engine: Arc<dyn Engine>,
        remover: Arc<dyn Remover>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                engine,
                remover,
                cleanup_hook: None,
            }),
        }
    }

    /// Installs an observer for failed palette removals.
    pub fn on_cleanup_error(
        self,
        hook: impl Fn(&Path, &std::io::Error) + Send + Sync + 'static,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                config: self.inner.config.clone(),
                engine: self.inner.engine.clone(),
                remover: self.inner.remover.clone(),
                cleanup_hook: Some(Arc::new(hook)),
            }),
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.inner.config
    }

    /// Captures a set of stills, returning the produced paths in the order
    /// the engine emitted them.
    pub async fn generate(&self, opts: ScreenshotOptions) -> Result<Vec<PathBuf>, Error> {
        let config = &self.inner.config;
        let request = ScreenshotRequest {
            input: config.source_path.clone(),
            folder: opts.folder.unwrap_or_else(|| config.thumbnail_path.clone()),
            count: opts.count.unwrap_or(DEFAULT_COUNT),
            timestamps: opts.timestamps,
            size: opts.size.unwrap_or_else(|| config.size.clone()),
            filename: opts
                .filename
                .unwrap_or_else(|| config.file_name_format.clone()),
        };
        Ok(self.inner.engine.screenshots(request).await?)
    }

    /// Captures a single still at `percent` of the video's duration.
    ///
    /// Percent outside `[0, 100]` is rejected before the engine is invoked.
    pub async fn generate_one_by_percent(
        &self,
        percent: f64,
        opts: ScreenshotOptions,
    ) -> Result<PathBuf, Error> {
        if !(0.0..=100.0).contains(&percent) {
            return Err(Error::PercentOutOfRange(percent));
        }

        let opts = ScreenshotOptions {
            count: Some(1),
            timestamps: Some(vec![format!("{percent}%")]),
            ..opts
        };
        let mut produced = self.generate(opts).await?;
        produced.pop().ok_or(Error::NoOutput)
    }

    /// Extracts the color palette needed for GIF encoding into a uniquely
    /// named file under the configured temp directory.
    pub async fn generate_palette(&self, opts: PaletteOptions) -> Result<PathBuf, Error> {
        let config = &self.inner.config;
        let filters = opts
            .video_filters
            .unwrap_or_else(|| DEFAULT_PALETTE_FILTERS.to_string());

        let mut input_options: Vec<String> = vec!["-y".into()];
        if let Some(offset) = &opts.offset {
            input_options.extend(["-ss".into(), offset.clone()]);
        }
        if let Some(duration) = &opts.duration {
            input_options.extend(["-t".into(), duration.clone()]);
        }

        let output = config.tmp_dir.join(format!("palette-{}.png", unique_token()));
        let request = TranscodeRequest {
            input: config.source_path.clone(),
            input_options,
            secondary_input: None,
            output_options: vec!["-vf".into(), filters],
            output: output.clone(),
        };

        self.inner.engine.transcode(request).await?;
        Ok(output)
    }

    /// Produces a short looping GIF preview: palette extraction, then an
    /// encode pass that uses the palette as a second input stream, then
    /// best-effort palette removal unless opted out.
    pub async fn generate_gif(&self, opts: PreviewOptions) -> Result<PathBuf, Error> {
        let config = &self.inner.config;
        let fps = opts.fps.unwrap_or(DEFAULT_GIF_FPS);
        let scale = opts.scale.unwrap_or(DEFAULT_GIF_SCALE);
        let speed = opts.speed_multiplier.unwrap_or(DEFAULT_GIF_SPEED);
        let delete_palette = opts.delete_palette.unwrap_or(true);
        let file_name = opts
            .file_name
            .unwrap_or_else(|| format!("video-{}.gif", unique_token()));
        let output = config.thumbnail_path.join(file_name);

        let palette = self.generate_palette(PaletteOptions::default()).await?;

        let mut input_options = Vec::new();
        if let Some(offset) = &opts.offset {
            input_options.extend(["-ss".into(), offset.clone()]);
        }
        if let Some(duration) = &opts.duration {
            input_options.extend(["-t".into(), duration.clone()]);
        }
        let filter = format!(
            "fps={fps},setpts=(1/{speed})*PTS,scale={scale}:-1:flags=lanczos[x];[x][1:v]paletteuse"
        );
        let request = TranscodeRequest {
            input: config.source_path.clone(),
            input_options,
            secondary_input: Some(palette.clone()),
            output_options: vec!["-filter_complex".into(), filter],
            output: output.clone(),
        };

        self.inner.engine.transcode(request).await?;

        if delete_palette {
            if let Err(e) = self.inner.remover.remove(&palette).await {
                warn!(palette = %palette.display(), error = %e, "failed to remove palette file");
                if let Some(hook) = &self.inner.cleanup_hook {
                    hook(&palette, &e);
                }
            } else {
                debug!(palette = %palette.display(), "removed palette file");
            }
        }

        Ok(output)
    }

    /// Callback form of [`generate`](Self::generate). Must be called within a
    /// tokio runtime; the callback fires exactly once with the operation's
    /// result.
    pub fn generate_cb<F>(&self, opts: ScreenshotOptions, callback: F)
    where
        F: FnOnce(Result<Vec<PathBuf>, Error>) + Send + 'static,
    {
        let generator = self.clone();
        tokio::spawn(async move { callback(generator.generate(opts).await) });
    }

    /// Callback form of [`generate_one_by_percent`](Self::generate_one_by_percent).
    pub fn generate_one_by_percent_cb<F>(&self, percent: f64, opts: ScreenshotOptions, callback: F)
    where
        F: FnOnce(Result<PathBuf, Error>) + Send + 'static,
    {
        let generator = self.clone();
        tokio::spawn(async move { callback(generator.generate_one_by_percent(percent, opts).await) });
    }

    /// Callback form of [`generate_palette`](Self::generate_palette).
    pub fn generate_palette_cb<F>(&self, opts: PaletteOptions, callback: F)
    where
        F: FnOnce(Result<PathBuf, Error>) + Send + 'static,
    {
        let generator = self.clone();
        tokio::spawn(async move { callback(generator.generate_palette(opts).await) });
    }

    /// Callback form of [`generate_gif`](Self::generate_gif).
    pub fn generate_gif_cb<F>(&self, opts: PreviewOptions, callback: F)
    where
        F: FnOnce(Result<PathBuf, Error>) + Send + 'static,
    {
        let generator = self.clone();
        tokio::spawn(async move { callback(generator.generate_gif(opts).await) });
    }
}
