use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Per-call options for [`Generator::generate`](crate::Generator::generate)
/// and [`Generator::generate_one_by_percent`](crate::Generator::generate_one_by_percent).
///
/// Every field is optional; an unset field falls back to the operation default
/// or the generator's configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ScreenshotOptions {
    /// Output directory. Defaults to the configured thumbnail path.
    pub folder: Option<PathBuf>,
    /// Number of stills to capture, spread evenly over the duration. Defaults to 10.
    pub count: Option<u32>,
    /// Frame size as `"WIDTHxHEIGHT"`; either side may be `"?"` to keep aspect ratio.
    pub size: Option<String>,
    /// Filename template. `%b` expands to the source basename, `%r` to a
    /// unique run token, `%i`/`%000i` to the (zero-padded) capture index.
    pub filename: Option<String>,
    /// Explicit seek positions, either percent strings (`"50%"`) or seconds
    /// (`"12.5"`). Takes precedence over even spreading by `count`.
    pub timestamps: Option<Vec<String>>,
}

/// Per-call options for [`Generator::generate_palette`](crate::Generator::generate_palette).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PaletteOptions {
    /// Filter graph for palette extraction. Defaults to
    /// `fps=10,scale=320:-1:flags=lanczos,palettegen`.
    pub video_filters: Option<String>,
    /// Seek offset (`-ss`), any syntax ffmpeg accepts.
    pub offset: Option<String>,
    /// Clip duration (`-t`), any syntax ffmpeg accepts.
    pub duration: Option<String>,
}

/// Per-call options for [`Generator::generate_gif`](crate::Generator::generate_gif).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PreviewOptions {
    /// Output frame rate. Defaults to 0.75.
    pub fps: Option<f64>,
    /// Output width in pixels, height follows aspect ratio. Defaults to 180.
    pub scale: Option<u32>,
    /// Playback speed-up applied via timestamp scaling. Defaults to 4.
    pub speed_multiplier: Option<u32>,
    /// Remove the intermediate palette file after a successful encode.
    /// Defaults to true.
    pub delete_palette: Option<bool>,
    /// Output filename under the thumbnail path. Defaults to a unique
    /// `video-<token>.gif` name.
    pub file_name: Option<String>,
    /// Seek offset for the encode stage (`-ss`).
    pub offset: Option<String>,
    /// Clip duration for the encode stage (`-t`).
    pub duration: Option<String>,
}
