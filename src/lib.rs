//! # Video Thumbnail Generator
//!
//! A library for deriving still thumbnails and short animated GIF previews
//! from a video file by driving FFmpeg.
//!
//! The entry point is [`Generator`], constructed once per source video from a
//! [`GeneratorConfig`]. It exposes four operations, each with an async form
//! and a callback (`_cb`) form:
//! - [`Generator::generate`] — a set of stills spread over the duration.
//! - [`Generator::generate_one_by_percent`] — one still at a seek percent.
//! - [`Generator::generate_palette`] — the color palette GIF encoding needs.
//! - [`Generator::generate_gif`] — a looping palette-optimized preview,
//!   composed of a palette stage, an encode stage and best-effort cleanup.
//!
//! The external engine and the file remover sit behind the [`Engine`] and
//! [`Remover`] traits and are injected at construction, so tests can swap in
//! recording mocks without touching the filesystem or spawning processes.
//!
//! ## Requirements
//!
//! - **FFmpeg**: must be installed and accessible in the system's `PATH`.
//! - **FFprobe**: must be installed and accessible in the system's `PATH`.
//!
//! ## Example
//!
//! ```no_run
//! use video_thumbnail_generator::{Generator, GeneratorConfig, PreviewOptions, ScreenshotOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = GeneratorConfig::new("path/to/video.mp4", "path/to/thumbnails");
//!     let generator = Generator::new(config);
//!
//!     // Ten stills spread evenly over the video.
//!     let stills = generator.generate(ScreenshotOptions::default()).await?;
//!     println!("generated {} stills", stills.len());
//!
//!     // One still at 50% of the duration.
//!     let still = generator
//!         .generate_one_by_percent(50.0, ScreenshotOptions::default())
//!         .await?;
//!     println!("still: {}", still.display());
//!
//!     // A looping GIF preview; the intermediate palette is cleaned up.
//!     let preview = generator.generate_gif(PreviewOptions::default()).await?;
//!     println!("preview: {}", preview.display());
//!
//!     Ok(())
//! }
//! ```

// Capability traits for the external engine and remover, plus request types.
mod engine;
// The typed error surface.
mod error;
// The default engine backed by the `ffmpeg` command-line tool.
mod ffmpeg;
// Duration probing via the `ffprobe` command-line tool.
mod ffprobe;
// The orchestration core.
mod generator;
// Per-operation option structs.
mod options;
// Unique artifact naming.
mod utils;

pub use engine::{Engine, FsRemover, Remover, ScreenshotRequest, TranscodeRequest};
pub use error::{EngineError, Error};
pub use ffmpeg::FfmpegEngine;
pub use generator::{CleanupHook, Generator, GeneratorConfig};
pub use options::{PaletteOptions, PreviewOptions, ScreenshotOptions};
