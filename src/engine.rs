use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::error::EngineError;

/// A multi-screenshot capture request.
#[derive(Clone, Debug, PartialEq)]
pub struct ScreenshotRequest {
    /// Source video.
    pub input: PathBuf,
    /// Directory the stills are written to.
    pub folder: PathBuf,
    /// Number of stills when no explicit timestamps are given.
    pub count: u32,
    /// Explicit seek positions as percent strings (`"50%"`) or seconds.
    /// When absent the engine spreads `count` captures evenly.
    pub timestamps: Option<Vec<String>>,
    /// Frame size as `"WIDTHxHEIGHT"`, either side may be `"?"`.
    pub size: String,
    /// Filename template, see [`ScreenshotOptions`](crate::ScreenshotOptions).
    pub filename: String,
}

/// A single transcode pass: palette extraction or GIF encoding.
#[derive(Clone, Debug, PartialEq)]
pub struct TranscodeRequest {
    /// Source video.
    pub input: PathBuf,
    /// Flags preceding the primary input (`-y`, `-ss`, `-t`).
    pub input_options: Vec<String>,
    /// Optional second input stream (the palette during GIF encoding).
    pub secondary_input: Option<PathBuf>,
    /// Flags preceding the output (`-vf`/`-filter_complex` and their values).
    pub output_options: Vec<String>,
    /// Output file path.
    pub output: PathBuf,
}

/// The external video-processing capability.
///
/// One request corresponds to one engine invocation; implementations hold no
/// state across requests. The default implementation is
/// [`FfmpegEngine`](crate::FfmpegEngine); tests inject recording mocks.
#[async_trait]
pub trait Engine: Send + Sync {
    /// Capture still frames, returning the produced paths in emission order.
    async fn screenshots(&self, request: ScreenshotRequest) -> Result<Vec<PathBuf>, EngineError>;

    /// Run a single transcode pass to completion.
    async fn transcode(&self, request: TranscodeRequest) -> Result<(), EngineError>;
}

/// Deletes intermediate artifacts after use.
#[async_trait]
pub trait Remover: Send + Sync {
    /// Force-remove `path`. A file that is already gone is not an error.
    async fn remove(&self, path: &Path) -> std::io::Result<()>;
}

/// Default [`Remover`] backed by `tokio::fs`.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsRemover;

#[async_trait]
impl Remover for FsRemover {
    async fn remove(&self, path: &Path) -> std::io::Result<()> {
        match tokio::fs::remove_file(path).await {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use temp_dir::TempDir;

    #[tokio::test]
    async fn fs_remover_deletes_existing_files() {
        let dir = TempDir::new().unwrap();
        let file = dir.child("palette-0.png");
        tokio::fs::write(&file, b"palette").await.unwrap();

        FsRemover.remove(&file).await.unwrap();
        assert!(!file.exists());
    }

    #[tokio::test]
    async fn fs_remover_tolerates_missing_files() {
        let dir = TempDir::new().unwrap();
        FsRemover.remove(&dir.child("never-created.png")).await.unwrap();
    }
}
