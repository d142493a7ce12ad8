//! Batch demo: generate stills and a GIF preview for every video under a
//! source folder.

use color_eyre::Result;
use color_eyre::eyre::eyre;
use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio_retry::Retry;
use tokio_retry::strategy::FixedInterval;
use tracing::{error, info};
use video_thumbnail_generator::{Generator, GeneratorConfig, PreviewOptions, ScreenshotOptions};
use walkdir::WalkDir;

const CONCURRENT_FILES: usize = 4;
const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "webm", "av1", "3gp", "mov", "mkv", "flv", "m4v", "m4p",
];

fn is_video(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| VIDEO_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

async fn process_file(path: &Path, thumbnails_dir: &Path) -> Result<()> {
    let file_name = path
        .file_name()
        .ok_or_else(|| eyre!("no file name in {}", path.display()))?;
    let out_dir = thumbnails_dir.join(file_name);

    let config = GeneratorConfig::new(path, &out_dir);
    let generator = Generator::new(config);

    let stills = generator.generate(ScreenshotOptions::default()).await?;
    info!(file = %path.display(), stills = stills.len(), "generated stills");

    let preview = generator.generate_gif(PreviewOptions::default()).await?;
    info!(file = %path.display(), preview = %preview.display(), "generated preview");

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let source_folder = PathBuf::from(args.next().unwrap_or_else(|| "assets".to_string()));
    let thumbnails_dir = PathBuf::from(args.next().unwrap_or_else(|| "thumbs".to_string()));
    fs::create_dir_all(&thumbnails_dir).await?;

    let files_to_process: Vec<PathBuf> = WalkDir::new(&source_folder)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| is_video(p))
        .collect();

    let processing_tasks = stream::iter(files_to_process)
        .map(|path| {
            let thumbnails_dir = thumbnails_dir.clone();

            tokio::spawn(async move {
                let retry_strategy = FixedInterval::from_millis(500).take(3);
                let result =
                    Retry::spawn(retry_strategy, || process_file(&path, &thumbnails_dir)).await;
                if let Err(e) = result {
                    error!(file = %path.display(), "failed after multiple attempts: {e}");
                }
            })
        })
        .buffer_unordered(CONCURRENT_FILES);

    processing_tasks.for_each(|_| async {}).await;
    Ok(())
}
