use async_trait::async_trait;
use std::ffi::OsStr;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::fs;
use tokio::process::Command;
use tracing::debug;

use crate::engine::{Engine, ScreenshotRequest, TranscodeRequest};
use crate::error::EngineError;
use crate::ffprobe::get_video_duration;
use crate::utils::unique_token;

/// [`Engine`] implementation backed by the `ffmpeg` CLI on the `PATH`.
#[derive(Clone, Copy, Debug, Default)]
pub struct FfmpegEngine;

pub(crate) async fn run_ffmpeg<S: AsRef<OsStr>>(args: &[S]) -> Result<(), EngineError> {
    debug!(
        args = ?args.iter().map(|a| a.as_ref().to_string_lossy()).collect::<Vec<_>>(),
        "running ffmpeg"
    );

    let output = Command::new("ffmpeg")
        .args(args)
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|source| EngineError::Spawn {
            command: "ffmpeg",
            source,
        })?;

    if output.status.success() {
        Ok(())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(EngineError::Failed {
            command: "ffmpeg",
            stderr: stderr.trim().to_string(),
        })
    }
}

/// Seek positions in seconds for a request: explicit timestamps when given,
/// otherwise `count` captures spread evenly over the duration.
fn resolve_timestamps(request: &ScreenshotRequest, duration: f64) -> Result<Vec<f64>, EngineError> {
    match &request.timestamps {
        Some(specs) => specs.iter().map(|s| parse_timestamp(s, duration)).collect(),
        None => Ok((0..request.count)
            .map(|i| (i as f64 + 0.5) / request.count as f64 * duration)
            .collect()),
    }
}

fn parse_timestamp(spec: &str, duration: f64) -> Result<f64, EngineError> {
    let parsed = match spec.trim().strip_suffix('%') {
        Some(pct) => pct.trim().parse::<f64>().map(|p| p / 100.0 * duration),
        None => spec.trim().parse::<f64>(),
    };
    parsed.map_err(|_| EngineError::InvalidRequest(format!("bad timestamp {spec:?}")))
}

fn scale_filter(size: &str) -> Result<String, EngineError> {
    let bad = || EngineError::InvalidRequest(format!("bad size {size:?}, expected WIDTHxHEIGHT"));
    let (w, h) = size.split_once('x').ok_or_else(bad)?;
    let side = |s: &str| -> Result<i64, EngineError> {
        if s == "?" { Ok(-1) } else { s.parse().map_err(|_| bad()) }
    };
    Ok(format!("scale={}:{}", side(w)?, side(h)?))
}

/// Expands `%b` (source basename), `%r` (run token) and `%i`/`%0..0i`
/// (capture index, padded to the number of zeros plus one digit). Appends
/// `.png` when the expanded name has no extension.
fn expand_filename(template: &str, basename: &str, token: &str, index: u32) -> String {
    let mut name = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            name.push(c);
            continue;
        }
        match chars.peek() {
            Some('b') => {
                chars.next();
                name.push_str(basename);
            }
            Some('r') => {
                chars.next();
                name.push_str(token);
            }
            Some('i') => {
                chars.next();
                name.push_str(&index.to_string());
            }
            Some('0') => {
                let mut zeros = 0;
                while chars.peek() == Some(&'0') {
                    chars.next();
                    zeros += 1;
                }
                if chars.peek() == Some(&'i') {
                    chars.next();
                    let width = zeros + 1;
                    name.push_str(&format!("{index:0width$}"));
                } else {
                    name.push('%');
                    name.push_str(&"0".repeat(zeros));
                }
            }
            _ => name.push('%'),
        }
    }

    if !name.contains('.') {
        name.push_str(".png");
    }
    name
}

#[async_trait]
impl Engine for FfmpegEngine {
    /// One ffmpeg invocation per request: a `-ss <seconds> -i <src>` input
    /// per capture, a scale filter per input and a single-frame map per
    /// output.
    async fn screenshots(&self, request: ScreenshotRequest) -> Result<Vec<PathBuf>, EngineError> {
        fs::create_dir_all(&request.folder).await?;

        let duration = get_video_duration(&request.input).await?;
        let seconds = resolve_timestamps(&request, duration)?;
        let scale = scale_filter(&request.size)?;
        let token = unique_token();
        let basename = request
            .input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "video".to_string());
        let input = request.input.to_string_lossy().into_owned();

        let mut args: Vec<String> = vec!["-y".into()];
        let mut filters = Vec::new();
        let mut maps = Vec::new();
        let mut produced = Vec::new();

        for (i, ts) in seconds.iter().enumerate() {
            args.extend(["-ss".into(), ts.to_string(), "-i".into(), input.clone()]);
            let label = format!("[out{i}]");
            filters.push(format!("[{i}:v]{scale}{label}"));
            let name = expand_filename(&request.filename, &basename, &token, i as u32 + 1);
            let out = request.folder.join(name);
            maps.extend([
                "-map".into(),
                label,
                "-frames:v".into(),
                "1".into(),
                out.to_string_lossy().into_owned(),
            ]);
            produced.push(out);
        }

        args.push("-filter_complex".into());
        args.push(filters.join(";"));
        args.extend(maps);

        run_ffmpeg(&args).await?;
        Ok(produced)
    }

    async fn transcode(&self, request: TranscodeRequest) -> Result<(), EngineError> {
        let mut args: Vec<String> = request.input_options.clone();
        args.extend(["-i".into(), request.input.to_string_lossy().into_owned()]);
        if let Some(second) = &request.secondary_input {
            args.extend(["-i".into(), second.to_string_lossy().into_owned()]);
        }
        args.extend(request.output_options.clone());
        args.push(request.output.to_string_lossy().into_owned());

        run_ffmpeg(&args).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn request(count: u32, timestamps: Option<Vec<String>>) -> ScreenshotRequest {
        ScreenshotRequest {
            input: Path::new("/videos/clip.mp4").to_path_buf(),
            folder: Path::new("/thumbs").to_path_buf(),
            count,
            timestamps,
            size: "320x240".to_string(),
            filename: "%b-thumbnail-%r-%000i".to_string(),
        }
    }

    #[test]
    fn spreads_captures_evenly_without_timestamps() {
        let seconds = resolve_timestamps(&request(4, None), 10.0).unwrap();
        assert_eq!(seconds, vec![1.25, 3.75, 6.25, 8.75]);
    }

    #[test]
    fn percent_timestamps_resolve_against_duration() {
        let req = request(1, Some(vec!["50%".to_string(), "12.5".to_string()]));
        let seconds = resolve_timestamps(&req, 20.0).unwrap();
        assert_eq!(seconds, vec![10.0, 12.5]);
    }

    #[test]
    fn bad_timestamp_is_rejected() {
        let req = request(1, Some(vec!["half".to_string()]));
        let err = resolve_timestamps(&req, 20.0).unwrap_err();
        assert!(matches!(err, EngineError::InvalidRequest(_)));
    }

    #[test]
    fn scale_filter_handles_fixed_and_free_sides() {
        assert_eq!(scale_filter("320x240").unwrap(), "scale=320:240");
        assert_eq!(scale_filter("320x?").unwrap(), "scale=320:-1");
        assert_eq!(scale_filter("?x240").unwrap(), "scale=-1:240");
        assert!(matches!(
            scale_filter("320"),
            Err(EngineError::InvalidRequest(_))
        ));
    }

    #[test]
    fn expands_filename_template() {
        let name = expand_filename("%b-thumbnail-%r-%000i", "clip", "17-0", 3);
        assert_eq!(name, "clip-thumbnail-17-0-0003.png");
    }

    #[test]
    fn keeps_explicit_extension_and_plain_index() {
        let name = expand_filename("%b-%i.jpg", "clip", "17-0", 12);
        assert_eq!(name, "clip-12.jpg");
    }
}
