use serde::Deserialize;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

use crate::error::EngineError;

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    format: Option<ProbeFormat>,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

/// Duration of `input` in seconds, via `ffprobe` on the `PATH`.
pub async fn get_video_duration(input: &Path) -> Result<f64, EngineError> {
    let output = Command::new("ffprobe")
        .args(["-v", "error", "-show_entries", "format=duration", "-of", "json"])
        .arg(input)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|source| EngineError::Spawn {
            command: "ffprobe",
            source,
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(EngineError::Failed {
            command: "ffprobe",
            stderr: stderr.trim().to_string(),
        });
    }

    parse_duration(&output.stdout, input)
}

fn parse_duration(json: &[u8], input: &Path) -> Result<f64, EngineError> {
    let probe = |reason: String| EngineError::Probe {
        path: input.to_path_buf(),
        reason,
    };
    let parsed: ProbeOutput = serde_json::from_slice(json).map_err(|e| probe(e.to_string()))?;
    parsed
        .format
        .and_then(|f| f.duration)
        .and_then(|d| d.parse::<f64>().ok())
        .ok_or_else(|| probe("no duration in ffprobe output".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_duration_from_format_section() {
        let json = br#"{"format": {"duration": "10.533333"}}"#;
        let duration = parse_duration(json, Path::new("in.mp4")).unwrap();
        assert!((duration - 10.533333).abs() < 1e-9);
    }

    #[test]
    fn missing_duration_is_a_probe_error() {
        let json = br#"{"format": {}}"#;
        let err = parse_duration(json, Path::new("in.mp4")).unwrap_err();
        assert!(matches!(err, EngineError::Probe { .. }));
    }

    #[test]
    fn garbage_output_is_a_probe_error() {
        let err = parse_duration(b"not json", Path::new("in.mp4")).unwrap_err();
        assert!(matches!(err, EngineError::Probe { .. }));
    }
}
