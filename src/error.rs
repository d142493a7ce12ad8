use std::path::PathBuf;
use thiserror::Error;

/// Failures reported by the external engine (the `ffmpeg`/`ffprobe` CLIs, or
/// whatever [`Engine`](crate::Engine) implementation is injected).
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine binary could not be started at all.
    #[error("failed to spawn {command}: {source}")]
    Spawn {
        command: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// The engine ran but exited unsuccessfully.
    #[error("{command} failed: {stderr}")]
    Failed {
        command: &'static str,
        stderr: String,
    },

    /// The duration of the input could not be determined.
    #[error("could not determine duration of {path}: {reason}")]
    Probe { path: PathBuf, reason: String },

    /// A request carried a value the engine cannot act on, e.g. a malformed
    /// size or timestamp string.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Errors surfaced by [`Generator`](crate::Generator) operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Rejected synchronously, before any engine invocation.
    #[error("percent must be a value from 0-100, got {0}")]
    PercentOutOfRange(f64),

    /// The engine signalled completion but produced no output files.
    #[error("engine produced no output files")]
    NoOutput,

    #[error(transparent)]
    Engine(#[from] EngineError),
}
