use std::path::PathBuf;

use thiserror::Error;

/// Malformed input: timestamp tokens, lyric lines or translation framing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("malformed timestamp '{token}': expected mm:ss.cc")]
    Timestamp { token: String },
    #[error("malformed lyric line {line_number}: bad timestamp '{token}'")]
    LyricLine { line_number: usize, token: String },
    #[error("offsets must be non-decreasing: {previous}ms is followed by {next}ms")]
    OffsetOrder { previous: u64, next: u64 },
    #[error("translation response is empty")]
    EmptyResponse,
}

/// The translated sequence does not line up with the source lines.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("translation count mismatch: expected {expected} lines, got {actual}")]
pub struct AlignmentError {
    pub expected: usize,
    pub actual: usize,
}

/// Failure of an external call (language model, flashcard store).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("{service} request failed: {reason}")]
    Request { service: String, reason: String },
    #[error("{service} request timed out")]
    Timeout { service: String },
    #[error("{service} returned HTTP {status}")]
    Status { service: String, status: u16 },
    #[error("{service} reported an error: {message}")]
    Api { service: String, message: String },
    #[error("{service} returned a malformed response: {reason}")]
    MalformedResponse { service: String, reason: String },
}

impl ServiceError {
    /// Classify a reqwest failure, mapping client timeouts to `Timeout`.
    pub fn from_reqwest(service: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ServiceError::Timeout {
                service: service.to_string(),
            }
        } else if let Some(status) = err.status() {
            ServiceError::Status {
                service: service.to_string(),
                status: status.as_u16(),
            }
        } else if err.is_decode() {
            ServiceError::MalformedResponse {
                service: service.to_string(),
                reason: err.to_string(),
            }
        } else {
            ServiceError::Request {
                service: service.to_string(),
                reason: err.to_string(),
            }
        }
    }
}

/// Everything that can fail while turning one song into a deck.
///
/// Errors are scoped to a single song; the batch runner logs them and moves
/// on to the next song.
#[derive(Error, Debug)]
pub enum SongError {
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error("{what} not found: {path}")]
    NotFound { what: &'static str, path: PathBuf },
    #[error(transparent)]
    Alignment(#[from] AlignmentError),
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error("missing media for clip {index}: {path}")]
    MissingMedia { index: usize, path: PathBuf },
    #[error("failed to decode audio {path}: {reason}")]
    AudioDecode { path: PathBuf, reason: String },
    #[error("failed to encode clip {path}: {reason}")]
    AudioEncode { path: PathBuf, reason: String },
    #[error("i/o error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SongError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SongError::Io {
            path: path.into(),
            source,
        }
    }
}
