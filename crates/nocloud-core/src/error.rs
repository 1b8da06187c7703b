//! Error types module
//!
//! Every failure surfaced by the client is a `NoCloudError`. Each variant
//! describes itself through `ErrorMetadata` so callers always get an
//! HTTP-status-shaped code, including for failures that never reached the
//! server (unsupported input, network errors).

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like rate limits
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error reporting - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code associated with the failure
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "UPLOAD_FAILED")
    fn error_code(&self) -> &'static str;

    /// Whether re-running the whole operation may succeed
    fn is_recoverable(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

/// Coarse error category the control plane's HTTP status maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    BadRequest,
    InvalidApiKey,
    NotFound,
    RateLimited,
    Internal,
    Unknown,
}

impl ErrorCode {
    /// Default status-to-code mapping used by the response resolver.
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => ErrorCode::BadRequest,
            401 => ErrorCode::InvalidApiKey,
            404 => ErrorCode::NotFound,
            429 => ErrorCode::RateLimited,
            500..=599 => ErrorCode::Internal,
            _ => ErrorCode::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::BadRequest => "BAD_REQUEST",
            ErrorCode::InvalidApiKey => "INVALID_API_KEY",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::RateLimited => "RATE_LIMITED",
            ErrorCode::Internal => "INTERNAL_ERROR",
            ErrorCode::Unknown => "UNKNOWN_ERROR",
        }
    }
}

impl Display for ErrorCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum NoCloudError {
    #[error("Unsupported body type: {0}")]
    UnsupportedBodyType(String),

    #[error("API error ({status} {code}): {message}")]
    Api {
        status: u16,
        code: ErrorCode,
        message: String,
    },

    #[error("Invalid media id: {0}")]
    InvalidMediaId(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Upload failed with status {status}: {body}")]
    UploadFailed { status: u16, body: String },

    #[error("Stream upload failed with status {status}: {body}")]
    StreamUploadFailed { status: u16, body: String },

    #[error("Delete batch {} of {batch_count} failed (ids {offset}..{}): {source}", .batch_index + 1, .offset + .batch_len)]
    BatchDeleteFailed {
        batch_index: usize,
        batch_count: usize,
        offset: usize,
        batch_len: usize,
        #[source]
        source: Box<NoCloudError>,
    },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl NoCloudError {
    pub fn transport(err: impl Display) -> Self {
        NoCloudError::Transport(err.to_string())
    }

    /// Innermost error, looking through batch wrappers.
    pub fn root(&self) -> &NoCloudError {
        match self {
            NoCloudError::BatchDeleteFailed { source, .. } => source.root(),
            other => other,
        }
    }
}

impl From<serde_json::Error> for NoCloudError {
    fn from(err: serde_json::Error) -> Self {
        NoCloudError::InvalidResponse(format!("JSON parsing error: {}", err))
    }
}

impl ErrorMetadata for NoCloudError {
    fn http_status_code(&self) -> u16 {
        match self {
            NoCloudError::UnsupportedBodyType(_) => 400,
            NoCloudError::Api { status, .. } => *status,
            NoCloudError::InvalidMediaId(_) => 400,
            NoCloudError::Transport(_) => 503,
            NoCloudError::UploadFailed { status, .. } => *status,
            NoCloudError::StreamUploadFailed { status, .. } => *status,
            NoCloudError::BatchDeleteFailed { source, .. } => source.http_status_code(),
            NoCloudError::InvalidResponse(_) => 502,
            NoCloudError::Config(_) => 400,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            NoCloudError::UnsupportedBodyType(_) => "UNSUPPORTED_BODY_TYPE",
            NoCloudError::Api { code, .. } => code.as_str(),
            NoCloudError::InvalidMediaId(_) => "INVALID_MEDIA_ID",
            NoCloudError::Transport(_) => "TRANSPORT_ERROR",
            NoCloudError::UploadFailed { .. } => "UPLOAD_FAILED",
            NoCloudError::StreamUploadFailed { .. } => "STREAM_UPLOAD_FAILED",
            NoCloudError::BatchDeleteFailed { source, .. } => source.error_code(),
            NoCloudError::InvalidResponse(_) => "INVALID_RESPONSE",
            NoCloudError::Config(_) => "CONFIG_ERROR",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            NoCloudError::UnsupportedBodyType(_)
            | NoCloudError::InvalidMediaId(_)
            | NoCloudError::Config(_) => false,
            NoCloudError::Api { code, .. } => {
                matches!(code, ErrorCode::RateLimited | ErrorCode::Internal)
            }
            NoCloudError::Transport(_) => true,
            NoCloudError::UploadFailed { status, .. }
            | NoCloudError::StreamUploadFailed { status, .. } => *status == 429 || *status >= 500,
            NoCloudError::BatchDeleteFailed { source, .. } => source.is_recoverable(),
            NoCloudError::InvalidResponse(_) => false,
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            NoCloudError::UnsupportedBodyType(_)
            | NoCloudError::InvalidMediaId(_)
            | NoCloudError::Config(_) => LogLevel::Debug,
            NoCloudError::Api { status, .. } if *status < 500 => LogLevel::Debug,
            NoCloudError::Api { .. } => LogLevel::Error,
            NoCloudError::Transport(_) => LogLevel::Warn,
            NoCloudError::UploadFailed { .. } | NoCloudError::StreamUploadFailed { .. } => {
                LogLevel::Error
            }
            NoCloudError::BatchDeleteFailed { source, .. } => source.log_level(),
            NoCloudError::InvalidResponse(_) => LogLevel::Error,
        }
    }
}

/// Result type for client operations
pub type NoCloudResult<T> = Result<T, NoCloudError>;
