use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum YtknowError {
    #[error("Invalid backend URL {url}: {reason}")]
    InvalidBackendUrl { url: String, reason: String },

    #[error("Backend request to {endpoint} failed: {reason}")]
    RequestFailed { endpoint: String, reason: String },

    #[error("Export to {path} failed: {reason}")]
    ExportFailed { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, YtknowError>;

/// Why a time spec was rejected by the strict parser.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeParseError {
    #[error("time is empty")]
    Empty,

    #[error("invalid {field} component: {value:?}")]
    InvalidComponent { field: &'static str, value: String },

    #[error("expected SS, MM:SS or HH:MM:SS, got {parts} components")]
    TooManyComponents { parts: usize },

    #[error("time {0:?} does not fit in seconds range")]
    Overflow(String),
}
