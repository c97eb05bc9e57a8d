//! Error types for ONVIF response decoding and normalization.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while fetching, decoding, or navigating a device response.
#[derive(Debug, Error)]
pub enum DeviceError {
    // Navigation errors (exit code 2)
    #[error("path not found: {path} (missing segment \"{segment}\")")]
    NotFound { path: String, segment: String },

    #[error("value at {path} does not match the expected shape: {source}")]
    Shape {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    // Parse errors (exit code 2)
    #[error("invalid XML: {message}")]
    InvalidXml { message: String },

    #[error("invalid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },

    // IO errors (exit code 3)
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "remote")]
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    // Device-reported errors (exit code 1)
    #[error("device returned SOAP fault {code}: {reason}")]
    Fault { code: String, reason: String },
}

impl DeviceError {
    /// Build a `NotFound` for `path`, naming the first segment that failed.
    pub(crate) fn not_found(path: &str, segment: &str) -> Self {
        DeviceError::NotFound {
            path: path.to_string(),
            segment: segment.to_string(),
        }
    }

    /// Returns true if this is a path lookup failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DeviceError::NotFound { .. })
    }

    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            DeviceError::FileNotFound { .. } | DeviceError::ReadError { .. } => 3,
            #[cfg(feature = "remote")]
            DeviceError::Network { .. } => 3,
            DeviceError::Fault { .. } => 1,
            _ => 2,
        }
    }
}
