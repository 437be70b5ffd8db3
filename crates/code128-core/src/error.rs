//! Error types for decode orchestration.
//!
//! Two layers of failure exist:
//! - [`DecodeError`] is what callers of the orchestrator see: the input could
//!   not be read, no plan step produced a payload, or the decoder was
//!   misconfigured.
//! - [`BackendError`] is a single failed attempt by one backend. The
//!   orchestrator logs it and moves on to the next plan step.

use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;

use thiserror::Error;

/// Errors returned by [`crate::Decoder`] and the batch helpers.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The source image could not be opened or decoded.
    #[error("cannot read image {}: {source}", path.display())]
    CannotRead {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Every plan step was tried and none produced a payload.
    #[error("code128 not found after {attempts} attempts")]
    NotFound { attempts: usize },

    /// The decoder configuration is inconsistent.
    #[error("invalid decoder configuration: {0}")]
    Config(String),

    /// Filesystem error outside of a single decode attempt.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DecodeError {
    /// Returns true for the "no barcode" outcome, as opposed to input or
    /// configuration failures.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DecodeError::NotFound { .. })
    }
}

/// A failed attempt by a single backend decoder.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The temporary image could not be created or written.
    #[error("failed to write temp image: {0}")]
    TempFile(#[source] std::io::Error),

    /// The image could not be encoded for the external tool.
    #[error("failed to encode temp image: {0}")]
    Encode(#[from] crate::encode::EncodeError),

    /// The external tool could not be started (usually not installed).
    #[error("{tool}: failed to start: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// Waiting on or killing the external tool failed.
    #[error("{tool}: {source}")]
    Process {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// The external tool exited unsuccessfully.
    #[error("{tool}: {status}: {stderr}")]
    ExitStatus {
        tool: String,
        status: ExitStatus,
        stderr: String,
    },

    /// The external tool did not finish in time and was killed.
    #[error("{tool}: timed out after {timeout:?}")]
    Timeout { tool: String, timeout: Duration },

    /// The tool succeeded but its output carried no result line.
    #[error("{tool}: no result")]
    NoResult { tool: String },

    /// The backend reported success with an empty payload.
    #[error("{backend}: empty result")]
    EmptyResult { backend: String },

    /// The in-process decoding library returned an error.
    #[error("{backend}: {message}")]
    Library { backend: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_display() {
        let err = DecodeError::NotFound { attempts: 20 };
        assert_eq!(err.to_string(), "code128 not found after 20 attempts");
        assert!(err.is_not_found());

        let err = DecodeError::Config("plan is empty".to_string());
        assert_eq!(
            err.to_string(),
            "invalid decoder configuration: plan is empty"
        );
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_cannot_read_mentions_path() {
        let source = image::ImageError::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "missing",
        ));
        let err = DecodeError::CannotRead {
            path: PathBuf::from("/tmp/nope.jpg"),
            source,
        };
        assert!(err.to_string().starts_with("cannot read image /tmp/nope.jpg"));
    }

    #[test]
    fn test_backend_error_display() {
        let err = BackendError::NoResult {
            tool: "ZXingReader".to_string(),
        };
        assert_eq!(err.to_string(), "ZXingReader: no result");

        let err = BackendError::Timeout {
            tool: "zbarimg".to_string(),
            timeout: Duration::from_secs(2),
        };
        assert_eq!(err.to_string(), "zbarimg: timed out after 2s");
    }
}
