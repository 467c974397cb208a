//! Error types for speech synthesis.

use thiserror::Error;

/// Result type for synthesis operations.
pub type TtsResult<T> = Result<T, TtsError>;

/// Errors that can occur while talking to the speech service.
#[derive(Debug, Error)]
pub enum TtsError {
    #[error("speech service request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("speech service returned {status}: {body}")]
    ServiceStatus { status: u16, body: String },

    #[error("speech service does not support streamed captions")]
    CaptionsUnsupported,

    #[error("synthesis produced no audio")]
    EmptyAudio,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TtsError {
    /// Create a status error from a failed response.
    pub fn service_status(status: u16, body: impl Into<String>) -> Self {
        Self::ServiceStatus {
            status,
            body: body.into(),
        }
    }

    /// Whether a retry against the service could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(e) => e.is_timeout() || e.is_connect(),
            Self::ServiceStatus { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
