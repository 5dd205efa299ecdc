//! Contact directory error types.

use thiserror::Error;

/// Error returned by every contact directory operation.
///
/// A failed call never yields a payload: the caller either gets the typed
/// result or one of these.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ContactError {
    /// The request did not complete (network, TLS, timeout, non-2xx status).
    #[error("transport error: {message}")]
    Transport { message: String },

    /// The platform answered with a non-zero `errcode`.
    #[error("open API error {code}: {message}")]
    Api { code: i64, message: String },

    /// The response body could not be decoded into the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ContactError {
    /// Create a transport error.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create a logical error reported by the platform envelope.
    #[must_use]
    pub fn api(code: i64, message: impl Into<String>) -> Self {
        Self::Api {
            code,
            message: message.into(),
        }
    }

    /// Platform error code, when the failure came from the envelope.
    #[must_use]
    pub fn code(&self) -> Option<i64> {
        match self {
            Self::Api { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Whether the platform itself rejected the call.
    #[must_use]
    pub fn is_api(&self) -> bool {
        matches!(self, Self::Api { .. })
    }
}
