// ── Core error types ──
//
// Errors from sdx-core are split by who caused them. Client mistakes
// (`Validation`, `NotFound`) are detected before any backend call;
// upstream failures (`ConnectionFailed`, `Timeout`, `Upstream`,
// `MalformedData`) happen after one. The `From<oess_api::Error>` impl
// translates transport-layer errors into the upstream variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Client errors ────────────────────────────────────────────────
    #[error("{message}")]
    Validation { message: String },

    #[error("{entity} not found: {identifier}")]
    NotFound { entity: String, identifier: String },

    // ── Upstream errors ──────────────────────────────────────────────
    #[error("Cannot reach OESS at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("OESS call timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("OESS request failed: {message}")]
    Upstream {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    #[error("Malformed OESS data: {message}")]
    MalformedData { message: String },

    // ── Local errors ─────────────────────────────────────────────────
    #[error("Version store error: {message}")]
    VersionStore { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedData {
            message: message.into(),
        }
    }

    /// `true` when the caller's request was at fault and no backend state changed.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::NotFound { .. })
    }

    /// `true` when OESS could not be reached or answered badly.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed { .. }
                | Self::Timeout { .. }
                | Self::Upstream { .. }
                | Self::MalformedData { .. }
        )
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<oess_api::Error> for CoreError {
    fn from(err: oess_api::Error) -> Self {
        match err {
            oess_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Upstream {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            oess_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid OESS URL: {e}"),
            },
            oess_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            oess_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            oess_api::Error::Status { status, body } => CoreError::Upstream {
                message: body,
                status: Some(status),
            },
            oess_api::Error::Oess { message } => CoreError::Upstream {
                message,
                status: None,
            },
            oess_api::Error::Deserialization { message, body: _ } => CoreError::MalformedData {
                message: format!("undecodable response: {message}"),
            },
        }
    }
}
