//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and a stable exit code.

use miette::Diagnostic;
use thiserror::Error;

use sdx_config::ConfigError;
use sdx_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const CONFIG: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const UPSTREAM: i32 = 5;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Configuration ────────────────────────────────────────────────
    #[error("Invalid configuration: {0}")]
    #[diagnostic(
        code(sdx::config),
        help(
            "Check the config file, or pass one with --config.\n\
             Environment overrides use SDX_ (nested keys: SDX_OESS__URL)."
        )
    )]
    Config(#[from] ConfigError),

    // ── Requests ─────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(sdx::validation))]
    Validation { message: String },

    #[error("{entity} not found: {identifier}")]
    #[diagnostic(
        code(sdx::not_found),
        help("Run: sdx-gateway l2vpn list to see existing services")
    )]
    NotFound { entity: String, identifier: String },

    // ── OESS ─────────────────────────────────────────────────────────
    #[error("Could not reach OESS at {url}: {reason}")]
    #[diagnostic(
        code(sdx::connection_failed),
        help(
            "Check that OESS is reachable and the credentials are right.\n\
             Try --insecure (-k) if OESS uses a self-signed certificate."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("OESS call timed out after {seconds}s")]
    #[diagnostic(
        code(sdx::timeout),
        help("Increase the timeout with --timeout or in the config file.")
    )]
    Timeout { seconds: u64 },

    #[error("{0}")]
    #[diagnostic(code(sdx::upstream))]
    Upstream(CoreError),

    // ── IO ───────────────────────────────────────────────────────────
    #[error("Could not read request: {0}")]
    #[diagnostic(code(sdx::io))]
    Io(#[from] std::io::Error),

    #[error("Could not encode output: {0}")]
    #[diagnostic(code(sdx::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => exit_code::CONFIG,
            Self::Validation { .. } => exit_code::USAGE,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Upstream(_) => exit_code::UPSTREAM,
            Self::Io(_) | Self::Json(_) => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation { message } => Self::Validation { message },
            CoreError::NotFound { entity, identifier } => Self::NotFound { entity, identifier },
            CoreError::ConnectionFailed { url, reason } => Self::ConnectionFailed { url, reason },
            CoreError::Timeout { timeout_secs } => Self::Timeout {
                seconds: timeout_secs,
            },
            other => Self::Upstream(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_mistakes_exit_as_usage_or_not_found() {
        let validation = CliError::from(CoreError::Validation {
            message: "Invalid endpoint - not found: x".into(),
        });
        assert_eq!(validation.exit_code(), exit_code::USAGE);

        let missing = CliError::from(CoreError::NotFound {
            entity: "L2VPN service".into(),
            identifier: "7".into(),
        });
        assert_eq!(missing.exit_code(), exit_code::NOT_FOUND);
    }

    #[test]
    fn upstream_failures_keep_their_message() {
        let err = CliError::from(CoreError::MalformedData {
            message: "link 9 references unknown interface 4".into(),
        });
        assert_eq!(err.exit_code(), exit_code::UPSTREAM);
        assert!(err.to_string().contains("unknown interface 4"));
    }
}
