// ── Core error types ──
//
// User-facing errors from asuswrt-core. Consumers never see reqwest or
// serde errors directly; the `From<asuswrt_api::Error>` impl translates
// transport-layer errors into domain-appropriate variants.

use thiserror::Error;

use crate::firewall::RuleViolation;

/// Which rule list an argument error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum RuleListKind {
    Ipv4,
    Ipv6,
}

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to router at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Router request timed out")]
    Timeout,

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Operation cancelled")]
    Cancelled,

    // ── Router errors ────────────────────────────────────────────────
    #[error("Router reported error status {status}")]
    Router { status: String },

    #[error("Unexpected router response: {message}")]
    Decode { message: String },

    // ── Firewall argument errors ─────────────────────────────────────
    #[error("Invalid {argument} rule: {violation}")]
    Validation {
        argument: RuleListKind,
        violation: RuleViolation,
    },

    #[error("The {argument} rule list cannot exceed {max} items (got {count})")]
    TooManyRules {
        argument: RuleListKind,
        max: usize,
        count: usize,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Write access must be enabled in the router configuration to call this method")]
    WriteDisabled,

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    pub(crate) fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<asuswrt_api::Error> for CoreError {
    fn from(err: asuswrt_api::Error) -> Self {
        match err {
            asuswrt_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            asuswrt_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e.url().map_or_else(
                            || "<unknown>".into(),
                            |u| u.origin().ascii_serialization(),
                        ),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Http {
                        status: e.status().map_or(0, |s| s.as_u16()),
                        message: e.to_string(),
                    }
                }
            }
            asuswrt_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            asuswrt_api::Error::Http { status, message } => CoreError::Http { status, message },
            asuswrt_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            asuswrt_api::Error::RouterStatus { status } => CoreError::Router { status },
            asuswrt_api::Error::Deserialization { message, body: _ } => {
                CoreError::Decode { message }
            }
            e @ asuswrt_api::Error::Extraction { .. } => CoreError::Decode {
                message: e.to_string(),
            },
            asuswrt_api::Error::Cancelled => CoreError::Cancelled,
        }
    }
}
