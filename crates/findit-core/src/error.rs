// ── Core error types ──
//
// User-facing errors from findit-core. These are NOT transport-specific --
// consumers never see HTTP status codes or JSON parse failures directly.
// The `From<findit_api::Error>` impl translates client-layer errors into
// domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("{message}")]
    AuthFailed { message: String },

    #[error("Cannot reach the server: {reason}")]
    Unreachable { reason: String },

    #[error("The server took too long to respond")]
    Timeout,

    #[error("Not found")]
    NotFound,

    #[error("{message}")]
    Rejected { message: String },

    #[error("Validation failed: {message}")]
    Validation { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// The message a form should surface inline, preferring server wording.
    pub fn surface_message(&self) -> String {
        self.to_string()
    }

    /// Whether this failure came from rejected or missing credentials.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::AuthFailed { .. })
    }
}

// ── Conversion from client-layer errors ──────────────────────────────

impl From<findit_api::Error> for CoreError {
    fn from(err: findit_api::Error) -> Self {
        match err {
            findit_api::Error::Authentication { message } => Self::AuthFailed { message },
            findit_api::Error::Timeout { .. } => Self::Timeout,
            findit_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    Self::Timeout
                } else if e.is_connect() {
                    Self::Unreachable {
                        reason: e.to_string(),
                    }
                } else {
                    Self::Internal(e.to_string())
                }
            }
            findit_api::Error::Api { message, status } => {
                if status == 404 {
                    Self::NotFound
                } else {
                    Self::Rejected { message }
                }
            }
            findit_api::Error::InvalidUrl(e) => Self::Config {
                message: format!("Invalid URL: {e}"),
            },
            findit_api::Error::Tls(msg) => Self::Unreachable {
                reason: format!("TLS error: {msg}"),
            },
            findit_api::Error::Decode { message, body: _ } => {
                Self::Internal(format!("Decode error: {message}"))
            }
        }
    }
}
