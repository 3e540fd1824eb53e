use thiserror::Error;

/// Top-level error type for the `findit-api` crate.
///
/// Covers every failure mode of talking to the FindIt REST API:
/// authentication, transport, structured API errors, and payload decoding.
/// `findit-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login, registration, or a credentialed call was rejected.
    /// Carries the server-provided message when one was present.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request exceeded its deadline.
    #[error("Request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── API ─────────────────────────────────────────────────────────
    /// Structured error from the API (parsed from the `{"error": "..."}` body).
    #[error("API error (HTTP {status}): {message}")]
    Api { message: String, status: u16 },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON payload did not match the expected shape, with the raw body
    /// for debugging.
    #[error("Decode error: {message}")]
    Decode { message: String, body: String },
}

impl Error {
    /// Returns `true` if this error is a timeout (deadline or transport).
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Timeout { .. } => true,
            Self::Transport(e) => e.is_timeout(),
            _ => false,
        }
    }

    /// Returns `true` if this error indicates missing or rejected credentials.
    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            Self::Authentication { .. } | Self::Api { status: 401 | 403, .. }
        )
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Api { status: 404, .. } => true,
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            _ => false,
        }
    }

    /// The message the server sent with a rejected request, if any.
    ///
    /// Used by callers that surface server wording verbatim (e.g. the
    /// login form showing "Invalid username or password").
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Authentication { message } | Self::Api { message, .. } => Some(message),
            _ => None,
        }
    }
}
