//! Shared configuration for FindIt clients.
//!
//! A TOML file (`~/.config/findit/config.toml` on Linux) merged with
//! `FINDIT_`-prefixed environment variables, translated into a validated
//! [`ClientConfig`] holding the server URL and transport settings.

use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use findit_api::{TlsMode, TransportConfig};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config struct ──────────────────────────────────────────────

/// Raw configuration as read from file and environment.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// FindIt server base URL (e.g. "https://findit.example.com").
    #[serde(default = "default_server")]
    pub server: String,

    /// HTTP timeout for ordinary requests, in seconds. The session
    /// bootstrap check carries its own fixed 5-second deadline.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Skip TLS certificate verification (self-hosted deployments).
    #[serde(default)]
    pub insecure: bool,

    /// Custom CA certificate (PEM) for self-signed deployments.
    #[serde(default)]
    pub ca_cert: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: default_server(),
            timeout: default_timeout(),
            insecure: false,
            ca_cert: None,
        }
    }
}

fn default_server() -> String {
    "http://localhost:5000".into()
}
fn default_timeout() -> u64 {
    30
}

/// Validated configuration ready to hand to `ApiClient`.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub server: Url,
    pub transport: TransportConfig,
}

// ── Loading ─────────────────────────────────────────────────────────

/// The config file path (`<config dir>/findit/config.toml`), if a home
/// directory can be resolved.
pub fn config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "findit").map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Load configuration: defaults, then the config file, then environment
/// variables (`FINDIT_SERVER`, `FINDIT_TIMEOUT`, `FINDIT_INSECURE`).
pub fn load_config() -> Result<Config, ConfigError> {
    let mut figment = Figment::from(Serialized::defaults(Config::default()));
    if let Some(path) = config_path() {
        figment = figment.merge(Toml::file(path));
    }
    Ok(figment.merge(Env::prefixed("FINDIT_")).extract()?)
}

/// Load configuration from an explicit file path (used by tests and the
/// `--config` flag).
pub fn load_config_from(path: &std::path::Path) -> Result<Config, ConfigError> {
    Ok(Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("FINDIT_"))
        .extract()?)
}

/// Validate a raw [`Config`] into a [`ClientConfig`].
pub fn to_client_config(config: &Config) -> Result<ClientConfig, ConfigError> {
    let server: Url = config
        .server
        .parse()
        .map_err(|e| ConfigError::Validation {
            field: "server".into(),
            reason: format!("{e}"),
        })?;

    if !matches!(server.scheme(), "http" | "https") {
        return Err(ConfigError::Validation {
            field: "server".into(),
            reason: format!("unsupported scheme '{}'", server.scheme()),
        });
    }

    let tls = if config.insecure {
        TlsMode::DangerAcceptInvalid
    } else if let Some(ref path) = config.ca_cert {
        TlsMode::CustomCa(path.clone())
    } else {
        TlsMode::System
    };

    Ok(ClientConfig {
        server,
        transport: TransportConfig {
            tls,
            timeout: Duration::from_secs(config.timeout),
            cookie_jar: None,
        },
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn defaults_point_at_localhost() {
        let config = Config::default();
        assert_eq!(config.server, "http://localhost:5000");
        assert_eq!(config.timeout, 30);
        assert!(!config.insecure);
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "server = \"https://findit.example.com\"\ntimeout = 10\ninsecure = true"
        )
        .unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.server, "https://findit.example.com");
        assert_eq!(config.timeout, 10);
        assert!(config.insecure);
    }

    #[test]
    fn client_config_validates_the_url() {
        let config = Config {
            server: "not a url".into(),
            ..Config::default()
        };
        assert!(matches!(
            to_client_config(&config),
            Err(ConfigError::Validation { .. })
        ));

        let config = Config {
            server: "ftp://findit.example.com".into(),
            ..Config::default()
        };
        assert!(matches!(
            to_client_config(&config),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn insecure_flag_selects_permissive_tls() {
        let config = Config {
            insecure: true,
            ..Config::default()
        };
        let client_config = to_client_config(&config).unwrap();
        assert!(matches!(
            client_config.transport.tls,
            TlsMode::DangerAcceptInvalid
        ));
        assert_eq!(client_config.transport.timeout, Duration::from_secs(30));
    }
}
