// ── Runtime connection configuration ──
//
// These types describe *how* to reach a router. They carry credential data
// and connection tuning, but never touch disk. `asuswrt-config` (or any
// other caller) constructs a `RouterConfig` and hands it in.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use asuswrt_api::{Credentials, TlsMode, TransportConfig};

use crate::error::CoreError;

pub const DEFAULT_HOSTNAME: &str = "router.asus.com";

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification. Routers ship self-signed certificates.
    #[default]
    DangerAcceptInvalid,
}

/// Configuration for talking to a single router.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Host name or address, optionally with `:port`.
    pub hostname: String,
    /// Use `https://` instead of `http://`.
    pub use_https: bool,
    pub username: String,
    pub password: SecretString,
    /// Write operations refuse to run unless this is set.
    pub write_enabled: bool,
    pub tls: TlsVerification,
    pub timeout: Duration,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            hostname: DEFAULT_HOSTNAME.into(),
            use_https: false,
            username: "admin".into(),
            password: SecretString::from(String::new()),
            write_enabled: false,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl RouterConfig {
    pub fn new(
        hostname: impl Into<String>,
        username: impl Into<String>,
        password: SecretString,
    ) -> Self {
        Self {
            hostname: hostname.into(),
            username: username.into(),
            password,
            ..Self::default()
        }
    }

    /// `http(s)://<hostname>`
    pub fn base_url(&self) -> Result<Url, CoreError> {
        let scheme = if self.use_https { "https" } else { "http" };
        let host = self.hostname.trim().trim_end_matches('/');
        if host.is_empty() {
            return Err(CoreError::Config {
                message: "hostname is empty".into(),
            });
        }
        Url::parse(&format!("{scheme}://{host}")).map_err(|e| CoreError::Config {
            message: format!("invalid hostname '{host}': {e}"),
        })
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.username.clone(), self.password.clone())
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        TransportConfig {
            tls,
            timeout: self.timeout,
        }
    }
}
