// Router HTTP client
//
// Wraps `reqwest::Client` with router-specific URL construction, session
// cookie injection, cancellation, and the firmware's in-body error
// reporting. Endpoint methods live in `hooks.rs` as inherent methods to
// keep this module focused on transport mechanics.

use std::sync::Arc;

use reqwest::header::{CONTENT_TYPE, COOKIE};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};
use url::Url;

use crate::auth::{Credentials, Session};
use crate::error::Error;
use crate::transport::TransportConfig;

pub(crate) const LOGIN_PATH: &str = "/login.cgi";

/// Login response: `{"asus_token":"..."}`.
#[derive(Deserialize)]
struct LoginResponse {
    #[serde(default)]
    asus_token: Option<String>,
}

/// Raw HTTP client for the router's web-management API.
///
/// Cheaply cloneable. Every authenticated request goes through
/// [`authenticate`](Self::authenticate), which reuses the token cached in
/// the shared [`Session`] or logs in again when the credentials changed.
#[derive(Clone)]
pub struct AsusClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: reqwest::Client,
    base_url: Url,
    credentials: Credentials,
    session: Arc<Session>,
}

impl AsusClient {
    /// Create a client with its own fresh session.
    ///
    /// `base_url` is the router root, e.g. `http://192.168.50.1` or
    /// `https://router.asus.com:8443`.
    pub fn new(
        base_url: Url,
        credentials: Credentials,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        Self::with_session(base_url, credentials, transport, Session::shared())
    }

    /// Create a client that shares `session` with other clients.
    pub fn with_session(
        base_url: Url,
        credentials: Credentials,
        transport: &TransportConfig,
        session: Arc<Session>,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url, credentials, session))
    }

    /// Create a client around a pre-built `reqwest::Client`.
    ///
    /// The caller is responsible for the User-Agent; see
    /// [`USER_AGENT`](crate::transport::USER_AGENT).
    pub fn with_client(
        http: reqwest::Client,
        base_url: Url,
        credentials: Credentials,
        session: Arc<Session>,
    ) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                http,
                base_url,
                credentials,
                session,
            }),
        }
    }

    /// The router base URL.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// The credentials this client logs in with.
    pub fn credentials(&self) -> &Credentials {
        &self.inner.credentials
    }

    /// The session token cache backing this client.
    pub fn session(&self) -> &Arc<Session> {
        &self.inner.session
    }

    // ── Authentication ───────────────────────────────────────────────

    /// Log in and return a fresh token. The session cache is left untouched.
    ///
    /// `POST /login.cgi` with `login_authorization=<base64(user:pass)>`.
    /// A 400/401 status or an `error_status` body is reported as
    /// [`Error::Authentication`].
    pub async fn get_token(&self, cancel: &CancellationToken) -> Result<SecretString, Error> {
        let url = self.url(LOGIN_PATH)?;
        debug!(user = %self.inner.credentials.username, "logging in");

        let body = format!(
            "login_authorization={}",
            self.inner.credentials.login_authorization()
        );
        let builder = self
            .inner
            .http
            .post(url)
            .header(CONTENT_TYPE, "application/json; charset=utf-8")
            .body(body);

        let text = match self.send(builder, cancel).await {
            Ok(text) => text,
            Err(Error::Http { status, .. }) if status == 400 || status == 401 => {
                return Err(Error::Authentication {
                    message: format!("login rejected (HTTP {status})"),
                });
            }
            Err(Error::RouterStatus { status }) => {
                return Err(Error::Authentication {
                    message: format!("login rejected (error_status {status})"),
                });
            }
            Err(e) => return Err(e),
        };

        let resp: LoginResponse =
            serde_json::from_str(&text).map_err(|e| Error::deserialization(&e, &text))?;

        match resp.asus_token.filter(|t| !t.is_empty()) {
            Some(token) => {
                debug!("login successful");
                Ok(SecretString::from(token))
            }
            None => Err(Error::Authentication {
                message: "login response did not contain a token".into(),
            }),
        }
    }

    /// Return the cached token for the current credentials, logging in
    /// first if there is none or it belongs to other credentials.
    pub async fn authenticate(&self, cancel: &CancellationToken) -> Result<SecretString, Error> {
        if let Some(token) = self.inner.session.token_for(&self.inner.credentials) {
            trace!("reusing cached session token");
            return Ok(token);
        }

        debug!("no session token for current credentials");
        let token = self.get_token(cancel).await?;
        self.inner
            .session
            .store(&self.inner.credentials, token.clone());
        Ok(token)
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a full URL from a router-absolute path (query included).
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        let base = self.inner.base_url.as_str().trim_end_matches('/');
        Url::parse(&format!("{base}{path}")).map_err(Error::InvalidUrl)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Authenticated GET returning the raw body.
    pub async fn get_text(&self, path: &str, cancel: &CancellationToken) -> Result<String, Error> {
        let token = self.authenticate(cancel).await?;
        let url = self.url(path)?;
        debug!("GET {}", path);

        let builder = self.inner.http.get(url).header(COOKIE, session_cookie(&token));
        self.send(builder, cancel).await
    }

    /// Authenticated GET parsed as JSON.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        cancel: &CancellationToken,
    ) -> Result<T, Error> {
        let body = self.get_text(path, cancel).await?;
        serde_json::from_str(&body).map_err(|e| Error::deserialization(&e, &body))
    }

    /// Authenticated form-encoded POST returning the raw body.
    pub async fn post_form(
        &self,
        path: &str,
        form: &[(&str, String)],
        cancel: &CancellationToken,
    ) -> Result<String, Error> {
        let token = self.authenticate(cancel).await?;
        let url = self.url(path)?;
        debug!(fields = form.len(), "POST {}", path);

        let builder = self
            .inner
            .http
            .post(url)
            .header(COOKIE, session_cookie(&token))
            .form(form);
        self.send(builder, cancel).await
    }

    /// Send a request, racing it against `cancel`, and return the body.
    ///
    /// Non-success statuses become [`Error::Http`]; a body mentioning
    /// `error_status` becomes [`Error::RouterStatus`] whatever the status.
    async fn send(
        &self,
        builder: reqwest::RequestBuilder,
        cancel: &CancellationToken,
    ) -> Result<String, Error> {
        let request = async {
            let resp = builder.send().await.map_err(Error::Transport)?;
            let status = resp.status();

            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                let preview: String = body.chars().take(200).collect();
                return Err(Error::Http {
                    status: status.as_u16(),
                    message: preview,
                });
            }

            let body = resp.text().await.map_err(Error::Transport)?;
            trace!(bytes = body.len(), "response received");
            check_router_status(&body)?;
            Ok(body)
        };

        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(Error::Cancelled),
            result = request => result,
        }
    }
}

impl std::fmt::Debug for AsusClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsusClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("username", &self.inner.credentials.username)
            .finish_non_exhaustive()
    }
}

fn session_cookie(token: &SecretString) -> String {
    format!("asus_token={}", token.expose_secret())
}

/// Detect the firmware's `{"error_status": ...}` error shape.
fn check_router_status(body: &str) -> Result<(), Error> {
    if !body.to_ascii_lowercase().contains("error_status") {
        return Ok(());
    }

    let status = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error_status").map(|s| match s {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            })
        })
        .unwrap_or_else(|| "unknown".into());

    Err(Error::RouterStatus { status })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn router_status_string_and_number() {
        assert!(matches!(
            check_router_status(r#"{"error_status":"2"}"#),
            Err(Error::RouterStatus { status }) if status == "2"
        ));
        assert!(matches!(
            check_router_status(r#"{"error_status":7}"#),
            Err(Error::RouterStatus { status }) if status == "7"
        ));
    }

    #[test]
    fn router_status_detected_case_insensitively() {
        assert!(matches!(
            check_router_status("ERROR_STATUS: garbled"),
            Err(Error::RouterStatus { status }) if status == "unknown"
        ));
    }

    #[test]
    fn ordinary_body_passes() {
        assert!(check_router_status(r#"{"uptime":"x"}"#).is_ok());
    }
}
