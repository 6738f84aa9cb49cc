// Credentials and session-token cache
//
// The router hands out an opaque `asus_token` on login. A `Session` keeps
// exactly one token together with the credentials that produced it; a
// lookup with different credentials is a miss, which forces a fresh login.
// Several clients may share one `Session` through an `Arc`.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use secrecy::{ExposeSecret, SecretString};

/// Username/password pair used to log in to the router.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: SecretString) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }

    /// The `login_authorization` value: base64 of `username:password`.
    pub fn login_authorization(&self) -> String {
        let pair = format!("{}:{}", self.username, self.password.expose_secret());
        STANDARD.encode(pair.as_bytes())
    }

    fn same_as(&self, other: &Self) -> bool {
        self.username == other.username
            && self.password.expose_secret() == other.password.expose_secret()
    }
}

struct CachedToken {
    token: SecretString,
    credentials: Credentials,
}

/// Single cached login token, keyed by the credentials that obtained it.
///
/// Reads and writes are lock-free swaps: concurrent logins simply race and
/// the last one to finish wins. Nothing is held across a network call.
#[derive(Default)]
pub struct Session {
    current: ArcSwapOption<CachedToken>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience constructor for sharing one session between clients.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// The cached token, if one exists and was issued for `credentials`.
    pub fn token_for(&self, credentials: &Credentials) -> Option<SecretString> {
        let guard = self.current.load();
        let cached = guard.as_ref()?;
        if cached.token.expose_secret().is_empty() || !cached.credentials.same_as(credentials) {
            return None;
        }
        Some(cached.token.clone())
    }

    /// Replace the cached token (last write wins).
    pub fn store(&self, credentials: &Credentials, token: SecretString) {
        self.current.store(Some(Arc::new(CachedToken {
            token,
            credentials: credentials.clone(),
        })));
    }

    /// Drop the cached token so the next request logs in again.
    pub fn clear(&self) {
        self.current.store(None);
    }

    /// Whether any token is currently cached.
    pub fn has_token(&self) -> bool {
        self.current.load().is_some()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("has_token", &self.has_token())
            .finish_non_exhaustive()
    }
}
