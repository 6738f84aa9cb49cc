// ── Router facade ──
//
// One configured router: a single HTTP client and session shared by the
// telemetry and firewall services.

use std::sync::Arc;

use asuswrt_api::{AsusClient, Session};
use tracing::debug;

use crate::config::RouterConfig;
use crate::error::CoreError;
use crate::service::{FirewallService, RouterService};

/// Entry point for consumers.
///
/// Cheaply cloneable. Clones share the session, so a login performed
/// through one is reused by all.
#[derive(Clone)]
pub struct Router {
    config: Arc<RouterConfig>,
    service: RouterService,
    firewall: FirewallService,
}

impl Router {
    /// Build a router with a fresh session. Does not contact the router;
    /// the first call logs in.
    pub fn new(config: RouterConfig) -> Result<Self, CoreError> {
        Self::with_session(config, Session::shared())
    }

    /// Build a router on an existing session, e.g. one shared with another
    /// `Router` for the same device.
    pub fn with_session(config: RouterConfig, session: Arc<Session>) -> Result<Self, CoreError> {
        let base_url = config.base_url()?;
        debug!(url = %base_url, write_enabled = config.write_enabled, "creating router client");

        let client = AsusClient::with_session(
            base_url,
            config.credentials(),
            &config.transport(),
            session,
        )?;

        Ok(Self {
            service: RouterService::new(client.clone()),
            firewall: FirewallService::new(client, config.write_enabled),
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Telemetry and settings reads.
    pub fn service(&self) -> &RouterService {
        &self.service
    }

    pub fn firewall(&self) -> &FirewallService {
        &self.firewall
    }

    pub fn session(&self) -> &Arc<Session> {
        self.service.client().session()
    }
}
