// ── Router telemetry service ──
//
// Read-only operations. Each call authenticates through the shared
// session, fetches one hook (or a batch of NVRAM keys) and decodes it.

use asuswrt_api::AsusClient;
use asuswrt_api::hooks::hook;
use secrecy::SecretString;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::decode;
use crate::error::CoreError;
use crate::model::{
    Client, CpuUsage, DhcpLease, LAN_STATUS_KEYS, LanStatus, MemoryUsage, ROUTER_SETTINGS_KEYS,
    RouterSettings, Traffic, Uptime, WanStatus, WebHistoryEntry,
};

/// Telemetry and settings reads.
#[derive(Clone)]
pub struct RouterService {
    client: AsusClient,
}

impl RouterService {
    pub fn new(client: AsusClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &AsusClient {
        &self.client
    }

    /// Log in and return a fresh token. The session cache is left alone.
    pub async fn get_token(&self, cancel: &CancellationToken) -> Result<SecretString, CoreError> {
        Ok(self.client.get_token(cancel).await?)
    }

    /// `None` when the router's answer has no uptime line.
    pub async fn uptime(&self, cancel: &CancellationToken) -> Result<Option<Uptime>, CoreError> {
        let body = self.client.hook(hook::UPTIME, cancel).await?;
        Ok(decode::uptime(&body))
    }

    pub async fn memory_usage(&self, cancel: &CancellationToken) -> Result<MemoryUsage, CoreError> {
        let body = self.client.hook(hook::MEMORY_USAGE, cancel).await?;
        decode::memory_usage(&body)
    }

    pub async fn cpu_usage(&self, cancel: &CancellationToken) -> Result<CpuUsage, CoreError> {
        let body = self.client.hook(hook::CPU_USAGE, cancel).await?;
        decode::cpu_usage(&body)
    }

    /// Every client the router knows, online or not.
    pub async fn clients(&self, cancel: &CancellationToken) -> Result<Vec<Client>, CoreError> {
        let body = self.client.hook(hook::CLIENT_LIST, cancel).await?;
        let clients = decode::clients(&body)?;
        debug!(count = clients.len(), "fetched clients");
        Ok(clients)
    }

    pub async fn traffic(&self, cancel: &CancellationToken) -> Result<Traffic, CoreError> {
        let body = self.client.hook(hook::NETDEV, cancel).await?;
        decode::traffic(&body)
    }

    /// `None` when the router returned no WAN getters.
    pub async fn wan_status(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Option<WanStatus>, CoreError> {
        let body = self.client.hook(hook::WANLINK, cancel).await?;
        decode::wan_status(&body)
    }

    /// Issues one request per setting, concurrently.
    pub async fn router_settings(
        &self,
        cancel: &CancellationToken,
    ) -> Result<RouterSettings, CoreError> {
        let values = self.client.nvram_get(&ROUTER_SETTINGS_KEYS, cancel).await?;
        decode::from_nvram(values)
    }

    pub async fn lan_status(&self, cancel: &CancellationToken) -> Result<LanStatus, CoreError> {
        let values = self.client.nvram_get(&LAN_STATUS_KEYS, cancel).await?;
        decode::from_nvram(values)
    }

    pub async fn dhcp_leases(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<DhcpLease>, CoreError> {
        let body = self.client.hook(hook::DHCP_LEASES, cancel).await?;
        decode::dhcp_leases(&body)
    }

    /// One page of visited domains. `client_mac` of `None` means all
    /// clients; pages start at 1.
    pub async fn web_history(
        &self,
        client_mac: Option<&str>,
        page: u32,
        cancel: &CancellationToken,
    ) -> Result<Vec<WebHistoryEntry>, CoreError> {
        let body = self.client.web_history(client_mac, page, cancel).await?;
        decode::web_history(&body)
    }
}
