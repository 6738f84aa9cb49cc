// Router endpoints
//
// Status data comes from `appGet.cgi?hook=<name>()`, one hook per call.
// Configuration values are read one NVRAM key at a time through the
// `nvram_get(<key>)` hook. Pages and the apply endpoint are plain paths.

use futures_util::future::try_join_all;
use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::client::AsusClient;
use crate::error::Error;

/// Hook names as the firmware spells them.
pub mod hook {
    pub const UPTIME: &str = "uptime";
    pub const MEMORY_USAGE: &str = "memory_usage";
    pub const CPU_USAGE: &str = "cpu_usage";
    pub const CLIENT_LIST: &str = "get_clientlist";
    pub const NETDEV: &str = "netdev(appobj)";
    pub const WANLINK: &str = "wanlink()";
    pub const DHCP_LEASES: &str = "dhcpLeaseMacList";

    /// `nvram_get(<key>)`
    pub fn nvram_get(key: &str) -> String {
        format!("nvram_get({key})")
    }
}

pub const FIREWALL_PAGE_PATH: &str = "/Advanced_BasicFirewall_Content.asp";
pub const APPLY_PATH: &str = "/start_apply.htm";

/// `/appGet.cgi?hook=<name>()`
pub fn hook_path(name: &str) -> String {
    format!("/appGet.cgi?hook={name}()")
}

/// `/getWebHistory.asp?client=<mac>&page=<n>`
pub fn web_history_path(client_mac: Option<&str>, page: u32) -> String {
    let client = client_mac.filter(|mac| !mac.is_empty()).unwrap_or("all");
    let page = page.max(1);
    format!("/getWebHistory.asp?client={client}&page={page}")
}

impl AsusClient {
    /// Fetch a hook and return the body untouched.
    ///
    /// Several hooks answer with text that is not valid JSON; callers
    /// run it through [`extract`](crate::extract) first.
    pub async fn hook(&self, name: &str, cancel: &CancellationToken) -> Result<String, Error> {
        self.get_text(&hook_path(name), cancel).await
    }

    /// Fetch a hook whose body is a JSON object.
    pub async fn hook_json(
        &self,
        name: &str,
        cancel: &CancellationToken,
    ) -> Result<Map<String, Value>, Error> {
        self.get_json(&hook_path(name), cancel).await
    }

    /// Read several NVRAM keys concurrently and merge the single-key
    /// objects into one.
    ///
    /// Requests are independent; any failure fails the whole read.
    pub async fn nvram_get(
        &self,
        keys: &[&str],
        cancel: &CancellationToken,
    ) -> Result<Map<String, Value>, Error> {
        debug!(count = keys.len(), "reading nvram keys");

        let requests = keys
            .iter()
            .map(|key| self.hook_json_owned(hook::nvram_get(key), cancel));
        let responses = try_join_all(requests).await?;

        let mut merged = Map::new();
        for response in responses {
            merged.extend(response);
        }
        Ok(merged)
    }

    async fn hook_json_owned(
        &self,
        name: String,
        cancel: &CancellationToken,
    ) -> Result<Map<String, Value>, Error> {
        self.hook_json(&name, cancel).await
    }

    /// Fetch one page of per-client web history as raw script text.
    ///
    /// `client_mac` defaults to `all`; `page` is clamped to at least 1.
    pub async fn web_history(
        &self,
        client_mac: Option<&str>,
        page: u32,
        cancel: &CancellationToken,
    ) -> Result<String, Error> {
        self.get_text(&web_history_path(client_mac, page), cancel)
            .await
    }

    /// Fetch the basic firewall settings page (HTML with inline script).
    pub async fn firewall_page(&self, cancel: &CancellationToken) -> Result<String, Error> {
        self.get_text(FIREWALL_PAGE_PATH, cancel).await
    }

    /// Submit a settings form to `/start_apply.htm`.
    ///
    /// The router's answer says nothing about whether the change took;
    /// re-read the affected settings to confirm.
    pub async fn apply(
        &self,
        form: &[(&str, String)],
        cancel: &CancellationToken,
    ) -> Result<String, Error> {
        debug!("applying settings");
        self.post_form(APPLY_PATH, form, cancel).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hook_paths_match_firmware() {
        assert_eq!(hook_path(hook::UPTIME), "/appGet.cgi?hook=uptime()");
        assert_eq!(hook_path(hook::NETDEV), "/appGet.cgi?hook=netdev(appobj)()");
        assert_eq!(
            hook_path(&hook::nvram_get("lan_ipaddr")),
            "/appGet.cgi?hook=nvram_get(lan_ipaddr)()"
        );
    }

    #[test]
    fn web_history_defaults() {
        assert_eq!(web_history_path(None, 0), "/getWebHistory.asp?client=all&page=1");
        assert_eq!(web_history_path(Some(""), 3), "/getWebHistory.asp?client=all&page=3");
        assert_eq!(
            web_history_path(Some("AA:BB:CC:DD:EE:FF"), 2),
            "/getWebHistory.asp?client=AA:BB:CC:DD:EE:FF&page=2"
        );
    }
}
