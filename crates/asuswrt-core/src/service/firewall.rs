// ── Firewall service ──

use asuswrt_api::AsusClient;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::decode;
use crate::error::CoreError;
use crate::firewall::{serialize_ipv4_rules, serialize_ipv6_rules, validate_rule_lists};
use crate::flag;
use crate::model::{FirewallRuleIpV4, FirewallRuleIpV6, FirewallSettings};

mod form {
    pub const ACTION_MODE: &str = "action_mode";
    pub const ACTION_SCRIPT: &str = "action_script";
    pub const ENABLED: &str = "fw_enable_x";
    pub const IPV6_RULES: &str = "ipv6_fw_rulelist";
    pub const IPV4_RULES: &str = "filter_wllist";
}

/// Basic firewall reads and writes.
#[derive(Clone)]
pub struct FirewallService {
    client: AsusClient,
    write_enabled: bool,
}

impl FirewallService {
    pub fn new(client: AsusClient, write_enabled: bool) -> Self {
        Self {
            client,
            write_enabled,
        }
    }

    pub async fn firewall_settings(
        &self,
        cancel: &CancellationToken,
    ) -> Result<FirewallSettings, CoreError> {
        let body = self.client.firewall_page(cancel).await?;
        let settings = decode::firewall_settings(&body)?;
        debug!(
            enabled = settings.enabled,
            ipv4 = settings.ipv4_rules.len(),
            ipv6 = settings.ipv6_rules.len(),
            "fetched firewall settings"
        );
        Ok(settings)
    }

    /// Replace firewall state. Each argument left as `None` is not touched;
    /// a supplied rule list replaces the router's list entirely.
    ///
    /// Everything is validated before anything is sent. The router does not
    /// report whether the change was applied; re-read with
    /// [`firewall_settings`](Self::firewall_settings) to confirm.
    pub async fn set_firewall_settings(
        &self,
        enabled: Option<bool>,
        ipv6_rules: Option<&[FirewallRuleIpV6]>,
        ipv4_rules: Option<&[FirewallRuleIpV4]>,
        cancel: &CancellationToken,
    ) -> Result<(), CoreError> {
        if !self.write_enabled {
            return Err(CoreError::WriteDisabled);
        }
        validate_rule_lists(ipv4_rules, ipv6_rules)?;

        let mut payload = vec![
            (form::ACTION_MODE, "apply".to_owned()),
            (form::ACTION_SCRIPT, "restart_firewall".to_owned()),
        ];
        if let Some(enabled) = enabled {
            payload.push((form::ENABLED, flag::encode(enabled).to_owned()));
        }
        if let Some(rules) = ipv6_rules {
            payload.push((form::IPV6_RULES, serialize_ipv6_rules(rules)));
        }
        if let Some(rules) = ipv4_rules {
            payload.push((form::IPV4_RULES, serialize_ipv4_rules(rules)));
        }

        info!(
            enabled = ?enabled,
            ipv6 = ?ipv6_rules.map(<[_]>::len),
            ipv4 = ?ipv4_rules.map(<[_]>::len),
            "applying firewall settings"
        );
        self.client.apply(&payload, cancel).await?;
        Ok(())
    }
}
