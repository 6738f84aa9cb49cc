// ── WAN / LAN / DHCP ──

use serde::{Deserialize, Serialize};

use super::lenient;

/// WAN link state from the `wanlink()` getter functions.
///
/// The `x*` fields describe the secondary (PPPoE/L2TP underlay) link.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WanStatus {
    #[serde(rename(deserialize = "wanlink_status"), default, with = "crate::flag")]
    pub is_online: bool,
    #[serde(
        rename(deserialize = "wanlink_statusstr"),
        default,
        deserialize_with = "lenient::opt_string"
    )]
    pub status: Option<String>,
    #[serde(
        rename(deserialize = "wanlink_type"),
        default,
        deserialize_with = "lenient::opt_string"
    )]
    pub link_type: Option<String>,
    #[serde(
        rename(deserialize = "wanlink_ipaddr"),
        default,
        deserialize_with = "lenient::opt_string"
    )]
    pub ip_address: Option<String>,
    #[serde(
        rename(deserialize = "wanlink_netmask"),
        default,
        deserialize_with = "lenient::opt_string"
    )]
    pub netmask: Option<String>,
    #[serde(
        rename(deserialize = "wanlink_gateway"),
        default,
        deserialize_with = "lenient::opt_string"
    )]
    pub gateway: Option<String>,
    #[serde(rename(deserialize = "wanlink_dns"), default, deserialize_with = "lenient::opt_string")]
    pub dns: Option<String>,
    /// Seconds.
    #[serde(rename(deserialize = "wanlink_lease"), default, deserialize_with = "lenient::int")]
    pub lease: i64,
    /// Seconds.
    #[serde(rename(deserialize = "wanlink_expires"), default, deserialize_with = "lenient::int")]
    pub expires: i64,
    #[serde(rename(deserialize = "is_private_subnet"), default, with = "crate::flag")]
    pub is_private_subnet: bool,

    #[serde(
        rename(deserialize = "wanlink_xipaddr"),
        default,
        deserialize_with = "lenient::opt_string"
    )]
    pub x_ip_address: Option<String>,
    #[serde(
        rename(deserialize = "wanlink_xnetmask"),
        default,
        deserialize_with = "lenient::opt_string"
    )]
    pub x_netmask: Option<String>,
    #[serde(
        rename(deserialize = "wanlink_xgateway"),
        default,
        deserialize_with = "lenient::opt_string"
    )]
    pub x_gateway: Option<String>,
    #[serde(rename(deserialize = "wanlink_xlease"), default, deserialize_with = "lenient::int")]
    pub x_lease: i64,
    #[serde(rename(deserialize = "wanlink_xexpires"), default, deserialize_with = "lenient::int")]
    pub x_expires: i64,
}

/// LAN interface settings read from NVRAM.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanStatus {
    #[serde(rename(deserialize = "lan_hwaddr"), default, deserialize_with = "lenient::opt_string")]
    pub hwaddr: Option<String>,
    #[serde(rename(deserialize = "lan_ipaddr"), default, deserialize_with = "lenient::opt_string")]
    pub ip_address: Option<String>,
    #[serde(rename(deserialize = "lan_proto"), default, deserialize_with = "lenient::opt_string")]
    pub proto: Option<String>,
    #[serde(rename(deserialize = "lan_netmask"), default, deserialize_with = "lenient::opt_string")]
    pub netmask: Option<String>,
    #[serde(rename(deserialize = "lan_gateway"), default, deserialize_with = "lenient::opt_string")]
    pub gateway: Option<String>,
}

/// NVRAM keys backing [`LanStatus`].
pub const LAN_STATUS_KEYS: [&str; 5] = [
    "lan_hwaddr",
    "lan_ipaddr",
    "lan_proto",
    "lan_netmask",
    "lan_gateway",
];

/// One entry of the DHCP lease table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DhcpLease {
    pub mac: String,
    pub hostname: Option<String>,
}
