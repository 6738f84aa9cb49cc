use serde::{Deserialize, Serialize};

use super::lenient;

/// Assorted router configuration, one NVRAM key per field.
///
/// Values are passed through as the firmware stores them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterSettings {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub time_zone: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub time_zone_dst: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub time_zone_x: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub time_zone_dstoff: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub ntp_server0: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub acs_dfs: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub productid: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub apps_sq: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub lan_hwaddr: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub lan_ipaddr: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub lan_proto: Option<String>,
    #[serde(rename(deserialize = "x_Setting"), default, deserialize_with = "lenient::opt_string")]
    pub x_setting: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub label_mac: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub lan_netmask: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub lan_gateway: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub http_enable: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub https_lanport: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub wl0_country_code: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub wl1_country_code: Option<String>,
}

/// NVRAM keys backing [`RouterSettings`].
pub const ROUTER_SETTINGS_KEYS: [&str; 19] = [
    "time_zone",
    "time_zone_dst",
    "time_zone_x",
    "time_zone_dstoff",
    "ntp_server0",
    "acs_dfs",
    "productid",
    "apps_sq",
    "lan_hwaddr",
    "lan_ipaddr",
    "lan_proto",
    "x_Setting",
    "label_mac",
    "lan_netmask",
    "lan_gateway",
    "http_enable",
    "https_lanport",
    "wl0_country_code",
    "wl1_country_code",
];
