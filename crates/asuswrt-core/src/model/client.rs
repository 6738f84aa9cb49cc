// ── Client domain types ──

use serde::{Deserialize, Serialize};

use super::lenient;

/// A device known to the router, from the `get_clientlist` hook.
///
/// Most attributes are firmware strings passed through untouched; only the
/// `is*` flags are normalized to `bool`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase"))]
#[allow(clippy::struct_excessive_bools)]
pub struct Client {
    #[serde(default, deserialize_with = "lenient::string")]
    pub mac: String,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub ip: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub nick_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub vendor: Option<String>,

    #[serde(rename(deserialize = "type"), default, deserialize_with = "lenient::opt_string")]
    pub client_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub default_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub dpi_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub dpi_device: Option<String>,

    // Connection
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub from: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub mac_repeat: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub ip_method: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub op_mode: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub ssid: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub rssi: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub wl_connect_time: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub cur_tx: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub cur_rx: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub total_tx: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub total_rx: Option<String>,

    // Flags
    #[serde(default, with = "crate::flag")]
    pub is_online: bool,
    #[serde(rename(deserialize = "isWL"), default, with = "crate::flag")]
    pub is_wl: bool,
    #[serde(rename(deserialize = "isGN"), default, with = "crate::flag")]
    pub is_gn: bool,
    #[serde(default, with = "crate::flag")]
    pub is_gateway: bool,
    #[serde(default, with = "crate::flag")]
    pub is_web_server: bool,
    #[serde(default, with = "crate::flag")]
    pub is_printer: bool,
    #[serde(rename(deserialize = "isITunes"), default, with = "crate::flag")]
    pub is_itunes: bool,
    #[serde(default, with = "crate::flag")]
    pub is_login: bool,

    // Policy
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub group: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub callback: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub keeparp: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub qos_level: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub wtfast: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub internet_mode: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub internet_state: Option<String>,
    #[serde(rename(deserialize = "ROG"), default, deserialize_with = "lenient::opt_string")]
    pub rog: Option<String>,

    // AiMesh
    #[serde(
        rename(deserialize = "amesh_bind_mac"),
        default,
        deserialize_with = "lenient::opt_string"
    )]
    pub amesh_bind_mac: Option<String>,
    #[serde(
        rename(deserialize = "amesh_bind_band"),
        default,
        deserialize_with = "lenient::opt_string"
    )]
    pub amesh_bind_band: Option<String>,
}

impl Client {
    /// Nickname, else name, else MAC.
    pub fn display_name(&self) -> &str {
        [self.nick_name.as_deref(), self.name.as_deref()]
            .into_iter()
            .flatten()
            .find(|s| !s.trim().is_empty())
            .unwrap_or(&self.mac)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_prefers_nickname() {
        let client = Client {
            mac: "AA:BB:CC:DD:EE:FF".into(),
            name: Some("android-1234".into()),
            nick_name: Some("Kitchen tablet".into()),
            ..Client::default()
        };
        assert_eq!(client.display_name(), "Kitchen tablet");
    }

    #[test]
    fn display_name_skips_blank_values() {
        let client = Client {
            mac: "AA:BB:CC:DD:EE:FF".into(),
            name: Some("android-1234".into()),
            nick_name: Some("  ".into()),
            ..Client::default()
        };
        assert_eq!(client.display_name(), "android-1234");

        let bare = Client {
            mac: "AA:BB:CC:DD:EE:FF".into(),
            ..Client::default()
        };
        assert_eq!(bare.display_name(), "AA:BB:CC:DD:EE:FF");
    }
}
