// ── Firewall domain types ──

use serde::{Deserialize, Serialize};

/// Protocol of an IPv4 inbound filter rule.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum IpV4Protocol {
    #[default]
    Unknown,
    Tcp,
    Udp,
}

/// Protocol of an IPv6 pinhole rule. `Other` matches a raw IP protocol
/// number in place of a port.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum IpV6Protocol {
    #[default]
    Unknown,
    Tcp,
    Udp,
    Both,
    Other,
}

macro_rules! protocol_wire_names {
    ($($ty:ty),+) => {$(
        impl $ty {
            /// Parse a firmware protocol name; anything unrecognized is `Unknown`.
            pub fn from_wire(raw: &str) -> Self {
                raw.trim().parse().unwrap_or_default()
            }

            /// Uppercase firmware name. `Unknown` has none and writes as empty.
            pub fn wire_name(self) -> &'static str {
                match self {
                    Self::Unknown => "",
                    other => other.into(),
                }
            }
        }
    )+};
}

protocol_wire_names!(IpV4Protocol, IpV6Protocol);

/// Inbound IPv4 filter rule (`filter_wllist`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirewallRuleIpV4 {
    /// Dotted-quad source address.
    pub source_ip: String,
    /// `"80"` or `"1000:2000"`.
    pub port_range: String,
    pub protocol: IpV4Protocol,
}

/// IPv6 pinhole rule (`ipv6_fw_rulelist`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirewallRuleIpV6 {
    pub service_name: String,
    /// CIDR, empty for any.
    pub remote_ip: String,
    pub local_ip: String,
    pub port_range: String,
    pub protocol: IpV6Protocol,
}

/// Basic firewall state. Rule order mirrors the router's lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirewallSettings {
    pub enabled: bool,
    pub ipv4_rules: Vec<FirewallRuleIpV4>,
    pub ipv6_rules: Vec<FirewallRuleIpV6>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protocol_names_are_case_insensitive() {
        assert_eq!(IpV4Protocol::from_wire("tcp"), IpV4Protocol::Tcp);
        assert_eq!(IpV4Protocol::from_wire(" UDP "), IpV4Protocol::Udp);
        assert_eq!(IpV6Protocol::from_wire("Both"), IpV6Protocol::Both);
        assert_eq!(IpV6Protocol::from_wire("other"), IpV6Protocol::Other);
    }

    #[test]
    fn unrecognized_protocol_is_unknown() {
        assert_eq!(IpV4Protocol::from_wire("BOTH"), IpV4Protocol::Unknown);
        assert_eq!(IpV4Protocol::from_wire(""), IpV4Protocol::Unknown);
        assert_eq!(IpV6Protocol::from_wire("icmp"), IpV6Protocol::Unknown);
    }

    #[test]
    fn wire_names_are_uppercase() {
        assert_eq!(IpV4Protocol::Tcp.wire_name(), "TCP");
        assert_eq!(IpV6Protocol::Both.wire_name(), "BOTH");
        assert_eq!(IpV6Protocol::Unknown.wire_name(), "");
    }
}
