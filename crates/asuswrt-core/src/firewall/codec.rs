// ── Rule list codec ──
//
// The firmware stores each rule list as one string: every rule starts with
// `<` and its fields are separated by `>`. The copy embedded in the settings
// page is additionally URL-encoded.
//
//   IPv4 (`filter_wllist`):     <PROTO>>source>>>ports
//   IPv6 (`ipv6_fw_rulelist`):  <service>remote>local>ports>PROTO
//
// IPv4 entries keep two router-internal slots empty; they are ignored on
// read and written back empty.

use std::fmt::Write as _;

use percent_encoding::percent_decode_str;

use crate::model::{FirewallRuleIpV4, FirewallRuleIpV6, IpV4Protocol, IpV6Protocol};

const RULE_START: char = '<';
const FIELD_SEP: char = '>';

/// Undo the page's URL encoding (`+` is a space).
fn url_decode(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

/// Split a decoded list into per-rule field vectors.
fn entries(decoded: &str) -> impl Iterator<Item = Vec<&str>> {
    decoded
        .split(RULE_START)
        .filter(|entry| !entry.is_empty())
        .map(|entry| entry.split(FIELD_SEP).collect())
}

fn field(fields: &[&str], index: usize) -> String {
    fields.get(index).copied().unwrap_or_default().to_owned()
}

/// Parse a URL-encoded IPv4 rule list as found in the settings page.
pub fn parse_ipv4_rules(raw: &str) -> Vec<FirewallRuleIpV4> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    decode_ipv4_rules(&url_decode(raw))
}

/// Parse a URL-encoded IPv6 rule list as found in the settings page.
pub fn parse_ipv6_rules(raw: &str) -> Vec<FirewallRuleIpV6> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    decode_ipv6_rules(&url_decode(raw))
}

/// Split an IPv4 list in wire form, the inverse of [`serialize_ipv4_rules`].
pub fn decode_ipv4_rules(wire: &str) -> Vec<FirewallRuleIpV4> {
    entries(wire)
        .map(|fields| FirewallRuleIpV4 {
            protocol: IpV4Protocol::from_wire(fields.first().copied().unwrap_or_default()),
            source_ip: field(&fields, 2),
            port_range: field(&fields, 5),
        })
        .collect()
}

/// Split an IPv6 list in wire form, the inverse of [`serialize_ipv6_rules`].
pub fn decode_ipv6_rules(wire: &str) -> Vec<FirewallRuleIpV6> {
    entries(wire)
        .map(|fields| FirewallRuleIpV6 {
            service_name: field(&fields, 0),
            remote_ip: field(&fields, 1),
            local_ip: field(&fields, 2),
            port_range: field(&fields, 3),
            protocol: IpV6Protocol::from_wire(fields.get(4).copied().unwrap_or_default()),
        })
        .collect()
}

/// Encode a full IPv4 list for `filter_wllist`.
pub fn serialize_ipv4_rules(rules: &[FirewallRuleIpV4]) -> String {
    rules.iter().fold(String::new(), |mut out, rule| {
        let _ = write!(
            out,
            "<{}>>{}>>>{}",
            rule.protocol.wire_name(),
            rule.source_ip,
            rule.port_range
        );
        out
    })
}

/// Encode a full IPv6 list for `ipv6_fw_rulelist`.
pub fn serialize_ipv6_rules(rules: &[FirewallRuleIpV6]) -> String {
    rules.iter().fold(String::new(), |mut out, rule| {
        let _ = write!(
            out,
            "<{}>{}>{}>{}>{}",
            rule.service_name,
            rule.remote_ip,
            rule.local_ip,
            rule.port_range,
            rule.protocol.wire_name()
        );
        out
    })
}
