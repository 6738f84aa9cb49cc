// ── Firewall rule validation ──
//
// Each validator checks its rule field by field and stops at the first
// violation. The order of checks is part of the contract: callers surface
// that single message to users.

use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;
use std::sync::LazyLock;

use ipnetwork::Ipv6Network;
use regex::Regex;
use thiserror::Error;

use crate::error::{CoreError, RuleListKind};
use crate::model::{FirewallRuleIpV4, FirewallRuleIpV6, IpV6Protocol};

/// The router stores at most this many rules per list.
pub const MAX_RULES: usize = 128;

const FORBIDDEN_CHARS: [char; 4] = ['<', '>', '\'', '%'];

const MIN_PORT: i32 = 1;
const MAX_PORT: i32 = 65535;
/// `Other` rules carry an IP protocol number, not a port.
const MAX_PROTOCOL_NUMBER: i32 = 255;

/// First failed check of a rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleViolation {
    #[error("{0} is required.")]
    Required(&'static str),

    #[error("A valid {0} is required.")]
    Invalid(&'static str),

    #[error("{0} cannot contain these characters '<,>,',%'.")]
    ForbiddenChars(&'static str),

    #[error("The port must be between {min} and {max}.")]
    PortOutOfRange { min: i32, max: i32 },

    #[error("The end port ({end}) must be greater than the start port ({start}).")]
    EndPortNotGreater { start: i32, end: i32 },
}

mod field {
    pub const SOURCE_IP: &str = "Source IP";
    pub const LOCAL_IP: &str = "Local IP";
    pub const REMOTE_IP: &str = "Remote IP";
    pub const SERVICE_NAME: &str = "Service name";
    pub const PORT_RANGE: &str = "Port range";
    pub const PROTOCOL: &str = "Protocol";
}

// ── Port ranges ──────────────────────────────────────────────────────

static PORT_RANGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{1,5}):([0-9]{1,5})$").expect("port range pattern"));

/// A parsed `portRange` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortRange {
    Single(i32),
    Range { start: i32, end: i32 },
}

impl PortRange {
    fn ports(self) -> impl Iterator<Item = i32> {
        let (first, second) = match self {
            Self::Single(port) => (port, None),
            Self::Range { start, end } => (start, Some(end)),
        };
        std::iter::once(first).chain(second)
    }
}

/// Returned when a port field is neither a number nor `start:end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("not a port or port range")]
pub struct InvalidPortRange;

impl FromStr for PortRange {
    type Err = InvalidPortRange;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(InvalidPortRange);
        }
        if let Ok(port) = raw.parse::<i32>() {
            return Ok(Self::Single(port));
        }
        let caps = PORT_RANGE_RE.captures(raw).ok_or(InvalidPortRange)?;
        let start = caps[1].parse().map_err(|_| InvalidPortRange)?;
        let end = caps[2].parse().map_err(|_| InvalidPortRange)?;
        Ok(Self::Range { start, end })
    }
}

impl fmt::Display for PortRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(port) => write!(f, "{port}"),
            Self::Range { start, end } => write!(f, "{start}:{end}"),
        }
    }
}

fn check_ports(raw: &str, max: i32) -> Result<(), RuleViolation> {
    let range: PortRange = raw
        .parse()
        .map_err(|_| RuleViolation::Invalid(field::PORT_RANGE))?;

    if range.ports().any(|port| !(MIN_PORT..=max).contains(&port)) {
        return Err(RuleViolation::PortOutOfRange { min: MIN_PORT, max });
    }
    if let PortRange::Range { start, end } = range {
        if end <= start {
            return Err(RuleViolation::EndPortNotGreater { start, end });
        }
    }
    Ok(())
}

// ── Rules ────────────────────────────────────────────────────────────

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn has_forbidden_char(value: &str) -> bool {
    value.contains(FORBIDDEN_CHARS)
}

/// Strict IPv6 CIDR: an address and an explicit prefix length.
fn is_ipv6_cidr(value: &str) -> bool {
    let value = value.trim();
    value.contains('/') && value.parse::<Ipv6Network>().is_ok()
}

/// Validate an IPv6 pinhole rule.
pub fn validate_ipv6(rule: &FirewallRuleIpV6) -> Result<(), RuleViolation> {
    if is_blank(&rule.local_ip) {
        return Err(RuleViolation::Required(field::LOCAL_IP));
    }
    if rule.local_ip.trim().parse::<Ipv6Addr>().is_err() {
        return Err(RuleViolation::Invalid(field::LOCAL_IP));
    }
    if is_blank(&rule.port_range) {
        return Err(RuleViolation::Required(field::PORT_RANGE));
    }
    if rule.protocol == IpV6Protocol::Unknown {
        return Err(RuleViolation::Invalid(field::PROTOCOL));
    }
    if !is_blank(&rule.remote_ip) && !is_ipv6_cidr(&rule.remote_ip) {
        return Err(RuleViolation::Invalid(field::REMOTE_IP));
    }
    if has_forbidden_char(&rule.service_name) {
        return Err(RuleViolation::ForbiddenChars(field::SERVICE_NAME));
    }

    let max = if rule.protocol == IpV6Protocol::Other {
        MAX_PROTOCOL_NUMBER
    } else {
        MAX_PORT
    };
    check_ports(&rule.port_range, max)
}

/// Validate an IPv4 inbound filter rule.
pub fn validate_ipv4(rule: &FirewallRuleIpV4) -> Result<(), RuleViolation> {
    if is_blank(&rule.source_ip) {
        return Err(RuleViolation::Required(field::SOURCE_IP));
    }
    if rule.source_ip.trim().parse::<Ipv4Addr>().is_err() {
        return Err(RuleViolation::Invalid(field::SOURCE_IP));
    }
    if is_blank(&rule.port_range) {
        return Err(RuleViolation::Required(field::PORT_RANGE));
    }
    if rule.protocol == crate::model::IpV4Protocol::Unknown {
        return Err(RuleViolation::Invalid(field::PROTOCOL));
    }
    check_ports(&rule.port_range, MAX_PORT)
}

/// Check both replacement lists before anything is sent.
///
/// List sizes are checked first, then every rule in order; the first
/// problem found is returned tagged with the list it came from.
pub fn validate_rule_lists(
    ipv4: Option<&[FirewallRuleIpV4]>,
    ipv6: Option<&[FirewallRuleIpV6]>,
) -> Result<(), CoreError> {
    check_count(RuleListKind::Ipv6, ipv6.map_or(0, <[_]>::len))?;
    check_count(RuleListKind::Ipv4, ipv4.map_or(0, <[_]>::len))?;

    for rule in ipv6.unwrap_or_default() {
        validate_ipv6(rule).map_err(|violation| CoreError::Validation {
            argument: RuleListKind::Ipv6,
            violation,
        })?;
    }
    for rule in ipv4.unwrap_or_default() {
        validate_ipv4(rule).map_err(|violation| CoreError::Validation {
            argument: RuleListKind::Ipv4,
            violation,
        })?;
    }
    Ok(())
}

fn check_count(argument: RuleListKind, count: usize) -> Result<(), CoreError> {
    if count > MAX_RULES {
        return Err(CoreError::TooManyRules {
            argument,
            max: MAX_RULES,
            count,
        });
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::IpV4Protocol;

    fn ipv4(source_ip: &str, port_range: &str, protocol: IpV4Protocol) -> FirewallRuleIpV4 {
        FirewallRuleIpV4 {
            source_ip: source_ip.into(),
            port_range: port_range.into(),
            protocol,
        }
    }

    fn ipv6(port_range: &str, protocol: IpV6Protocol) -> FirewallRuleIpV6 {
        FirewallRuleIpV6 {
            service_name: "ssh".into(),
            remote_ip: "2001:db8::/32".into(),
            local_ip: "2001:db8::10".into(),
            port_range: port_range.into(),
            protocol,
        }
    }

    // ── Port parsing ──

    #[test]
    fn port_parsing() {
        assert_eq!("80".parse(), Ok(PortRange::Single(80)));
        assert_eq!("100:200".parse(), Ok(PortRange::Range { start: 100, end: 200 }));
        assert_eq!("1:F".parse::<PortRange>(), Err(InvalidPortRange));
        assert_eq!("".parse::<PortRange>(), Err(InvalidPortRange));
        assert_eq!("1:123456".parse::<PortRange>(), Err(InvalidPortRange));
        assert_eq!("100-200".parse::<PortRange>(), Err(InvalidPortRange));
    }

    #[test]
    fn port_range_display_matches_wire_form() {
        assert_eq!(PortRange::Range { start: 1, end: 2 }.to_string(), "1:2");
        assert_eq!(PortRange::Single(443).to_string(), "443");
    }

    // ── IPv4 ──

    #[test]
    fn valid_ipv4_rule() {
        assert_eq!(validate_ipv4(&ipv4("192.168.255.255", "3333:3334", IpV4Protocol::Tcp)), Ok(()));
        assert_eq!(validate_ipv4(&ipv4("10.0.0.1", "22", IpV4Protocol::Udp)), Ok(()));
    }

    #[test]
    fn ipv4_unknown_protocol_names_protocol() {
        let err = validate_ipv4(&ipv4("192.168.255.255", "3333:3334", IpV4Protocol::Unknown))
            .unwrap_err();
        assert_eq!(err, RuleViolation::Invalid("Protocol"));
        assert!(err.to_string().contains("Protocol"));
    }

    #[test]
    fn ipv4_reversed_range() {
        let err =
            validate_ipv4(&ipv4("192.168.255.255", "5000:4999", IpV4Protocol::Tcp)).unwrap_err();
        assert_eq!(err, RuleViolation::EndPortNotGreater { start: 5000, end: 4999 });
        assert_eq!(
            err.to_string(),
            "The end port (4999) must be greater than the start port (5000)."
        );
    }

    #[test]
    fn ipv4_equal_range_is_rejected() {
        let err = validate_ipv4(&ipv4("10.0.0.1", "80:80", IpV4Protocol::Tcp)).unwrap_err();
        assert_eq!(err, RuleViolation::EndPortNotGreater { start: 80, end: 80 });
    }

    #[test]
    fn ipv4_check_order() {
        assert_eq!(
            validate_ipv4(&ipv4("", "", IpV4Protocol::Unknown)),
            Err(RuleViolation::Required("Source IP"))
        );
        assert_eq!(
            validate_ipv4(&ipv4("300.1.1.1", "", IpV4Protocol::Unknown)),
            Err(RuleViolation::Invalid("Source IP"))
        );
        assert_eq!(
            validate_ipv4(&ipv4("10.0.0.1", " ", IpV4Protocol::Unknown)),
            Err(RuleViolation::Required("Port range"))
        );
        assert_eq!(
            validate_ipv4(&ipv4("10.0.0.1", "abc", IpV4Protocol::Tcp)),
            Err(RuleViolation::Invalid("Port range"))
        );
        assert_eq!(
            validate_ipv4(&ipv4("10.0.0.1", "0", IpV4Protocol::Tcp)),
            Err(RuleViolation::PortOutOfRange { min: 1, max: 65535 })
        );
    }

    // ── IPv6 ──

    #[test]
    fn valid_ipv6_rule() {
        assert_eq!(validate_ipv6(&ipv6("22", IpV6Protocol::Tcp)), Ok(()));
        assert_eq!(validate_ipv6(&ipv6("255", IpV6Protocol::Other)), Ok(()));
        assert_eq!(validate_ipv6(&ipv6("1000:2000", IpV6Protocol::Both)), Ok(()));
    }

    #[test]
    fn ipv6_other_protocol_caps_at_255() {
        assert_eq!(
            validate_ipv6(&ipv6("256", IpV6Protocol::Other)),
            Err(RuleViolation::PortOutOfRange { min: 1, max: 255 })
        );
    }

    #[test]
    fn ipv6_tcp_caps_at_65535() {
        assert_eq!(
            validate_ipv6(&ipv6("65536", IpV6Protocol::Tcp)),
            Err(RuleViolation::PortOutOfRange { min: 1, max: 65535 })
        );
        assert_eq!(
            validate_ipv6(&ipv6("100:65536", IpV6Protocol::Udp)),
            Err(RuleViolation::PortOutOfRange { min: 1, max: 65535 })
        );
    }

    #[test]
    fn ipv6_remote_ip_must_be_cidr() {
        let mut rule = ipv6("22", IpV6Protocol::Tcp);
        rule.remote_ip = "2001:db8::1".into();
        assert_eq!(validate_ipv6(&rule), Err(RuleViolation::Invalid("Remote IP")));

        rule.remote_ip = "2001:db8::/129".into();
        assert_eq!(validate_ipv6(&rule), Err(RuleViolation::Invalid("Remote IP")));

        rule.remote_ip = String::new();
        assert_eq!(validate_ipv6(&rule), Ok(()));
    }

    #[test]
    fn ipv6_local_ip_checked_first() {
        let mut rule = ipv6("", IpV6Protocol::Unknown);
        rule.local_ip = String::new();
        assert_eq!(validate_ipv6(&rule), Err(RuleViolation::Required("Local IP")));

        rule.local_ip = "192.168.1.1".into();
        assert_eq!(validate_ipv6(&rule), Err(RuleViolation::Invalid("Local IP")));
    }

    #[test]
    fn ipv6_service_name_rejects_markup() {
        let mut rule = ipv6("22", IpV6Protocol::Tcp);
        for bad in ["a<b", "a>b", "it's", "100%"] {
            rule.service_name = bad.into();
            assert_eq!(
                validate_ipv6(&rule),
                Err(RuleViolation::ForbiddenChars("Service name")),
                "{bad}"
            );
        }
    }

    // ── Lists ──

    #[test]
    fn oversized_list_rejected_before_rule_checks() {
        let rules = vec![ipv4("", "", IpV4Protocol::Unknown); MAX_RULES + 1];
        let err = validate_rule_lists(Some(&rules), None).unwrap_err();
        assert!(
            matches!(
                err,
                CoreError::TooManyRules { argument: RuleListKind::Ipv4, max: MAX_RULES, count: 129 }
            ),
            "got {err:?}"
        );
    }

    #[test]
    fn list_errors_are_tagged_with_their_list() {
        let good6 = vec![ipv6("22", IpV6Protocol::Tcp)];
        let bad4 = vec![
            ipv4("10.0.0.1", "22", IpV4Protocol::Tcp),
            ipv4("10.0.0.2", "22", IpV4Protocol::Unknown),
        ];
        let err = validate_rule_lists(Some(&bad4), Some(&good6)).unwrap_err();
        assert_eq!(err.to_string(), "Invalid ipv4 rule: A valid Protocol is required.");

        let bad6 = vec![ipv6("256", IpV6Protocol::Other)];
        let err = validate_rule_lists(None, Some(&bad6)).unwrap_err();
        assert!(matches!(err, CoreError::Validation { argument: RuleListKind::Ipv6, .. }));
    }

    #[test]
    fn full_list_of_max_size_is_accepted() {
        let rules = vec![ipv4("10.0.0.1", "22", IpV4Protocol::Tcp); MAX_RULES];
        assert!(validate_rule_lists(Some(&rules), Some(&[])).is_ok());
    }
}
