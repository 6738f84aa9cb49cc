// ── Firewall rules ──
//
// Rule list encoding and validation. Both are pure; `FirewallService`
// wires them to the router.

pub mod codec;
pub mod validate;

pub use codec::{
    decode_ipv4_rules, decode_ipv6_rules, parse_ipv4_rules, parse_ipv6_rules, serialize_ipv4_rules,
    serialize_ipv6_rules,
};
pub use validate::{
    InvalidPortRange, MAX_RULES, PortRange, RuleViolation, validate_ipv4, validate_ipv6,
    validate_rule_lists,
};
