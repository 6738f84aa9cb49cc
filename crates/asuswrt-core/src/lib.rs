//! Typed domain layer over `asuswrt-api`.
//!
//! - **[`Router`]**: facade for one configured router. Owns a single HTTP
//!   client and session shared by [`RouterService`] (telemetry and settings
//!   reads) and [`FirewallService`] (basic firewall read and replace).
//!
//! - **Decoders** ([`decode`]): raw router bodies (broken JSON, script
//!   getters, hex counters, URL-encoded rule lists) into model records.
//!
//! - **Firewall rules** ([`firewall`]): the rule-list codec and the
//!   validators every write passes before anything is sent.
//!
//! - **Domain model** ([`model`]): `Uptime`, `Client`, `WanStatus`,
//!   `FirewallSettings` and friends.

pub mod config;
pub mod decode;
pub mod error;
pub mod firewall;
pub mod flag;
pub mod model;
pub mod router;
pub mod service;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{DEFAULT_HOSTNAME, RouterConfig, TlsVerification};
pub use error::{CoreError, RuleListKind};
pub use firewall::{MAX_RULES, PortRange, RuleViolation};
pub use router::Router;
pub use service::{FirewallService, RouterService};

pub use model::{
    Client, CpuCore, CpuUsage, DhcpLease, FirewallRuleIpV4, FirewallRuleIpV6, FirewallSettings,
    IpV4Protocol, IpV6Protocol, LanStatus, MemoryUsage, RouterSettings, Traffic, Uptime,
    WanStatus, WebHistoryEntry,
};

// Session and credentials come from the wire layer unchanged.
pub use asuswrt_api::{Credentials, Session};
