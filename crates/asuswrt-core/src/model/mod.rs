// ── Domain model ──
//
// Typed records built from router responses. Nothing here touches the
// network; decoders in `crate::decode` construct these from raw bodies.

pub mod client;
pub mod firewall;
pub mod history;
pub(crate) mod lenient;
pub mod network;
pub mod settings;
pub mod telemetry;

pub use client::Client;
pub use firewall::{
    FirewallRuleIpV4, FirewallRuleIpV6, FirewallSettings, IpV4Protocol, IpV6Protocol,
};
pub use history::WebHistoryEntry;
pub use network::{DhcpLease, LAN_STATUS_KEYS, LanStatus, WanStatus};
pub use settings::{ROUTER_SETTINGS_KEYS, RouterSettings};
pub use telemetry::{CPU_CORES, CpuCore, CpuUsage, MemoryUsage, Traffic, Uptime};
