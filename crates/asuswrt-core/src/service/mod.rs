pub mod firewall;
pub mod router;

pub use firewall::FirewallService;
pub use router::RouterService;
