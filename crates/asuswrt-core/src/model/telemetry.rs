// ── Device telemetry ──
//
// Point-in-time readings built fresh on every call.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::lenient;

/// Time since the router booted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Uptime {
    /// Boot time, when the firmware's date text could be parsed.
    pub since: Option<DateTime<Utc>>,
    pub total_seconds: u64,
}

/// RAM figures in KB.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryUsage {
    #[serde(rename(deserialize = "mem_total"), default, deserialize_with = "lenient::int")]
    pub total: i64,
    #[serde(rename(deserialize = "mem_used"), default, deserialize_with = "lenient::int")]
    pub used: i64,
    #[serde(rename(deserialize = "mem_free"), default, deserialize_with = "lenient::int")]
    pub free: i64,
}

/// Cumulative jiffy counters for one core.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpuCore {
    pub total: i64,
    pub usage: i64,
}

impl CpuCore {
    /// Busy share of `total` in percent, `None` before the counters move.
    #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
    pub fn percent(&self) -> Option<f64> {
        if self.total <= 0 {
            return None;
        }
        Some(self.usage as f64 * 100.0 / self.total as f64)
    }
}

pub const CPU_CORES: usize = 4;

/// Per-core CPU counters. Routers with fewer cores report zeros for the rest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpuUsage {
    pub cores: [CpuCore; CPU_CORES],
}

/// WAN throughput counters, scaled the way the firmware's own UI scales them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Traffic {
    pub sent: u64,
    pub received: u64,
}
