// ── Response decoders ──
//
// Raw router bodies in, domain records out. Fields the router is sloppy
// about degrade to defaults with a warning; a body whose overall shape is
// wrong is a `CoreError::Decode`.

use asuswrt_api::extract;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{trace, warn};

use crate::error::CoreError;
use crate::firewall::{parse_ipv4_rules, parse_ipv6_rules};
use crate::model::lenient;
use crate::model::{
    Client, CpuCore, CpuUsage, DhcpLease, FirewallSettings, MemoryUsage, Traffic,
    Uptime, WanStatus, WebHistoryEntry,
};

fn parse_json<T: DeserializeOwned>(text: &str, what: &str) -> Result<T, CoreError> {
    serde_json::from_str(text).map_err(|e| CoreError::decode(format!("{what}: {e}")))
}

// ── Telemetry ────────────────────────────────────────────────────────

/// `None` when the body carries no uptime line at all.
pub fn uptime(body: &str) -> Option<Uptime> {
    let text = extract::uptime(body)?;
    let since = parse_boot_date(text.date);
    if since.is_none() {
        warn!(date = text.date, "unparseable boot date in uptime");
    }
    Some(Uptime {
        since,
        total_seconds: text.seconds,
    })
}

const NAIVE_DATE_FORMATS: [&str; 3] = [
    "%a, %d %b %Y %H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%d %b %Y %H:%M:%S",
];

fn parse_boot_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// `{"memory_usage":{"mem_total":"...", ...}}`
pub fn memory_usage(body: &str) -> Result<MemoryUsage, CoreError> {
    let object = extract::keyed_object(body, "memory_usage").unwrap_or(body);
    parse_json(object, "memory_usage")
}

/// `{"cpu_usage":{"cpu1_total":"...","cpu1_usage":"...", ...}}`
pub fn cpu_usage(body: &str) -> Result<CpuUsage, CoreError> {
    let object = extract::keyed_object(body, "cpu_usage").unwrap_or(body);
    let counters: Map<String, Value> = parse_json(object, "cpu_usage")?;

    let counter = |name: String| counters.get(&name).map_or(0, lenient::int_from_value);
    let mut usage = CpuUsage::default();
    for (index, core) in usage.cores.iter_mut().enumerate() {
        let n = index + 1;
        *core = CpuCore {
            total: counter(format!("cpu{n}_total")),
            usage: counter(format!("cpu{n}_usage")),
        };
    }
    Ok(usage)
}

/// Hex byte counters from `netdev(appobj)`, scaled to the router UI's
/// figure: `bytes * 8 / 1024 / 1024 / 2`.
pub fn traffic(body: &str) -> Result<Traffic, CoreError> {
    let json: Map<String, Value> = parse_json(body, "netdev")?;
    let netdev = json
        .get("netdev")
        .and_then(Value::as_object)
        .ok_or_else(|| CoreError::decode("netdev object missing"))?;

    let counter = |key: &str| -> Result<u64, CoreError> {
        let raw = netdev
            .get(key)
            .and_then(lenient::text)
            .ok_or_else(|| CoreError::decode(format!("{key} missing")))?;
        scale_hex_counter(&raw)
            .ok_or_else(|| CoreError::decode(format!("{key}: bad counter '{raw}'")))
    };

    Ok(Traffic {
        sent: counter("INTERNET_tx")?,
        received: counter("INTERNET_rx")?,
    })
}

fn scale_hex_counter(raw: &str) -> Option<u64> {
    let digits = raw.get(2..)?;
    let bytes = u128::from_str_radix(digits, 16).ok()?;
    u64::try_from(bytes.checked_mul(8)? / 1024 / 1024 / 2).ok()
}

// ── Clients ──────────────────────────────────────────────────────────

/// `{"get_clientlist":{"<mac>":{...}, "maclist":[...], ...}}`
///
/// Only object values are clients; bookkeeping entries beside them are
/// skipped, as are clients with no MAC.
pub fn clients(body: &str) -> Result<Vec<Client>, CoreError> {
    let json: Map<String, Value> = parse_json(body, "get_clientlist")?;
    let Some(list) = json.get("get_clientlist").and_then(Value::as_object) else {
        return Ok(Vec::new());
    };

    let mut clients = Vec::with_capacity(list.len());
    for value in list.values().filter(|v| v.is_object()) {
        let client = Client::deserialize(value)
            .map_err(|e| CoreError::decode(format!("client: {e}")))?;
        if !client.mac.is_empty() {
            clients.push(client);
        }
    }
    trace!(count = clients.len(), "decoded clients");
    Ok(clients)
}

// ── Network ──────────────────────────────────────────────────────────

/// `None` when the body defines no getter functions.
pub fn wan_status(body: &str) -> Result<Option<WanStatus>, CoreError> {
    let pairs = extract::js_functions(body);
    if pairs.is_empty() {
        return Ok(None);
    }
    let object: Map<String, Value> = pairs
        .into_iter()
        .map(|(name, value)| (name, Value::String(value)))
        .collect();
    serde_json::from_value(Value::Object(object))
        .map(Some)
        .map_err(|e| CoreError::decode(format!("wanlink: {e}")))
}

/// Map merged `nvram_get` results onto a record.
pub fn from_nvram<T: DeserializeOwned>(values: Map<String, Value>) -> Result<T, CoreError> {
    serde_json::from_value(Value::Object(values))
        .map_err(|e| CoreError::decode(format!("nvram: {e}")))
}

/// `{"dhcpLeaseMacList":[["<mac>","<hostname>"], ...]}`
pub fn dhcp_leases(body: &str) -> Result<Vec<DhcpLease>, CoreError> {
    let json: Map<String, Value> = parse_json(body, "dhcpLeaseMacList")?;
    let Some(rows) = json.get("dhcpLeaseMacList").and_then(Value::as_array) else {
        return Ok(Vec::new());
    };

    Ok(rows
        .iter()
        .filter_map(Value::as_array)
        .filter_map(|row| {
            let mac = row.first().and_then(lenient::text)?;
            if mac.trim().is_empty() {
                return None;
            }
            let hostname = row
                .get(1)
                .and_then(lenient::text)
                .filter(|h| !h.is_empty());
            Some(DhcpLease { mac, hostname })
        })
        .collect())
}

// ── Web history ──────────────────────────────────────────────────────

/// The page is script text ending in `[[mac, unix_time, domain], ...];`.
/// Rows with fewer than three columns are dropped.
pub fn web_history(body: &str) -> Result<Vec<WebHistoryEntry>, CoreError> {
    let Some(literal) = extract::array_literal(body) else {
        return Ok(Vec::new());
    };
    let rows: Vec<Vec<Value>> = parse_json(literal, "web history")?;

    Ok(rows
        .iter()
        .filter(|row| row.len() >= 3)
        .map(|row| {
            let column = |i: usize| row.get(i).and_then(lenient::text).unwrap_or_default();
            WebHistoryEntry {
                mac: column(0),
                access_time: unix_time_or_epoch(&column(1)),
                domain: column(2),
            }
        })
        .collect())
}

fn unix_time_or_epoch(raw: &str) -> DateTime<Utc> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .unwrap_or_else(|| {
            warn!(raw, "unparseable web history timestamp");
            DateTime::<Utc>::UNIX_EPOCH
        })
}

// ── Firewall ─────────────────────────────────────────────────────────

/// Decode `Advanced_BasicFirewall_Content.asp`. A page missing any of the
/// three script assignments is an error.
pub fn firewall_settings(body: &str) -> Result<FirewallSettings, CoreError> {
    let page = extract::firewall_page(body)?;
    Ok(FirewallSettings {
        enabled: page.enabled == "1",
        ipv4_rules: parse_ipv4_rules(page.ipv4_rules),
        ipv6_rules: parse_ipv6_rules(page.ipv6_rules),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::{IpV4Protocol, IpV6Protocol, LanStatus, RouterSettings};

    // ── Uptime ──

    #[test]
    fn uptime_with_rfc2822_date() {
        let body = r#"{"uptime":"Mon, 16 Oct 2023 09:12:44 +0800(184953 secs since boot)"}"#;
        let uptime = uptime(body).unwrap();
        assert_eq!(uptime.total_seconds, 184_953);
        assert_eq!(
            uptime.since,
            Some(Utc.with_ymd_and_hms(2023, 10, 16, 1, 12, 44).unwrap())
        );
    }

    #[test]
    fn uptime_keeps_seconds_when_date_is_garbage() {
        let body = r#""uptime":"sometime last week(42 secs since boot)""#;
        let uptime = uptime(body).unwrap();
        assert_eq!(uptime.total_seconds, 42);
        assert_eq!(uptime.since, None);
    }

    #[test]
    fn uptime_absent_is_none() {
        assert_eq!(uptime(r#"{"error":"nope"}"#), None);
    }

    // ── Memory / CPU ──

    #[test]
    fn memory_usage_unwraps_outer_key() {
        let body = r#"{"memory_usage":{"mem_total":"262144","mem_free":"100000","mem_used":162144}}"#;
        assert_eq!(
            memory_usage(body).unwrap(),
            MemoryUsage {
                total: 262_144,
                used: 162_144,
                free: 100_000,
            }
        );
    }

    #[test]
    fn cpu_usage_tolerates_missing_cores() {
        let body = r#"{"cpu_usage":{"cpu1_total":"1000","cpu1_usage":"250","cpu2_total":2000,"cpu2_usage":500}}"#;
        let usage = cpu_usage(body).unwrap();
        assert_eq!(usage.cores[0], CpuCore { total: 1000, usage: 250 });
        assert_eq!(usage.cores[1], CpuCore { total: 2000, usage: 500 });
        assert_eq!(usage.cores[2], CpuCore::default());
        assert_eq!(usage.cores[3], CpuCore::default());
        assert!(usage.cores[0].percent().is_some_and(|p| (p - 25.0).abs() < f64::EPSILON));
        assert_eq!(usage.cores[3].percent(), None);
    }

    // ── Traffic ──

    #[test]
    fn traffic_scaling() {
        let body = r#"{"netdev":{"INTERNET_tx":"0x00000400","INTERNET_rx":"0x40000000"}}"#;
        let traffic = traffic(body).unwrap();
        assert_eq!(traffic.sent, 0x400 * 8 / 1_048_576 / 2);
        assert_eq!(traffic.sent, 0);
        assert_eq!(traffic.received, 0x4000_0000 * 8 / 1024 / 1024 / 2);
        assert_eq!(traffic.received, 4096);
    }

    #[test]
    fn traffic_rejects_bad_counters() {
        assert!(traffic(r#"{"netdev":{"INTERNET_tx":"0xZZ","INTERNET_rx":"0x1"}}"#).is_err());
        assert!(traffic(r#"{"netdev":{"INTERNET_tx":"1","INTERNET_rx":"0x1"}}"#).is_err());
        assert!(traffic(r#"{"netdev":{}}"#).is_err());
        assert!(traffic(r#"{}"#).is_err());
    }

    // ── Clients ──

    #[test]
    fn clients_skip_bookkeeping_and_empty_macs() {
        let body = r#"{"get_clientlist":{
            "AA:BB:CC:DD:EE:01":{"mac":"AA:BB:CC:DD:EE:01","ip":"192.168.1.10","name":"laptop","nickName":"","isOnline":"1","isWL":"2","rssi":-48},
            "AA:BB:CC:DD:EE:02":{"mac":"","ip":"192.168.1.11"},
            "maclist":["AA:BB:CC:DD:EE:01"],
            "ClientAPILevel":"2"
        }}"#;
        let clients = clients(body).unwrap();
        assert_eq!(clients.len(), 1);
        let laptop = &clients[0];
        assert_eq!(laptop.ip.as_deref(), Some("192.168.1.10"));
        assert!(laptop.is_online);
        assert!(!laptop.is_wl);
        assert_eq!(laptop.rssi.as_deref(), Some("-48"));
        assert_eq!(laptop.display_name(), "laptop");
    }

    #[test]
    fn clients_without_wrapper_is_empty() {
        assert!(clients("{}").unwrap().is_empty());
        assert!(clients("not json").is_err());
    }

    // ── Network ──

    #[test]
    fn wan_status_from_getters() {
        let body = "function wanlink_status() { return 1;}\n\
            function wanlink_statusstr() { return 'Connected';}\n\
            function wanlink_type() { return 'dhcp';}\n\
            function wanlink_ipaddr() { return '203.0.113.7';}\n\
            function wanlink_lease() { return 86400;}\n\
            function wanlink_expires() { return 'soon';}\n\
            function is_private_subnet() { return '0';}\n\
            function wanlink_xipaddr() { return '0.0.0.0';}";
        let wan = wan_status(body).unwrap().unwrap();
        assert!(wan.is_online);
        assert_eq!(wan.status.as_deref(), Some("Connected"));
        assert_eq!(wan.link_type.as_deref(), Some("dhcp"));
        assert_eq!(wan.ip_address.as_deref(), Some("203.0.113.7"));
        assert_eq!(wan.lease, 86_400);
        assert_eq!(wan.expires, 0);
        assert!(!wan.is_private_subnet);
        assert_eq!(wan.x_ip_address.as_deref(), Some("0.0.0.0"));
        assert_eq!(wan.gateway, None);
    }

    #[test]
    fn wan_status_without_getters_is_none() {
        assert_eq!(wan_status("<html></html>").unwrap(), None);
    }

    #[test]
    fn nvram_maps_onto_records() {
        let mut values = Map::new();
        values.insert("lan_ipaddr".into(), Value::from("192.168.50.1"));
        values.insert("lan_proto".into(), Value::from("static"));
        values.insert("x_Setting".into(), Value::from("1"));
        values.insert("https_lanport".into(), Value::from(8443));

        let lan: LanStatus = from_nvram(values.clone()).unwrap();
        assert_eq!(lan.ip_address.as_deref(), Some("192.168.50.1"));
        assert_eq!(lan.proto.as_deref(), Some("static"));
        assert_eq!(lan.gateway, None);

        let settings: RouterSettings = from_nvram(values).unwrap();
        assert_eq!(settings.x_setting.as_deref(), Some("1"));
        assert_eq!(settings.https_lanport.as_deref(), Some("8443"));
    }

    #[test]
    fn dhcp_leases_drop_rows_without_mac() {
        let body = r#"{"dhcpLeaseMacList":[["AA:BB:CC:DD:EE:01","laptop"],["",""],["AA:BB:CC:DD:EE:02",""],[]]}"#;
        assert_eq!(
            dhcp_leases(body).unwrap(),
            vec![
                DhcpLease {
                    mac: "AA:BB:CC:DD:EE:01".into(),
                    hostname: Some("laptop".into()),
                },
                DhcpLease {
                    mac: "AA:BB:CC:DD:EE:02".into(),
                    hostname: None,
                },
            ]
        );
    }

    // ── Web history ──

    #[test]
    fn web_history_rows() {
        let body = r#"var array_list = [["AA:BB:CC:DD:EE:01","1697440000","example.com"],["AA:BB:CC:DD:EE:02","1697440001"],["AA:BB:CC:DD:EE:03","yesterday","rust-lang.org"]];
"#;
        let entries = web_history(body).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].domain, "example.com");
        assert_eq!(entries[0].access_time, DateTime::from_timestamp(1_697_440_000, 0).unwrap());
        assert_eq!(entries[1].mac, "AA:BB:CC:DD:EE:03");
        assert_eq!(entries[1].access_time, DateTime::<Utc>::UNIX_EPOCH);
    }

    #[test]
    fn web_history_without_array_is_empty() {
        assert!(web_history("<html>nothing</html>").unwrap().is_empty());
        assert!(web_history("[];").unwrap().is_empty());
    }

    // ── Firewall ──

    #[test]
    fn firewall_page_decodes() {
        let body = r#"<html><head><script>
            var firewall_enable = '1';
            var ipv6_fw_rulelist_array = "%3Cssh%3E%3E2001%3Adb8%3A%3A10%3E22%3ETCP";
            var ipv4_fw_rulelist_array = "%3CUDP%3E%3E10.0.0.5%3E%3E%3E53";
            </script></head></html>"#;
        let settings = firewall_settings(body).unwrap();
        assert!(settings.enabled);
        assert_eq!(settings.ipv6_rules.len(), 1);
        assert_eq!(settings.ipv6_rules[0].protocol, IpV6Protocol::Tcp);
        assert_eq!(settings.ipv6_rules[0].local_ip, "2001:db8::10");
        assert_eq!(settings.ipv4_rules.len(), 1);
        assert_eq!(settings.ipv4_rules[0].protocol, IpV4Protocol::Udp);
    }

    #[test]
    fn firewall_page_without_script_is_error() {
        let err = firewall_settings("<html></html>").unwrap_err();
        assert!(matches!(err, CoreError::Decode { .. }), "got {err:?}");
    }
}
