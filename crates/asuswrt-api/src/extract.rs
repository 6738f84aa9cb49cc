// Text extraction for non-JSON router responses
//
// Several endpoints answer with JavaScript fragments, HTML pages or JSON
// that does not parse as-is. Each response shape gets its own small
// grammar here so malformed input can be tested shape by shape. Nothing in
// this module allocates typed records; it only locates the text.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::Error;

// ── Uptime ───────────────────────────────────────────────────────────

/// `"uptime":"<date>(<seconds> secs since boot)"`
static UPTIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""uptime"\s*:\s*"?(?P<date>[^"(]*)\((?P<seconds>[0-9]+)[^)]*\)"#)
        .expect("uptime pattern")
});

/// Pieces of the uptime line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UptimeText<'a> {
    /// Boot date as printed by the firmware, trimmed.
    pub date: &'a str,
    pub seconds: u64,
}

/// Locate the boot date and uptime seconds. `None` when the line is absent.
pub fn uptime(body: &str) -> Option<UptimeText<'_>> {
    let caps = UPTIME_RE.captures(body)?;
    let seconds = caps.name("seconds")?.as_str().parse().ok()?;
    let date = caps.name("date").map_or("", |m| m.as_str().trim());
    Some(UptimeText { date, seconds })
}

// ── JavaScript getter functions ──────────────────────────────────────

/// `function wanlink_ipaddr() { return '1.2.3.4';}`
static JS_FUNCTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"function\s+(?P<name>[A-Za-z0-9_]+)\s*\(\s*\)\s*\{\s*return\s+(?P<value>'[^']*'|"[^"]*"|[^;}]*?)\s*;?\s*\}"#,
    )
    .expect("js function pattern")
});

/// Every `(name, value)` pair defined as a zero-argument getter.
///
/// Quoted values are unquoted; bare values (numbers) are returned as-is.
pub fn js_functions(body: &str) -> Vec<(String, String)> {
    JS_FUNCTION_RE
        .captures_iter(body)
        .filter_map(|caps| {
            let name = caps.name("name")?.as_str();
            let raw = caps.name("value")?.as_str().trim();
            Some((name.to_owned(), unquote(raw).to_owned()))
        })
        .collect()
}

fn unquote(raw: &str) -> &str {
    for quote in ['\'', '"'] {
        if let Some(inner) = raw
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    raw
}

// ── Firewall settings page ───────────────────────────────────────────

static FIREWALL_ENABLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"firewall_enable\s*=\s*'(?P<value>[^']*)'\s*;").expect("firewall_enable pattern")
});

static IPV6_RULES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"ipv6_fw_rulelist_array\s*=\s*"(?P<value>[^"]*)"\s*;"#)
        .expect("ipv6 rule list pattern")
});

static IPV4_RULES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"ipv4_fw_rulelist_array\s*=\s*"(?P<value>[^"]*)"\s*;"#)
        .expect("ipv4 rule list pattern")
});

/// The three script assignments on `Advanced_BasicFirewall_Content.asp`.
///
/// Rule lists are returned still URL-encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirewallPageText<'a> {
    pub enabled: &'a str,
    pub ipv6_rules: &'a str,
    pub ipv4_rules: &'a str,
}

/// Pull the firewall assignments out of the page's inline script.
///
/// All three must be present; there is no sensible default for a
/// half-parsed firewall.
pub fn firewall_page(body: &str) -> Result<FirewallPageText<'_>, Error> {
    let script = body
        .find("<script")
        .map(|start| &body[start..])
        .ok_or(Error::Extraction {
            what: "firewall settings script",
        })?;

    let value = |re: &Regex, what: &'static str| {
        re.captures(script)
            .and_then(|caps| caps.name("value"))
            .map(|m| m.as_str())
            .ok_or(Error::Extraction { what })
    };

    Ok(FirewallPageText {
        enabled: value(&FIREWALL_ENABLE_RE, "firewall_enable")?,
        ipv6_rules: value(&IPV6_RULES_RE, "ipv6_fw_rulelist_array")?,
        ipv4_rules: value(&IPV4_RULES_RE, "ipv4_fw_rulelist_array")?,
    })
}

// ── Wrapped objects ──────────────────────────────────────────────────

/// Find `"key": { ... }` and return the `{ ... }` slice.
///
/// Hooks such as `memory_usage` wrap the payload in a redundant key and the
/// surrounding text is not always valid JSON, so this scans braces directly,
/// skipping over string literals.
pub fn keyed_object<'a>(body: &'a str, key: &str) -> Option<&'a str> {
    let marker = format!("\"{key}\"");
    let after_key = body.find(&marker)? + marker.len();
    let rest = body[after_key..].trim_start().strip_prefix(':')?.trim_start();
    if !rest.starts_with('{') {
        return None;
    }
    let len = balanced_object_len(rest)?;
    Some(&rest[..len])
}

/// Byte length of the object starting at `text[0] == '{'`.
fn balanced_object_len(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (idx, ch) in text.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(idx + 1);
                }
            }
            _ => {}
        }
    }
    None
}

// ── Embedded array literal ───────────────────────────────────────────

/// The array literal embedded in a script fragment: everything from the
/// first `[`, with trailing whitespace and `;` removed.
pub fn array_literal(body: &str) -> Option<&str> {
    let start = body.find('[')?;
    let literal = body[start..].trim().trim_end_matches(';').trim_end();
    Some(literal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uptime_line_with_date_and_seconds() {
        let body = r#"{"uptime":"Mon, 16 Oct 2023 09:12:44 +0800(184953 secs since boot)"}"#;
        let text = uptime(body).expect("uptime");
        assert_eq!(text.date, "Mon, 16 Oct 2023 09:12:44 +0800");
        assert_eq!(text.seconds, 184_953);
    }

    #[test]
    fn uptime_without_quotes_around_value() {
        let text = uptime(r#""uptime":Tue, 02 Jan 2024 00:00:00 +0000(60 secs since boot)"#)
            .expect("uptime");
        assert_eq!(text.seconds, 60);
    }

    #[test]
    fn uptime_missing_is_none() {
        assert!(uptime(r#"{"memory_usage":{}}"#).is_none());
        assert!(uptime(r#""uptime":"garbage without parens""#).is_none());
    }

    #[test]
    fn js_functions_collects_quoted_and_bare_values() {
        let body = "function wanlink_status() { return 1;}\n\
                    function wanlink_statusstr() { return 'Connected';}\n\
                    function wanlink_ipaddr() { return '203.0.113.9';}\n\
                    function wanlink_dns() { return '';}";
        let pairs = js_functions(body);
        assert_eq!(
            pairs,
            vec![
                ("wanlink_status".to_owned(), "1".to_owned()),
                ("wanlink_statusstr".to_owned(), "Connected".to_owned()),
                ("wanlink_ipaddr".to_owned(), "203.0.113.9".to_owned()),
                ("wanlink_dns".to_owned(), String::new()),
            ]
        );
    }

    #[test]
    fn js_functions_on_unrelated_text() {
        assert!(js_functions("<html>nothing here</html>").is_empty());
    }

    #[test]
    fn firewall_page_extracts_all_assignments() {
        let page = r#"<html><head><script>
            var firewall_enable = '1';
            var ipv6_fw_rulelist_array = "%3Cweb%3E%3E2001%3Adb8%3A%3A1%3E80%3ETCP";
            var ipv4_fw_rulelist_array = "";
            </script></head></html>"#;
        let text = firewall_page(page).expect("firewall page");
        assert_eq!(text.enabled, "1");
        assert_eq!(text.ipv6_rules, "%3Cweb%3E%3E2001%3Adb8%3A%3A1%3E80%3ETCP");
        assert_eq!(text.ipv4_rules, "");
    }

    #[test]
    fn firewall_page_missing_assignment_is_error() {
        let page = "<script>var firewall_enable = '0';</script>";
        assert!(matches!(
            firewall_page(page),
            Err(Error::Extraction { what: "ipv6_fw_rulelist_array" })
        ));
        assert!(firewall_page("<html></html>").is_err());
    }

    #[test]
    fn keyed_object_strips_wrapper() {
        let body = r#"{"memory_usage":{"mem_total":"262144","mem_free":"1}2"}}"#;
        assert_eq!(
            keyed_object(body, "memory_usage"),
            Some(r#"{"mem_total":"262144","mem_free":"1}2"}"#)
        );
    }

    #[test]
    fn keyed_object_without_outer_braces() {
        let body = r#""cpu_usage":{"cpu1_total":"10"}"#;
        assert_eq!(keyed_object(body, "cpu_usage"), Some(r#"{"cpu1_total":"10"}"#));
        assert_eq!(keyed_object(body, "memory_usage"), None);
        assert_eq!(keyed_object(r#""cpu_usage":{"unterminated""#, "cpu_usage"), None);
    }

    #[test]
    fn array_literal_trims_semicolon() {
        let body = "var history = [[\"aa\",\"1\",\"x.com\"]];\n";
        assert_eq!(array_literal(body), Some("[[\"aa\",\"1\",\"x.com\"]]"));
        assert_eq!(array_literal("no array"), None);
    }
}
