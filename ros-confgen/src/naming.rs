//! Deterministic RouterOS object names.
//!
//! User-chosen names end up in interface names, routing tables, connection
//! marks and address lists. [`encode`] maps any string onto the characters
//! those objects accept without losing information, so two different inputs
//! never produce the same object name.

use std::fmt::Write;

use crate::topology::NetworkKind;

/// Encode `name` into `[A-Za-z0-9_-]`.
///
/// ASCII letters, digits and `-` pass through, `_` is doubled and every other
/// byte becomes `_HH` (uppercase hex). Surrounding whitespace is ignored;
/// past that the mapping is reversible, hence injective.
pub fn encode(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for byte in name.trim().bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' => out.push(char::from(byte)),
            b'_' => out.push_str("__"),
            other => {
                let _ = write!(out, "_{other:02X}");
            }
        }
    }
    out
}

/// Interface name for a tunnel: `{tag}-{encoded name}`.
///
/// Tags never contain `-`, so the first `-` always separates tag and name.
pub fn interface_name(name: &str, protocol_tag: &str) -> String {
    format!("{protocol_tag}-{}", encode(name))
}

/// Routing table holding a network's recursive default routes.
pub fn network_routing_table(kind: NetworkKind) -> String {
    format!("to-{}", kind.label())
}

/// Routing table that sends traffic out one specific WAN link.
pub fn link_routing_table(link_name: &str) -> String {
    format!("to-{}", encode(link_name))
}

/// Connection mark for inbound connections that arrived on one WAN link.
pub fn link_connection_mark(link_name: &str) -> String {
    format!("conn-{}", encode(link_name))
}

/// Address list holding a tunnel's remote endpoint.
pub fn endpoint_list(interface: &str) -> String {
    format!("{interface}-endpoint")
}

/// Address list holding the LAN subnets steered into `kind`.
pub fn subnet_list(kind: NetworkKind) -> String {
    format!("{}-LAN", kind.label())
}

/// Quote a value for a RouterOS command line when it needs it.
///
/// Control characters are escaped, so a value never spans script lines.
pub fn quote(value: &str) -> String {
    let plain = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_' | ':' | '/' | ','));
    if plain {
        return value.to_string();
    }
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' | '\\' | '$' | '?' => {
                out.push('\\');
                out.push(c);
            }
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_ascii_control() => {
                let _ = write!(out, "\\{:02X}", u32::from(c));
            }
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::{encode, interface_name, link_connection_mark, link_routing_table, quote};

    #[test]
    fn plain_names_pass_through() {
        assert_eq!(interface_name("ISP-A", "L2TP"), "L2TP-ISP-A");
        assert_eq!(link_routing_table("ISP-A"), "to-ISP-A");
        assert_eq!(link_connection_mark("ISP-A"), "conn-ISP-A");
    }

    #[test]
    fn escapes_are_unambiguous() {
        assert_eq!(encode("a b"), "a_20b");
        assert_eq!(encode("a_20b"), "a__20b");
        assert_ne!(encode("a b"), encode("a_20b"));
    }

    #[test]
    fn distinct_pairs_never_collide() {
        let names = ["home", "home ", "Home", "h_me", "h me", "h-me", "خانه", "x_2D", "x-"];
        let tags = ["Wireguard", "OpenVPN", "PPTP", "L2TP", "SSTP", "IKEv2"];
        let mut seen = HashSet::new();
        for tag in tags {
            for name in names {
                // trailing whitespace is trimmed, so "home " aliases "home"
                if name != name.trim() {
                    continue;
                }
                assert!(seen.insert(interface_name(name, tag)), "{tag}/{name}");
            }
        }
    }

    #[test]
    fn quotes_only_when_needed() {
        assert_eq!(quote("ether1"), "ether1");
        assert_eq!(quote("CheckIP home"), "\"CheckIP home\"");
        assert_eq!(quote("p\"w$"), "\"p\\\"w\\$\"");
    }

    #[test]
    fn control_characters_stay_on_one_line() {
        assert_eq!(quote("p\n/ip route"), "\"p\\n/ip route\"");
        assert_eq!(quote("a\r\tb"), "\"a\\r\\tb\"");
        assert_eq!(quote("bell\u{7}"), "\"bell\\07\"");
        assert!(!quote("x\ny\rz").contains(|c: char| c == '\n' || c == '\r'));
    }
}
