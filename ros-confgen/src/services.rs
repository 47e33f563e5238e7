//! Router services and their reply-path pinning.
//!
//! A service reachable on a Domestic link must answer out of that same link,
//! or the reply leaves through whatever the default route picks and the
//! client drops it. Inbound connections are marked per arrival link in the
//! input chain and the router's own replies are routed by that mark in the
//! output chain.

use ros_script::CommandDocument;
use tracing::debug;

use crate::command::CommandLine;
use crate::naming::{link_connection_mark, link_routing_table};
use crate::section::{IP_SERVICE, MANGLE};
use crate::topology::{GeneratorOptions, ServiceMap, Transport, WanLink};

/// `/ip service set` lines for every declared service, in key order.
pub fn service_settings(services: &ServiceMap) -> CommandDocument {
    let mut doc = CommandDocument::new();
    for (key, setting) in services {
        doc.push(
            IP_SERVICE,
            CommandLine::set(Some(key.routeros_name()))
                .opt("disabled", if setting.enabled { "no" } else { "yes" })
                .opt_some("port", setting.port.filter(|p| *p != 0)),
        );
    }
    doc
}

/// Custom ports of enabled services, split by transport.
///
/// Services without a custom port are left out. Ports keep service key
/// order; a port shared by two services is listed once.
pub fn pinned_ports(services: &ServiceMap) -> (Vec<u16>, Vec<u16>) {
    partition_ports(
        services
            .iter()
            .filter_map(|(key, setting)| setting.pinned_port().map(|port| (key.transport(), port))),
    )
}

/// Split `(transport, port)` pairs into deduplicated TCP and UDP port lists.
pub fn partition_ports(entries: impl IntoIterator<Item = (Transport, u16)>) -> (Vec<u16>, Vec<u16>) {
    let mut tcp = Vec::new();
    let mut udp = Vec::new();
    for (transport, port) in entries {
        if transport.carries_tcp() && !tcp.contains(&port) {
            tcp.push(port);
        }
        if transport.carries_udp() && !udp.contains(&port) {
            udp.push(port);
        }
    }
    (tcp, udp)
}

/// Mangle rules pinning service replies to the Domestic link they arrived on.
pub fn mangle_rules(
    domestic_links: &[WanLink],
    services: &ServiceMap,
    opts: &GeneratorOptions,
) -> CommandDocument {
    let (tcp, udp) = pinned_ports(services);
    pin_ports(domestic_links, &tcp, &udp, opts)
}

/// Per link: one input rule per non-empty port list, then one output rule.
///
/// Every management service in the static table is TCP today, so `udp` is
/// empty unless the caller supplies its own ports.
pub fn pin_ports(
    domestic_links: &[WanLink],
    tcp: &[u16],
    udp: &[u16],
    opts: &GeneratorOptions,
) -> CommandDocument {
    let mut doc = CommandDocument::new();
    if tcp.is_empty() && udp.is_empty() {
        return doc;
    }

    for link in domestic_links {
        let name = link.name.trim();
        let mark = link_connection_mark(name);
        for (protocol, ports) in [("tcp", tcp), ("udp", udp)] {
            if ports.is_empty() {
                continue;
            }
            let ports = ports
                .iter()
                .map(u16::to_string)
                .collect::<Vec<_>>()
                .join(",");
            doc.push(
                MANGLE,
                CommandLine::add()
                    .comment(opts.comments, format!("Services via {name}"))
                    .opt("chain", "input")
                    .opt("in-interface", link.interface.trim())
                    .opt("protocol", protocol)
                    .opt("dst-port", ports)
                    .opt("connection-state", "new")
                    .opt("action", "mark-connection")
                    .opt("new-connection-mark", &mark)
                    .opt("passthrough", "yes"),
            );
        }
        doc.push(
            MANGLE,
            CommandLine::add()
                .comment(opts.comments, format!("Service replies via {name}"))
                .opt("chain", "output")
                .opt("connection-mark", &mark)
                .opt("action", "mark-routing")
                .opt("new-routing-mark", link_routing_table(name))
                .opt("passthrough", "no"),
        );
        debug!(link = name, tcp = tcp.len(), udp = udp.len(), "pinned services");
    }
    doc
}
