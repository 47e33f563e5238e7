use ros_script::CommandDocument;

use super::ClientContext;
use crate::command::CommandLine;
use crate::naming::{endpoint_list, network_routing_table};
use crate::section::{ADDRESS_LIST, INTERFACE_LIST_MEMBER, IP_ROUTE, MANGLE};
use crate::topology::NetworkKind;
use crate::wan::WAN_LIST;

/// Lines every tunnel carries regardless of protocol.
///
/// - membership in the `WAN` interface list, so NAT masquerades out of it
/// - a CheckIP host route through the tunnel
/// - a recursive default route in `to-VPN`, ranked by input position
/// - the remote endpoint in an address list, with an output-chain rule that
///   keeps the tunnel's own packets on the WAN link it was configured for
pub fn base_fragment(server: &str, ctx: &ClientContext<'_>) -> CommandDocument {
    let comments = ctx.opts.comments;
    let endpoints = endpoint_list(&ctx.interface);

    let mut doc = CommandDocument::new();
    doc.push(
        INTERFACE_LIST_MEMBER,
        CommandLine::add()
            .comment(comments, ctx.label("VPN"))
            .opt("interface", &ctx.interface)
            .opt("list", WAN_LIST),
    );
    doc.push(
        IP_ROUTE,
        CommandLine::add()
            .comment(comments, ctx.label("CheckIP"))
            .opt("dst-address", format!("{}/32", ctx.checkip))
            .opt("gateway", &ctx.interface)
            .opt("scope", 10),
    );
    doc.push(
        IP_ROUTE,
        CommandLine::add()
            .comment(comments, ctx.label("VPN via"))
            .opt("dst-address", "0.0.0.0/0")
            .opt("gateway", ctx.checkip)
            .opt("routing-table", network_routing_table(NetworkKind::Vpn))
            .opt("target-scope", 11)
            .opt("check-gateway", "ping")
            .opt("distance", ctx.index + 1),
    );
    doc.push(
        ADDRESS_LIST,
        CommandLine::add()
            .comment(comments, ctx.label("Endpoint of"))
            .opt("list", &endpoints)
            .opt("address", server),
    );
    doc.push(
        MANGLE,
        CommandLine::add()
            .comment(comments, ctx.label("Pin endpoint of"))
            .opt("chain", "output")
            .opt("dst-address-list", &endpoints)
            .opt("action", "mark-routing")
            .opt("new-routing-mark", &ctx.wan_table)
            .opt("passthrough", "no"),
    );
    doc
}

/// `yes`/`no` as RouterOS spells booleans.
pub(super) fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
