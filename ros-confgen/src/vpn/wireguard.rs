use ros_script::CommandDocument;

use super::ClientContext;
use crate::command::CommandLine;
use crate::error::BuildError;
use crate::section::{INTERFACE_WIREGUARD, INTERFACE_WIREGUARD_PEERS, IP_ADDRESS};
use crate::topology::WireguardClient;

const DEFAULT_PORT: u16 = 51820;

pub fn build(config: &WireguardClient, ctx: &ClientContext<'_>) -> Result<CommandDocument, BuildError> {
    let comments = ctx.opts.comments;
    let mut doc = CommandDocument::new();
    doc.push(
        INTERFACE_WIREGUARD,
        CommandLine::add()
            .comment(comments, ctx.label("Wireguard"))
            .opt("name", &ctx.interface)
            .opt("private-key", config.private_key.trim())
            .opt_some("mtu", config.mtu),
    );
    doc.push(
        INTERFACE_WIREGUARD_PEERS,
        CommandLine::add()
            .comment(comments, ctx.label("Peer of"))
            .opt("interface", &ctx.interface)
            .opt("public-key", config.public_key.trim())
            .opt_some("preshared-key", config.preshared_key.as_deref().map(str::trim))
            .opt("endpoint-address", config.server.trim())
            .opt("endpoint-port", config.port.unwrap_or(DEFAULT_PORT))
            .opt_some("persistent-keepalive", config.keepalive.map(|s| format!("{s}s")))
            .opt("allowed-address", "0.0.0.0/0"),
    );
    doc.push(
        IP_ADDRESS,
        CommandLine::add()
            .comment(comments, ctx.label("Address of"))
            .opt("address", config.address.trim())
            .opt("interface", &ctx.interface),
    );
    Ok(doc)
}
