//! VPN client fragments.
//!
//! Every protocol module exposes one `build` function with the same shape,
//! `(&Config, &ClientContext) -> Result<CommandDocument, BuildError>`, that
//! returns only the protocol stanza. [`build_client`] validates the client,
//! resolves its CheckIP through the shared plan, dispatches on the variant
//! and appends the base fragment every tunnel carries.

use std::net::Ipv4Addr;

use ros_script::{merge, merge_many, CommandDocument};
use tracing::debug;

use crate::checkip::CheckIpPlan;
use crate::error::BuildError;
use crate::naming::{interface_name, link_routing_table};
use crate::topology::{GeneratorOptions, VpnClient};

mod common;
mod ikev2;
mod l2tp;
mod openvpn;
mod pptp;
mod sstp;
mod wireguard;

pub use common::base_fragment;

/// Everything a protocol builder needs besides its own configuration.
#[derive(Debug, Clone)]
pub struct ClientContext<'a> {
    /// Position of the client in the input list.
    pub index: usize,
    /// Probe address assigned to this client.
    pub checkip: Ipv4Addr,
    /// RouterOS interface name derived from the client name and protocol tag.
    pub interface: String,
    /// Routing table of the WAN link the tunnel itself egresses through.
    pub wan_table: String,
    pub opts: &'a GeneratorOptions,
}

impl ClientContext<'_> {
    /// `comment=` text for lines belonging to this client.
    pub(crate) fn label(&self, what: &str) -> String {
        format!("{what} {}", self.interface)
    }
}

/// Build the full fragment of the client at `index`.
pub fn build_client(
    client: &VpnClient,
    index: usize,
    plan: &CheckIpPlan,
    wan_names: &[&str],
    opts: &GeneratorOptions,
) -> Result<CommandDocument, BuildError> {
    client.validate(index, wan_names)?;
    let checkip = plan.for_vpn(index).ok_or_else(|| BuildError::Unallocated {
        entity: client.entity(index),
        index,
    })?;
    let ctx = ClientContext {
        index,
        checkip,
        interface: interface_name(client.name(), client.protocol().tag()),
        wan_table: link_routing_table(client.wan().trim()),
        opts,
    };

    let stanza = match client {
        VpnClient::Wireguard(c) => wireguard::build(c, &ctx)?,
        VpnClient::OpenVpn(c) => openvpn::build(c, &ctx)?,
        VpnClient::Pptp(c) => pptp::build(c, &ctx)?,
        VpnClient::L2tp(c) => l2tp::build(c, &ctx)?,
        VpnClient::Sstp(c) => sstp::build(c, &ctx)?,
        VpnClient::Ikev2(c) => ikev2::build(c, &ctx)?,
    };
    let base = base_fragment(client.server().trim(), &ctx);

    debug!(
        client = client.name(),
        protocol = %client.protocol(),
        interface = %ctx.interface,
        %checkip,
        "built VPN client fragment"
    );
    Ok(merge(&stanza, &base))
}

/// Build every client with its input index and fold the fragments.
///
/// The first failing client aborts the fold.
pub fn clients_wrapper(
    clients: &[VpnClient],
    plan: &CheckIpPlan,
    wan_names: &[&str],
    opts: &GeneratorOptions,
) -> Result<CommandDocument, BuildError> {
    let fragments = clients
        .iter()
        .enumerate()
        .map(|(index, client)| build_client(client, index, plan, wan_names, opts))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(merge_many(fragments))
}
